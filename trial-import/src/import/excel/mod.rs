//! Workbook reading (xlsx, xls, ods) via calamine

mod reader;

pub use reader::read_workbook_file;
