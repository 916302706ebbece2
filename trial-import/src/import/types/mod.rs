//! Core types for trial import

mod cell;
mod date;
mod record;
mod trial;
mod workbook;

pub use cell::*;
pub use date::*;
pub use record::*;
pub use trial::*;
pub use workbook::*;
