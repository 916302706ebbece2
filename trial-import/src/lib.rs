//! Agricultural trial workbook import
//!
//! Reads a workbook with one sheet per assessment date and produces a
//! normalized [`Trial`](import::Trial): grid layout, assessment types,
//! per-date values and the date readings that still need a human decision.

pub mod config;
pub mod import;

pub use config::ImportConfig;
pub use import::{
    DateInterpreter, ImportError, ImportReport, Trial, Workbook, import_bytes, import_file,
    import_workbook,
};
