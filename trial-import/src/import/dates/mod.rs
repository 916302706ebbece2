//! Date token interpretation

mod general;
mod interpreter;

pub use general::{parse_general, serial_to_date};
pub use interpreter::DateInterpreter;
