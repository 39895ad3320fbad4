//! Models Module - Data Structures & Errors
//!
//! Single source of truth for the report model and the error taxonomy.

pub mod errors;
pub mod report;

pub use errors::*;
pub use report::*;
