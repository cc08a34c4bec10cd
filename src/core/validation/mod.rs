//! Validation and filtering primitives
//!
//! Filters normalize raw request strings (trim, case folding) and validators
//! check them. Domain types compose these into their own ordered rules.

pub mod extractor;
pub mod filters;
pub mod validators;

pub use extractor::{ValidJson, ValidQuery};
