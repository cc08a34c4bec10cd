//! Core module containing the error taxonomy, validation primitives and
//! storage traits

pub mod error;
pub mod field;
pub mod service;
pub mod validation;

pub use error::{ApiError, EnrollError, EnrollResult};
pub use field::FieldFormat;
pub use service::CollectionStore;
pub use validation::{ValidJson, ValidQuery};
