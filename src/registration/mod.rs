//! Registration store: validated, email-deduplicated, durably persisted
//! registrations

pub mod descriptor;
pub mod handlers;
pub mod input;
pub mod model;
pub mod store;

pub use descriptor::RegistrationDescriptor;
pub use input::{NewRegistration, RegistrationInput};
pub use model::{OTHER_COURSE, RegistrationRecord, RegistrationStatus, RegistrationSummary};
pub use store::RegistrationStore;
