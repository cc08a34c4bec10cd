//! Registration store
//!
//! Every mutation loads the whole collection, changes it in memory and saves
//! the whole collection back. Mutations of one store instance are serialized
//! by an async mutex held across that read-modify-write cycle, so concurrent
//! requests never lose each other's writes.

use super::input::RegistrationInput;
use super::model::{RegistrationRecord, RegistrationStatus};
use crate::core::error::{ConflictError, EnrollResult, NotFoundError};
use crate::core::service::CollectionStore;
use crate::notify::{self, LogNotifier, Notifier};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct RegistrationStore {
    storage: Arc<dyn CollectionStore<RegistrationRecord>>,
    write_lock: Mutex<()>,
    notifier: Arc<dyn Notifier>,
}

impl RegistrationStore {
    pub fn new(storage: Arc<dyn CollectionStore<RegistrationRecord>>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Validate, deduplicate by email and persist a new registration
    ///
    /// Returns the stored record, always `pending`. A duplicate email leaves
    /// the existing record untouched.
    pub async fn register(&self, input: &RegistrationInput) -> EnrollResult<RegistrationRecord> {
        let new = input.validate()?;

        let record = {
            let _guard = self.write_lock.lock().await;
            let mut records = self.storage.load().await?;

            if records.iter().any(|r| r.normalized_email() == new.email) {
                debug!(course = %new.course, "duplicate registration rejected");
                return Err(ConflictError::EmailAlreadyRegistered.into());
            }

            let record = RegistrationRecord::new(new, Utc::now());
            records.push(record.clone());
            self.storage.save(&records).await?;

            info!(
                registration_id = %record.id,
                course = %record.course,
                total = records.len(),
                "registration stored"
            );
            record
        };

        let created = record.clone();
        notify::dispatch(&self.notifier, move |notifier| async move {
            notifier.registration_created(&created).await;
        });

        Ok(record)
    }

    pub async fn get(&self, id: &str) -> EnrollResult<RegistrationRecord> {
        let records = self.storage.load().await?;
        records.into_iter().find(|r| r.id == id).ok_or_else(|| {
            NotFoundError::Registration { id: id.to_string() }.into()
        })
    }

    /// All records in insertion order
    pub async fn list_all(&self) -> EnrollResult<Vec<RegistrationRecord>> {
        Ok(self.storage.load().await?)
    }

    /// Set the status of one record
    ///
    /// The status string is checked before the id is looked up.
    pub async fn update_status(&self, id: &str, status: &str) -> EnrollResult<RegistrationRecord> {
        let status: RegistrationStatus = status.parse()?;

        let _guard = self.write_lock.lock().await;
        let mut records = self.storage.load().await?;

        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| NotFoundError::Registration { id: id.to_string() })?;
        record.set_status(status, Utc::now());
        let updated = record.clone();

        self.storage.save(&records).await?;

        info!(registration_id = %updated.id, status = %updated.status, "registration status updated");
        Ok(updated)
    }
}
