//! Registration record and its projections

use super::input::NewRegistration;
use crate::core::error::ValidationError;
use crate::core::validation::filters;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Course value that requires a free-text `customCourse`
pub const OTHER_COURSE: &str = "Other";

/// Review state of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = ValidationError;

    /// Exact, case-sensitive match on the wire names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RegistrationStatus::Pending),
            "approved" => Ok(RegistrationStatus::Approved),
            "rejected" => Ok(RegistrationStatus::Rejected),
            other => Err(ValidationError::InvalidStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// A persisted registration
///
/// Field names on disk are camelCase (`customCourse`, `registrationDate`,
/// `lastUpdated`) so collections written by earlier deployments load as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub course: String,
    #[serde(default)]
    pub custom_course: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub status: RegistrationStatus,
    pub registration_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl RegistrationRecord {
    /// Build a fresh pending record from validated input
    pub fn new(input: NewRegistration, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            course: input.course,
            custom_course: input.custom_course,
            experience: input.experience,
            status: RegistrationStatus::Pending,
            registration_date: now,
            last_updated: now,
        }
    }

    /// Email as used for duplicate detection
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }

    /// Change the status and move `last_updated` forward
    ///
    /// `last_updated` always ends up strictly later than its previous value,
    /// even when the clock has not advanced since the last mutation.
    pub fn set_status(&mut self, status: RegistrationStatus, now: DateTime<Utc>) {
        let floor = self.last_updated + Duration::milliseconds(1);
        self.status = status;
        self.last_updated = now.max(floor);
    }

    pub fn summary(&self) -> RegistrationSummary {
        RegistrationSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            course: self.course.clone(),
            custom_course: self.custom_course.clone(),
            status: self.status,
            registration_date: self.registration_date,
        }
    }
}

/// Projection handed to untrusted callers: no phone, no experience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub course: String,
    pub custom_course: String,
    pub status: RegistrationStatus,
    pub registration_date: DateTime<Utc>,
}

pub(crate) fn normalize_email(email: &str) -> String {
    filters::lowercase()(email)
}
