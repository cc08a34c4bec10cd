//! Registration submission and its validation

use super::model::{OTHER_COURSE, normalize_email};
use crate::core::error::ValidationError;
use crate::core::field::FieldFormat;
use crate::core::validation::{filters, validators};
use serde::{Deserialize, Serialize};

/// Registration submission as received from the client
///
/// Every field is optional at the wire level: an absent field is reported
/// as "missing required fields" rather than a JSON parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub course: Option<String>,
    pub custom_course: Option<String>,
    pub experience: Option<String>,
}

impl RegistrationInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        course: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
            course: Some(course.into()),
            ..Default::default()
        }
    }

    pub fn with_custom_course(mut self, custom_course: impl Into<String>) -> Self {
        self.custom_course = Some(custom_course.into());
        self
    }

    pub fn with_experience(mut self, experience: impl Into<String>) -> Self {
        self.experience = Some(experience.into());
        self
    }

    /// Apply the registration rules, first violation wins:
    ///
    /// 1. name, email, phone and course are non-empty after trimming
    /// 2. email has the `local@domain.tld` shape
    /// 3. phone is digits, `+`, `-`, spaces or parentheses, 10+ characters
    /// 4. course "Other" requires a non-empty custom course
    pub fn validate(&self) -> Result<NewRegistration, ValidationError> {
        let trim = filters::trim();
        let name = filters::apply(&trim, self.name.as_deref());
        let email = filters::apply(&trim, self.email.as_deref());
        let phone = filters::apply(&trim, self.phone.as_deref());
        let course = filters::apply(&trim, self.course.as_deref());
        let custom_course = filters::apply(&trim, self.custom_course.as_deref());
        let experience = filters::apply(&trim, self.experience.as_deref());

        let required = validators::required();
        let all_present = [
            ("name", &name),
            ("email", &email),
            ("phone", &phone),
            ("course", &course),
        ]
        .iter()
        .all(|(field, value)| required(*field, value.as_str()).is_ok());
        if !all_present {
            return Err(ValidationError::MissingRequiredFields);
        }

        if validators::format(FieldFormat::Email)("email", email.as_str()).is_err() {
            return Err(ValidationError::InvalidEmail);
        }

        if validators::format(FieldFormat::Phone)("phone", phone.as_str()).is_err() {
            return Err(ValidationError::InvalidPhone);
        }

        let custom_course = if course == OTHER_COURSE {
            if required("customCourse", custom_course.as_str()).is_err() {
                return Err(ValidationError::MissingCourseDetail);
            }
            custom_course
        } else {
            String::new()
        };

        Ok(NewRegistration {
            name,
            email: normalize_email(&email),
            phone,
            course,
            custom_course,
            experience,
        })
    }
}

/// A submission that passed validation
///
/// Strings are trimmed and the email is lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub course: String,
    pub custom_course: String,
    pub experience: String,
}
