//! Two-step registration wizard.
//!
//! Step one collects personal details, step two the password and consents.
//! The same personal-info check guards both advancing and submitting.

use std::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use momos_mart_core::Email;

use super::checkbox;
use crate::backend::RegistrationRequest;

/// Characters that count as "special" for password strength.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Wizard position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStep {
    #[default]
    PersonalInfo,
    Security,
}

impl RegistrationStep {
    /// One-based step number for the progress indicator.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::PersonalInfo => 1,
            Self::Security => 2,
        }
    }
}

/// First failed registration check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("Please fill in all required fields")]
    MissingRequired,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 8 characters with uppercase, lowercase, and number")]
    PasswordPolicy,

    #[error("Please accept the terms and conditions")]
    TermsNotAccepted,
}

/// Step one fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
}

impl PersonalInfo {
    /// Check the required names and the email format.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::MissingRequired`] when a name or the
    /// email is blank, [`RegistrationError::InvalidEmail`] when the email
    /// is malformed.
    pub fn validate(&self) -> Result<Email, RegistrationError> {
        if self.first_name.trim().is_empty()
            || self.last_name.trim().is_empty()
            || self.email.trim().is_empty()
        {
            return Err(RegistrationError::MissingRequired);
        }

        Email::parse(self.email.trim()).map_err(|_| RegistrationError::InvalidEmail)
    }
}

/// Step two fields, as submitted.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct SecurityInput {
    pub password: String,
    pub confirm_password: String,
    #[serde(deserialize_with = "checkbox")]
    pub accept_terms: bool,
    #[serde(deserialize_with = "checkbox")]
    pub subscribe_newsletter: bool,
}

impl fmt::Debug for SecurityInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityInput")
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .field("accept_terms", &self.accept_terms)
            .field("subscribe_newsletter", &self.subscribe_newsletter)
            .finish()
    }
}

/// Wizard state kept in the session. Never holds a password.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDraft {
    pub step: RegistrationStep,
    pub personal: PersonalInfo,
    pub subscribe_newsletter: bool,
}

impl RegistrationDraft {
    /// Store step one input and move to step two if it is valid.
    ///
    /// The input is kept either way so the form re-renders with it.
    ///
    /// # Errors
    ///
    /// Returns the personal-info check failure; the step does not change.
    pub fn advance(&mut self, personal: PersonalInfo) -> Result<(), RegistrationError> {
        self.personal = personal;
        self.personal.validate()?;
        self.step = RegistrationStep::Security;
        Ok(())
    }

    /// Return to step one, keeping all data.
    pub fn back(&mut self) {
        self.step = RegistrationStep::PersonalInfo;
    }

    /// Run the full submission guard and build the backend payload.
    ///
    /// Checks run in order: required fields, email format, password
    /// confirmation, password policy, terms.
    ///
    /// # Errors
    ///
    /// Returns the first failed check.
    pub fn submit(&self, security: &SecurityInput) -> Result<RegistrationRequest, RegistrationError> {
        if security.password.is_empty() {
            return Err(RegistrationError::MissingRequired);
        }
        let email = self.personal.validate()?;

        if security.password != security.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }

        if !PasswordChecks::evaluate(&security.password).meets_policy() {
            return Err(RegistrationError::PasswordPolicy);
        }

        if !security.accept_terms {
            return Err(RegistrationError::TermsNotAccepted);
        }

        let personal = &self.personal;
        Ok(RegistrationRequest {
            first_name: personal.first_name.trim().to_owned(),
            last_name: personal.last_name.trim().to_owned(),
            email,
            phone: personal.phone.trim().to_owned(),
            password: SecretString::from(security.password.as_str()),
            address: personal.address.trim().to_owned(),
            city: personal.city.trim().to_owned(),
            subscribe_newsletter: security.subscribe_newsletter,
        })
    }
}

/// The five password character-class checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct PasswordChecks {
    pub length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub number: bool,
    pub special: bool,
}

impl PasswordChecks {
    /// Evaluate `password`.
    #[must_use]
    pub fn evaluate(password: &str) -> Self {
        Self {
            length: password.chars().count() >= MIN_PASSWORD_LENGTH,
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            number: password.chars().any(|c| c.is_ascii_digit()),
            special: password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
        }
    }

    /// Number of checks passed, 0 to 5.
    #[must_use]
    pub fn score(self) -> u8 {
        [
            self.length,
            self.uppercase,
            self.lowercase,
            self.number,
            self.special,
        ]
        .into_iter()
        .map(u8::from)
        .sum()
    }

    /// Minimum accepted password: length, lowercase and digit.
    #[must_use]
    pub const fn meets_policy(self) -> bool {
        self.length && self.lowercase && self.number
    }

    /// Strength meter reading.
    #[must_use]
    pub fn strength(self) -> PasswordStrength {
        PasswordStrength::from_score(self.score())
    }
}

/// Strength meter reading. Presentational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    /// Reading for a check score.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            0 | 1 => Self::Weak,
            2 | 3 => Self::Fair,
            4 => Self::Good,
            _ => Self::Strong,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Strong => "Strong",
        }
    }

    /// Colour name used by the meter's CSS classes.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Weak => "red",
            Self::Fair => "yellow",
            Self::Good => "blue",
            Self::Strong => "green",
        }
    }
}
