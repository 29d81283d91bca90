//! Form input as the user typed it, and the requests built from it
//!
//! Validation is deliberately shallow: required fields must be non-empty and
//! amounts must be numbers. Email format and password strength are the
//! server's business.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::opportunity::{parse_amount, NewOpportunity, OpportunityStatus};

/// Why a form was refused before any request went out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    /// A required field is empty
    MissingField,
    /// The amount field does not hold a number
    InvalidValue,
}

/// Sign-up form fields
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Log-in form fields
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Body of `POST /signup`
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /login`
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl SignupForm {
    pub fn validate(&self) -> Result<SignupRequest, FormError> {
        if self.username.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err(FormError::MissingField);
        }
        Ok(SignupRequest {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, FormError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(FormError::MissingField);
        }
        Ok(LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

/// The add-opportunity form: a name and an amount typed as text
#[derive(Debug, Clone, Default)]
pub struct OpportunityForm {
    pub name: String,
    pub value: String,
}

impl OpportunityForm {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn validate(&self) -> Result<NewOpportunity, FormError> {
        if self.name.is_empty() || self.value.is_empty() {
            return Err(FormError::MissingField);
        }
        let value = parse_amount(&self.value).ok_or(FormError::InvalidValue)?;
        Ok(NewOpportunity::open(self.name.clone(), value))
    }
}

/// Edits to an existing opportunity; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct OpportunityChanges {
    pub name: Option<String>,
    pub value: Option<String>,
    pub status: Option<String>,
}

/// Validated form of [`OpportunityChanges`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedChanges {
    pub name: Option<String>,
    pub value: Option<Decimal>,
    pub status: Option<OpportunityStatus>,
}

impl OpportunityChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.value.is_none() && self.status.is_none()
    }

    pub fn validate(&self) -> Result<ValidatedChanges, FormError> {
        if self.is_empty() {
            return Err(FormError::MissingField);
        }
        let name = match &self.name {
            Some(name) if name.is_empty() => return Err(FormError::MissingField),
            other => other.clone(),
        };
        let value = match &self.value {
            Some(text) if text.is_empty() => return Err(FormError::MissingField),
            Some(text) => Some(parse_amount(text).ok_or(FormError::InvalidValue)?),
            None => None,
        };
        let status = match &self.status {
            Some(status) if status.is_empty() => return Err(FormError::MissingField),
            Some(status) => Some(OpportunityStatus::from(status.as_str())),
            None => None,
        };
        Ok(ValidatedChanges { name, value, status })
    }
}
