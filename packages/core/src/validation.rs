// ABOUTME: Client-side validation run before any request leaves the process
// ABOUTME: Task titles, due dates, and signup credentials

use thiserror::Error;

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::types::{SignupForm, TaskCreateInput, TaskUpdateInput};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Task title cannot be empty")]
    EmptyTitle,

    #[error("Invalid due date '{0}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDueDate(String),

    #[error("Unknown task status: {0}")]
    UnknownStatus(String),

    #[error("Email cannot be empty")]
    MissingEmail,

    #[error("Password cannot be empty")]
    MissingPassword,

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Validate a task title, returning the trimmed value
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

pub fn validate_task_create(input: &TaskCreateInput) -> Result<(), ValidationError> {
    validate_title(&input.title).map(|_| ())
}

/// A patch may omit the title, but cannot blank it
pub fn validate_task_update(input: &TaskUpdateInput) -> Result<(), ValidationError> {
    match &input.title {
        Some(title) => validate_title(title).map(|_| ()),
        None => Ok(()),
    }
}

/// Login only checks presence; length rules apply at signup
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Validate a signup form: confirmation first, then length, as the form reports them
pub fn validate_signup(form: &SignupForm) -> Result<(), ValidationError> {
    if form.email.trim().is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if let Some(confirm) = &form.confirm_password {
        if confirm != &form.password {
            return Err(ValidationError::PasswordMismatch);
        }
    }
    validate_password(&form.password)
}
