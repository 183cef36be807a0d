// ABOUTME: Core types, validation, and constants for TaskMaster
// ABOUTME: Foundational package shared by the API client and the CLI

pub mod constants;
pub mod datetime;
pub mod types;
pub mod validation;

// Re-export main types
pub use types::{
    split_tags, SignupForm, Task, TaskCreateInput, TaskId, TaskSearch, TaskStatus, TaskTab,
    TaskUpdateInput,
};

// Re-export constants
pub use constants::{
    config_file, session_file, taskmaster_dir, DEFAULT_DEVELOPMENT_URL, DEFAULT_NOTICE_TIMEOUT_MS,
    DEFAULT_REQUEST_TIMEOUT_SECS, MIN_PASSWORD_LENGTH,
};

// Re-export validation
pub use validation::{
    validate_credentials, validate_password, validate_signup, validate_task_create,
    validate_task_update, validate_title, ValidationError,
};
