// ABOUTME: Shared constants and well-known paths for TaskMaster
// ABOUTME: Local data directory, session file location, and client-side limits

use std::env;
use std::path::PathBuf;

/// Minimum number of characters accepted for an account password
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// How long a success notice stays visible before it clears itself
pub const DEFAULT_NOTICE_TIMEOUT_MS: u64 = 3_000;

/// Per-request timeout applied to every API call
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// API base URL used in the development environment
pub const DEFAULT_DEVELOPMENT_URL: &str = "http://localhost:8000";

/// Get the path to the TaskMaster directory (~/.taskmaster)
pub fn taskmaster_dir() -> PathBuf {
    // HOME wins so tests can redirect it
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".taskmaster")
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".taskmaster")
    }
}

/// Get the path to the persisted session file (~/.taskmaster/session.toml)
pub fn session_file() -> PathBuf {
    taskmaster_dir().join("session.toml")
}

/// Get the path to the client configuration file
pub fn config_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(taskmaster_dir)
        .join("taskmaster")
        .join("config.toml")
}
