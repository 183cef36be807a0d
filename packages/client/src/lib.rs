//! TaskMaster client
//!
//! Session management and a typed client for the TaskMaster REST API. The
//! [`SessionManager`] owns the bearer token and its persisted copy; the
//! [`TaskClient`] borrows it to authenticate every task request.

pub mod api;
pub mod board;
pub mod client;
pub mod config;
pub mod error;
pub mod notice;
pub mod session;
pub mod storage;

use std::sync::Arc;

// Re-export commonly used types
pub use api::RegisteredUser;
pub use board::TaskBoard;
pub use client::TaskClient;
pub use config::{ClientConfig, ClientConfigBuilder, Environment};
pub use error::{ClientError, ClientResult};
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use session::{AuthState, Session, SessionManager};
pub use storage::{FileSessionStore, MemorySessionStore, SessionStore, StoredSession};

pub use taskmaster_core::{
    SignupForm, Task, TaskCreateInput, TaskId, TaskSearch, TaskStatus, TaskTab, TaskUpdateInput,
    ValidationError,
};

/// Default configuration for the client
pub fn default_config() -> ClientConfig {
    ClientConfig::default()
}

/// Load configuration, restore the persisted session, and build a task client
pub async fn init() -> ClientResult<(Arc<SessionManager>, TaskClient)> {
    let config = ClientConfig::load().await?;
    config.validate()?;
    connect(&config).await
}

/// Restore the session named by `config` and build a task client on top of it
pub async fn connect(config: &ClientConfig) -> ClientResult<(Arc<SessionManager>, TaskClient)> {
    let session = Arc::new(SessionManager::from_config(config).await?);
    let client = TaskClient::new(session.clone());
    Ok((session, client))
}
