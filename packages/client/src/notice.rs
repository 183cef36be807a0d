//! Feedback notices shown after an operation
//!
//! Errors stay until dismissed. Success notices clear themselves once the
//! configured timeout has elapsed.

use std::time::{Duration, Instant};

use taskmaster_core::DEFAULT_NOTICE_TIMEOUT_MS;

use crate::config::ClientConfig;
use crate::error::ClientResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub posted_at: Instant,
}

#[derive(Debug, Clone)]
pub struct NoticeBoard {
    timeout: Duration,
    success: Option<Notice>,
    error: Option<Notice>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_NOTICE_TIMEOUT_MS))
    }
}

impl NoticeBoard {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            success: None,
            error: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.notice_timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn post_success(&mut self, message: impl Into<String>) {
        self.post_success_at(message, Instant::now());
    }

    pub fn post_success_at(&mut self, message: impl Into<String>, now: Instant) {
        self.success = Some(Notice {
            kind: NoticeKind::Success,
            message: message.into(),
            posted_at: now,
        });
    }

    pub fn post_error(&mut self, message: impl Into<String>) {
        self.error = Some(Notice {
            kind: NoticeKind::Error,
            message: message.into(),
            posted_at: Instant::now(),
        });
    }

    /// Post the outcome of an operation: `success` on `Ok`, the error text on `Err`
    pub fn report<T>(&mut self, result: &ClientResult<T>, success: &str) {
        match result {
            Ok(_) => {
                self.error = None;
                self.post_success(success);
            }
            Err(e) => self.post_error(e.to_string()),
        }
    }

    /// The success notice, unless it has expired by `now`
    pub fn success_at(&self, now: Instant) -> Option<&Notice> {
        self.success
            .as_ref()
            .filter(|notice| now.saturating_duration_since(notice.posted_at) < self.timeout)
    }

    pub fn success(&self) -> Option<&Notice> {
        self.success_at(Instant::now())
    }

    pub fn error(&self) -> Option<&Notice> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
