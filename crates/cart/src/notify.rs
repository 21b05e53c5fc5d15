//! User-facing notifications (toasts).
//!
//! The store fires a [`Notice`] for every validation failure and error, and a
//! success notice after each committed mutation. Delivery is fire-and-forget.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A single user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Sink for user-facing messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}

/// Writes notices to the log. Used by the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => info!(notice = %notice.message, "Cart notice"),
            NoticeLevel::Error => warn!(notice = %notice.message, "Cart notice"),
        }
    }
}

/// Collects notices so a UI can drain them into toasts.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferedNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl BufferedNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending notice, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Copy of the pending notices without consuming them.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Pending error messages, oldest first.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.snapshot()
            .into_iter()
            .filter(Notice::is_error)
            .map(|notice| notice.message)
            .collect()
    }
}

impl Notifier for BufferedNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
