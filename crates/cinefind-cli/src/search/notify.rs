//! Transient user notifications.

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    /// Something the user should fix or be told about.
    Error,
    /// Informational message.
    Info,
}

/// A short, non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity tag.
    pub level: NotifyLevel,
    /// Message text.
    pub message: String,
}

impl Notification {
    /// Creates an error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotifyLevel::Error,
            message: message.into(),
        }
    }

    /// Creates an info notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotifyLevel::Info,
            message: message.into(),
        }
    }
}

/// Sink for transient notifications.
///
/// Fire and forget: there is no return value and no acknowledgement.
pub trait Notifier {
    /// Delivers one notification.
    fn notify(&mut self, notification: Notification);
}

/// Notifier that forwards messages to `tracing`.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: Notification) {
        match notification.level {
            NotifyLevel::Error => tracing::warn!("{}", notification.message),
            NotifyLevel::Info => tracing::info!("{}", notification.message),
        }
    }
}

#[cfg(test)]
impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}
