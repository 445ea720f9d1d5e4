//! User-facing notifications.
//!
//! Components never fail loudly: a failed backend call becomes a
//! [`NotificationMsg`] that the host program can render as a toast or status
//! line, while the component keeps its last good state.

use bubbletea_rs::{Cmd, Msg};
use std::fmt;
use std::time::Duration;

/// How long a notification should stay visible unless told otherwise.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// An operation completed.
    Success,
    /// Neutral information.
    Info,
    /// Something degraded but still works.
    Warning,
    /// A backend call failed.
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Level::Success => "success",
                Level::Info => "info",
                Level::Warning => "warning",
                Level::Error => "error",
            }
        )
    }
}

/// A message for the host to show to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMsg {
    /// Severity.
    pub level: Level,
    /// Text to show.
    pub message: String,
    /// How long to show it.
    pub duration: Duration,
}

impl NotificationMsg {
    /// Creates a notification shown for [`DEFAULT_DURATION`].
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            duration: DEFAULT_DURATION,
        }
    }

    /// Overrides how long the notification stays visible.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

impl From<NotificationMsg> for Msg {
    fn from(msg: NotificationMsg) -> Self {
        Box::new(msg) as Msg
    }
}

/// A command delivering a notification to the program.
///
/// # Examples
///
/// ```rust
/// use bubbletea_hexview::notify::{notify, Level, NotificationMsg};
///
/// # async fn run() {
/// let msg = notify(Level::Warning, "file changed on disk").await.unwrap();
/// let note = msg.downcast_ref::<NotificationMsg>().unwrap();
/// assert_eq!(note.level, Level::Warning);
/// # }
/// ```
pub fn notify(level: Level, message: impl Into<String>) -> Cmd {
    let msg = NotificationMsg::new(level, message);
    Box::pin(async move { Some(Msg::from(msg)) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn notify_delivers_message() {
        let msg = notify(Level::Error, "read failed").await.expect("message");
        let n = msg.downcast_ref::<NotificationMsg>().expect("notification");
        assert_eq!(n.level, Level::Error);
        assert_eq!(n.message, "read failed");
        assert_eq!(n.duration, DEFAULT_DURATION);
    }

    #[test]
    fn level_display() {
        assert_eq!(Level::Warning.to_string(), "warning");
    }
}
