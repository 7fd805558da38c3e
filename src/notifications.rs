use notify_rust::{Notification, Timeout};
use std::sync::Arc;

const NOTIFICATION_TIMEOUT_SECS: u32 = 10;

/// Trait for sending desktop notifications
pub trait NotificationClient: Send + Sync {
    /// Notify when a transcription or build finishes
    fn notify_complete(&self, input_name: &str, success: bool, message: Option<&str>);
}

/// Desktop notification client using notify-rust
pub struct DesktopNotificationClient {
    timeout_seconds: u32,
}

impl DesktopNotificationClient {
    pub fn new(timeout_seconds: u32) -> Self {
        Self { timeout_seconds }
    }
}

impl NotificationClient for DesktopNotificationClient {
    fn notify_complete(&self, input_name: &str, success: bool, message: Option<&str>) {
        let summary = if success {
            "Transcription Completed"
        } else {
            "Transcription Failed"
        };
        let body = format!(
            "'{}' {}\n{}",
            input_name,
            if success {
                "was transcribed successfully"
            } else {
                "could not be transcribed"
            },
            message.unwrap_or("")
        );

        let mut notification = Notification::new();
        notification.summary(summary);
        notification.body(body.trim_end());
        notification.timeout(Timeout::Milliseconds(self.timeout_seconds * 1000));

        if let Err(e) = notification.show() {
            // Fall back to terminal output
            eprintln!("scrib: {} - {}", summary, body.replace('\n', " "));
            eprintln!("(Desktop notification failed: {e})");
        }
    }
}

/// Notification client that discards all notifications.
pub struct NullNotificationClient;

impl NotificationClient for NullNotificationClient {
    fn notify_complete(&self, _input_name: &str, _success: bool, _message: Option<&str>) {}
}

/// Creates the default notification client. Set `SCRIB_NO_NOTIFY` to disable
/// desktop notifications (useful in scripts and CI).
pub fn create_notification_client() -> Arc<dyn NotificationClient> {
    if std::env::var("SCRIB_NO_NOTIFY").is_ok() {
        Arc::new(NullNotificationClient)
    } else {
        Arc::new(DesktopNotificationClient::new(NOTIFICATION_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_client_no_panic() {
        let client = NullNotificationClient;
        client.notify_complete("audio.mp3", true, None);
        client.notify_complete("audio.mp3", false, Some("boom"));
    }

    #[test]
    fn test_create_notification_client() {
        // Just ensure construction never panics regardless of environment
        let _client = create_notification_client();
    }
}
