//! Notification delivery port trait.

/// Sink for alert notifications: desktop toast, log line, webhook, or
/// whatever the host platform provides. Invoked once per alert transition
/// into the triggered state; fire-and-forget, never retried.
pub trait NotifyPort {
    fn notify(&self, title: &str, body: &str);
}
