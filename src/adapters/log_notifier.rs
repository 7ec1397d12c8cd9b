//! Log-line notification adapter.
//!
//! Stands in for a desktop toast on headless setups: each notification
//! becomes one structured log line.

use tracing::info;

use crate::ports::notify_port::NotifyPort;

#[derive(Debug, Default)]
pub struct LogNotifier;

impl NotifyPort for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        info!(target: "goldwatch::notify", title, body, "notification");
    }
}
