use vca_application::Alerts;

/// Alerts for headless runs: the message goes to stderr.
#[derive(Debug, Default)]
pub struct ConsoleAlerts;

impl Alerts for ConsoleAlerts {
    fn alert(&self, message: &str) {
        tracing::debug!(message, "alert raised");
        eprintln!("{message}");
    }
}
