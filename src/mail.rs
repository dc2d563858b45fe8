//! Best-effort outbound mail. Messages are spooled to files under the data
//! directory; failures are logged and never surface to the request path.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use uuid::Uuid;

/// Spool-file mail transport. Callers fire and forget; a registering
/// request never blocks on delivery outcome.
#[derive(Debug, Clone)]
pub struct Mailer {
    outbox: PathBuf,
}

impl Mailer {
    #[must_use]
    pub fn new(outbox: PathBuf) -> Self {
        Self { outbox }
    }

    pub fn send(&self, to: &str, subject: &str, body: &str) {
        match self.spool(to, subject, body) {
            Ok(path) => tracing::info!("mail to {} spooled at {}", to, path.display()),
            Err(e) => tracing::warn!("failed to spool mail to {}: {}", to, e),
        }
    }

    fn spool(&self, to: &str, subject: &str, body: &str) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.outbox)?;

        let name = format!(
            "{}-{}.eml",
            Utc::now().format("%Y%m%dT%H%M%S"),
            &Uuid::new_v4().to_string()[..8]
        );
        let path = self.outbox.join(name);
        let message = format!("To: {to}\nSubject: {subject}\nDate: {}\n\n{body}\n", Utc::now().to_rfc2822());
        fs::write(&path, message)?;
        Ok(path)
    }
}
