//! OTP delivery seam.
//!
//! Actual email dispatch (SMTP, branded template with the embedded logo
//! image, retry policy) is an external collaborator. Handlers talk to this
//! trait; deployments swap in a real transport without touching the routes.

use tracing::info;

/// Delivery failure. Carried as a plain reason string; the HTTP layer
/// converts it to an internal error.
#[derive(Debug, thiserror::Error)]
#[error("OTP delivery failed: {0}")]
pub struct MailerError(pub String);

/// Sends one-time passwords to users.
pub trait OtpMailer: Send + Sync {
    /// Dispatches `code` to `email`. The message carries the validity
    /// window so users know how long the code lasts.
    fn send_otp(&self, email: &str, code: &str, ttl_secs: i64) -> Result<(), MailerError>;
}

/// Development mailer: logs the code instead of sending it.
#[derive(Debug, Default)]
pub struct LogMailer;

impl OtpMailer for LogMailer {
    fn send_otp(&self, email: &str, code: &str, ttl_secs: i64) -> Result<(), MailerError> {
        info!(email = %email, code = %code, ttl_secs, "OTP issued (log mailer, not delivered)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_mailer_accepts() {
        let mailer = LogMailer;
        assert!(mailer.send_otp("amir@example.com", "123456", 600).is_ok());
    }
}
