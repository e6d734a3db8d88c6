//! Outgoing email
//!
//! Search results are mailed as `multipart/alternative`: the raw text as the
//! plain part and the converted HTML fragment as the rich part.

pub mod smtp;

use crate::models::SearchResult;
use crate::parser;
use async_trait::async_trait;

pub use smtp::SmtpMailer;

/// A message ready to hand to a [`Mailer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl OutgoingMail {
    /// Compose the email for a search result
    pub fn for_result(result: &SearchResult, to: impl Into<String>) -> Self {
        let body = result.full_content();
        Self {
            to: to.into(),
            subject: format!("Search Result: {}", result.title),
            text_body: body.to_string(),
            html_body: parser::convert(body),
        }
    }
}

/// Errors that can occur when sending mail
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("No SMTP password configured (set {} or smtp.password)", crate::models::config::SMTP_PASSWORD_ENV)]
    MissingPassword,

    #[error("Invalid email address '{0}'")]
    InvalidAddress(String),

    #[error("SMTP login failed for {0}")]
    Authentication(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Transport(String),
}

/// Something that can deliver an [`OutgoingMail`]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;

    /// Address that appears as the sender
    fn sender(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_result_builds_subject_and_bodies() {
        let result = SearchResult {
            title: "Rust 2024".into(),
            url: "https://example.com".into(),
            content: "short".into(),
            raw_content: Some("# Edition\nUse `cargo fix`".into()),
            ..Default::default()
        };

        let mail = OutgoingMail::for_result(&result, "reader@example.com");
        assert_eq!(mail.to, "reader@example.com");
        assert_eq!(mail.subject, "Search Result: Rust 2024");
        assert_eq!(mail.text_body, "# Edition\nUse `cargo fix`");
        assert_eq!(
            mail.html_body,
            "<h1>Edition</h1>\n<p>Use <code>cargo fix</code></p>"
        );
    }
}
