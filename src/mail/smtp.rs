use super::{MailError, Mailer, OutgoingMail};
use crate::models::{SmtpConfig, SmtpSecurity};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::response::{Category, Code, Detail, Severity};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, warn};

/// Sends mail through an authenticated SMTP relay
pub struct SmtpMailer {
    config: SmtpConfig,
    password: Option<String>,
}

impl SmtpMailer {
    /// Create a mailer; the password is resolved from the environment first
    pub fn new(config: &SmtpConfig) -> Self {
        Self {
            config: config.clone(),
            password: config.resolve_password(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.password.is_some() && !self.config.username.is_empty()
    }

    /// Build the MIME message for `mail`
    pub fn build_message(&self, mail: &OutgoingMail) -> Result<Message, MailError> {
        let from = parse_mailbox(self.config.sender())?;
        let to = parse_mailbox(&mail.to)?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject.as_str())
            .multipart(MultiPart::alternative_plain_html(
                mail.text_body.clone(),
                mail.html_body.clone(),
            ))
            .map_err(|e| MailError::Build(e.to_string()))
    }

    fn transport(&self, password: &str) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let builder = match self.config.security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host),
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
            }
        }
        .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(builder
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.username.clone(),
                password.to_string(),
            ))
            .build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let password = self.password.as_deref().ok_or(MailError::MissingPassword)?;
        let message = self.build_message(mail)?;
        let transport = self.transport(password)?;

        debug!(
            host = %self.config.host,
            port = self.config.port,
            security = ?self.config.security,
            "connecting to SMTP relay"
        );

        match transport.send(message).await {
            Ok(_) => {
                info!(to = %mail.to, "email sent");
                Ok(())
            }
            Err(e) if e.status().is_some_and(is_auth_failure) => {
                warn!(user = %self.config.username, "SMTP authentication failed");
                Err(MailError::Authentication(self.config.username.clone()))
            }
            Err(e) => Err(MailError::Transport(e.to_string())),
        }
    }

    fn sender(&self) -> &str {
        self.config.sender()
    }
}

/// `535 Authentication credentials invalid`
fn is_auth_failure(code: Code) -> bool {
    code.severity == Severity::PermanentNegativeCompletion
        && code.category == Category::Unspecified3
        && code.detail == Detail::Five
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}
