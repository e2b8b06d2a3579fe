use crate::config::EmailCredentials;

use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Email credentials are not set: missing {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
    #[error("Invalid email address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("Failed to build email: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("{0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// What happened to a notification attempt. Never an error the caller must handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent,
    MissingCredentials(Vec<&'static str>),
    Failed(String),
}

#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail, password: &str) -> Result<(), NotifyError>;
}

/// Authenticated SMTP submission over STARTTLS.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    host: String,
    port: u16,
}

impl SmtpMailer {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

fn mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|source| NotifyError::Address {
        address: address.to_string(),
        source,
    })
}

#[async_trait::async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail, password: &str) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(mailbox(&email.from)?)
            .to(mailbox(&email.to)?)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .port(self.port)
            .credentials(Credentials::new(email.from.clone(), password.to_string()))
            .build();

        log::debug!("Submitting email via {}:{}", self.host, self.port);

        transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(())
    }
}

pub struct Notifier<T> {
    transport: T,
    credentials: EmailCredentials,
    subject: String,
}

impl<T: MailTransport> Notifier<T> {
    pub fn new(transport: T, credentials: EmailCredentials, subject: impl Into<String>) -> Self {
        Self {
            transport,
            credentials,
            subject: subject.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the email for `lines`, one formatted event per line.
    ///
    /// Fails without side effects when any credential is missing.
    pub fn compose(&self, lines: &[String]) -> Result<(OutgoingEmail, &str), NotifyError> {
        let missing = self.credentials.missing_fields();
        if !missing.is_empty() {
            return Err(NotifyError::MissingCredentials(missing));
        }

        let email = OutgoingEmail {
            from: self.credentials.sender.clone().unwrap_or_default(),
            to: self.credentials.receiver.clone().unwrap_or_default(),
            subject: self.subject.clone(),
            body: lines.join("\n"),
        };

        Ok((email, self.credentials.password.as_deref().unwrap_or_default()))
    }

    /// Sends one email for `lines`. Failures are logged and reported in the outcome.
    pub async fn notify(&self, lines: &[String]) -> NotifyOutcome {
        let result = match self.compose(lines) {
            Ok((email, password)) => self.transport.send(&email, password).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                log::info!("Email sent successfully.");
                NotifyOutcome::Sent
            }
            Err(NotifyError::MissingCredentials(missing)) => {
                log::error!("Email credentials are not set: missing {}", missing.join(", "));
                NotifyOutcome::MissingCredentials(missing)
            }
            Err(e) => {
                log::error!("Error sending email: {}", e);
                NotifyOutcome::Failed(e.to_string())
            }
        }
    }
}
