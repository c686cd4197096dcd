use async_trait::async_trait;
use lettre::address::Envelope;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::external::mail_transport::{MailError, MailTransport, RawEmail};

/// `MailTransport` relaying through an SMTP server with STARTTLS.
pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Transport(format!("Failed to create SMTP transport: {}", e)))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self { mailer })
    }
}

fn envelope_for(email: &RawEmail) -> Result<Envelope, MailError> {
    let from = email
        .source
        .parse::<Address>()
        .map_err(|e| MailError::Transport(format!("Invalid source address: {}", e)))?;

    let to = email
        .destinations
        .iter()
        .map(|d| {
            d.parse::<Address>()
                .map_err(|e| MailError::Transport(format!("Invalid destination {}: {}", d, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Envelope::new(Some(from), to).map_err(|e| MailError::Transport(e.to_string()))
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send_raw(&self, email: &RawEmail) -> Result<String, MailError> {
        let envelope = envelope_for(email)?;

        let response = self
            .mailer
            .send_raw(&envelope, &email.data)
            .await
            .map_err(|e| MailError::Service(format!("SMTP send failed: {}", e)))?;

        Ok(response.message().collect::<Vec<_>>().join(" "))
    }
}
