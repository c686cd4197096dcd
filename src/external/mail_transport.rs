use async_trait::async_trait;
use thiserror::Error;

/// A fully rendered MIME message plus the routing the provider should use.
///
/// Source and destinations are passed explicitly so the provider never has to
/// re-parse the message headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEmail {
    pub source: String,
    pub destinations: Vec<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("service error: {0}")]
    Service(String),

    #[error("transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Submit a raw message and return the provider-assigned message id.
    async fn send_raw(&self, email: &RawEmail) -> Result<String, MailError>;
}
