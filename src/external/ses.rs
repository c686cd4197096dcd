use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ses::error::DisplayErrorContext;
use aws_sdk_ses::primitives::Blob;
use aws_sdk_ses::types::RawMessage;
use aws_sdk_ses::Client;

use crate::external::mail_transport::{MailError, MailTransport, RawEmail};

/// `MailTransport` backed by Amazon SES `SendRawEmail`.
pub struct SesMailTransport {
    client: Client,
}

impl SesMailTransport {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl MailTransport for SesMailTransport {
    async fn send_raw(&self, email: &RawEmail) -> Result<String, MailError> {
        let raw_message = RawMessage::builder()
            .data(Blob::new(email.data.clone()))
            .build()
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let output = self
            .client
            .send_raw_email()
            .raw_message(raw_message)
            .source(&email.source)
            .set_destinations(Some(email.destinations.clone()))
            .send()
            .await
            .map_err(|e| MailError::Service(DisplayErrorContext(&e).to_string()))?;

        Ok(output.message_id().to_string())
    }
}
