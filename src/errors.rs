use thiserror::Error;

use crate::config::ConfigError;
use crate::external::cost_source::CostSourceError;
use crate::external::mail_transport::MailError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Cost query failed: {0}")]
    CostQuery(#[from] CostSourceError),
    #[error("Report error: {0}")]
    Report(String),
    #[error("Email build error: {0}")]
    EmailBuild(String),
    #[error("Email send failed: {0}")]
    EmailSend(#[from] MailError),
    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        AppError::Report(value.to_string())
    }
}

impl From<lettre::error::Error> for AppError {
    fn from(value: lettre::error::Error) -> Self {
        AppError::EmailBuild(value.to_string())
    }
}

impl From<lettre::address::AddressError> for AppError {
    fn from(value: lettre::address::AddressError) -> Self {
        AppError::EmailBuild(value.to_string())
    }
}
