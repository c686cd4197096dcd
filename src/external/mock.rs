//! In-memory stand-ins for the AWS services, used by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::external::cost_source::{CostSource, CostSourceError};
use crate::external::mail_transport::{MailError, MailTransport, RawEmail};
use crate::models::{CostBucket, CostGroup, TimePeriod};

/// Build a bucket from `(service, amount)` pairs.
pub fn bucket(groups: &[(&str, &str)]) -> CostBucket {
    CostBucket {
        start: None,
        end: None,
        groups: groups
            .iter()
            .map(|(service, amount)| CostGroup {
                service: service.to_string(),
                amount: amount.to_string(),
            })
            .collect(),
    }
}

pub struct MockCostSource {
    response: Result<Vec<CostBucket>, String>,
    pub requested: Mutex<Vec<TimePeriod>>,
}

impl MockCostSource {
    pub fn returning(buckets: Vec<CostBucket>) -> Self {
        Self {
            response: Ok(buckets),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<TimePeriod> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl CostSource for MockCostSource {
    async fn fetch_daily_costs_by_service(
        &self,
        period: &TimePeriod,
    ) -> Result<Vec<CostBucket>, CostSourceError> {
        self.requested.lock().unwrap().push(*period);
        self.response
            .clone()
            .map_err(CostSourceError::Service)
    }
}

pub struct MockMailTransport {
    fail_with: Option<String>,
    pub sent: Mutex<Vec<RawEmail>>,
}

impl MockMailTransport {
    pub fn new() -> Self {
        Self {
            fail_with: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<RawEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn send_raw(&self, email: &RawEmail) -> Result<String, MailError> {
        if let Some(message) = &self.fail_with {
            return Err(MailError::Service(message.clone()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(email.clone());
        Ok(format!("mock-message-{}", sent.len()))
    }
}
