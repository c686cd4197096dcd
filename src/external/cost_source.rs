use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CostBucket, TimePeriod};

/// Service dimension value excluded from every query.
///
/// Savings Plan true-up adjustments are booked under this synthetic service and
/// would otherwise distort per-service totals.
pub const EXCLUDED_SERVICE: &str = "Savings Plan Negation";

pub const UNBLENDED_COST: &str = "UnblendedCost";

#[derive(Debug, Error)]
pub enum CostSourceError {
    #[error("service error: {0}")]
    Service(String),

    #[error("bad response: {0}")]
    BadResponse(String),
}

#[async_trait]
pub trait CostSource: Send + Sync {
    /// Daily unblended cost grouped by service over `period`, one bucket per day.
    ///
    /// An empty vector means the service returned no time buckets.
    async fn fetch_daily_costs_by_service(
        &self,
        period: &TimePeriod,
    ) -> Result<Vec<CostBucket>, CostSourceError>;
}
