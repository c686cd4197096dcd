//! Monthly Billing Report Job
//!
//! Queries Cost Explorer for the previous calendar month's unblended cost per
//! service and emails it as a CSV attachment.
//!
//! # Job Schedule
//!
//! - **Production**: 1st of every month at 12:00 UTC (0 0 12 1 * *)
//! - **Test Mode**: Every 5 minutes (0 */5 * * * *)
//!
//! # Error Handling
//!
//! - A failed cost query or email send fails the whole run; nothing is retried
//! - An empty cost response still sends a header-only report

use crate::errors::AppError;
use crate::services::billing_report_service;
use crate::services::job_scheduler_service::{JobContext, JobResult};
use chrono::Utc;
use tracing::info;

/// Job entry point, invoked once per trigger.
pub async fn send_monthly_billing_report(ctx: JobContext) -> Result<JobResult, AppError> {
    let today = Utc::now().date_naive();

    let outcome = billing_report_service::run_billing_report(
        &ctx.config,
        today,
        ctx.cost_source.as_ref(),
        ctx.mailer.as_ref(),
    )
    .await?;

    info!(
        "📧 Report for {} delivered as message {}",
        outcome.period.month_label(),
        outcome.message_id
    );

    Ok(JobResult {
        items_processed: outcome.rows,
        items_failed: 0,
    })
}
