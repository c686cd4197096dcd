use chrono::NaiveDate;
use tracing::{debug, error, info, instrument, warn};

use crate::config::ReportConfig;
use crate::errors::AppError;
use crate::external::cost_source::CostSource;
use crate::external::mail_transport::MailTransport;
use crate::models::TimePeriod;
use crate::services::{notification_service, period_service, report_service};

/// Summary of one successful report run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    pub period: TimePeriod,
    pub rows: usize,
    pub message_id: String,
}

/// Run the full report flow once: period, cost query, CSV, email.
///
/// Any failure aborts before the email is sent. An empty cost response is not
/// a failure; it produces a header-only report.
#[instrument(skip_all, fields(today = %today))]
pub async fn run_billing_report(
    config: &ReportConfig,
    today: NaiveDate,
    cost_source: &dyn CostSource,
    mailer: &dyn MailTransport,
) -> Result<ReportOutcome, AppError> {
    info!("📊 Billing report run started");

    let period = period_service::resolve_period(today, config.report_month);
    info!(
        "Querying Cost Explorer for period: {} to {}",
        period.start_param(),
        period.end_param()
    );

    let buckets = match cost_source.fetch_daily_costs_by_service(&period).await {
        Ok(buckets) => buckets,
        Err(e) => {
            error!(
                "❌ Error fetching cost and usage for {} to {}: {}",
                period.start_param(),
                period.end_param(),
                e
            );
            return Err(e.into());
        }
    };

    if buckets.is_empty() {
        warn!("No cost data returned for the period.");
    } else {
        info!("Received {} time buckets", buckets.len());
        for bucket in &buckets {
            debug!(
                "Bucket {} to {}: {} services",
                bucket.start.as_deref().unwrap_or("?"),
                bucket.end.as_deref().unwrap_or("?"),
                bucket.groups.len()
            );
        }
    }

    let report = report_service::build_report(period, &buckets, config.aggregation)?;
    let csv = report_service::to_csv(&report)?;

    let email = notification_service::build_report_email(
        &config.sender,
        &config.recipients,
        &report,
        csv,
    )?;
    let message_id = notification_service::send_report_email(mailer, &email).await?;

    if report.is_empty() {
        info!("✅ Billing report run completed (empty report)");
    } else {
        info!("✅ Billing report run completed ({} services)", report.records.len());
    }

    Ok(ReportOutcome {
        period,
        rows: report.records.len(),
        message_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BucketAggregation;
    use crate::external::mock::{bucket, MockCostSource, MockMailTransport};
    use std::collections::HashMap;
    use tracing_test::traced_test;

    fn config() -> ReportConfig {
        ReportConfig::from_lookup(|key| {
            let vars: HashMap<&str, &str> = [
                ("SENDER_EMAIL", "billing@example.com"),
                ("RECIPIENT_EMAILS", " a@x.com , , b@x.com "),
            ]
            .into_iter()
            .collect();
            vars.get(key).map(|v| v.to_string())
        })
        .unwrap()
    }

    fn june_10() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    /// Extract the attachment text, whatever transfer encoding lettre picked.
    fn raw_text(data: &[u8]) -> String {
        String::from_utf8_lossy(data).replace("=\r\n", "")
    }

    #[tokio::test]
    async fn test_end_to_end_report_for_may() {
        let cost_source = MockCostSource::returning(vec![bucket(&[
            ("Amazon EC2", "12.34"),
            ("Amazon S3", "0.56"),
        ])]);
        let mailer = MockMailTransport::new();

        let outcome = run_billing_report(&config(), june_10(), &cost_source, &mailer)
            .await
            .unwrap();

        let requested = cost_source.calls();
        assert_eq!(requested.len(), 1);
        assert_eq!(requested[0].start_param(), "2024-05-01");
        assert_eq!(requested[0].end_param(), "2024-06-01");

        assert_eq!(outcome.rows, 2);
        assert_eq!(outcome.message_id, "mock-message-1");

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].source, "billing@example.com");
        assert_eq!(sent[0].destinations, vec!["a@x.com", "b@x.com"]);

        let raw = raw_text(&sent[0].data);
        assert!(raw.contains("Subject: AWS Cost Explorer Report for 2024-05"));
        assert!(raw.contains("aws-cost-report-2024-05.csv"));
        assert!(raw.contains("Amazon EC2,12.34"));
        assert!(raw.contains("Amazon S3,0.56"));
    }

    #[traced_test]
    #[tokio::test]
    async fn test_empty_response_sends_header_only_report_and_warns() {
        let cost_source = MockCostSource::returning(vec![]);
        let mailer = MockMailTransport::new();

        let outcome = run_billing_report(&config(), june_10(), &cost_source, &mailer)
            .await
            .unwrap();

        assert_eq!(outcome.rows, 0);
        assert!(logs_contain("No cost data returned for the period."));

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        let raw = raw_text(&sent[0].data);
        assert!(raw.contains("Service,Cost"));
    }

    #[tokio::test]
    async fn test_cost_query_failure_aborts_before_send() {
        let cost_source = MockCostSource::failing("AccessDeniedException");
        let mailer = MockMailTransport::new();

        let result = run_billing_report(&config(), june_10(), &cost_source, &mailer).await;

        assert!(matches!(result, Err(AppError::CostQuery(_))));
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_send_failure_is_propagated() {
        let cost_source = MockCostSource::returning(vec![bucket(&[("Amazon EC2", "1")])]);
        let mailer = MockMailTransport::failing("MessageRejected");

        let result = run_billing_report(&config(), june_10(), &cost_source, &mailer).await;

        assert!(matches!(result, Err(AppError::EmailSend(_))));
    }

    #[tokio::test]
    async fn test_pinned_month_and_first_bucket_aggregation() {
        let mut config = config();
        config.report_month = NaiveDate::from_ymd_opt(2023, 12, 1);
        config.aggregation = BucketAggregation::First;

        let cost_source = MockCostSource::returning(vec![
            bucket(&[("Amazon EC2", "1")]),
            bucket(&[("Amazon EC2", "2"), ("Amazon S3", "3")]),
        ]);
        let mailer = MockMailTransport::new();

        let outcome = run_billing_report(&config, june_10(), &cost_source, &mailer)
            .await
            .unwrap();

        assert_eq!(outcome.period.start_param(), "2023-12-01");
        assert_eq!(outcome.period.end_param(), "2024-01-01");
        assert_eq!(outcome.rows, 1);
    }

    #[tokio::test]
    async fn test_summed_buckets_reach_the_attachment() {
        let cost_source = MockCostSource::returning(vec![
            bucket(&[("Amazon EC2", "1.25")]),
            bucket(&[("Amazon EC2", "2.75"), ("Amazon S3", "0.5")]),
        ]);
        let mailer = MockMailTransport::new();

        let outcome = run_billing_report(&config(), june_10(), &cost_source, &mailer)
            .await
            .unwrap();

        assert_eq!(outcome.rows, 2);
        let raw = raw_text(&mailer.sent()[0].data);
        assert!(raw.contains("Amazon EC2,4.00"));
        assert!(raw.contains("Amazon S3,0.5"));
    }
}
