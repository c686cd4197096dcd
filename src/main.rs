mod config;
mod errors;
mod external;
mod jobs;
mod logging;
mod models;
mod services;

use std::sync::Arc;

use anyhow::Context;
use aws_config::BehaviorVersion;

use crate::config::{MailTransportKind, ReportConfig};
use crate::external::cost_explorer::CostExplorerSource;
use crate::external::mail_transport::MailTransport;
use crate::external::ses::SesMailTransport;
use crate::external::smtp::SmtpMailTransport;
use crate::jobs::monthly_billing_report_job;
use crate::logging::{init_logging, LoggingConfig};
use crate::services::job_scheduler_service::{JobContext, JobSchedulerService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    // Resolved before any network call so a bad setup never queries or sends
    let config = ReportConfig::from_env().context("Invalid report configuration")?;

    let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;

    let mailer: Arc<dyn MailTransport> = match &config.transport {
        MailTransportKind::Ses => {
            tracing::info!("📨 Using mail transport: Amazon SES");
            Arc::new(SesMailTransport::new(&sdk_config))
        }
        MailTransportKind::Smtp(smtp) => {
            tracing::info!("📨 Using mail transport: SMTP relay {}:{}", smtp.host, smtp.port);
            Arc::new(SmtpMailTransport::new(smtp)?)
        }
    };

    let schedule = config.schedule.clone();
    let context = JobContext {
        config: Arc::new(config),
        cost_source: Arc::new(CostExplorerSource::new(&sdk_config)),
        mailer,
    };

    match schedule {
        None => {
            if let Err(e) = monthly_billing_report_job::send_monthly_billing_report(context).await {
                tracing::error!("❌ Billing report failed: {}", e);
                return Err(e.into());
            }
        }
        Some(schedule) => {
            let mut scheduler = JobSchedulerService::new(context).await?;
            scheduler.start(&schedule).await?;

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for shutdown signal")?;

            scheduler.stop().await?;
        }
    }

    Ok(())
}
