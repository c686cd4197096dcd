//! Background Jobs Module
//!
//! Jobs run either once (the default process mode) or on a cron schedule
//! through the job scheduler service.
//!
//! # Available Jobs
//!
//! - `monthly_billing_report_job` - Emails last month's per-service AWS cost report

pub mod monthly_billing_report_job;
