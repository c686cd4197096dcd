pub mod billing_report_service;
pub mod job_scheduler_service;
pub mod notification_service;
pub mod period_service;
pub mod report_service;
