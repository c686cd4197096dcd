use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Header row of every generated report.
pub const CSV_HEADER: [&str; 2] = ["Service", "Cost"];

/// Half-open date range `[start, end)` at day granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimePeriod {
    /// `YYYY-MM` of the reported month, used in the subject and attachment name.
    pub fn month_label(&self) -> String {
        self.start.format("%Y-%m").to_string()
    }

    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

/// One grouped entry of a time bucket as reported by the cost service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostGroup {
    pub service: String,
    /// Unblended cost, verbatim decimal string.
    pub amount: String,
}

/// One `ResultsByTime` entry (a single day at DAILY granularity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostBucket {
    pub start: Option<String>,
    pub end: Option<String>,
    pub groups: Vec<CostGroup>,
}

/// A single CSV data row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRecord {
    #[serde(rename = "Service")]
    pub service: String,
    #[serde(rename = "Cost")]
    pub amount: String,
}

/// Ordered report rows for one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostReport {
    pub period: TimePeriod,
    pub records: Vec<CostRecord>,
}

impl CostReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn attachment_filename(&self) -> String {
        format!("aws-cost-report-{}.csv", self.period.month_label())
    }
}
