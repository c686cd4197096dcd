mod cost_report;

pub use cost_report::{CostBucket, CostGroup, CostRecord, CostReport, TimePeriod, CSV_HEADER};
