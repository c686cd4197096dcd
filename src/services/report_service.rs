use std::collections::HashMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use csv::{Terminator, WriterBuilder};
use tracing::debug;

use crate::config::BucketAggregation;
use crate::errors::AppError;
use crate::models::{CostBucket, CostRecord, CostReport, TimePeriod, CSV_HEADER};

/// Turn the fetched buckets into ordered report rows.
///
/// Rows keep the order in which services first appear. With `Sum`, a service
/// reported on several days gets the exact decimal total of its amounts; a
/// service reported once keeps its amount string untouched.
pub fn build_report(
    period: TimePeriod,
    buckets: &[CostBucket],
    aggregation: BucketAggregation,
) -> Result<CostReport, AppError> {
    let selected: &[CostBucket] = match aggregation {
        BucketAggregation::First => buckets.get(..1).unwrap_or(&[]),
        BucketAggregation::Sum => buckets,
    };

    let mut order: Vec<(String, Vec<&str>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for group in selected.iter().flat_map(|bucket| bucket.groups.iter()) {
        match index.get(group.service.as_str()) {
            Some(&pos) => order[pos].1.push(group.amount.as_str()),
            None => {
                index.insert(group.service.as_str(), order.len());
                order.push((group.service.clone(), vec![group.amount.as_str()]));
            }
        }
    }

    let records = order
        .into_iter()
        .map(|(service, amounts)| {
            let amount = sum_amounts(&service, &amounts)?;
            Ok(CostRecord { service, amount })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(CostReport { period, records })
}

fn sum_amounts(service: &str, amounts: &[&str]) -> Result<String, AppError> {
    if let [single] = amounts {
        return Ok(single.to_string());
    }

    let mut total = BigDecimal::from(0);
    for amount in amounts {
        let value = BigDecimal::from_str(amount).map_err(|e| {
            AppError::Report(format!("Invalid amount '{}' for {}: {}", amount, service, e))
        })?;
        total += value;
    }

    Ok(total.to_string())
}

/// Serialize the report as `Service,Cost` CSV.
pub fn to_csv(report: &CostReport) -> Result<String, AppError> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for record in &report.records {
        writer.write_record([record.service.as_str(), record.amount.as_str()])?;
        debug!("Added row to CSV: {}, {}", record.service, record.amount);
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Report(format!("Failed to flush CSV buffer: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| AppError::Report(e.to_string()))
}
