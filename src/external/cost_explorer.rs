use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_costexplorer::error::DisplayErrorContext;
use aws_sdk_costexplorer::types::{
    DateInterval, Dimension, DimensionValues, Expression, Granularity, Group, GroupDefinition,
    GroupDefinitionType, ResultByTime,
};
use aws_sdk_costexplorer::Client;

use crate::external::cost_source::{CostSource, CostSourceError, EXCLUDED_SERVICE, UNBLENDED_COST};
use crate::models::{CostBucket, CostGroup, TimePeriod};

/// `CostSource` backed by the AWS Cost Explorer `GetCostAndUsage` API.
pub struct CostExplorerSource {
    client: Client,
}

impl CostExplorerSource {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

fn exclude_service_filter(service: &str) -> Expression {
    Expression::builder()
        .not(
            Expression::builder()
                .dimensions(
                    DimensionValues::builder()
                        .key(Dimension::Service)
                        .values(service)
                        .build(),
                )
                .build(),
        )
        .build()
}

fn convert_group(group: &Group) -> Result<CostGroup, CostSourceError> {
    let service = group
        .keys()
        .first()
        .cloned()
        .ok_or_else(|| CostSourceError::BadResponse("group without a service key".into()))?;

    let amount = group
        .metrics()
        .and_then(|metrics| metrics.get(UNBLENDED_COST))
        .and_then(|metric| metric.amount())
        .ok_or_else(|| {
            CostSourceError::BadResponse(format!("no {} amount for {}", UNBLENDED_COST, service))
        })?;

    Ok(CostGroup {
        service,
        amount: amount.to_string(),
    })
}

fn convert_bucket(result: &ResultByTime) -> Result<CostBucket, CostSourceError> {
    let groups = result
        .groups()
        .iter()
        .map(convert_group)
        .collect::<Result<Vec<_>, _>>()?;

    let interval = result.time_period();

    Ok(CostBucket {
        start: interval.map(|i| i.start().to_string()),
        end: interval.map(|i| i.end().to_string()),
        groups,
    })
}

#[async_trait]
impl CostSource for CostExplorerSource {
    async fn fetch_daily_costs_by_service(
        &self,
        period: &TimePeriod,
    ) -> Result<Vec<CostBucket>, CostSourceError> {
        let time_period = DateInterval::builder()
            .start(period.start_param())
            .end(period.end_param())
            .build()
            .map_err(|e| CostSourceError::BadResponse(e.to_string()))?;

        let output = self
            .client
            .get_cost_and_usage()
            .time_period(time_period)
            .granularity(Granularity::Daily)
            .metrics(UNBLENDED_COST)
            .group_by(
                GroupDefinition::builder()
                    .r#type(GroupDefinitionType::Dimension)
                    .key("SERVICE")
                    .build(),
            )
            .filter(exclude_service_filter(EXCLUDED_SERVICE))
            .send()
            .await
            .map_err(|e| CostSourceError::Service(DisplayErrorContext(&e).to_string()))?;

        output
            .results_by_time()
            .iter()
            .map(convert_bucket)
            .collect()
    }
}
