use chrono::NaiveDate;
use thiserror::Error;
use tracing::error;

/// Cron expression used when `REPORT_SCHEDULE=monthly`: the 1st of every month at 12:00 UTC.
pub const MONTHLY_SCHEDULE: &str = "0 0 12 1 * *";

const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("SENDER_EMAIL environment variable is required")]
    MissingSender,
    #[error("RECIPIENT_EMAILS environment variable is required")]
    MissingRecipients,
    #[error("At least one valid recipient email is required")]
    NoValidRecipients,
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// How the daily buckets returned by Cost Explorer become report rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BucketAggregation {
    /// Sum every bucket per service, in order of first appearance.
    #[default]
    Sum,
    /// Only the first bucket is read.
    First,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MailTransportKind {
    Ses,
    Smtp(SmtpConfig),
}

/// Everything one report run needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub sender: String,
    pub recipients: Vec<String>,
    pub aggregation: BucketAggregation,
    /// First day of a pinned report month (`REPORT_MONTH`), for backfills.
    pub report_month: Option<NaiveDate>,
    pub transport: MailTransportKind,
    /// Cron expression; `None` means run once and exit.
    pub schedule: Option<String>,
    pub scheduler_test_mode: bool,
}

impl ReportConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary key lookup.
    ///
    /// Mandatory sender/recipient checks run first so a missing address is
    /// reported before anything else.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sender = match non_blank(lookup("SENDER_EMAIL")) {
            Some(sender) => sender,
            None => {
                error!("SENDER_EMAIL environment variable is not set.");
                return Err(ConfigError::MissingSender);
            }
        };

        let recipients_raw = match non_blank(lookup("RECIPIENT_EMAILS")) {
            Some(raw) => raw,
            None => {
                error!("RECIPIENT_EMAILS environment variable is not set.");
                return Err(ConfigError::MissingRecipients);
            }
        };

        let recipients = parse_recipients(&recipients_raw);
        if recipients.is_empty() {
            error!("No valid recipient email addresses found in RECIPIENT_EMAILS.");
            return Err(ConfigError::NoValidRecipients);
        }

        let aggregation = match non_blank(lookup("REPORT_AGGREGATION")) {
            None => BucketAggregation::default(),
            Some(value) => parse_aggregation(&value)?,
        };

        let report_month = non_blank(lookup("REPORT_MONTH"))
            .map(|value| parse_report_month(&value))
            .transpose()?;

        let transport = match non_blank(lookup("MAIL_TRANSPORT"))
            .map(|v| v.to_lowercase())
            .as_deref()
        {
            None | Some("ses") => MailTransportKind::Ses,
            Some("smtp") => MailTransportKind::Smtp(smtp_from_lookup(&lookup)?),
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "MAIL_TRANSPORT",
                    value: other.to_string(),
                    reason: "must be 'ses' or 'smtp'".to_string(),
                })
            }
        };

        let schedule = non_blank(lookup("REPORT_SCHEDULE")).map(|value| {
            if value.eq_ignore_ascii_case("monthly") {
                MONTHLY_SCHEDULE.to_string()
            } else {
                value
            }
        });

        let scheduler_test_mode = lookup("JOB_SCHEDULER_TEST_MODE")
            .unwrap_or_else(|| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        Ok(Self {
            sender,
            recipients,
            aggregation,
            report_month,
            transport,
            schedule,
            scheduler_test_mode,
        })
    }
}

/// Split a comma-separated address list, trimming entries and dropping empty ones.
///
/// Addresses are not syntax-checked here.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_aggregation(value: &str) -> Result<BucketAggregation, ConfigError> {
    match value.to_lowercase().as_str() {
        "sum" => Ok(BucketAggregation::Sum),
        "first" => Ok(BucketAggregation::First),
        _ => Err(ConfigError::InvalidValue {
            key: "REPORT_AGGREGATION",
            value: value.to_string(),
            reason: "must be 'sum' or 'first'".to_string(),
        }),
    }
}

fn parse_report_month(value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").map_err(|e| {
        ConfigError::InvalidValue {
            key: "REPORT_MONTH",
            value: value.to_string(),
            reason: format!("expected YYYY-MM: {}", e),
        }
    })
}

fn smtp_from_lookup<F>(lookup: &F) -> Result<SmtpConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &'static str| {
        non_blank(lookup(key)).ok_or_else(|| ConfigError::InvalidValue {
            key,
            value: String::new(),
            reason: "required when MAIL_TRANSPORT=smtp".to_string(),
        })
    };

    let port = match non_blank(lookup("SMTP_PORT")) {
        None => DEFAULT_SMTP_PORT,
        Some(value) => value.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
            key: "SMTP_PORT",
            value: value.clone(),
            reason: e.to_string(),
        })?,
    };

    Ok(SmtpConfig {
        host: required("SMTP_HOST")?,
        port,
        username: required("SMTP_USERNAME")?,
        password: required("SMTP_PASSWORD")?,
    })
}
