use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::Message;
use tracing::{error, info};

use crate::errors::AppError;
use crate::external::mail_transport::{MailTransport, RawEmail};
use crate::models::CostReport;

// ==============================================================================
// Report Email
// ==============================================================================

pub const REPORT_BODY: &str = "Please find attached the AWS billing data for last month.";

const CSV_CONTENT_TYPE: &str = "text/csv";

/// Subject line for the report covering `month_label` (`YYYY-MM`).
pub fn report_subject(month_label: &str) -> String {
    format!("AWS Cost Explorer Report for {}", month_label)
}

/// Build the multipart report email (plain-text body + CSV attachment) and render it.
pub fn build_report_email(
    sender: &str,
    recipients: &[String],
    report: &CostReport,
    csv: String,
) -> Result<RawEmail, AppError> {
    let from: Mailbox = sender.parse()?;

    let mut builder = Message::builder()
        .from(from)
        .subject(report_subject(&report.period.month_label()));

    for recipient in recipients {
        let to: Mailbox = recipient.parse()?;
        builder = builder.to(to);
    }

    let content_type = ContentType::parse(CSV_CONTENT_TYPE)
        .map_err(|e| AppError::EmailBuild(format!("Invalid content type: {}", e)))?;

    let email = builder.multipart(
        MultiPart::mixed()
            .singlepart(SinglePart::plain(REPORT_BODY.to_string()))
            .singlepart(Attachment::new(report.attachment_filename()).body(csv, content_type)),
    )?;

    Ok(RawEmail {
        source: sender.to_string(),
        destinations: recipients.to_vec(),
        data: email.formatted(),
    })
}

// ==============================================================================
// Delivery
// ==============================================================================

/// Hand the rendered message to the mail provider, returning its message id.
pub async fn send_report_email(
    transport: &dyn MailTransport,
    email: &RawEmail,
) -> Result<String, AppError> {
    info!("📤 Sending billing report to: {:?}", email.destinations);

    match transport.send_raw(email).await {
        Ok(message_id) => {
            info!("✅ Email sent successfully: {}", message_id);
            Ok(message_id)
        }
        Err(e) => {
            error!(
                "❌ Error sending email from {} to {:?}: {}",
                email.source, email.destinations, e
            );
            Err(e.into())
        }
    }
}
