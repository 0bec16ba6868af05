use vca_application::ApplicationError;
use vca_domain::{DamageReport, ReportPayload};

/// Parses and validates a comparison response body.
pub fn parse_report(body: &[u8]) -> Result<DamageReport, ApplicationError> {
    let payload: ReportPayload = serde_json::from_slice(body)
        .map_err(|error| ApplicationError::MalformedReport(error.to_string()))?;
    DamageReport::try_from(payload)
        .map_err(|error| ApplicationError::MalformedReport(error.to_string()))
}
