mod schema;

pub use schema::parse_report;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use vca_application::{ApplicationError, ComparisonService};
use vca_domain::{ComparisonPair, DamageReport, ImageFile};

pub const DEFAULT_SERVICE_URL: &str = "https://hiring-sprint-2025-djkc.onrender.com/api";

const MAX_ERROR_BODY_CHARS: usize = 512;

/// Multipart client for `POST <base>/compare`. One attempt per call, the
/// client's default timeout, no retries.
#[derive(Debug, Clone)]
pub struct HttpComparisonClient {
    endpoint: String,
    client: Client,
}

impl HttpComparisonClient {
    pub fn new(base_url: &str) -> Result<Self, ApplicationError> {
        let client = Client::builder()
            .build()
            .map_err(|error| ApplicationError::Transport(error.to_string()))?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            endpoint: format!("{}/compare", base_url.trim_end_matches('/')),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ComparisonService for HttpComparisonClient {
    fn compare(&self, pair: &ComparisonPair) -> Result<DamageReport, ApplicationError> {
        let form = Form::new()
            .part("before_image", file_part(&pair.before)?)
            .part("after_image", file_part(&pair.after)?);

        tracing::debug!(endpoint = %self.endpoint, "posting comparison request");
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|error| ApplicationError::Transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .map_err(|error| ApplicationError::Transport(error.to_string()))?;
        if !status.is_success() {
            return Err(ApplicationError::Service {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body)
                    .chars()
                    .take(MAX_ERROR_BODY_CHARS)
                    .collect(),
            });
        }

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "comparison response received");
        parse_report(&body)
    }
}

fn file_part(file: &ImageFile) -> Result<Part, ApplicationError> {
    Part::bytes(file.bytes().to_vec())
        .file_name(file.name().to_string())
        .mime_str(mime_for(file.name()))
        .map_err(|error| ApplicationError::Transport(error.to_string()))
}

fn mime_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
