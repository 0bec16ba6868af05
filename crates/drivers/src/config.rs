use std::path::PathBuf;

use vca_adapters::DEFAULT_SERVICE_URL;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub service_url: String,
    pub output_path: PathBuf,
    pub window_width: usize,
    pub window_height: usize,
}

impl AppConfig {
    pub fn with_service_url(mut self, service_url: Option<String>) -> Self {
        if let Some(url) = service_url.filter(|url| !url.trim().is_empty()) {
            self.service_url = url;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            output_path: PathBuf::from("report.png"),
            window_width: 1120,
            window_height: 700,
        }
    }
}
