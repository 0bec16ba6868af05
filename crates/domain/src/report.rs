use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use crate::DomainError;

/// Where the annotated image of a report comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    DataUrl { media_type: String, payload: String },
    Remote(String),
    Local(PathBuf),
}

impl ImageReference {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DomainError::EmptyReportField("after_image"));
        }

        if let Some(rest) = strip_prefix_ignore_case(value, "data:") {
            let (header, payload) = rest.split_once(',').ok_or_else(|| {
                DomainError::InvalidImageReference("data url has no payload".to_string())
            })?;
            let mut params = header.split(';');
            let media_type = params.next().unwrap_or_default().to_string();
            if !params.any(|param| param.eq_ignore_ascii_case("base64")) {
                return Err(DomainError::InvalidImageReference(
                    "data url must be base64 encoded".to_string(),
                ));
            }
            return Ok(Self::DataUrl {
                media_type,
                payload: payload.to_string(),
            });
        }

        if strip_prefix_ignore_case(value, "http://").is_some()
            || strip_prefix_ignore_case(value, "https://").is_some()
        {
            return Ok(Self::Remote(value.to_string()));
        }

        Ok(Self::Local(PathBuf::from(value)))
    }
}

impl Display for ImageReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataUrl {
                media_type,
                payload,
            } => write!(f, "data:{media_type};base64 ({} chars)", payload.len()),
            Self::Remote(url) => write!(f, "{url}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        value.get(prefix.len()..)
    } else {
        None
    }
}

/// Two opposite corners in after-image pixel space. Corners are kept as sent;
/// nothing requires `x2 > x1` or `y2 > y1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn from_corners(corners: [f64; 4]) -> Option<Self> {
        if corners.iter().any(|value| !value.is_finite()) {
            return None;
        }
        let [x1, y1, x2, y2] = corners;
        Some(Self { x1, y1, x2, y2 })
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let (width, height) = (f64::from(width), f64::from(height));
        [self.x1, self.x2].iter().all(|x| (0.0..=width).contains(x))
            && [self.y1, self.y2].iter().all(|y| (0.0..=height).contains(y))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DamageRecord {
    pub label: String,
    pub bounds: BoundingBox,
    pub severity: Option<u8>,
    pub confidence: Option<f64>,
    pub estimated_cost: Option<i64>,
}

impl DamageRecord {
    pub fn new(label: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            label: label.into(),
            bounds,
            severity: None,
            confidence: None,
            estimated_cost: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DamageReport {
    pub after_image: ImageReference,
    pub new_damages: Vec<DamageRecord>,
    pub session_id: Option<String>,
    pub before_image: Option<String>,
    pub total_cost_estimate: Option<i64>,
    pub summary: Option<String>,
}

impl DamageReport {
    pub fn new(after_image: ImageReference, new_damages: Vec<DamageRecord>) -> Self {
        Self {
            after_image,
            new_damages,
            session_id: None,
            before_image: None,
            total_cost_estimate: None,
            summary: None,
        }
    }

    /// Sum of per-damage costs, used when the service omits the total.
    pub fn cost_total(&self) -> Option<i64> {
        self.total_cost_estimate.or_else(|| {
            self.new_damages
                .iter()
                .map(|damage| damage.estimated_cost)
                .sum::<Option<i64>>()
                .filter(|_| !self.new_damages.is_empty())
        })
    }
}
