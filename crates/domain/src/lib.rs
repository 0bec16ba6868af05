mod annotation;
mod error;
mod file;
mod image;
mod report;
mod schema;

pub use annotation::{plan_overlays, AnnotationStyle, LabelPrimitive, Overlay, RectPrimitive};
pub use error::DomainError;
pub use file::{ComparisonPair, FileSelection, ImageFile};
pub use image::Bitmap;
pub use report::{BoundingBox, DamageRecord, DamageReport, ImageReference};
pub use schema::{DamagePayload, ReportPayload, CURRENT_SCHEMA_VERSION};
