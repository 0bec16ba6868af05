use std::path::PathBuf;

use vca_domain::{
    Bitmap, ComparisonPair, DamageReport, ImageFile, ImageReference, LabelPrimitive,
    RectPrimitive,
};

use crate::ApplicationError;

/// Remote before/after comparison. One call, one request; errors come back
/// as the transport reported them.
pub trait ComparisonService: Send + Sync {
    fn compare(&self, pair: &ComparisonPair) -> Result<DamageReport, ApplicationError>;
}

pub trait ImageDecoder: Send + Sync {
    fn decode(&self, reference: &ImageReference) -> Result<Bitmap, ApplicationError>;
}

pub trait FileSource {
    fn load(&self, paths: &[PathBuf]) -> Result<Vec<ImageFile>, ApplicationError>;
}

/// Blocking, user-facing message.
pub trait Alerts {
    fn alert(&self, message: &str);
}

/// Drawing target of the report stage, in the after-image's pixel space.
pub trait Surface {
    fn resize(&mut self, width: u32, height: u32);

    fn draw_bitmap(&mut self, bitmap: &Bitmap);

    fn stroke_rect(&mut self, rect: &RectPrimitive, color: u32, line_width: u32);

    fn fill_text(&mut self, label: &LabelPrimitive, color: u32, scale: u32);
}
