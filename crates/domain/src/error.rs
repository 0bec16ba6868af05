use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("at least {required} files are required, got {actual}")]
    NotEnoughFiles { required: usize, actual: usize },
    #[error("report field {0} must not be empty")]
    EmptyReportField(&'static str),
    #[error("unsupported report schema version {found} (supported: {supported})")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    #[error("damage #{index} must have 4 coordinates, got {len}")]
    CoordinateCount { index: usize, len: usize },
    #[error("damage #{index} has non-finite coordinates")]
    NonFiniteCoordinates { index: usize },
    #[error("invalid image reference: {0}")]
    InvalidImageReference(String),
    #[error("bitmap of {width}x{height} needs {expected} pixels, got {actual}")]
    BitmapSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
