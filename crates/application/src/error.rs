use thiserror::Error;
use vca_domain::DomainError;

use crate::Route;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("service responded with status {status}: {body}")]
    Service { status: u16, body: String },
    #[error("malformed report: {0}")]
    MalformedReport(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("{operation} is not available on the {route} stage")]
    WrongStage {
        operation: &'static str,
        route: Route,
    },
    #[error("cannot navigate from {from} to {to}")]
    InvalidTransition { from: Route, to: Route },
    #[error("task was canceled")]
    Canceled,
}
