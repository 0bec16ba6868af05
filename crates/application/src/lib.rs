mod error;
mod navigation;
mod ports;
mod service;
mod stages;
mod task;
mod use_cases;

pub use error::ApplicationError;
pub use navigation::{NavigationState, Route, Transition};
pub use ports::{Alerts, ComparisonService, FileSource, ImageDecoder, Surface};
pub use service::{ApplicationService, ComparisonStatus};
pub use stages::{
    CompareStatus, ComparisonProgress, PickupStage, RenderProgress, ReportStage, ReturnStage,
    Stage, COMPARE_FAILED_MESSAGE, NOT_ENOUGH_FILES_MESSAGE, NO_FILES_MESSAGE,
    RENDER_FAILED_MESSAGE,
};
pub use task::{Task, TaskPoll};
pub use use_cases::{
    BeginRenderCommand, CompareCommand, OpenFilesCommand, PollComparisonCommand,
    PollRenderCommand, ProceedCommand, RenderReportCommand, RestartSessionCommand,
    SelectFilesCommand, SelectedFileNamesQuery, WaitComparisonCommand,
};
