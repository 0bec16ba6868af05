use std::path::PathBuf;

use vca_domain::ImageFile;

#[derive(Debug, Clone)]
pub struct SelectFilesCommand {
    pub files: Vec<ImageFile>,
}

#[derive(Debug, Clone)]
pub struct OpenFilesCommand {
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct SelectedFileNamesQuery;

#[derive(Debug, Clone, Default)]
pub struct ProceedCommand;

#[derive(Debug, Clone, Default)]
pub struct CompareCommand;

#[derive(Debug, Clone, Default)]
pub struct PollComparisonCommand;

#[derive(Debug, Clone, Default)]
pub struct WaitComparisonCommand;

#[derive(Debug, Clone, Default)]
pub struct BeginRenderCommand;

#[derive(Debug, Clone, Default)]
pub struct PollRenderCommand;

#[derive(Debug, Clone, Default)]
pub struct RenderReportCommand;

#[derive(Debug, Clone, Default)]
pub struct RestartSessionCommand;
