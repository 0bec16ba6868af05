use std::sync::Arc;

use vca_domain::{ComparisonPair, DamageReport, DomainError, FileSelection, ImageFile};

use crate::{
    Alerts, ApplicationError, ComparisonService, NavigationState, Task, TaskPoll, Transition,
};

pub const NOT_ENOUGH_FILES_MESSAGE: &str = "Select before and after images.";
pub const COMPARE_FAILED_MESSAGE: &str = "Error comparing images.";

type ComparisonTask = Task<Result<DamageReport, ApplicationError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareStatus {
    Submitted,
    Rejected,
    AlreadyRunning,
}

#[derive(Debug)]
pub enum ComparisonProgress {
    Idle,
    Pending,
    Completed(Transition),
    Failed(ApplicationError),
}

/// Holds the before/after selection and at most one in-flight comparison.
/// Dropping the stage cancels that comparison.
#[derive(Default)]
pub struct ReturnStage {
    selection: FileSelection,
    pending: Option<ComparisonTask>,
}

impl ReturnStage {
    pub fn enter(state: Option<NavigationState>) -> Self {
        let selection = match state {
            Some(NavigationState::Files(files)) => FileSelection::new(files),
            _ => FileSelection::default(),
        };
        Self {
            selection,
            pending: None,
        }
    }

    pub fn select_files(&mut self, files: Vec<ImageFile>) {
        tracing::debug!(count = files.len(), "return selection replaced");
        self.selection.replace(files);
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    pub fn selected_file_names(&self) -> String {
        self.selection.display_names()
    }

    pub fn is_comparing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn compare(
        &mut self,
        service: &Arc<dyn ComparisonService>,
        alerts: &dyn Alerts,
    ) -> Result<CompareStatus, ApplicationError> {
        if self.pending.is_some() {
            tracing::warn!("comparison already in flight; ignoring compare");
            return Ok(CompareStatus::AlreadyRunning);
        }

        let pair = match ComparisonPair::from_selection(&self.selection) {
            Ok(pair) => pair,
            Err(DomainError::NotEnoughFiles { actual, .. }) => {
                tracing::info!(selected = actual, "compare rejected: need before and after");
                alerts.alert(NOT_ENOUGH_FILES_MESSAGE);
                return Ok(CompareStatus::Rejected);
            }
            Err(error) => return Err(error.into()),
        };

        let ignored = self.selection.len() - ComparisonPair::REQUIRED_FILES;
        if ignored > 0 {
            tracing::warn!(ignored, "only the first two selected files are compared");
        }
        tracing::info!(
            before = pair.before.name(),
            after = pair.after.name(),
            "submitting comparison"
        );

        let service = Arc::clone(service);
        self.pending = Some(Task::spawn("vca-compare", move || service.compare(&pair))?);
        Ok(CompareStatus::Submitted)
    }

    pub fn poll(&mut self, alerts: &dyn Alerts) -> ComparisonProgress {
        let Some(task) = self.pending.as_mut() else {
            return ComparisonProgress::Idle;
        };
        let outcome = match task.poll() {
            TaskPoll::Pending => return ComparisonProgress::Pending,
            TaskPoll::Ready(outcome) => outcome,
            TaskPoll::Closed => Err(ApplicationError::Canceled),
        };
        self.pending = None;
        finish(outcome, alerts)
    }

    pub fn wait(&mut self, alerts: &dyn Alerts) -> ComparisonProgress {
        let Some(task) = self.pending.take() else {
            return ComparisonProgress::Idle;
        };
        let outcome = task.wait().unwrap_or(Err(ApplicationError::Canceled));
        finish(outcome, alerts)
    }
}

fn finish(
    outcome: Result<DamageReport, ApplicationError>,
    alerts: &dyn Alerts,
) -> ComparisonProgress {
    match outcome {
        Ok(report) => {
            tracing::info!(damages = report.new_damages.len(), "comparison finished");
            ComparisonProgress::Completed(Transition::to_report(report))
        }
        Err(error) => {
            tracing::error!(%error, "comparison failed");
            alerts.alert(COMPARE_FAILED_MESSAGE);
            ComparisonProgress::Failed(error)
        }
    }
}
