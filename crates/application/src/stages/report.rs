use std::sync::Arc;

use vca_domain::{plan_overlays, AnnotationStyle, Bitmap, DamageReport};

use crate::{
    Alerts, ApplicationError, ImageDecoder, NavigationState, Surface, Task, TaskPoll,
};

pub const RENDER_FAILED_MESSAGE: &str = "Error loading report image.";

type DecodeTask = Task<Result<Bitmap, ApplicationError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderProgress {
    NothingToRender,
    Waiting,
    Decoding,
    Rendered { overlays: usize },
    Failed,
}

enum Phase {
    Idle,
    Decoding(DecodeTask),
    Rendered { overlays: usize },
    Failed,
}

pub struct ReportStage {
    report: Option<DamageReport>,
    style: AnnotationStyle,
    phase: Phase,
}

impl ReportStage {
    pub fn enter(state: Option<NavigationState>) -> Self {
        let report = match state {
            Some(NavigationState::Report(report)) => Some(*report),
            _ => None,
        };
        Self {
            report,
            style: AnnotationStyle::default(),
            phase: Phase::Idle,
        }
    }

    pub fn with_style(mut self, style: AnnotationStyle) -> Self {
        self.style = style;
        self
    }

    pub fn report(&self) -> Option<&DamageReport> {
        self.report.as_ref()
    }

    pub fn progress(&self) -> RenderProgress {
        match &self.phase {
            Phase::Idle if self.report.is_none() => RenderProgress::NothingToRender,
            Phase::Idle => RenderProgress::Waiting,
            Phase::Decoding(_) => RenderProgress::Decoding,
            Phase::Rendered { overlays } => RenderProgress::Rendered {
                overlays: *overlays,
            },
            Phase::Failed => RenderProgress::Failed,
        }
    }

    /// Called once the drawing surface exists. Without a report this does
    /// nothing; after the first call it only reports progress.
    pub fn begin_render(
        &mut self,
        decoder: &Arc<dyn ImageDecoder>,
    ) -> Result<RenderProgress, ApplicationError> {
        if !matches!(self.phase, Phase::Idle) {
            return Ok(self.progress());
        }
        let Some(report) = &self.report else {
            tracing::debug!("report stage has no report; nothing to render");
            return Ok(RenderProgress::NothingToRender);
        };

        tracing::info!(image = %report.after_image, "decoding report image");
        let reference = report.after_image.clone();
        let decoder = Arc::clone(decoder);
        let task = Task::spawn("vca-decode", move || decoder.decode(&reference))?;
        self.phase = Phase::Decoding(task);
        Ok(RenderProgress::Decoding)
    }

    pub fn poll_render(&mut self, surface: &mut dyn Surface, alerts: &dyn Alerts) -> RenderProgress {
        let Phase::Decoding(task) = &mut self.phase else {
            return self.progress();
        };
        let outcome = match task.poll() {
            TaskPoll::Pending => return RenderProgress::Decoding,
            TaskPoll::Ready(outcome) => outcome,
            TaskPoll::Closed => Err(ApplicationError::Canceled),
        };
        self.complete(outcome, surface, alerts)
    }

    pub fn render_blocking(
        &mut self,
        decoder: &Arc<dyn ImageDecoder>,
        surface: &mut dyn Surface,
        alerts: &dyn Alerts,
    ) -> Result<RenderProgress, ApplicationError> {
        self.begin_render(decoder)?;
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Decoding(task) => {
                let outcome = task.wait().unwrap_or(Err(ApplicationError::Canceled));
                Ok(self.complete(outcome, surface, alerts))
            }
            other => {
                self.phase = other;
                Ok(self.progress())
            }
        }
    }

    fn complete(
        &mut self,
        outcome: Result<Bitmap, ApplicationError>,
        surface: &mut dyn Surface,
        alerts: &dyn Alerts,
    ) -> RenderProgress {
        self.phase = match outcome {
            Ok(bitmap) => Phase::Rendered {
                overlays: self.paint(&bitmap, surface),
            },
            Err(error) => {
                tracing::error!(%error, "report image could not be decoded");
                alerts.alert(RENDER_FAILED_MESSAGE);
                Phase::Failed
            }
        };
        self.progress()
    }

    fn paint(&self, bitmap: &Bitmap, surface: &mut dyn Surface) -> usize {
        let Some(report) = &self.report else {
            return 0;
        };

        surface.resize(bitmap.width(), bitmap.height());
        surface.draw_bitmap(bitmap);

        for (index, damage) in report.new_damages.iter().enumerate() {
            if damage.bounds.is_degenerate()
                || !damage.bounds.fits_within(bitmap.width(), bitmap.height())
            {
                tracing::warn!(
                    index,
                    label = %damage.label,
                    bounds = ?damage.bounds,
                    "damage box is degenerate or outside the image; drawing as sent"
                );
            }
        }

        let overlays = plan_overlays(&report.new_damages, &self.style);
        for overlay in &overlays {
            surface.stroke_rect(&overlay.rect, self.style.stroke_color, self.style.stroke_width);
            surface.fill_text(&overlay.label, self.style.label_color, self.style.font_scale);
        }
        tracing::info!(
            width = bitmap.width(),
            height = bitmap.height(),
            overlays = overlays.len(),
            "report rendered"
        );
        overlays.len()
    }
}
