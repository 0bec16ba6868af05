use std::sync::Arc;

use vca_domain::DamageReport;

use crate::{
    Alerts, ApplicationError, BeginRenderCommand, CompareCommand, CompareStatus,
    ComparisonProgress, ComparisonService, FileSource, ImageDecoder, OpenFilesCommand,
    PollComparisonCommand, PollRenderCommand, ProceedCommand, RenderProgress,
    RenderReportCommand, RestartSessionCommand, Route, SelectFilesCommand,
    SelectedFileNamesQuery, Stage, Surface, Transition, WaitComparisonCommand,
};

#[derive(Debug)]
pub enum ComparisonStatus {
    Idle,
    Pending,
    Completed,
    Failed(ApplicationError),
}

/// One inspection session: the active stage plus the ports it needs.
pub struct ApplicationService {
    comparisons: Arc<dyn ComparisonService>,
    decoder: Arc<dyn ImageDecoder>,
    files: Box<dyn FileSource>,
    alerts: Box<dyn Alerts>,
    stage: Stage,
}

impl ApplicationService {
    pub fn new(
        comparisons: Arc<dyn ComparisonService>,
        decoder: Arc<dyn ImageDecoder>,
        files: Box<dyn FileSource>,
        alerts: Box<dyn Alerts>,
    ) -> Self {
        Self {
            comparisons,
            decoder,
            files,
            alerts,
            stage: Stage::default(),
        }
    }

    pub fn current_route(&self) -> Route {
        self.stage.route()
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn select_files(&mut self, command: SelectFilesCommand) -> Result<(), ApplicationError> {
        match &mut self.stage {
            Stage::Pickup(stage) => stage.select_files(command.files),
            Stage::Return(stage) => stage.select_files(command.files),
            Stage::Report(_) => return Err(self.wrong_stage("select files")),
        }
        Ok(())
    }

    pub fn open_files(&mut self, command: OpenFilesCommand) -> Result<usize, ApplicationError> {
        let files = self.files.load(&command.paths)?;
        let count = files.len();
        self.select_files(SelectFilesCommand { files })?;
        Ok(count)
    }

    pub fn selected_file_names(
        &self,
        _query: SelectedFileNamesQuery,
    ) -> Result<String, ApplicationError> {
        match &self.stage {
            Stage::Pickup(stage) => Ok(stage.selection().display_names()),
            Stage::Return(stage) => Ok(stage.selected_file_names()),
            Stage::Report(_) => Err(self.wrong_stage("list selected files")),
        }
    }

    /// Returns whether the session moved on to the return stage.
    pub fn proceed(&mut self, _command: ProceedCommand) -> Result<bool, ApplicationError> {
        let Stage::Pickup(stage) = &self.stage else {
            return Err(self.wrong_stage("proceed"));
        };
        match stage.proceed(self.alerts.as_ref()) {
            Some(transition) => {
                self.navigate(transition)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn compare(&mut self, _command: CompareCommand) -> Result<CompareStatus, ApplicationError> {
        let Stage::Return(stage) = &mut self.stage else {
            return Err(self.wrong_stage("compare"));
        };
        stage.compare(&self.comparisons, self.alerts.as_ref())
    }

    pub fn poll_comparison(
        &mut self,
        _command: PollComparisonCommand,
    ) -> Result<ComparisonStatus, ApplicationError> {
        let Stage::Return(stage) = &mut self.stage else {
            return Err(self.wrong_stage("poll comparison"));
        };
        let progress = stage.poll(self.alerts.as_ref());
        self.apply_progress(progress)
    }

    pub fn wait_for_comparison(
        &mut self,
        _command: WaitComparisonCommand,
    ) -> Result<ComparisonStatus, ApplicationError> {
        let Stage::Return(stage) = &mut self.stage else {
            return Err(self.wrong_stage("wait for comparison"));
        };
        let progress = stage.wait(self.alerts.as_ref());
        self.apply_progress(progress)
    }

    pub fn begin_render(
        &mut self,
        _command: BeginRenderCommand,
    ) -> Result<RenderProgress, ApplicationError> {
        let Stage::Report(stage) = &mut self.stage else {
            return Err(self.wrong_stage("render"));
        };
        stage.begin_render(&self.decoder)
    }

    pub fn poll_render(
        &mut self,
        _command: PollRenderCommand,
        surface: &mut dyn Surface,
    ) -> Result<RenderProgress, ApplicationError> {
        let Stage::Report(stage) = &mut self.stage else {
            return Err(self.wrong_stage("render"));
        };
        Ok(stage.poll_render(surface, self.alerts.as_ref()))
    }

    pub fn render_report(
        &mut self,
        _command: RenderReportCommand,
        surface: &mut dyn Surface,
    ) -> Result<RenderProgress, ApplicationError> {
        let Stage::Report(stage) = &mut self.stage else {
            return Err(self.wrong_stage("render"));
        };
        stage.render_blocking(&self.decoder, surface, self.alerts.as_ref())
    }

    pub fn report(&self) -> Option<&DamageReport> {
        match &self.stage {
            Stage::Report(stage) => stage.report(),
            _ => None,
        }
    }

    /// Opens the report stage directly with a report obtained elsewhere,
    /// e.g. a saved service response.
    pub fn show_report(&mut self, report: DamageReport) -> Result<(), ApplicationError> {
        tracing::info!(from = %self.stage.route(), "opening report directly");
        self.stage = Stage::enter(Transition::to_report(report));
        Ok(())
    }

    /// Drops every stage's state, cancelling in-flight work.
    pub fn restart(&mut self, _command: RestartSessionCommand) {
        tracing::info!(from = %self.stage.route(), "session restarted");
        self.stage = Stage::default();
    }

    fn apply_progress(
        &mut self,
        progress: ComparisonProgress,
    ) -> Result<ComparisonStatus, ApplicationError> {
        match progress {
            ComparisonProgress::Idle => Ok(ComparisonStatus::Idle),
            ComparisonProgress::Pending => Ok(ComparisonStatus::Pending),
            ComparisonProgress::Completed(transition) => {
                self.navigate(transition)?;
                Ok(ComparisonStatus::Completed)
            }
            ComparisonProgress::Failed(error) => Ok(ComparisonStatus::Failed(error)),
        }
    }

    fn navigate(&mut self, transition: Transition) -> Result<(), ApplicationError> {
        let from = self.stage.route();
        if from.next() != Some(transition.to) {
            return Err(ApplicationError::InvalidTransition {
                from,
                to: transition.to,
            });
        }
        tracing::info!(%from, to = %transition.to, "navigating");
        self.stage = Stage::enter(transition);
        Ok(())
    }

    fn wrong_stage(&self, operation: &'static str) -> ApplicationError {
        ApplicationError::WrongStage {
            operation,
            route: self.stage.route(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::thread;
    use std::time::{Duration, Instant};

    use vca_domain::{
        Bitmap, BoundingBox, ComparisonPair, DamageRecord, ImageFile, ImageReference,
        LabelPrimitive, RectPrimitive,
    };

    use super::*;
    use crate::{COMPARE_FAILED_MESSAGE, NOT_ENOUGH_FILES_MESSAGE, NO_FILES_MESSAGE};

    #[derive(Clone, Default)]
    struct FakeAlerts {
        messages: Rc<RefCell<Vec<String>>>,
    }

    impl Alerts for FakeAlerts {
        fn alert(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    #[derive(Default)]
    struct FakeComparisons {
        sent: Mutex<Vec<(String, Vec<u8>, String, Vec<u8>)>>,
        fail: bool,
        damages: Vec<DamageRecord>,
        gate: Option<Arc<Mutex<()>>>,
        finished: AtomicBool,
    }

    impl ComparisonService for FakeComparisons {
        fn compare(&self, pair: &ComparisonPair) -> Result<DamageReport, ApplicationError> {
            if let Ok(mut sent) = self.sent.lock() {
                sent.push((
                    pair.before.name().to_string(),
                    pair.before.bytes().to_vec(),
                    pair.after.name().to_string(),
                    pair.after.bytes().to_vec(),
                ));
            }
            if let Some(gate) = &self.gate {
                let _open = gate.lock().map(|_| ());
            }
            self.finished.store(true, Ordering::SeqCst);
            if self.fail {
                return Err(ApplicationError::Transport("network unreachable".to_string()));
            }
            Ok(DamageReport::new(
                ImageReference::parse("data:image/png;base64,iVBORw0KGgo=").expect("reference"),
                self.damages.clone(),
            ))
        }
    }

    struct FakeDecoder;

    impl ImageDecoder for FakeDecoder {
        fn decode(&self, _reference: &ImageReference) -> Result<Bitmap, ApplicationError> {
            Ok(Bitmap::filled(100, 80, 0x202020))
        }
    }

    struct FakeFiles {
        contents: HashMap<PathBuf, Vec<u8>>,
    }

    impl FileSource for FakeFiles {
        fn load(&self, paths: &[PathBuf]) -> Result<Vec<ImageFile>, ApplicationError> {
            paths
                .iter()
                .map(|path| {
                    self.contents
                        .get(path)
                        .map(|bytes| ImageFile::new(path.to_string_lossy(), bytes.clone()))
                        .ok_or_else(|| ApplicationError::Io(format!("missing {path:?}")))
                })
                .collect()
        }
    }

    #[derive(Default)]
    struct RecordingSurface {
        size: Option<(u32, u32)>,
        rects: Vec<RectPrimitive>,
        labels: Vec<LabelPrimitive>,
    }

    impl Surface for RecordingSurface {
        fn resize(&mut self, width: u32, height: u32) {
            self.size = Some((width, height));
        }

        fn draw_bitmap(&mut self, _bitmap: &Bitmap) {}

        fn stroke_rect(&mut self, rect: &RectPrimitive, _color: u32, _line_width: u32) {
            self.rects.push(*rect);
        }

        fn fill_text(&mut self, label: &LabelPrimitive, _color: u32, _scale: u32) {
            self.labels.push(label.clone());
        }
    }

    fn service_with(comparisons: Arc<FakeComparisons>) -> (ApplicationService, FakeAlerts) {
        let alerts = FakeAlerts::default();
        let mut contents = HashMap::new();
        contents.insert(PathBuf::from("before.jpg"), vec![1, 1]);
        contents.insert(PathBuf::from("after.jpg"), vec![2, 2]);
        let service = ApplicationService::new(
            comparisons,
            Arc::new(FakeDecoder),
            Box::new(FakeFiles { contents }),
            Box::new(alerts.clone()),
        );
        (service, alerts)
    }

    fn files(names: &[&str]) -> Vec<ImageFile> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| ImageFile::new(*name, vec![index as u8]))
            .collect()
    }

    fn scratch() -> DamageRecord {
        DamageRecord::new(
            "scratch",
            BoundingBox::from_corners([10.0, 20.0, 50.0, 60.0]).expect("finite"),
        )
    }

    #[test]
    fn full_session_from_pickup_to_rendered_report() {
        let comparisons = Arc::new(FakeComparisons {
            damages: vec![scratch()],
            ..FakeComparisons::default()
        });
        let (mut service, alerts) = service_with(Arc::clone(&comparisons));

        service
            .open_files(OpenFilesCommand {
                paths: vec![PathBuf::from("before.jpg"), PathBuf::from("after.jpg")],
            })
            .expect("open files");
        assert!(service.proceed(ProceedCommand).expect("proceed"));
        assert_eq!(service.current_route(), Route::Return);
        assert_eq!(
            service
                .selected_file_names(SelectedFileNamesQuery)
                .expect("names"),
            "before.jpg, after.jpg"
        );

        service.compare(CompareCommand).expect("compare");
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            match service
                .poll_comparison(PollComparisonCommand)
                .expect("poll")
            {
                ComparisonStatus::Pending => {
                    assert!(Instant::now() < deadline, "timed out waiting for comparison");
                    thread::sleep(Duration::from_millis(5));
                }
                ComparisonStatus::Completed => break,
                other => panic!("unexpected status {other:?}"),
            }
        }
        assert_eq!(service.current_route(), Route::Report);

        let mut surface = RecordingSurface::default();
        let progress = service
            .render_report(RenderReportCommand, &mut surface)
            .expect("render");
        assert_eq!(progress, RenderProgress::Rendered { overlays: 1 });
        assert_eq!(surface.size, Some((100, 80)));
        assert_eq!(
            surface.rects,
            vec![RectPrimitive {
                x: 10.0,
                y: 20.0,
                width: 40.0,
                height: 40.0
            }]
        );
        assert_eq!(surface.labels[0].text, "scratch");
        assert_eq!((surface.labels[0].x, surface.labels[0].y), (10.0, 15.0));
        assert!(alerts.messages.borrow().is_empty());

        let sent = comparisons.sent.lock().expect("lock");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "before.jpg");
        assert_eq!(sent[0].1, vec![1, 1]);
        assert_eq!(sent[0].2, "after.jpg");
        assert_eq!(sent[0].3, vec![2, 2]);
    }

    #[test]
    fn empty_pickup_never_navigates() {
        let (mut service, alerts) = service_with(Arc::new(FakeComparisons::default()));
        assert!(!service.proceed(ProceedCommand).expect("proceed"));
        assert_eq!(service.current_route(), Route::Pickup);
        assert_eq!(*alerts.messages.borrow(), vec![NO_FILES_MESSAGE.to_string()]);
    }

    #[test]
    fn pickup_handoff_preserves_every_file_in_order() {
        let (mut service, _alerts) = service_with(Arc::new(FakeComparisons::default()));
        service
            .select_files(SelectFilesCommand {
                files: files(&["c.jpg", "a.jpg", "b.jpg"]),
            })
            .expect("select");
        service.proceed(ProceedCommand).expect("proceed");

        let Stage::Return(stage) = service.stage() else {
            panic!("expected return stage");
        };
        assert_eq!(stage.selection().files(), files(&["c.jpg", "a.jpg", "b.jpg"]).as_slice());
    }

    #[test]
    fn return_stage_reselect_replaces_handoff() {
        let comparisons = Arc::new(FakeComparisons::default());
        let (mut service, _alerts) = service_with(Arc::clone(&comparisons));
        service
            .select_files(SelectFilesCommand {
                files: files(&["one.jpg"]),
            })
            .expect("select");
        service.proceed(ProceedCommand).expect("proceed");
        service
            .select_files(SelectFilesCommand {
                files: files(&["x.jpg", "y.jpg", "z.jpg"]),
            })
            .expect("reselect");
        service.compare(CompareCommand).expect("compare");
        service
            .wait_for_comparison(WaitComparisonCommand)
            .expect("wait");

        let sent = comparisons.sent.lock().expect("lock");
        assert_eq!(sent.len(), 1);
        assert_eq!((sent[0].0.as_str(), sent[0].2.as_str()), ("x.jpg", "y.jpg"));
    }

    #[test]
    fn single_file_compare_is_rejected_without_request() {
        let comparisons = Arc::new(FakeComparisons::default());
        let (mut service, alerts) = service_with(Arc::clone(&comparisons));
        service
            .select_files(SelectFilesCommand {
                files: files(&["one.jpg"]),
            })
            .expect("select");
        service.proceed(ProceedCommand).expect("proceed");

        assert_eq!(
            service.compare(CompareCommand).expect("compare"),
            CompareStatus::Rejected
        );
        assert!(comparisons.sent.lock().expect("lock").is_empty());
        assert_eq!(
            *alerts.messages.borrow(),
            vec![NOT_ENOUGH_FILES_MESSAGE.to_string()]
        );
    }

    #[test]
    fn failed_comparison_stays_on_return_stage() {
        let (mut service, alerts) = service_with(Arc::new(FakeComparisons {
            fail: true,
            ..FakeComparisons::default()
        }));
        service
            .select_files(SelectFilesCommand {
                files: files(&["a.jpg", "b.jpg"]),
            })
            .expect("select");
        service.proceed(ProceedCommand).expect("proceed");
        service.compare(CompareCommand).expect("compare");

        let status = service
            .wait_for_comparison(WaitComparisonCommand)
            .expect("wait");
        assert!(matches!(
            status,
            ComparisonStatus::Failed(ApplicationError::Transport(_))
        ));
        assert_eq!(service.current_route(), Route::Return);
        assert_eq!(
            *alerts.messages.borrow(),
            vec![COMPARE_FAILED_MESSAGE.to_string()]
        );
    }

    #[test]
    fn stage_operations_are_checked() {
        let (mut service, _alerts) = service_with(Arc::new(FakeComparisons::default()));
        assert!(matches!(
            service.compare(CompareCommand),
            Err(ApplicationError::WrongStage {
                route: Route::Pickup,
                ..
            })
        ));
        let mut surface = RecordingSurface::default();
        assert!(matches!(
            service.render_report(RenderReportCommand, &mut surface),
            Err(ApplicationError::WrongStage { .. })
        ));
    }

    #[test]
    fn restart_returns_to_empty_pickup() {
        let (mut service, _alerts) = service_with(Arc::new(FakeComparisons::default()));
        service
            .select_files(SelectFilesCommand {
                files: files(&["a.jpg", "b.jpg"]),
            })
            .expect("select");
        service.proceed(ProceedCommand).expect("proceed");
        service.compare(CompareCommand).expect("compare");

        service.restart(RestartSessionCommand);
        assert_eq!(service.current_route(), Route::Pickup);
        assert_eq!(
            service
                .selected_file_names(SelectedFileNamesQuery)
                .expect("names"),
            ""
        );
    }

    #[test]
    fn restart_discards_comparison_still_in_flight() {
        let gate = Arc::new(Mutex::new(()));
        let held = gate.lock().expect("lock");
        let comparisons = Arc::new(FakeComparisons {
            damages: vec![scratch()],
            gate: Some(Arc::clone(&gate)),
            ..FakeComparisons::default()
        });
        let (mut service, alerts) = service_with(Arc::clone(&comparisons));
        service
            .open_files(OpenFilesCommand {
                paths: vec![PathBuf::from("before.jpg"), PathBuf::from("after.jpg")],
            })
            .expect("open files");
        service.proceed(ProceedCommand).expect("proceed");
        assert_eq!(
            service.compare(CompareCommand).expect("compare"),
            CompareStatus::Submitted
        );

        service.restart(RestartSessionCommand);
        drop(held);

        let deadline = Instant::now() + Duration::from_secs(2);
        while !comparisons.finished.load(Ordering::SeqCst) {
            assert!(Instant::now() < deadline, "comparison never finished");
            thread::sleep(Duration::from_millis(5));
        }
        thread::sleep(Duration::from_millis(20));

        assert_eq!(service.current_route(), Route::Pickup);
        assert!(service.report().is_none());
        assert!(matches!(
            service.poll_comparison(PollComparisonCommand),
            Err(ApplicationError::WrongStage { .. })
        ));
        assert!(alerts.messages.borrow().is_empty());
    }
}
