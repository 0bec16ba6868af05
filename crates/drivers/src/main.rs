mod cli;
mod config;
mod logging;
mod ui;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Command};
use config::AppConfig;
use vca_adapters::{
    parse_report, present_report, ConsoleAlerts, FsFileSource, HttpComparisonClient,
    ImageCrateDecoder, PixelCanvas,
};
use vca_application::{
    Alerts, ApplicationError, ApplicationService, CompareCommand, CompareStatus,
    ComparisonStatus, OpenFilesCommand, ProceedCommand, RenderProgress, RenderReportCommand,
    WaitComparisonCommand,
};

fn main() -> ExitCode {
    logging::init_logging();
    let (service_url, command) = Cli::parse().into_parts();
    let config = AppConfig::default().with_service_url(service_url);

    match run_command(command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Usage(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(2)
        }
        Err(CommandError::Runtime(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

fn build_application_service(
    config: &AppConfig,
    alerts: Box<dyn Alerts>,
) -> Result<ApplicationService, ApplicationError> {
    Ok(ApplicationService::new(
        Arc::new(HttpComparisonClient::new(&config.service_url)?),
        Arc::new(ImageCrateDecoder::new()),
        Box::new(FsFileSource),
        alerts,
    ))
}

#[derive(Debug, Clone)]
enum CommandError {
    Usage(String),
    Runtime(String),
}

impl From<ApplicationError> for CommandError {
    fn from(error: ApplicationError) -> Self {
        Self::Runtime(error.to_string())
    }
}

fn run_command(command: Command, config: &AppConfig) -> Result<(), CommandError> {
    match command {
        Command::Ui => ui::launch_window(config).map_err(CommandError::Runtime),
        Command::Compare { files, out } => {
            let mut service = build_application_service(config, Box::new(ConsoleAlerts))?;
            let loaded = service
                .open_files(OpenFilesCommand { paths: files })
                .map_err(|error| CommandError::Runtime(format!("could not read files: {error}")))?;
            tracing::info!(loaded, "files selected");
            if !service.proceed(ProceedCommand)? {
                return Err(CommandError::Usage("no files to compare".to_string()));
            }

            match service.compare(CompareCommand)? {
                CompareStatus::Submitted => {}
                CompareStatus::Rejected | CompareStatus::AlreadyRunning => {
                    return Err(CommandError::Usage(
                        "compare needs a before and an after image".to_string(),
                    ))
                }
            }
            match service.wait_for_comparison(WaitComparisonCommand)? {
                ComparisonStatus::Completed => {}
                ComparisonStatus::Failed(error) => {
                    return Err(CommandError::Runtime(format!("compare failed: {error}")))
                }
                ComparisonStatus::Idle | ComparisonStatus::Pending => {
                    return Err(CommandError::Runtime(
                        "comparison did not finish".to_string(),
                    ))
                }
            }
            render_and_save(&mut service, &output_path(out, config))
        }
        Command::Render { report, out } => {
            let bytes = std::fs::read(&report).map_err(|error| {
                CommandError::Runtime(format!("failed to read {}: {error}", report.display()))
            })?;
            let parsed = parse_report(&bytes).map_err(|error| {
                CommandError::Runtime(format!("{}: {error}", report.display()))
            })?;
            let mut service = build_application_service(config, Box::new(ConsoleAlerts))?;
            service.show_report(parsed)?;
            render_and_save(&mut service, &output_path(out, config))
        }
    }
}

fn output_path(out: Option<PathBuf>, config: &AppConfig) -> PathBuf {
    out.unwrap_or_else(|| config.output_path.clone())
}

fn render_and_save(service: &mut ApplicationService, out: &Path) -> Result<(), CommandError> {
    if let Some(report) = service.report() {
        println!("{}", present_report(report));
    }

    let mut canvas = PixelCanvas::default();
    match service.render_report(RenderReportCommand, &mut canvas)? {
        RenderProgress::Rendered { overlays } => {
            canvas.save_png(out)?;
            println!(
                "saved {} ({}x{}, {overlays} box(es))",
                out.display(),
                canvas.width(),
                canvas.height()
            );
            Ok(())
        }
        RenderProgress::Failed => Err(CommandError::Runtime(
            "report image could not be decoded".to_string(),
        )),
        RenderProgress::NothingToRender | RenderProgress::Waiting | RenderProgress::Decoding => {
            Err(CommandError::Runtime("no report to render".to_string()))
        }
    }
}
