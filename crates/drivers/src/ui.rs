use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use vca_adapters::{glyph_cells, FsFileSource, HttpComparisonClient, ImageCrateDecoder, PixelCanvas};
use vca_application::{
    Alerts, ApplicationError, ApplicationService, BeginRenderCommand, CompareCommand,
    ComparisonStatus, OpenFilesCommand, PollComparisonCommand, PollRenderCommand,
    ProceedCommand, RenderProgress, RestartSessionCommand, Route, SelectedFileNamesQuery, Stage,
};

use crate::config::AppConfig;

const CANVAS_MARGIN: usize = 24;
const HEADER_TOP: usize = 20;
const HEADER_HEIGHT: usize = 56;
const WORKAREA_TOP: usize = 94;
const WORKAREA_BOTTOM_MARGIN: usize = 28;
const SPLIT_GUTTER: usize = 24;
const CONTROL_PANEL_WIDTH: usize = 300;
const CONTROL_INSET: usize = 18;
const LINE_HEIGHT: usize = 14;
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "bmp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiAction {
    OpenFiles,
    Advance,
    Compare,
    Restart,
    Save,
}

/// Native message box; blocks the UI loop until dismissed.
struct DialogAlerts;

impl Alerts for DialogAlerts {
    fn alert(&self, message: &str) {
        tracing::debug!(message, "alert raised");
        MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("Vehicle inspection")
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}

pub fn launch_window(config: &AppConfig) -> Result<(), String> {
    let width = config.window_width;
    let height = config.window_height;
    let comparisons = HttpComparisonClient::new(&config.service_url)
        .map_err(|error| format!("failed to build comparison client: {error}"))?;
    let mut service = ApplicationService::new(
        Arc::new(comparisons),
        Arc::new(ImageCrateDecoder::new()),
        Box::new(FsFileSource),
        Box::new(DialogAlerts),
    );

    let mut window = Window::new(
        &window_title(Route::Pickup, &config.service_url),
        width,
        height,
        WindowOptions::default(),
    )
    .map_err(|error| format!("failed to start UI window: {error}"))?;
    window.limit_update_rate(Some(Duration::from_micros(16_000)));

    let mut buffer = vec![0x222222_u32; width * height];
    let mut canvas = PixelCanvas::default();
    let mut last_route = service.current_route();
    let mut status = String::new();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let action = window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .find_map(action_for_key);
        if let Some(action) = action {
            status = handle_action(&mut service, action, &canvas, config);
        }

        if let Some(failure) = advance_background_work(&mut service, &mut canvas) {
            status = failure;
        }

        let route = service.current_route();
        if route != last_route {
            window.set_title(&window_title(route, &config.service_url));
            if route == Route::Pickup {
                canvas = PixelCanvas::default();
            }
            last_route = route;
        }

        draw_background(&mut buffer, width, height);
        draw_header(&mut buffer, width, route);
        draw_work_panel(&mut buffer, width, height, &service, &canvas);
        draw_control_panel(&mut buffer, width, height, &service, &status);

        window
            .update_with_buffer(&buffer, width, height)
            .map_err(|error| format!("failed to update UI window: {error}"))?;
    }

    Ok(())
}

/// Polls the comparison or the report render, whichever the stage runs.
fn advance_background_work(
    service: &mut ApplicationService,
    canvas: &mut PixelCanvas,
) -> Option<String> {
    match service.current_route() {
        Route::Pickup => None,
        Route::Return => match service.poll_comparison(PollComparisonCommand) {
            Ok(ComparisonStatus::Failed(error)) => Some(format!("compare failed: {error}")),
            Ok(_) => None,
            Err(error) => Some(action_failed("comparison poll", &error)),
        },
        Route::Report => {
            let progress = service
                .begin_render(BeginRenderCommand)
                .and_then(|_| service.poll_render(PollRenderCommand, &mut *canvas));
            progress.err().map(|error| action_failed("render", &error))
        }
    }
}

fn action_for_key(key: Key) -> Option<UiAction> {
    match key {
        Key::O => Some(UiAction::OpenFiles),
        Key::Enter | Key::NumPadEnter => Some(UiAction::Advance),
        Key::C => Some(UiAction::Compare),
        Key::R => Some(UiAction::Restart),
        Key::S => Some(UiAction::Save),
        _ => None,
    }
}

/// Every failure here ends up in the status line; the window stays open.
fn handle_action(
    service: &mut ApplicationService,
    action: UiAction,
    canvas: &PixelCanvas,
    config: &AppConfig,
) -> String {
    let route = service.current_route();
    match (action, route) {
        (UiAction::OpenFiles, Route::Pickup | Route::Return) => match pick_images() {
            Some(paths) => open_paths(service, paths),
            None => String::new(),
        },
        (UiAction::Advance, Route::Pickup) => match service.proceed(ProceedCommand) {
            Ok(true) => "pickup recorded".to_string(),
            Ok(false) => String::new(),
            Err(error) => action_failed("proceed", &error),
        },
        (UiAction::Advance | UiAction::Compare, Route::Return) => {
            match service.compare(CompareCommand) {
                Ok(submitted) => format!("compare: {submitted:?}").to_ascii_lowercase(),
                Err(error) => action_failed("compare", &error),
            }
        }
        (UiAction::Save, Route::Report) => {
            if canvas.width() == 0 {
                return "nothing rendered yet".to_string();
            }
            match canvas.save_png(&config.output_path) {
                Ok(()) => format!("saved {}", config.output_path.display()),
                Err(error) => action_failed("save", &error),
            }
        }
        (UiAction::Restart, _) => {
            service.restart(RestartSessionCommand);
            "new inspection".to_string()
        }
        _ => String::new(),
    }
}

fn open_paths(service: &mut ApplicationService, paths: Vec<PathBuf>) -> String {
    match service.open_files(OpenFilesCommand { paths }) {
        Ok(count) => format!("{count} file(s) selected"),
        Err(error) => action_failed("file selection", &error),
    }
}

fn action_failed(action: &str, error: &ApplicationError) -> String {
    tracing::error!(action, %error, "ui action failed");
    format!("{action} failed: {error}")
}

fn pick_images() -> Option<Vec<PathBuf>> {
    FileDialog::new()
        .set_title("Select vehicle photos")
        .add_filter("images", &IMAGE_EXTENSIONS)
        .pick_files()
}

fn window_title(route: Route, service_url: &str) -> String {
    format!("vca | {route} | service={service_url}")
}

fn stage_heading(route: Route) -> &'static str {
    match route {
        Route::Pickup => "PICKUP: PHOTOGRAPH THE CAR",
        Route::Return => "RETURN: BEFORE AND AFTER",
        Route::Report => "REPORT: NEW DAMAGE",
    }
}

fn key_hints(route: Route) -> &'static [&'static str] {
    match route {
        Route::Pickup => &["O  select photos", "ENTER  continue", "ESC  quit"],
        Route::Return => &[
            "O  select before, after",
            "ENTER/C  compare",
            "R  start over",
            "ESC  quit",
        ],
        Route::Report => &["S  save annotated png", "R  new inspection", "ESC  quit"],
    }
}

fn stage_lines(service: &ApplicationService) -> Vec<String> {
    let mut lines = Vec::new();
    match service.stage() {
        Stage::Pickup(_) | Stage::Return(_) => {
            let names = service
                .selected_file_names(SelectedFileNamesQuery)
                .unwrap_or_default();
            if names.is_empty() {
                lines.push("no files selected".to_string());
            } else {
                lines.push("selected:".to_string());
                lines.extend(names.split(", ").map(|name| format!("  {name}")));
            }
            if let Stage::Return(stage) = service.stage() {
                if stage.is_comparing() {
                    lines.push("comparing...".to_string());
                }
            }
        }
        Stage::Report(stage) => {
            lines.push(render_status(stage.progress()));
            if let Some(report) = stage.report() {
                lines.push(format!("{} new damage(s)", report.new_damages.len()));
                lines.extend(
                    report
                        .new_damages
                        .iter()
                        .map(|damage| format!("  {}", damage.label)),
                );
                if let Some(total) = report.cost_total() {
                    lines.push(format!("estimated cost: {total}"));
                }
            }
        }
    }
    lines
}

fn render_status(progress: RenderProgress) -> String {
    match progress {
        RenderProgress::NothingToRender => "no report".to_string(),
        RenderProgress::Waiting | RenderProgress::Decoding => "loading image...".to_string(),
        RenderProgress::Rendered { overlays } => format!("rendered, {overlays} box(es)"),
        RenderProgress::Failed => "image failed to load".to_string(),
    }
}

fn draw_background(buffer: &mut [u32], width: usize, height: usize) {
    for y in 0..height {
        let t = y as f32 / height.max(1) as f32;
        let color = lerp_color(0xF7EFE0, 0xF2E1CC, t);
        buffer[y * width..(y + 1) * width].fill(color);
    }
}

fn draw_header(buffer: &mut [u32], width: usize, route: Route) {
    let left = CANVAS_MARGIN;
    let right = width.saturating_sub(CANVAS_MARGIN);
    let band_width = right.saturating_sub(left);
    fill_rect(buffer, width, left, HEADER_TOP, band_width, HEADER_HEIGHT, 0xFFFDF8);
    draw_rect(buffer, width, left, HEADER_TOP, band_width, HEADER_HEIGHT, 0xCCBBA4);

    let accent_h = HEADER_HEIGHT.saturating_sub(16);
    let steps = [Route::Pickup, Route::Return, Route::Report];
    for (index, step) in steps.into_iter().enumerate() {
        let step_left = right.saturating_sub(330) + index * 104;
        let color = if step == route { 0xF05C4B } else { 0x1B1F26 };
        fill_rect(buffer, width, step_left, HEADER_TOP + 8, 96, accent_h, color);
        draw_text(
            buffer,
            width,
            step_left + 8,
            HEADER_TOP + 24,
            &step.as_str().to_ascii_uppercase(),
            0xFFFFFF,
        );
    }
    draw_text(buffer, width, left + 14, HEADER_TOP + 24, stage_heading(route), 0x1B1F26);
}

fn draw_work_panel(
    buffer: &mut [u32],
    width: usize,
    height: usize,
    service: &ApplicationService,
    canvas: &PixelCanvas,
) {
    let panel_left = work_panel_left();
    let panel_top = WORKAREA_TOP;
    let panel_width = work_panel_right(width).saturating_sub(panel_left);
    let panel_height = height.saturating_sub(WORKAREA_BOTTOM_MARGIN + panel_top);
    fill_rect(buffer, width, panel_left, panel_top, panel_width, panel_height, 0xFBFAF7);
    draw_rect(buffer, width, panel_left, panel_top, panel_width, panel_height, 0xC8B89F);

    let stage_left = panel_left + 12;
    let stage_top = panel_top + 12;
    let stage_width = panel_width.saturating_sub(24);
    let stage_height = panel_height.saturating_sub(24);
    fill_rect(buffer, width, stage_left, stage_top, stage_width, stage_height, 0x101010);

    if service.current_route() != Route::Report || canvas.width() == 0 {
        let message = match service.current_route() {
            Route::Pickup => "Press O to select photos of the car",
            Route::Return => "Press O to select the before and after photos",
            Route::Report => "Loading report image",
        };
        draw_text(buffer, width, stage_left + 16, stage_top + 16, message, 0xE0E0E0);
        return;
    }

    let (draw_width, draw_height) = fit_within(
        canvas.width() as usize,
        canvas.height() as usize,
        stage_width.saturating_sub(2),
        stage_height.saturating_sub(2),
    );
    let start_x = stage_left + 1 + stage_width.saturating_sub(2 + draw_width) / 2;
    let start_y = stage_top + 1 + stage_height.saturating_sub(2 + draw_height) / 2;
    let src_width = canvas.width() as usize;
    let src_height = canvas.height() as usize;
    for y in 0..draw_height {
        let src_y = y * src_height / draw_height;
        for x in 0..draw_width {
            let src_x = x * src_width / draw_width;
            let color = canvas.pixels()[src_y * src_width + src_x];
            set_pixel(buffer, width, start_x + x, start_y + y, color);
        }
    }
}

fn draw_control_panel(
    buffer: &mut [u32],
    width: usize,
    height: usize,
    service: &ApplicationService,
    status: &str,
) {
    let left = control_panel_left(width);
    let top = WORKAREA_TOP;
    let panel_w = width.saturating_sub(CANVAS_MARGIN).saturating_sub(left);
    let panel_h = height.saturating_sub(WORKAREA_BOTTOM_MARGIN + top);
    fill_rect(buffer, width, left, top, panel_w, panel_h, 0xFBFAF7);
    draw_rect(buffer, width, left, top, panel_w, panel_h, 0xCCBBA4);

    let text_left = left + CONTROL_INSET;
    let mut cursor = top + CONTROL_INSET;
    for hint in key_hints(service.current_route()) {
        draw_text(buffer, width, text_left, cursor, hint, 0x4E78D5);
        cursor += LINE_HEIGHT;
    }
    cursor += LINE_HEIGHT;
    for line in stage_lines(service) {
        draw_text(buffer, width, text_left, cursor, &line, 0x1A1F29);
        cursor += LINE_HEIGHT;
    }
    if !status.is_empty() {
        let bottom = top + panel_h.saturating_sub(CONTROL_INSET + 8);
        draw_text(buffer, width, text_left, bottom, status, 0xF05C4B);
    }
}

fn fit_within(src_width: usize, src_height: usize, max_width: usize, max_height: usize) -> (usize, usize) {
    if src_width == 0 || src_height == 0 || max_width == 0 || max_height == 0 {
        return (0, 0);
    }
    let scale = (max_width as f32 / src_width as f32)
        .min(max_height as f32 / src_height as f32)
        .min(1.0);
    let fitted_width = ((src_width as f32 * scale).round() as usize).clamp(1, max_width);
    let fitted_height = ((src_height as f32 * scale).round() as usize).clamp(1, max_height);
    (fitted_width, fitted_height)
}

fn work_panel_left() -> usize {
    CANVAS_MARGIN
}

fn work_panel_right(width: usize) -> usize {
    width.saturating_sub(CANVAS_MARGIN + CONTROL_PANEL_WIDTH + SPLIT_GUTTER)
}

fn control_panel_left(width: usize) -> usize {
    work_panel_right(width).saturating_add(SPLIT_GUTTER)
}

fn fill_rect(buffer: &mut [u32], width: usize, left: usize, top: usize, w: usize, h: usize, color: u32) {
    let height = buffer.len() / width.max(1);
    let right = left.saturating_add(w).min(width);
    if left >= right {
        return;
    }
    for y in top..top.saturating_add(h).min(height) {
        buffer[y * width + left..y * width + right].fill(color);
    }
}

fn draw_rect(buffer: &mut [u32], width: usize, left: usize, top: usize, w: usize, h: usize, color: u32) {
    if w == 0 || h == 0 {
        return;
    }
    fill_rect(buffer, width, left, top, w, 1, color);
    fill_rect(buffer, width, left, top + h - 1, w, 1, color);
    fill_rect(buffer, width, left, top, 1, h, color);
    fill_rect(buffer, width, left + w - 1, top, 1, h, color);
}

fn lerp_color(start: u32, end: u32, t: f32) -> u32 {
    let clamped = t.clamp(0.0, 1.0);
    let channel = |shift: u32| {
        let from = ((start >> shift) & 0xFF) as f32;
        let to = ((end >> shift) & 0xFF) as f32;
        ((from + (to - from) * clamped).round() as u32) << shift
    };
    channel(16) | channel(8) | channel(0)
}

fn set_pixel(buffer: &mut [u32], width: usize, x: usize, y: usize, color: u32) {
    if x >= width {
        return;
    }
    if let Some(pixel) = buffer.get_mut(y * width + x) {
        *pixel = color;
    }
}

/// 8x8 text with its top-left corner at `(x, y)`.
fn draw_text(buffer: &mut [u32], width: usize, x: usize, y: usize, text: &str, color: u32) {
    let glyphs = text.chars().filter(|ch| *ch != '\n');
    for (index, ch) in glyphs.enumerate() {
        let left = x.saturating_add(index * 8);
        for (dx, dy) in glyph_cells(ch, 1) {
            set_pixel(buffer, width, left + dx as usize, y + dy as usize, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vca_adapters::ConsoleAlerts;

    fn session() -> ApplicationService {
        ApplicationService::new(
            Arc::new(HttpComparisonClient::new("http://127.0.0.1:9/api").expect("client")),
            Arc::new(ImageCrateDecoder::new()),
            Box::new(FsFileSource),
            Box::new(ConsoleAlerts),
        )
    }

    #[test]
    fn unreadable_pick_is_reported_without_leaving_the_window() {
        let mut service = session();

        let status = open_paths(&mut service, vec![PathBuf::from("definitely/missing/front.jpg")]);

        assert!(status.starts_with("file selection failed"), "status: {status}");
        assert_eq!(service.current_route(), Route::Pickup);
        assert_eq!(
            service
                .selected_file_names(SelectedFileNamesQuery)
                .expect("names"),
            ""
        );
    }

    #[test]
    fn actions_outside_their_stage_do_nothing() {
        let mut service = session();
        let canvas = PixelCanvas::default();
        let config = AppConfig::default();

        assert_eq!(handle_action(&mut service, UiAction::Save, &canvas, &config), "");
        assert_eq!(handle_action(&mut service, UiAction::Compare, &canvas, &config), "");
        assert!(advance_background_work(&mut service, &mut PixelCanvas::default()).is_none());
        assert_eq!(service.current_route(), Route::Pickup);
    }

    #[test]
    fn keys_map_to_stage_actions() {
        assert_eq!(action_for_key(Key::O), Some(UiAction::OpenFiles));
        assert_eq!(action_for_key(Key::Enter), Some(UiAction::Advance));
        assert_eq!(action_for_key(Key::S), Some(UiAction::Save));
        assert_eq!(action_for_key(Key::Space), None);
    }

    #[test]
    fn fit_within_keeps_aspect_and_never_upscales() {
        assert_eq!(fit_within(1600, 800, 800, 800), (800, 400));
        assert_eq!(fit_within(100, 50, 800, 800), (100, 50));
        assert_eq!(fit_within(0, 50, 800, 800), (0, 0));
    }

    #[test]
    fn every_route_has_heading_and_hints() {
        for route in [Route::Pickup, Route::Return, Route::Report] {
            assert!(!stage_heading(route).is_empty());
            assert!(key_hints(route).iter().any(|hint| hint.contains("ESC")));
        }
    }

    #[test]
    fn text_is_clipped_to_buffer() {
        let width = 16;
        let mut buffer = vec![0_u32; width * 8];
        draw_text(&mut buffer, width, 12, 0, "WW", 0xFFFFFF);
        assert!(buffer.iter().any(|pixel| *pixel == 0xFFFFFF));
    }
}
