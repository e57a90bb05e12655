/*!
 * Desktop dashboard for teamstats
 *
 * Loads a Teams.csv (file or URL) in the background, then shows league, team,
 * metric and year-range controls next to a live chart with hover tooltips.
 *
 * Usage: teamstats-gui [PATH_OR_URL]
 * Chart settings are read from <config dir>/teamstats/config.toml if it exists.
 */

use anyhow::Result;
use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use teamstats::config::Rgb;
use teamstats::controls::{Bindings, ControlId, ControlOption};
use teamstats::viz::{
    self, ChartLayout, DrawingSurface, HAlign, HoverState, Point, Stroke, TextSpec, VAlign,
};
use teamstats::{ChartConfig, Config, ControlSurface, Dashboard, Dataset, Source, loader};

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let initial = std::env::args().nth(1);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 560.0])
            .with_min_inner_size([700.0, 400.0])
            .with_title("Team Stats Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Team Stats Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(TeamStatsApp::new(initial)))),
    )
}

/// A dropdown or radio group.
#[derive(Default)]
struct SelectControl {
    options: Vec<ControlOption>,
    value: String,
}

impl ControlSurface for SelectControl {
    fn populate(&mut self, options: &[ControlOption]) {
        self.options = options.to_vec();
    }
    fn value(&self) -> String {
        self.value.clone()
    }
    fn set_text(&mut self, text: &str) {
        self.value = text.to_string();
    }
}

impl SelectControl {
    fn selected_label(&self) -> &str {
        self.options
            .iter()
            .find(|o| o.value == self.value)
            .map_or(self.value.as_str(), |o| o.label.as_str())
    }
}

/// A year input; text that is not a year leaves it unchanged.
#[derive(Default)]
struct YearControl {
    year: i32,
}

impl ControlSurface for YearControl {
    fn populate(&mut self, _options: &[ControlOption]) {}
    fn value(&self) -> String {
        self.year.to_string()
    }
    fn set_text(&mut self, text: &str) {
        if let Ok(y) = text.trim().parse() {
            self.year = y;
        }
    }
}

/// A read-only label.
#[derive(Default)]
struct TextControl {
    text: String,
}

impl ControlSurface for TextControl {
    fn populate(&mut self, _options: &[ControlOption]) {}
    fn value(&self) -> String {
        self.text.clone()
    }
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

#[derive(Default)]
struct Controls {
    league: SelectControl,
    team: SelectControl,
    metric: SelectControl,
    year_min: YearControl,
    year_max: YearControl,
    year_label: TextControl,
    title: TextControl,
}

impl Controls {
    fn bindings(&mut self) -> Bindings<'_> {
        Bindings {
            league: &mut self.league,
            team: &mut self.team,
            metric: &mut self.metric,
            year_min: &mut self.year_min,
            year_max: &mut self.year_max,
            year_label: &mut self.year_label,
            title: &mut self.title,
        }
    }
}

/// Loaded data plus everything the chart needs between frames.
struct Session {
    dashboard: Dashboard,
    controls: Controls,
    hover: HoverState,
    bounds: (i32, i32),
}

impl Session {
    fn new(dataset: Dataset) -> Self {
        let bounds = dataset
            .year_bounds()
            .map_or((0, 0), |b| (b.min, b.max));
        let dashboard = Dashboard::new(dataset);
        let mut controls = Controls::default();
        dashboard.bind(&mut controls.bindings());
        Self {
            dashboard,
            controls,
            hover: HoverState::new(),
            bounds,
        }
    }

    fn changed(&mut self, id: ControlId) {
        self.dashboard.on_change(id, &mut self.controls.bindings());
    }
}

enum Phase {
    Idle,
    Loading(mpsc::Receiver<Result<Dataset, String>>),
    Ready(Box<Session>),
}

struct TeamStatsApp {
    config: Config,
    source_input: String,
    phase: Phase,
    status_message: String,
    error_message: String,
}

impl TeamStatsApp {
    fn new(initial: Option<String>) -> Self {
        let (config, error_message) = match user_config() {
            Ok(config) => (config, String::new()),
            Err(err) => (Config::default(), format!("Ignoring config file: {err}")),
        };
        let mut app = Self {
            config,
            source_input: initial.clone().unwrap_or_default(),
            phase: Phase::Idle,
            status_message: String::new(),
            error_message,
        };
        if initial.is_some() {
            app.start_load();
        }
        app
    }

    fn start_load(&mut self) {
        let input = self.source_input.trim();
        if input.is_empty() {
            self.error_message = "Please choose a Teams.csv file or enter a URL".to_string();
            return;
        }
        let source = Source::from(input);
        let opts = self.config.data.clone();
        self.error_message.clear();
        self.status_message = format!("Loading {source}...");

        let (sender, receiver) = mpsc::channel();
        self.phase = Phase::Loading(receiver);
        thread::spawn(move || {
            let result = loader::load(&source, &opts)
                .map_err(|err| format!("Failed to load {source}: {err}"));
            let _ = sender.send(result);
        });
    }

    fn check_load_result(&mut self) {
        let Phase::Loading(receiver) = &self.phase else {
            return;
        };
        match receiver.try_recv() {
            Ok(Ok(dataset)) => {
                self.status_message = format!(
                    "{} team-seasons loaded ({} rows skipped)",
                    dataset.len(),
                    dataset.report().dropped()
                );
                self.phase = Phase::Ready(Box::new(Session::new(dataset)));
            }
            Ok(Err(error)) => {
                self.error_message = error;
                self.status_message.clear();
                self.phase = Phase::Idle;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.error_message = "Loader thread stopped unexpectedly".to_string();
                self.phase = Phase::Idle;
            }
        }
    }

    fn source_bar(&mut self, ui: &mut egui::Ui) {
        let loading = matches!(self.phase, Phase::Loading(_));
        ui.horizontal(|ui| {
            ui.label("Data:");
            ui.text_edit_singleline(&mut self.source_input)
                .on_hover_text("Path or http(s) URL of a Teams.csv file");
            if ui.add_enabled(!loading, egui::Button::new("Browse")).clicked()
                && let Some(path) = pick_csv()
            {
                self.source_input = path.to_string_lossy().to_string();
                self.start_load();
            }
            if ui.add_enabled(!loading, egui::Button::new("Load")).clicked() {
                self.start_load();
            }
            if loading {
                ui.spinner();
            }
            if !self.status_message.is_empty() {
                ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
            }
        });
        if !self.error_message.is_empty() {
            ui.colored_label(egui::Color32::RED, &self.error_message);
        }
    }
}

/// `<config dir>/teamstats/config.toml` when present, defaults otherwise.
fn user_config() -> Result<Config> {
    let Some(path) = dirs::config_dir().map(|d| d.join("teamstats").join("config.toml")) else {
        return Ok(Config::default());
    };
    if !path.is_file() {
        return Ok(Config::default());
    }
    log::info!("reading {}", path.display());
    Ok(Config::from_path(&path)?)
}

fn pick_csv() -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new().add_filter("CSV", &["csv"]);
    if let Some(home) = dirs::home_dir() {
        dialog = dialog.set_directory(home);
    }
    dialog.pick_file()
}

fn select(ui: &mut egui::Ui, id: &str, label: &str, control: &mut SelectControl) -> bool {
    let before = control.value.clone();
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(control.selected_label().to_string())
        .width(180.0)
        .show_ui(ui, |ui| {
            for opt in &control.options {
                ui.selectable_value(&mut control.value, opt.value.clone(), &opt.label);
            }
        });
    control.value != before
}

fn side_panel(ui: &mut egui::Ui, s: &mut Session) {
    ui.heading("Filters");
    ui.add_space(8.0);

    if select(ui, "league", "League", &mut s.controls.league) {
        s.changed(ControlId::League);
    }
    ui.add_space(6.0);
    if select(ui, "team", "Team", &mut s.controls.team) {
        s.changed(ControlId::Team);
    }
    ui.add_space(10.0);

    ui.label("Metric");
    let before = s.controls.metric.value.clone();
    let metric = &mut s.controls.metric;
    for opt in metric.options.clone() {
        ui.radio_value(&mut metric.value, opt.value, opt.label);
    }
    if s.controls.metric.value != before {
        s.changed(ControlId::Metric);
    }
    ui.add_space(10.0);

    let (lo, hi) = s.bounds;
    ui.label("Years");
    ui.horizontal(|ui| {
        if ui
            .add(egui::DragValue::new(&mut s.controls.year_min.year).range(lo..=hi))
            .changed()
        {
            s.changed(ControlId::YearMin);
        }
        ui.label("to");
        if ui
            .add(egui::DragValue::new(&mut s.controls.year_max.year).range(lo..=hi))
            .changed()
        {
            s.changed(ControlId::YearMax);
        }
    });
    ui.label(&s.controls.year_label.text);
}

impl eframe::App for TeamStatsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_result();
        if matches!(self.phase, Phase::Loading(_)) {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("source").show(ctx, |ui| {
            ui.add_space(4.0);
            self.source_bar(ui);
            ui.add_space(4.0);
        });

        let Phase::Ready(session) = &mut self.phase else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label("Open a Teams.csv to start");
                });
            });
            return;
        };

        egui::SidePanel::left("filters")
            .resizable(false)
            .min_width(200.0)
            .show(ctx, |ui| side_panel(ui, session));

        let chart = &self.config.chart;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&session.controls.title.text);
            ui.add_space(6.0);
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::hover());
            let mut surface = PainterSurface::new(&painter, response.rect);
            let view = session.dashboard.view();
            let layout = match viz::render_chart(&mut surface, &view.aggregation, "", chart) {
                Ok(layout) => layout,
                Err(err) => {
                    log::error!("chart render failed: {err:#}");
                    return;
                }
            };
            hover(&mut surface, &mut session.hover, &layout, &response, chart);
        });
    }
}

fn hover(
    surface: &mut PainterSurface<'_>,
    state: &mut HoverState,
    layout: &ChartLayout,
    response: &egui::Response,
    cfg: &ChartConfig,
) {
    let pos = response
        .hover_pos()
        .map(|p| (p.x - response.rect.min.x, p.y - response.rect.min.y));
    state.pointer(layout, pos, cfg.tooltip_precision);
    if let Err(err) = viz::draw_tooltip(surface, &state.tooltip, cfg) {
        log::error!("tooltip render failed: {err:#}");
    }
}

fn color(c: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(c.0, c.1, c.2)
}

/// [`DrawingSurface`] over an egui painter clipped to the chart rectangle.
struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    rect: egui::Rect,
}

impl<'a> PainterSurface<'a> {
    fn new(painter: &'a egui::Painter, rect: egui::Rect) -> Self {
        Self { painter, rect }
    }

    fn pos(&self, (x, y): Point) -> egui::Pos2 {
        self.rect.min + egui::vec2(x, y)
    }
}

impl DrawingSurface for PainterSurface<'_> {
    fn width(&self) -> u32 {
        self.rect.width().max(1.0) as u32
    }

    fn height(&self) -> u32 {
        self.rect.height().max(1.0) as u32
    }

    fn clear(&mut self, background: Rgb) -> Result<()> {
        self.painter.rect_filled(self.rect, 0.0, color(background));
        Ok(())
    }

    fn line_path(&mut self, points: &[Point], stroke: Stroke) -> Result<()> {
        let pts = points.iter().map(|&p| self.pos(p)).collect();
        self.painter.add(egui::Shape::line(
            pts,
            egui::Stroke::new(stroke.width, color(stroke.color)),
        ));
        Ok(())
    }

    fn circle(&mut self, center: Point, radius: f32, fill: Rgb) -> Result<()> {
        self.painter
            .circle_filled(self.pos(center), radius, color(fill));
        Ok(())
    }

    fn rect(
        &mut self,
        top_left: Point,
        bottom_right: Point,
        fill: Rgb,
    ) -> Result<()> {
        let r = egui::Rect::from_min_max(self.pos(top_left), self.pos(bottom_right));
        self.painter.rect_filled(r, 0.0, color(fill));
        Ok(())
    }

    fn text(&mut self, text: &str, at: Point, spec: &TextSpec) -> Result<()> {
        let font = egui::FontId::proportional(spec.size as f32);
        let at = self.pos(at);
        if spec.vertical {
            // Rotated a quarter turn: the galley's height now runs along +x.
            let galley = self
                .painter
                .layout_no_wrap(text.to_string(), font, color(spec.color));
            let size = galley.size();
            let x = match spec.v {
                VAlign::Top => at.x,
                VAlign::Center => at.x - size.y / 2.0,
                VAlign::Bottom => at.x - size.y,
            };
            let y = match spec.h {
                HAlign::Left => at.y,
                HAlign::Center => at.y + size.x / 2.0,
                HAlign::Right => at.y + size.x,
            };
            self.painter.add(
                egui::epaint::TextShape::new(egui::pos2(x, y), galley, color(spec.color))
                    .with_angle(-std::f32::consts::FRAC_PI_2),
            );
        } else {
            let h = match spec.h {
                HAlign::Left => egui::Align::Min,
                HAlign::Center => egui::Align::Center,
                HAlign::Right => egui::Align::Max,
            };
            let v = match spec.v {
                VAlign::Top => egui::Align::Min,
                VAlign::Center => egui::Align::Center,
                VAlign::Bottom => egui::Align::Max,
            };
            self.painter
                .text(at, egui::Align2([h, v]), text, font, color(spec.color));
        }
        Ok(())
    }
}
