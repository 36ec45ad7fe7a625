use eframe::egui;
use std::sync::{Arc, Mutex};

use crate::config::AppConfig;
use crate::data::registry::{DatasetRegistry, RegistryError};
use crate::state::orchestrator::{Orchestrator, UpdateError};
use crate::state::theme::Theme;
use crate::ui::chart_panel::ChartView;
use crate::ui::controls::{self, ControlEvent};
use crate::ui::stats_table::StatsTableView;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

type LoadSlot = Arc<Mutex<Option<Result<DatasetRegistry, RegistryError>>>>;
type StatsView = Orchestrator<StatsTableView, ChartView>;

/// Registry build running on a background thread.
struct PendingLoad {
    result: LoadSlot,
}

/// The main scatterstat application.
pub struct ScatterStatApp {
    config: AppConfig,
    theme: Theme,
    /// `None` until the first registry has loaded.
    view: Option<StatsView>,
    /// Fatal load failure (required source missing). Replaces the data views.
    load_error: Option<String>,
    /// Last failed transition; the previous display stays visible.
    error_message: Option<String>,
    pending_load: Option<PendingLoad>,
}

impl ScatterStatApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::proportional(15.0),
        );
        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::proportional(22.0),
        );
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        ctx.set_style(style);
        ctx.set_visuals(config.theme.visuals());

        let mut app = Self {
            theme: config.theme,
            config,
            view: None,
            load_error: None,
            error_message: None,
            pending_load: None,
        };
        app.start_load();
        app
    }

    /// Build the registry on a background thread; `poll_load` picks it up.
    fn start_load(&mut self) {
        let sources = self.config.sources.clone();
        let attempts = self.config.load_attempts;
        let result: LoadSlot = Arc::new(Mutex::new(None));
        let result_clone = Arc::clone(&result);

        std::thread::spawn(move || {
            let loaded = DatasetRegistry::from_sources(&sources, attempts);
            match result_clone.lock() {
                Ok(mut slot) => *slot = Some(loaded),
                Err(_) => tracing::error!("Load result slot poisoned"),
            }
        });

        self.pending_load = Some(PendingLoad { result });
    }

    fn poll_load(&mut self) {
        let finished = match &self.pending_load {
            Some(pending) => pending.result.lock().map(|mut slot| slot.take()).map_err(|_| ()),
            None => return,
        };
        let result = match finished {
            Ok(Some(result)) => result,
            Ok(None) => return,
            Err(()) => {
                self.load_error = Some("Dataset loading thread panicked".to_string());
                self.pending_load = None;
                return;
            }
        };
        self.pending_load = None;

        match result {
            Ok(registry) => self.install_registry(registry),
            Err(e) => {
                tracing::error!("Failed to load datasets: {e}");
                self.view = None;
                self.load_error = Some(e.to_string());
            }
        }
    }

    fn install_registry(&mut self, registry: DatasetRegistry) {
        // A reload keeps the user's selection and toggle; a first load uses the config.
        let previous = self.view.as_ref().and_then(|v| v.active_dataset().map(str::to_string));
        let show_regression = self
            .view
            .as_ref()
            .map_or(self.config.show_regression, |v| v.show_regression());
        let mut view = Orchestrator::new(
            registry,
            show_regression,
            StatsTableView::new(self.config.decimals),
            ChartView::new(self.config.plot_height),
        );
        self.load_error = None;
        self.error_message = view
            .initialize_at(previous.as_deref())
            .err()
            .map(|e| describe(&e));
        self.view = Some(view);
    }

    fn apply(&mut self, event: ControlEvent) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let result = match event {
            ControlEvent::SelectDataset(name) => view.select_dataset(&name),
            ControlEvent::ToggleRegression(show) => view.set_show_regression(show),
        };
        self.error_message = result.err().map(|e| describe(&e));
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        let mut reload = false;
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("scatterstat");
                ui.separator();

                let loading = self.pending_load.is_some();
                if ui
                    .add_enabled(!loading, egui::Button::new("Reload Datasets"))
                    .on_hover_text("Read all configured sources again")
                    .clicked()
                {
                    reload = true;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_label = match self.theme {
                        Theme::Dark => "Light Mode",
                        Theme::Light => "Dark Mode",
                    };
                    if ui.button(theme_label).clicked() {
                        self.theme = self.theme.toggle();
                        tracing::debug!("Theme switched to {}", self.theme.label());
                    }

                    ui.separator();
                    ui.small(format!("v{VERSION}"));
                });
            });
        });

        if reload {
            tracing::info!("Reloading datasets");
            self.start_load();
        }
    }
}

fn describe(error: &UpdateError) -> String {
    match error {
        UpdateError::UnknownDataset(_) => error.to_string(),
        UpdateError::Stats(e) => format!("Cannot summarize this dataset: {e}"),
    }
}

impl eframe::App for ScatterStatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(self.theme.visuals());

        self.poll_load();
        self.show_header(ctx);

        let mut event = None;
        egui::SidePanel::left("controls")
            .resizable(false)
            .min_width(280.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                if let Some(msg) = &self.load_error {
                    ui.colored_label(self.theme.error_color(), msg);
                    return;
                }
                let Some(view) = &self.view else {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading datasets...");
                    });
                    return;
                };
                if view.registry().is_empty() {
                    ui.label(egui::RichText::new("No datasets available.").weak());
                    return;
                }

                event = controls::show_controls(
                    ui,
                    view.registry().names(),
                    view.active_dataset(),
                    view.show_regression(),
                );

                if let Some(msg) = &self.error_message {
                    ui.add_space(8.0);
                    ui.colored_label(self.theme.error_color(), msg);
                }

                ui.add_space(12.0);
                ui.separator();
                view.table().show(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(view) = &self.view {
                view.chart().show(ui, &self.theme);
            }
        });

        if let Some(event) = event {
            self.apply(event);
        }

        if self.pending_load.is_some() {
            ctx.request_repaint();
        }
    }
}
