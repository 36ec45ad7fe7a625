use crate::processing::summary::StatsSummary;
use crate::render::format::{format_equation, format_value};
use crate::render::TableRenderer;

/// Summary table of the active dataset, kept as preformatted rows between
/// frames.
pub struct StatsTableView {
    decimals: usize,
    rows: Vec<(&'static str, String)>,
}

impl StatsTableView {
    pub fn new(decimals: usize) -> Self {
        Self {
            decimals,
            rows: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[(&'static str, String)] {
        &self.rows
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        if self.rows().is_empty() {
            ui.label(egui::RichText::new("No dataset selected.").weak());
            return;
        }

        use egui_extras::{Column, TableBuilder};

        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(110.0))
            .column(Column::remainder().at_least(120.0))
            .body(|mut body| {
                for (label, value) in self.rows() {
                    body.row(22.0, |mut row| {
                        row.col(|ui| {
                            ui.label(egui::RichText::new(*label).strong());
                        });
                        row.col(|ui| {
                            ui.label(egui::RichText::new(value).monospace());
                        });
                    });
                }
            });
    }
}

impl TableRenderer for StatsTableView {
    fn render_table(&mut self, name: &str, summary: &StatsSummary) {
        let d = self.decimals;
        self.rows = vec![
            ("Dataset", name.to_string()),
            ("n", summary.n.to_string()),
            ("mean(x)", format_value(summary.mean_x, d)),
            ("mean(y)", format_value(summary.mean_y, d)),
            ("sd(x)", format_value(summary.sd_x, d)),
            ("sd(y)", format_value(summary.sd_y, d)),
            ("r (Pearson)", format_value(summary.r, d)),
            ("r\u{00b2}", format_value(summary.r_squared(), d)),
            ("Regression", format_equation(summary, d)),
        ];
    }
}
