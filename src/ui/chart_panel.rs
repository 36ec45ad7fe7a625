use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::processing::summary::RegressionLine;
use crate::render::ChartRenderer;
use crate::state::dataset::Point;
use crate::state::theme::Theme;

const POINT_RADIUS: f32 = 3.0;

/// Scatter plot of the active dataset with an optional fitted segment.
pub struct ChartView {
    title: String,
    points: Vec<[f64; 2]>,
    line: Option<[[f64; 2]; 2]>,
    height: f32,
}

impl ChartView {
    pub fn new(height: f32) -> Self {
        Self {
            title: String::new(),
            points: Vec::new(),
            line: None,
            height,
        }
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    pub fn line(&self) -> Option<[[f64; 2]; 2]> {
        self.line
    }

    pub fn show(&self, ui: &mut egui::Ui, theme: &Theme) {
        if self.points().is_empty() {
            ui.label(egui::RichText::new("Nothing to plot.").weak());
            return;
        }

        Plot::new("scatter_plot")
            .height(self.height)
            .x_axis_label("x")
            .y_axis_label("y")
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(PlotPoints::from(self.points().to_vec()))
                        .radius(POINT_RADIUS)
                        .color(theme.point_color())
                        .name(&self.title),
                );
                if let Some(segment) = self.line() {
                    plot_ui.line(
                        Line::new(PlotPoints::from(segment.to_vec()))
                            .color(theme.line_color())
                            .width(2.0)
                            .name("Least squares"),
                    );
                }
            });
    }
}

impl ChartRenderer for ChartView {
    fn render_chart(&mut self, name: &str, points: &[Point], line: Option<&RegressionLine>) {
        self.title = name.to_string();
        self.points = points.iter().map(|p| [p.x, p.y]).collect();
        self.line = line.map(|l| [[l.p1.x, l.p1.y], [l.p2.x, l.p2.y]]);
    }
}
