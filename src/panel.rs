//! The one plot widget both dialogs are built from, configured by an explicit
//! options record instead of per-dialog copies.

use eframe::egui;
use egui_plot::{Line, MarkerShape, Plot, Points};

use crate::view::LineData;

/// Axis scaling behavior of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoscalePolicy {
    /// Rescale on every draw (raw plot).
    Always,
    /// Autoscale the first drawn dataset, then keep the bounds stable across
    /// updates (spectrum plot).
    LockAfterFirstDraw,
}

#[derive(Debug, Clone)]
pub struct PanelOptions {
    pub id: String,
    pub autoscale: AutoscalePolicy,
    pub color: egui::Color32,
    pub marker_radius: f32,
}

impl PanelOptions {
    pub fn new(id: impl Into<String>, autoscale: AutoscalePolicy) -> Self {
        Self {
            id: id.into(),
            autoscale,
            color: egui::Color32::LIGHT_BLUE,
            marker_radius: 2.0,
        }
    }
}

/// Renders whatever line its view currently caches. Holds no data itself,
/// only the bounds-lock latch.
pub struct WaveformPanel {
    options: PanelOptions,
    bounds_locked: bool,
}

impl WaveformPanel {
    pub fn new(options: PanelOptions) -> Self {
        Self {
            options,
            bounds_locked: false,
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        height: f32,
        line: Option<&LineData>,
        x_label: &str,
        y_label: &str,
    ) {
        let auto = !self.bounds_locked;
        Plot::new(self.options.id.clone())
            .height(height)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .show_grid(true)
            .auto_bounds(egui::Vec2b::new(auto, auto))
            .show(ui, |plot_ui| {
                if let Some(line) = line {
                    let points: Vec<[f64; 2]> = line
                        .xs
                        .iter()
                        .zip(&line.ys)
                        .map(|(&x, &y)| [x, y])
                        .collect();
                    plot_ui.line(
                        Line::new(y_label.to_owned(), points.clone()).color(self.options.color),
                    );
                    plot_ui.points(
                        Points::new(String::new(), points)
                            .shape(MarkerShape::Asterisk)
                            .radius(self.options.marker_radius)
                            .color(self.options.color),
                    );
                }
            });
        if self.options.autoscale == AutoscalePolicy::LockAfterFirstDraw && line.is_some() {
            self.bounds_locked = true;
        }
    }
}
