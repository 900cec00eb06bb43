use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use log::warn;

use fft_scope::config::ScopeConfig;
use fft_scope::controls::FftControls;
use fft_scope::export::{default_export_name, write_csv};
use fft_scope::naming::PvFamily;
use fft_scope::panel::{AutoscalePolicy, PanelOptions, WaveformPanel};
use fft_scope::pv::{ProcessVariable, PvConnector};
use fft_scope::relay::{UpdateReceiver, UpdateRelay, channel};
use fft_scope::types::{AcquisitionMode, WaveSignal};
use fft_scope::view::{LineData, ScopeController};
use fft_scope::{ScopeError, validate_pv_name};

/// The aggregate dialog: raw block over spectrum, controls underneath.
pub struct FftPanelApp {
    controller: ScopeController,
    relay: UpdateRelay,
    receiver: UpdateReceiver,
    raw_panel: WaveformPanel,
    spectrum_panel: WaveformPanel,
    controls: FftControls,
    spect_x_pv: Arc<dyn ProcessVariable>,
    spect_y_pv: Arc<dyn ProcessVariable>,
    raw_pv: Arc<dyn ProcessVariable>,
    /// Captured once at startup; the trigger button never re-enables later.
    mode: AcquisitionMode,
    title: String,
    refresh: Duration,
    message: Option<(String, bool)>,
}

impl FftPanelApp {
    pub fn connect(
        connector: &dyn PvConnector,
        family: &PvFamily,
        cfg: &ScopeConfig,
    ) -> Result<Self, ScopeError> {
        for (name, role) in [
            (family.spectrum_x_axis(), "spectrum x axis"),
            (family.spectrum_amp(), "spectrum amplitude"),
            (family.raw_data(), "raw data"),
            (family.enable(), "enable"),
            (family.trigg(), "trigger"),
            (family.source(), "source"),
            (family.sample_rate(), "sample rate"),
            (family.nfft(), "nfft"),
            (family.mode(), "mode"),
        ] {
            validate_pv_name(&name, role)?;
        }

        let spect_x_pv = connector.connect(&family.spectrum_x_axis())?;
        let spect_y_pv = connector.connect(&family.spectrum_amp())?;
        let raw_pv = connector.connect(&family.raw_data())?;
        let source_pv = connector.connect(&family.source())?;
        let sample_rate_pv = connector.connect(&family.sample_rate())?;
        let nfft_pv = connector.connect(&family.nfft())?;
        let controls = FftControls::new(
            connector.connect(&family.enable())?,
            connector.connect(&family.trigg())?,
            connector.connect(&family.mode())?,
        );

        // One-time startup reads, like the rest of the title line.
        let source = source_pv
            .value()
            .and_then(|v| v.as_str().map(str::to_string).ok())
            .unwrap_or_else(|| "-".to_string());
        let sample_rate = match sample_rate_pv.value().and_then(|v| v.as_f64().ok()) {
            Some(rate) if rate > 0.0 => rate,
            _ => {
                warn!(
                    "no usable sample rate from {}, falling back to {} Hz",
                    sample_rate_pv.name(),
                    cfg.sim.sample_rate
                );
                cfg.sim.sample_rate
            }
        };
        let nfft = nfft_pv.value().and_then(|v| v.as_i64().ok()).unwrap_or(0);
        let mode = controls.mode();

        let (relay, receiver) = channel();
        relay.attach(spect_x_pv.as_ref(), WaveSignal::SpectrumX);
        relay.attach(spect_y_pv.as_ref(), WaveSignal::SpectrumY);
        relay.attach(raw_pv.as_ref(), WaveSignal::RawY);

        let title = format!(
            "FFT main plot: prefix={}, id={}, source={}, rate={}, nfft={}, mode={}",
            family.prefix(),
            family.id(),
            source,
            sample_rate,
            nfft,
            mode.label()
        );

        Ok(Self {
            controller: ScopeController::with_raw(sample_rate),
            relay,
            receiver,
            raw_panel: WaveformPanel::new(PanelOptions::new("raw", AutoscalePolicy::Always)),
            spectrum_panel: WaveformPanel::new(PanelOptions::new(
                "spectrum",
                AutoscalePolicy::LockAfterFirstDraw,
            )),
            controls,
            spect_x_pv,
            spect_y_pv,
            raw_pv,
            mode,
            title,
            refresh: Duration::from_millis(cfg.display.refresh_ms),
            message: None,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn drain(&mut self) {
        for update in self.receiver.try_iter() {
            self.controller.apply(&update);
        }
    }

    fn save_line(&mut self, stem: &str, x_label: &str, y_label: &str, line: Option<LineData>) {
        let Some(line) = line else {
            self.message = Some(("No data to export yet".to_string(), true));
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(default_export_name(stem))
            .save_file()
        else {
            return;
        };
        match write_csv(Path::new(&path), x_label, y_label, &line) {
            Ok(()) => {
                self.message = Some((format!("Saved {}", path.display()), false));
            }
            Err(e) => {
                self.message = Some((format!("Export failed: {e}"), true));
            }
        }
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let paused = self.controller.paused();
            let pause_fill = if paused {
                egui::Color32::DARK_RED
            } else {
                egui::Color32::DARK_GREEN
            };
            if ui.add(egui::Button::new("pause").fill(pause_fill)).clicked() {
                for replay in self.controller.set_paused(!paused) {
                    self.relay.relay(replay);
                }
            }

            let enable_fill = if self.controls.enabled() {
                egui::Color32::DARK_GREEN
            } else {
                egui::Color32::DARK_RED
            };
            if ui
                .add(egui::Button::new("enable FFT").fill(enable_fill))
                .clicked()
            {
                self.controls.toggle_enable();
            }

            if ui
                .add_enabled(
                    self.mode.allows_trigger(),
                    egui::Button::new("trigg FFT"),
                )
                .clicked()
            {
                self.controls.fire_trigger();
            }

            ui.separator();

            if ui.button("Save raw CSV…").clicked() {
                let line = self.controller.raw().and_then(|r| r.line().cloned());
                let y_label = self.raw_y_label();
                self.save_line("raw", "Time [s]", &y_label, line);
            }
            if ui.button("Save spectrum CSV…").clicked() {
                let line = self.controller.spectrum().line().cloned();
                let (x_label, y_label) = self.spectrum_labels();
                self.save_line("spectrum", &x_label, &y_label, line);
            }
        });

        if let Some((ref msg, is_error)) = self.message {
            let color = if is_error {
                egui::Color32::RED
            } else {
                egui::Color32::GREEN
            };
            ui.colored_label(color, msg);
        }
    }

    fn raw_y_label(&self) -> String {
        format!("{} [{}]", self.raw_pv.name(), self.raw_pv.unit())
    }

    fn spectrum_labels(&self) -> (String, String) {
        (
            format!("{} [{}]", self.spect_x_pv.name(), self.spect_x_pv.unit()),
            format!("{} [{}]", self.spect_y_pv.name(), self.spect_y_pv.unit()),
        )
    }
}

impl eframe::App for FftPanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain();
        ctx.request_repaint_after(self.refresh);

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_controls(ui);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let plot_height = (ui.available_height() - 16.0) / 2.0;

            let raw_y_label = self.raw_y_label();
            let raw_line = self.controller.raw().and_then(|r| r.line().cloned());
            self.raw_panel
                .show(ui, plot_height, raw_line.as_ref(), "Time [s]", &raw_y_label);

            ui.add_space(8.0);

            let (x_label, y_label) = self.spectrum_labels();
            let spectrum_line = self.controller.spectrum().line().cloned();
            self.spectrum_panel.show(
                ui,
                plot_height,
                spectrum_line.as_ref(),
                &x_label,
                &y_label,
            );
        });
    }
}
