use std::sync::Arc;
use std::time::Duration;

use eframe::egui;

use fft_scope::panel::{AutoscalePolicy, PanelOptions, WaveformPanel};
use fft_scope::pv::{ProcessVariable, PvConnector};
use fft_scope::relay::{UpdateReceiver, UpdateRelay, channel};
use fft_scope::types::WaveSignal;
use fft_scope::view::ScopeController;
use fft_scope::{ScopeError, validate_pv_name};

/// The simple dialog: one spectrum plot fed by an explicit X/Y PV pair, plus
/// a pause toggle.
pub struct SpectrumPlotApp {
    controller: ScopeController,
    relay: UpdateRelay,
    receiver: UpdateReceiver,
    panel: WaveformPanel,
    x_pv: Arc<dyn ProcessVariable>,
    y_pv: Arc<dyn ProcessVariable>,
    refresh: Duration,
}

impl SpectrumPlotApp {
    pub fn connect(
        connector: &dyn PvConnector,
        x_name: &str,
        y_name: &str,
        refresh: Duration,
    ) -> Result<Self, ScopeError> {
        validate_pv_name(x_name, "x axis")?;
        validate_pv_name(y_name, "y axis")?;

        let x_pv = connector.connect(x_name)?;
        let y_pv = connector.connect(y_name)?;

        let (relay, receiver) = channel();
        relay.attach(x_pv.as_ref(), WaveSignal::SpectrumX);
        relay.attach(y_pv.as_ref(), WaveSignal::SpectrumY);

        Ok(Self {
            controller: ScopeController::spectrum_only(),
            relay,
            receiver,
            panel: WaveformPanel::new(PanelOptions::new(
                "spectrum",
                AutoscalePolicy::LockAfterFirstDraw,
            )),
            x_pv,
            y_pv,
            refresh,
        })
    }

    fn drain(&mut self) {
        for update in self.receiver.try_iter() {
            self.controller.apply(&update);
        }
    }
}

impl eframe::App for SpectrumPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain();
        ctx.request_repaint_after(self.refresh);

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let paused = self.controller.paused();
                let fill = if paused {
                    egui::Color32::DARK_RED
                } else {
                    egui::Color32::DARK_GREEN
                };
                if ui.add(egui::Button::new("pause").fill(fill)).clicked() {
                    for replay in self.controller.set_paused(!paused) {
                        self.relay.relay(replay);
                    }
                }
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let x_label = format!("{} [{}]", self.x_pv.name(), self.x_pv.unit());
            let y_label = format!("{} [{}]", self.y_pv.name(), self.y_pv.unit());
            let height = ui.available_height();
            self.panel.show(
                ui,
                height,
                self.controller.spectrum().line(),
                &x_label,
                &y_label,
            );
        });
    }
}
