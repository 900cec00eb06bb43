use std::sync::Arc;

use log::warn;

use crate::pv::ProcessVariable;
use crate::types::{AcquisitionMode, PvValue};

/// Outbound control surface of one FFT plugin instance: the enable flag and
/// the trigger pulse, plus the mode readback that decides whether triggering
/// is offered at all.
///
/// The enable flag is optimistic: it is read once at construction and flipped
/// locally on every toggle, never re-read after a write. A failed write is
/// logged and otherwise ignored so the display keeps running.
pub struct FftControls {
    enable_pv: Arc<dyn ProcessVariable>,
    trigg_pv: Arc<dyn ProcessVariable>,
    mode_pv: Arc<dyn ProcessVariable>,
    enabled: bool,
}

impl FftControls {
    pub fn new(
        enable_pv: Arc<dyn ProcessVariable>,
        trigg_pv: Arc<dyn ProcessVariable>,
        mode_pv: Arc<dyn ProcessVariable>,
    ) -> Self {
        let enabled = enable_pv
            .value()
            .and_then(|v| v.as_bool().ok())
            .unwrap_or(false);
        Self {
            enable_pv,
            trigg_pv,
            mode_pv,
            enabled,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the local flag and write it through to the controller.
    pub fn toggle_enable(&mut self) {
        self.enabled = !self.enabled;
        if let Err(e) = self.enable_pv.put(PvValue::Bool(self.enabled)) {
            warn!("enable write to {} failed: {e}", self.enable_pv.name());
        }
    }

    /// Fire one trigger pulse. No local state changes.
    pub fn fire_trigger(&self) {
        if let Err(e) = self.trigg_pv.put(PvValue::Bool(true)) {
            warn!("trigger write to {} failed: {e}", self.trigg_pv.name());
        }
    }

    /// Decode the current mode readback.
    pub fn mode(&self) -> AcquisitionMode {
        self.mode_pv
            .value()
            .and_then(|v| v.as_i64().ok())
            .map(AcquisitionMode::from_raw)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::PvFamily;
    use crate::pv::SimulatedConnector;

    fn controls_for(connector: &SimulatedConnector, family: &PvFamily) -> FftControls {
        FftControls::new(
            connector.get_or_create(&family.enable()),
            connector.get_or_create(&family.trigg()),
            connector.get_or_create(&family.mode()),
        )
    }

    #[test]
    fn toggle_writes_the_flipped_value_without_rereading() {
        let connector = SimulatedConnector::new();
        let family = PvFamily::new("IOC_TEST:", 0).unwrap();
        let enable = connector.get_or_create(&family.enable());
        enable.seed(PvValue::Bool(false));

        let mut controls = controls_for(&connector, &family);
        assert!(!controls.enabled());

        controls.toggle_enable();
        assert!(controls.enabled());
        assert_eq!(enable.value(), Some(PvValue::Bool(true)));

        // An external change does not leak back into the local flag.
        enable.seed(PvValue::Bool(false));
        assert!(controls.enabled());

        controls.toggle_enable();
        assert!(!controls.enabled());
        assert_eq!(enable.value(), Some(PvValue::Bool(false)));
    }

    #[test]
    fn initial_flag_comes_from_the_readback_once() {
        let connector = SimulatedConnector::new();
        let family = PvFamily::new("IOC_TEST:", 1).unwrap();
        connector
            .get_or_create(&family.enable())
            .seed(PvValue::I64(1));
        let controls = controls_for(&connector, &family);
        assert!(controls.enabled());
    }

    #[test]
    fn trigger_writes_true_and_keeps_no_state() {
        let connector = SimulatedConnector::new();
        let family = PvFamily::new("IOC_TEST:", 0).unwrap();
        let trigg = connector.get_or_create(&family.trigg());

        let controls = controls_for(&connector, &family);
        controls.fire_trigger();
        assert_eq!(trigg.value(), Some(PvValue::Bool(true)));
    }

    #[test]
    fn mode_decodes_the_readback() {
        let connector = SimulatedConnector::new();
        let family = PvFamily::new("IOC_TEST:", 0).unwrap();
        let mode = connector.get_or_create(&family.mode());

        let controls = controls_for(&connector, &family);
        assert_eq!(controls.mode(), AcquisitionMode::Unknown);

        mode.seed(PvValue::I64(2));
        assert_eq!(controls.mode(), AcquisitionMode::Triggered);

        mode.seed(PvValue::F64(1.0));
        assert_eq!(controls.mode(), AcquisitionMode::Continuous);
    }
}
