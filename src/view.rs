//! Redraw state machines for the two plot kinds.
//!
//! The views are UI-free: they cache incoming arrays, decide when a redraw is
//! due and hold the single line each plot renders. The GUI layer only draws
//! what is cached here, on its own loop. Absent data is represented by state,
//! never by an error.

use log::warn;

use crate::types::{SignalUpdate, WaveSignal};

/// Which plot a redraw decision refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotId {
    Raw,
    Spectrum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumState {
    /// No usable X axis yet. A cached Y may already be waiting for it.
    NoData,
    XOnly,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawState {
    NoData,
    Ready,
}

/// The one line a plot renders. Replaced wholesale on each redraw, never
/// accumulated.
#[derive(Debug, Clone, PartialEq)]
pub struct LineData {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

/// Spectrum plot: amplitude array against a frequency axis, both delivered by
/// the data source. Draws only once both are present; the frequency axis never
/// triggers a draw by itself.
#[derive(Debug, Default)]
pub struct SpectrumView {
    x: Option<Vec<f64>>,
    y: Option<Vec<f64>>,
    line: Option<LineData>,
    revision: u64,
}

impl SpectrumView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SpectrumState {
        match (&self.x, &self.y) {
            (Some(_), Some(_)) => SpectrumState::Ready,
            (Some(_), None) => SpectrumState::XOnly,
            (None, _) => SpectrumState::NoData,
        }
    }

    /// Cache a new frequency axis. Empty arrays are ignored.
    pub fn accept_x(&mut self, xs: &[f64]) {
        if !xs.is_empty() {
            self.x = Some(xs.to_vec());
        }
    }

    /// Cache a new amplitude array. Returns false for an empty array, which
    /// is ignored entirely.
    pub fn accept_y(&mut self, ys: &[f64]) -> bool {
        if ys.is_empty() {
            return false;
        }
        self.y = Some(ys.to_vec());
        true
    }

    /// Replace the drawn line with the cached arrays. False while the axis is
    /// still missing or the arrays disagree in length.
    pub fn try_draw(&mut self) -> bool {
        let (Some(xs), Some(ys)) = (&self.x, &self.y) else {
            return false;
        };
        if xs.len() != ys.len() {
            warn!(
                "spectrum arrays disagree in length ({} x, {} y), draw withheld",
                xs.len(),
                ys.len()
            );
            return false;
        }
        self.line = Some(LineData {
            xs: xs.clone(),
            ys: ys.clone(),
        });
        self.revision += 1;
        true
    }

    pub fn line(&self) -> Option<&LineData> {
        self.line.as_ref()
    }

    /// Bumped once per successful draw.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn cached_y(&self) -> Option<&[f64]> {
        self.y.as_deref()
    }
}

/// Raw plot: a time-domain block against a locally synthesized time axis.
/// The axis is regenerated only when the block length changes.
#[derive(Debug)]
pub struct RawView {
    sample_rate: f64,
    x: Option<Vec<f64>>,
    y: Option<Vec<f64>>,
    line: Option<LineData>,
    revision: u64,
}

impl RawView {
    /// `sample_rate` is captured once at startup and fixed for the dialog's
    /// lifetime.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            x: None,
            y: None,
            line: None,
            revision: 0,
        }
    }

    pub fn state(&self) -> RawState {
        if self.y.is_some() {
            RawState::Ready
        } else {
            RawState::NoData
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Cache a new sample block, synthesizing the time axis when the length
    /// changed. Returns false for an empty array, which is ignored entirely.
    pub fn accept_y(&mut self, ys: &[f64]) -> bool {
        if ys.is_empty() {
            return false;
        }
        if self.x.is_none() || self.y.as_ref().map(Vec::len) != Some(ys.len()) {
            self.x = Some(time_axis(ys.len(), self.sample_rate));
        }
        self.y = Some(ys.to_vec());
        true
    }

    pub fn try_draw(&mut self) -> bool {
        let (Some(xs), Some(ys)) = (&self.x, &self.y) else {
            return false;
        };
        self.line = Some(LineData {
            xs: xs.clone(),
            ys: ys.clone(),
        });
        self.revision += 1;
        true
    }

    pub fn line(&self) -> Option<&LineData> {
        self.line.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn cached_y(&self) -> Option<&[f64]> {
        self.y.as_deref()
    }

    pub fn time_axis(&self) -> Option<&[f64]> {
        self.x.as_deref()
    }
}

/// Time axis for an `n`-sample block sampled at `rate` Hz: the half-open
/// range `[-n/rate, 0)` stepped by `1/rate`, so the newest sample sits at
/// `-1/rate`.
pub fn time_axis(n: usize, rate: f64) -> Vec<f64> {
    (0..n).map(|i| (i as f64 - n as f64) / rate).collect()
}

/// Owns the views of one dialog plus the paused flag, and turns incoming
/// updates into redraw decisions. While paused, updates are still cached but
/// no redraw is reported.
pub struct ScopeController {
    spectrum: SpectrumView,
    raw: Option<RawView>,
    paused: bool,
}

impl ScopeController {
    /// Controller for the simple dialog: spectrum plot only.
    pub fn spectrum_only() -> Self {
        Self {
            spectrum: SpectrumView::new(),
            raw: None,
            paused: false,
        }
    }

    /// Controller for the aggregate dialog: raw plot plus spectrum plot.
    pub fn with_raw(sample_rate: f64) -> Self {
        Self {
            spectrum: SpectrumView::new(),
            raw: Some(RawView::new(sample_rate)),
            paused: false,
        }
    }

    /// Feed one update through the state machine. Returns the plot that must
    /// redraw, if any.
    pub fn apply(&mut self, update: &SignalUpdate) -> Option<PlotId> {
        match update.signal {
            WaveSignal::SpectrumX => {
                self.spectrum.accept_x(&update.samples);
                None
            }
            WaveSignal::SpectrumY => {
                if !self.spectrum.accept_y(&update.samples) || self.paused {
                    return None;
                }
                self.spectrum.try_draw().then_some(PlotId::Spectrum)
            }
            WaveSignal::RawY => {
                let raw = self.raw.as_mut()?;
                if !raw.accept_y(&update.samples) || self.paused {
                    return None;
                }
                raw.try_draw().then_some(PlotId::Raw)
            }
        }
    }

    /// Flip the paused flag. Un-pausing returns the cached Y arrays as
    /// updates the caller must re-deliver through the relay, so the resume
    /// redraw runs through the same state machine as a live update.
    #[must_use = "re-deliver the returned updates through the relay"]
    pub fn set_paused(&mut self, paused: bool) -> Vec<SignalUpdate> {
        self.paused = paused;
        if paused {
            return Vec::new();
        }
        let mut replays = Vec::new();
        if let Some(ys) = self.spectrum.cached_y() {
            replays.push(SignalUpdate::new(WaveSignal::SpectrumY, ys.to_vec()));
        }
        if let Some(ys) = self.raw.as_ref().and_then(RawView::cached_y) {
            replays.push(SignalUpdate::new(WaveSignal::RawY, ys.to_vec()));
        }
        replays
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn spectrum(&self) -> &SpectrumView {
        &self.spectrum
    }

    pub fn raw(&self) -> Option<&RawView> {
        self.raw.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_update(samples: Vec<f64>) -> SignalUpdate {
        SignalUpdate::new(WaveSignal::SpectrumX, samples)
    }

    fn y_update(samples: Vec<f64>) -> SignalUpdate {
        SignalUpdate::new(WaveSignal::SpectrumY, samples)
    }

    fn raw_update(samples: Vec<f64>) -> SignalUpdate {
        SignalUpdate::new(WaveSignal::RawY, samples)
    }

    #[test]
    fn one_redraw_per_y_after_x_none_before() {
        let mut ctl = ScopeController::spectrum_only();

        assert_eq!(ctl.apply(&x_update(vec![0.0, 1.0, 2.0, 3.0])), None);
        assert_eq!(ctl.spectrum().state(), SpectrumState::XOnly);
        assert_eq!(ctl.spectrum().revision(), 0);

        assert_eq!(
            ctl.apply(&y_update(vec![0.0, 5.0, 2.0, 1.0])),
            Some(PlotId::Spectrum)
        );
        assert_eq!(ctl.spectrum().state(), SpectrumState::Ready);
        assert_eq!(ctl.spectrum().revision(), 1);

        for i in 0..5 {
            assert_eq!(
                ctl.apply(&y_update(vec![i as f64; 4])),
                Some(PlotId::Spectrum)
            );
        }
        assert_eq!(ctl.spectrum().revision(), 6);
    }

    #[test]
    fn y_before_x_is_cached_without_drawing() {
        let mut ctl = ScopeController::spectrum_only();

        assert_eq!(ctl.apply(&y_update(vec![1.0, 2.0])), None);
        assert_eq!(ctl.spectrum().state(), SpectrumState::NoData);
        assert!(ctl.spectrum().line().is_none());

        // The axis arriving still does not draw; the next Y does.
        assert_eq!(ctl.apply(&x_update(vec![0.0, 1.0])), None);
        assert_eq!(ctl.apply(&y_update(vec![3.0, 4.0])), Some(PlotId::Spectrum));
    }

    #[test]
    fn empty_arrays_are_ignored_entirely() {
        let mut ctl = ScopeController::spectrum_only();
        assert_eq!(ctl.apply(&x_update(vec![])), None);
        assert_eq!(ctl.apply(&y_update(vec![])), None);
        assert_eq!(ctl.spectrum().state(), SpectrumState::NoData);
        assert!(ctl.spectrum().cached_y().is_none());
    }

    #[test]
    fn mismatched_lengths_withhold_the_draw() {
        let mut ctl = ScopeController::spectrum_only();
        ctl.apply(&x_update(vec![0.0, 1.0, 2.0]));
        assert_eq!(ctl.apply(&y_update(vec![1.0, 2.0, 3.0])), Some(PlotId::Spectrum));

        // Shorter Y: cached, but the stale line stays.
        assert_eq!(ctl.apply(&y_update(vec![9.0])), None);
        assert_eq!(ctl.spectrum().revision(), 1);
        assert_eq!(ctl.spectrum().line().unwrap().ys, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn pause_gates_redraws_and_unpause_replays_latest() {
        let mut ctl = ScopeController::spectrum_only();
        ctl.apply(&x_update(vec![0.0, 1.0]));
        ctl.apply(&y_update(vec![1.0, 1.0]));

        assert!(ctl.set_paused(true).is_empty());
        for i in 0..10 {
            assert_eq!(ctl.apply(&y_update(vec![i as f64, i as f64])), None);
        }
        assert_eq!(ctl.spectrum().revision(), 1);
        assert_eq!(ctl.spectrum().line().unwrap().ys, vec![1.0, 1.0]);

        let replays = ctl.set_paused(false);
        assert_eq!(replays.len(), 1);
        assert_eq!(replays[0].samples, vec![9.0, 9.0]);

        let redraws: Vec<_> = replays.iter().filter_map(|u| ctl.apply(u)).collect();
        assert_eq!(redraws, vec![PlotId::Spectrum]);
        assert_eq!(ctl.spectrum().revision(), 2);
        assert_eq!(ctl.spectrum().line().unwrap().ys, vec![9.0, 9.0]);
    }

    #[test]
    fn unpause_with_nothing_cached_replays_nothing() {
        let mut ctl = ScopeController::with_raw(1000.0);
        let _ = ctl.set_paused(true);
        assert!(ctl.set_paused(false).is_empty());
    }

    #[test]
    fn line_is_replaced_never_accumulated() {
        let mut ctl = ScopeController::spectrum_only();
        ctl.apply(&x_update(vec![0.0, 1.0, 2.0]));
        for i in 0..20 {
            ctl.apply(&y_update(vec![i as f64; 3]));
        }
        // One line object, holding exactly the latest data.
        let line = ctl.spectrum().line().unwrap();
        assert_eq!(line.ys, vec![19.0; 3]);
        assert_eq!(ctl.spectrum().revision(), 20);
    }

    #[test]
    fn time_axis_is_the_half_open_range_ending_before_zero() {
        let axis = time_axis(4, 1000.0);
        assert_eq!(axis.len(), 4);
        let expected = [-0.004, -0.003, -0.002, -0.001];
        for (a, e) in axis.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12);
        }
        assert!(axis.windows(2).all(|w| w[0] < w[1]));

        let long = time_axis(2048, 500.0);
        assert_eq!(long.len(), 2048);
        assert!((long[0] + 2048.0 / 500.0).abs() < 1e-12);
        assert!((long[2047] + 1.0 / 500.0).abs() < 1e-12);
    }

    #[test]
    fn raw_axis_regenerates_only_on_length_change() {
        let mut ctl = ScopeController::with_raw(1000.0);

        assert_eq!(ctl.apply(&raw_update(vec![1.0; 4])), Some(PlotId::Raw));
        let first_axis = ctl.raw().unwrap().time_axis().unwrap().to_vec();
        assert_eq!(first_axis.len(), 4);

        assert_eq!(ctl.apply(&raw_update(vec![2.0; 4])), Some(PlotId::Raw));
        assert_eq!(ctl.raw().unwrap().time_axis().unwrap(), &first_axis[..]);

        assert_eq!(ctl.apply(&raw_update(vec![3.0; 8])), Some(PlotId::Raw));
        let regenerated = ctl.raw().unwrap().time_axis().unwrap();
        assert_eq!(regenerated.len(), 8);
        assert!((regenerated[0] + 0.008).abs() < 1e-12);
    }

    #[test]
    fn raw_updates_without_a_raw_view_are_ignored() {
        let mut ctl = ScopeController::spectrum_only();
        assert_eq!(ctl.apply(&raw_update(vec![1.0; 4])), None);
    }
}
