//! Simulated FFT plugin source.
//!
//! Publishes the same record family a live plugin would, backed by a tone
//! generator instead of drive hardware, so the display utilities run end to
//! end without a controller. Honors the `Enable`, `Mode-RB` and `Trigg`
//! records: continuous mode streams one block per cycle, triggered mode emits
//! a single burst per trigger pulse and rearms.

use std::f64::consts::TAU;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::info;
use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

use crate::naming::PvFamily;
use crate::pv::{ProcessVariable, SimulatedConnector, SimulatedPv};
use crate::types::{AcquisitionMode, PvValue};

#[derive(Debug, Clone)]
pub struct SimOptions {
    pub sample_rate: f64,
    pub nfft: usize,
    pub period: Duration,
    /// The two test tones mixed into the raw block.
    pub tones_hz: [f64; 2],
    pub mode: AcquisitionMode,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            sample_rate: 1000.0,
            nfft: 1024,
            period: Duration::from_millis(200),
            tones_hz: [50.0, 120.0],
            mode: AcquisitionMode::Continuous,
        }
    }
}

/// Phase-continuous two-tone generator with a small third-harmonic ripple.
struct ToneGenerator {
    sample_rate: f64,
    tones_hz: [f64; 2],
    pos: u64,
}

impl ToneGenerator {
    fn new(sample_rate: f64, tones_hz: [f64; 2]) -> Self {
        Self {
            sample_rate,
            tones_hz,
            pos: 0,
        }
    }

    fn next_block(&mut self, n: usize) -> Vec<f64> {
        let block = (0..n)
            .map(|i| {
                let t = (self.pos + i as u64) as f64 / self.sample_rate;
                (TAU * self.tones_hz[0] * t).sin()
                    + 0.4 * (TAU * self.tones_hz[1] * t).sin()
                    + 0.05 * (TAU * 3.0 * self.tones_hz[0] * t).sin()
            })
            .collect();
        self.pos += n as u64;
        block
    }
}

/// Single-sided amplitude spectrum: `2·|X_k|/n` over the first `n/2` bins.
pub fn amplitude_spectrum(samples: &[f64]) -> Vec<f64> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }
    let mut buf: Vec<Complex<f64>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    FftPlanner::new().plan_fft_forward(n).process(&mut buf);
    buf.iter()
        .take(n / 2)
        .map(|c| 2.0 * c.norm() / n as f64)
        .collect()
}

/// Frequency axis matching [`amplitude_spectrum`]: `k·rate/n` for the first
/// `n/2` bins.
pub fn frequency_axis(n: usize, rate: f64) -> Vec<f64> {
    (0..n / 2).map(|k| k as f64 * rate / n as f64).collect()
}

struct FamilyPvs {
    raw: Arc<SimulatedPv>,
    spect_x: Arc<SimulatedPv>,
    spect_y: Arc<SimulatedPv>,
    enable: Arc<SimulatedPv>,
    trigg: Arc<SimulatedPv>,
    mode: Arc<SimulatedPv>,
}

impl FamilyPvs {
    /// One acquisition cycle: raw block plus its spectrum. The frequency axis
    /// goes out before the amplitudes, matching the plugin's update order.
    fn publish_cycle(&self, generator: &mut ToneGenerator, nfft: usize, rate: f64) {
        let block = generator.next_block(nfft);
        let spectrum = amplitude_spectrum(&block);
        let _ = self.spect_x.put(PvValue::ArrayF64(frequency_axis(nfft, rate)));
        let _ = self.raw.put(PvValue::ArrayF64(block));
        let _ = self.spect_y.put(PvValue::ArrayF64(spectrum));
    }

    /// Returns true if data was published this cycle.
    fn step(&self, generator: &mut ToneGenerator, nfft: usize, rate: f64) -> bool {
        let enabled = self
            .enable
            .value()
            .and_then(|v| v.as_bool().ok())
            .unwrap_or(false);
        if !enabled {
            return false;
        }
        let mode = self
            .mode
            .value()
            .and_then(|v| v.as_i64().ok())
            .map(AcquisitionMode::from_raw)
            .unwrap_or_default();
        match mode {
            AcquisitionMode::Continuous => {
                self.publish_cycle(generator, nfft, rate);
                true
            }
            AcquisitionMode::Triggered => {
                let trigged = self
                    .trigg
                    .value()
                    .and_then(|v| v.as_bool().ok())
                    .unwrap_or(false);
                if !trigged {
                    return false;
                }
                self.publish_cycle(generator, nfft, rate);
                self.trigg.seed(PvValue::Bool(false));
                true
            }
            AcquisitionMode::Unknown => false,
        }
    }
}

/// Background stand-in for one FFT plugin instance. Stops and joins on drop.
pub struct FftPluginSim {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FftPluginSim {
    /// Publish the full record family of `family` on `connector`.
    pub fn spawn_family(
        connector: &SimulatedConnector,
        family: &PvFamily,
        opts: SimOptions,
    ) -> Self {
        let pvs = FamilyPvs {
            raw: connector.get_or_create(&family.raw_data()),
            spect_x: connector.get_or_create(&family.spectrum_x_axis()),
            spect_y: connector.get_or_create(&family.spectrum_amp()),
            enable: connector.get_or_create(&family.enable()),
            trigg: connector.get_or_create(&family.trigg()),
            mode: connector.get_or_create(&family.mode()),
        };
        pvs.raw.set_unit("V");
        pvs.spect_y.set_unit("V");
        pvs.spect_x.set_unit("Hz");
        pvs.enable.seed(PvValue::Bool(true));
        pvs.trigg.seed(PvValue::Bool(false));
        pvs.mode.seed(PvValue::I64(opts.mode.raw()));

        let source = connector.get_or_create(&family.source());
        source.seed(PvValue::Str("sim-tones".into()));
        let sample_rate = connector.get_or_create(&family.sample_rate());
        sample_rate.set_unit("Hz");
        sample_rate.seed(PvValue::F64(opts.sample_rate));
        let nfft = connector.get_or_create(&family.nfft());
        nfft.seed(PvValue::I64(opts.nfft as i64));

        info!(
            "simulated FFT plugin {}Plugin-FFT{}: {} Hz, nfft {}, {}",
            family.prefix(),
            family.id(),
            opts.sample_rate,
            opts.nfft,
            opts.mode.label()
        );

        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let handle = thread::spawn(move || {
            let mut generator = ToneGenerator::new(opts.sample_rate, opts.tones_hz);
            while !stop_flag.load(Ordering::Relaxed) {
                thread::sleep(opts.period);
                pvs.step(&mut generator, opts.nfft, opts.sample_rate);
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Publish only a spectrum pair on two explicit names, streaming
    /// unconditionally. Backs the simple two-PV dialog.
    pub fn spawn_spectrum_pair(
        connector: &SimulatedConnector,
        x_name: &str,
        y_name: &str,
        opts: SimOptions,
    ) -> Self {
        let spect_x = connector.get_or_create(x_name);
        let spect_y = connector.get_or_create(y_name);
        spect_x.set_unit("Hz");
        spect_y.set_unit("V");

        info!("simulated spectrum source: {y_name} vs {x_name}");

        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let handle = thread::spawn(move || {
            let mut generator = ToneGenerator::new(opts.sample_rate, opts.tones_hz);
            while !stop_flag.load(Ordering::Relaxed) {
                thread::sleep(opts.period);
                let block = generator.next_block(opts.nfft);
                let spectrum = amplitude_spectrum(&block);
                let _ = spect_x.put(PvValue::ArrayF64(frequency_axis(
                    opts.nfft,
                    opts.sample_rate,
                )));
                let _ = spect_y.put(PvValue::ArrayF64(spectrum));
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }
}

impl Drop for FftPluginSim {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
