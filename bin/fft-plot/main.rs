mod app;

use std::path::PathBuf;
use std::time::Duration;

use app::SpectrumPlotApp;
use clap::Parser;
use log::info;

use fft_scope::config::load_config_or_default;
use fft_scope::pv::SimulatedConnector;
use fft_scope::sim::{FftPluginSim, SimOptions};

/// Live spectrum plot of two waveform PVs (y vs x), updated on every y
/// callback.
#[derive(Parser, Debug)]
#[command(name = "fft-plot")]
#[command(about = "Plot one waveform PV against another, live", long_about = None)]
struct Args {
    /// X-axis waveform PV, e.g. "IOC_TEST:Plugin-FFT0-Spectrum-X-Axis-Act"
    x_pv: String,

    /// Y-axis waveform PV, e.g. "IOC_TEST:Plugin-FFT0-Spectrum-Amp-Act"
    y_pv: String,

    /// Run against the built-in simulated source instead of a live controller
    #[arg(long)]
    sim: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(format!(
        "{level},winit=warn,eframe=warn,egui_glow=warn,wgpu=warn,naga=warn"
    )))
    .format_timestamp_millis()
    .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let cfg = load_config_or_default(args.config.as_deref());
    init_logging(args.log_level.as_deref().unwrap_or(&cfg.console.verbosity));

    if !args.sim {
        return Err("no live controller transport in this build; run with --sim".into());
    }

    let connector = SimulatedConnector::new();
    let _sim = FftPluginSim::spawn_spectrum_pair(
        &connector,
        &args.x_pv,
        &args.y_pv,
        SimOptions {
            sample_rate: cfg.sim.sample_rate,
            nfft: cfg.sim.nfft,
            period: Duration::from_millis(cfg.sim.period_ms),
            tones_hz: cfg.sim.tones_hz,
            mode: cfg.sim.acquisition_mode(),
        },
    );

    // Any configuration problem is fatal here, before a window exists.
    let app = SpectrumPlotApp::connect(
        connector.as_ref(),
        &args.x_pv,
        &args.y_pv,
        Duration::from_millis(cfg.display.refresh_ms),
    )?;
    info!("displaying {} vs {}", args.y_pv, args.x_pv);

    let title = format!("FFT plot: {} vs {}", args.y_pv, args.x_pv);
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([cfg.display.window_width, cfg.display.window_height]),
        ..Default::default()
    };
    eframe::run_native(&title, options, Box::new(move |_cc| Ok(Box::new(app))))?;
    Ok(())
}
