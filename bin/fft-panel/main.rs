mod app;

use std::path::PathBuf;
use std::time::Duration;

use app::FftPanelApp;
use clap::Parser;
use log::info;

use fft_scope::PvFamily;
use fft_scope::config::load_config_or_default;
use fft_scope::pv::SimulatedConnector;
use fft_scope::sim::{FftPluginSim, SimOptions};

/// Aggregate display for one FFT plugin instance: raw block and spectrum,
/// stacked, with pause / enable / trigger controls.
#[derive(Parser, Debug)]
#[command(name = "fft-panel")]
#[command(about = "Live raw + spectrum display for one FFT plugin instance", long_about = None)]
struct Args {
    /// IOC prefix, e.g. "IOC_TEST:"
    prefix: String,

    /// Id of the FFT plugin instance, e.g. 0
    fft_id: u32,

    /// Run against the built-in simulated plugin instead of a live controller
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

    // Derivation fails fast on an empty prefix, before any window exists.
    let family = PvFamily::new(&args.prefix, args.fft_id)?;

    if !args.sim {
        return Err("no live controller transport in this build; run with --sim".into());
    }

    let connector = SimulatedConnector::new();
    let _sim = FftPluginSim::spawn_family(
        &connector,
        &family,
        SimOptions {
            sample_rate: cfg.sim.sample_rate,
            nfft: cfg.sim.nfft,
            period: Duration::from_millis(cfg.sim.period_ms),
            tones_hz: cfg.sim.tones_hz,
            mode: cfg.sim.acquisition_mode(),
        },
    );

    let app = FftPanelApp::connect(connector.as_ref(), &family, &cfg)?;
    info!(
        "displaying FFT plugin {} of {}",
        family.id(),
        family.prefix()
    );

    let title = app.title().to_string();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([cfg.display.window_width, cfg.display.window_height]),
        ..Default::default()
    };
    eframe::run_native(&title, options, Box::new(move |_cc| Ok(Box::new(app))))?;
    Ok(())
}
