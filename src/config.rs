use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::AcquisitionMode;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ScopeConfig {
    pub display: DisplayConfig,
    pub sim: SimConfig,
    pub console: ConsoleConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DisplayConfig {
    /// UI refresh interval in milliseconds.
    pub refresh_ms: u64,
    pub window_width: f32,
    pub window_height: f32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SimConfig {
    pub period_ms: u64,
    pub sample_rate: f64,
    pub nfft: usize,
    pub tones_hz: [f64; 2],
    /// "cont" or "trigg".
    pub mode: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConsoleConfig {
    pub verbosity: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_ms: 100,
            window_width: 900.0,
            window_height: 700.0,
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            period_ms: 200,
            sample_rate: 1000.0,
            nfft: 1024,
            tones_hz: [50.0, 120.0],
            mode: "cont".to_string(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            verbosity: "info".to_string(),
        }
    }
}

impl SimConfig {
    pub fn acquisition_mode(&self) -> AcquisitionMode {
        match self.mode.as_str() {
            "cont" => AcquisitionMode::Continuous,
            "trigg" => AcquisitionMode::Triggered,
            _ => AcquisitionMode::Unknown,
        }
    }
}

/// Load configuration from file with layered fallbacks
pub fn load_config(config_path: Option<&Path>) -> Result<ScopeConfig, ConfigError> {
    let mut builder = Config::builder().add_source(Config::try_from(&ScopeConfig::default())?);

    if let Some(path) = config_path {
        if path.exists() {
            builder = builder.add_source(File::from(path));
        } else {
            return Err(ConfigError::Message(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
    } else if Path::new("fft-scope.toml").exists() {
        builder = builder.add_source(File::with_name("fft-scope.toml"));
    }

    // Environment variable overrides with prefix "FFT_SCOPE_"
    builder = builder.add_source(
        Environment::with_prefix("FFT_SCOPE")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize::<ScopeConfig>()
}

/// Load configuration with defaults when no file is usable.
pub fn load_config_or_default(config_path: Option<&Path>) -> ScopeConfig {
    match load_config(config_path) {
        Ok(config) => {
            log::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            log::warn!("Failed to load config ({}), using defaults", e);
            ScopeConfig::default()
        }
    }
}
