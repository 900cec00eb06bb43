pub mod config;
pub mod controls;
pub mod error;
pub mod export;
pub mod naming;
pub mod pv;
pub mod relay;
pub mod sim;
pub mod types;
pub mod view;

#[cfg(feature = "gui")]
pub mod panel;

pub use controls::FftControls;
pub use error::ScopeError;
pub use naming::{PvFamily, validate_pv_name};
pub use pv::{ProcessVariable, PvConnector, SimulatedConnector, SimulatedPv};
pub use relay::{UpdateReceiver, UpdateRelay, channel};
pub use sim::{FftPluginSim, SimOptions};
pub use types::{AcquisitionMode, PvValue, SignalUpdate, WaveSignal};
pub use view::{LineData, PlotId, RawState, RawView, ScopeController, SpectrumState, SpectrumView};
