use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PV name for {role} must not be empty")]
    EmptyPvName { role: &'static str },
    #[error("PV not connected: {0}")]
    Unconnected(String),
    #[error("Type error: expected {expected}, got {actual}")]
    Type {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("Data shape error: {0}")]
    Shape(String),
    #[error("Write to {pv} failed: {reason}")]
    Write { pv: String, reason: String },
    #[error("Configuration error: {0}")]
    Config(String),
}
