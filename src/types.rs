use crate::error::ScopeError;

/// Value carried by a process variable: the scalar, string and waveform
/// shapes the controller's diagnostic records expose.
#[derive(Debug, Clone, PartialEq)]
pub enum PvValue {
    F64(f64),
    I64(i64),
    Bool(bool),
    Str(String),
    ArrayF64(Vec<f64>),
}

impl PvValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PvValue::F64(_) => "f64",
            PvValue::I64(_) => "i64",
            PvValue::Bool(_) => "bool",
            PvValue::Str(_) => "string",
            PvValue::ArrayF64(_) => "f64 array",
        }
    }

    pub fn as_f64(&self) -> Result<f64, ScopeError> {
        match self {
            PvValue::F64(v) => Ok(*v),
            PvValue::I64(v) => Ok(*v as f64),
            other => Err(ScopeError::Type {
                expected: "f64",
                actual: other.type_name(),
            }),
        }
    }

    pub fn as_i64(&self) -> Result<i64, ScopeError> {
        match self {
            PvValue::I64(v) => Ok(*v),
            PvValue::F64(v) => Ok(*v as i64),
            PvValue::Bool(v) => Ok(i64::from(*v)),
            other => Err(ScopeError::Type {
                expected: "i64",
                actual: other.type_name(),
            }),
        }
    }

    /// Truthiness the way control-system records report flags: any non-zero
    /// numeric value counts as set.
    pub fn as_bool(&self) -> Result<bool, ScopeError> {
        match self {
            PvValue::Bool(v) => Ok(*v),
            PvValue::I64(v) => Ok(*v != 0),
            PvValue::F64(v) => Ok(*v != 0.0),
            other => Err(ScopeError::Type {
                expected: "bool",
                actual: other.type_name(),
            }),
        }
    }

    pub fn as_str(&self) -> Result<&str, ScopeError> {
        match self {
            PvValue::Str(v) => Ok(v),
            other => Err(ScopeError::Type {
                expected: "string",
                actual: other.type_name(),
            }),
        }
    }

    pub fn as_array(&self) -> Result<&[f64], ScopeError> {
        match self {
            PvValue::ArrayF64(v) => Ok(v),
            other => Err(ScopeError::Type {
                expected: "f64 array",
                actual: other.type_name(),
            }),
        }
    }
}

impl From<f64> for PvValue {
    fn from(value: f64) -> Self {
        PvValue::F64(value)
    }
}

impl From<i64> for PvValue {
    fn from(value: i64) -> Self {
        PvValue::I64(value)
    }
}

impl From<bool> for PvValue {
    fn from(value: bool) -> Self {
        PvValue::Bool(value)
    }
}

impl From<&str> for PvValue {
    fn from(value: &str) -> Self {
        PvValue::Str(value.to_string())
    }
}

impl From<Vec<f64>> for PvValue {
    fn from(value: Vec<f64>) -> Self {
        PvValue::ArrayF64(value)
    }
}

/// Acquisition mode read back from the plugin's `Mode-RB` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquisitionMode {
    /// Raw value 1: the plugin streams continuously.
    Continuous,
    /// Raw value 2: one burst per trigger pulse.
    Triggered,
    #[default]
    Unknown,
}

impl AcquisitionMode {
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => AcquisitionMode::Continuous,
            2 => AcquisitionMode::Triggered,
            _ => AcquisitionMode::Unknown,
        }
    }

    pub fn raw(&self) -> i64 {
        match self {
            AcquisitionMode::Continuous => 1,
            AcquisitionMode::Triggered => 2,
            AcquisitionMode::Unknown => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AcquisitionMode::Continuous => "CONT",
            AcquisitionMode::Triggered => "TRIGG",
            AcquisitionMode::Unknown => "NO_MODE",
        }
    }

    /// The trigger action is only meaningful in triggered mode.
    pub fn allows_trigger(&self) -> bool {
        matches!(self, AcquisitionMode::Triggered)
    }
}

/// Which waveform a subscription update belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveSignal {
    SpectrumX,
    SpectrumY,
    RawY,
}

/// One waveform update as delivered by the subscription layer.
#[derive(Debug, Clone)]
pub struct SignalUpdate {
    pub signal: WaveSignal,
    pub samples: Vec<f64>,
}

impl SignalUpdate {
    pub fn new(signal: WaveSignal, samples: Vec<f64>) -> Self {
        Self { signal, samples }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_decoding() {
        assert_eq!(AcquisitionMode::from_raw(1), AcquisitionMode::Continuous);
        assert_eq!(AcquisitionMode::from_raw(2), AcquisitionMode::Triggered);
        assert_eq!(AcquisitionMode::from_raw(0), AcquisitionMode::Unknown);
        assert_eq!(AcquisitionMode::from_raw(7), AcquisitionMode::Unknown);
        assert!(AcquisitionMode::Triggered.allows_trigger());
        assert!(!AcquisitionMode::Continuous.allows_trigger());
    }

    #[test]
    fn numeric_truthiness() {
        assert!(PvValue::I64(1).as_bool().unwrap());
        assert!(!PvValue::I64(0).as_bool().unwrap());
        assert!(PvValue::F64(0.5).as_bool().unwrap());
        assert!(PvValue::Bool(true).as_bool().unwrap());
        assert!(PvValue::Str("on".into()).as_bool().is_err());
    }

    #[test]
    fn accessor_type_errors_name_both_sides() {
        let err = PvValue::ArrayF64(vec![1.0]).as_f64().unwrap_err();
        assert!(err.to_string().contains("expected f64"));
        assert!(err.to_string().contains("f64 array"));
    }
}
