use crate::error::ScopeError;

// Record suffixes published by one FFT plugin instance.
pub const SUFFIX_SPECTRUM_AMP: &str = "Spectrum-Amp-Act";
pub const SUFFIX_SPECTRUM_X: &str = "Spectrum-X-Axis-Act";
pub const SUFFIX_RAW_DATA: &str = "Raw-Data-Act";
pub const SUFFIX_ENABLE: &str = "Enable";
pub const SUFFIX_TRIGG: &str = "Trigg";
pub const SUFFIX_SOURCE: &str = "Source";
pub const SUFFIX_SAMPLE_RATE: &str = "SampleRate-Act";
pub const SUFFIX_NFFT: &str = "NFFT";
pub const SUFFIX_MODE: &str = "Mode-RB";

/// Reject an empty PV name before any connection is attempted.
pub fn validate_pv_name(name: &str, role: &'static str) -> Result<(), ScopeError> {
    if name.is_empty() {
        return Err(ScopeError::EmptyPvName { role });
    }
    Ok(())
}

/// The set of PV names published by one FFT plugin instance, derived from the
/// IOC prefix and the plugin id by the fixed scheme
/// `<prefix>Plugin-FFT<id>-<suffix>`.
#[derive(Debug, Clone)]
pub struct PvFamily {
    prefix: String,
    id: u32,
}

impl PvFamily {
    pub fn new(prefix: &str, id: u32) -> Result<Self, ScopeError> {
        validate_pv_name(prefix, "IOC prefix")?;
        Ok(Self {
            prefix: prefix.to_string(),
            id,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    fn derive(&self, suffix: &str) -> String {
        format!("{}Plugin-FFT{}-{}", self.prefix, self.id, suffix)
    }

    pub fn spectrum_amp(&self) -> String {
        self.derive(SUFFIX_SPECTRUM_AMP)
    }

    pub fn spectrum_x_axis(&self) -> String {
        self.derive(SUFFIX_SPECTRUM_X)
    }

    pub fn raw_data(&self) -> String {
        self.derive(SUFFIX_RAW_DATA)
    }

    pub fn enable(&self) -> String {
        self.derive(SUFFIX_ENABLE)
    }

    pub fn trigg(&self) -> String {
        self.derive(SUFFIX_TRIGG)
    }

    pub fn source(&self) -> String {
        self.derive(SUFFIX_SOURCE)
    }

    pub fn sample_rate(&self) -> String {
        self.derive(SUFFIX_SAMPLE_RATE)
    }

    pub fn nfft(&self) -> String {
        self.derive(SUFFIX_NFFT)
    }

    pub fn mode(&self) -> String {
        self.derive(SUFFIX_MODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_the_fixed_naming_scheme() {
        let family = PvFamily::new("IOC_TEST:", 0).unwrap();
        assert_eq!(family.spectrum_amp(), "IOC_TEST:Plugin-FFT0-Spectrum-Amp-Act");
        assert_eq!(
            family.spectrum_x_axis(),
            "IOC_TEST:Plugin-FFT0-Spectrum-X-Axis-Act"
        );
        assert_eq!(family.raw_data(), "IOC_TEST:Plugin-FFT0-Raw-Data-Act");
        assert_eq!(family.enable(), "IOC_TEST:Plugin-FFT0-Enable");
        assert_eq!(family.trigg(), "IOC_TEST:Plugin-FFT0-Trigg");
        assert_eq!(family.source(), "IOC_TEST:Plugin-FFT0-Source");
        assert_eq!(family.sample_rate(), "IOC_TEST:Plugin-FFT0-SampleRate-Act");
        assert_eq!(family.nfft(), "IOC_TEST:Plugin-FFT0-NFFT");
        assert_eq!(family.mode(), "IOC_TEST:Plugin-FFT0-Mode-RB");
    }

    #[test]
    fn plugin_id_lands_in_every_name() {
        let family = PvFamily::new("LAB:", 3).unwrap();
        assert_eq!(family.spectrum_amp(), "LAB:Plugin-FFT3-Spectrum-Amp-Act");
    }

    #[test]
    fn empty_prefix_is_a_fatal_configuration_error() {
        let err = PvFamily::new("", 0).unwrap_err();
        assert!(matches!(err, ScopeError::EmptyPvName { role: "IOC prefix" }));
    }

    #[test]
    fn empty_explicit_name_is_rejected() {
        assert!(validate_pv_name("", "x axis").is_err());
        assert!(validate_pv_name("IOC:Wave", "x axis").is_ok());
    }
}
