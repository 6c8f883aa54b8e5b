//! Receiver Configuration
//!
//! Session-level parameters for the DQPSK receiver. A configuration is
//! validated once when the pipeline is constructed; rates are immutable
//! mid-session (changing the sample rate resets all loop state).
//!
//! The loop gains and the noise-gate multiplier are deliberately exposed
//! here rather than buried as globals: the timing loop and the equalizer
//! adaptation are independent controllers and their gains must be tunable
//! separately.
//!
//! ## Example
//!
//! ```rust
//! use dmrx_core::config::DemodConfig;
//!
//! let config = DemodConfig::default();
//! assert_eq!(config.symbol_rate, 4800);
//! assert!(config.validate().is_ok());
//! assert!((config.samples_per_symbol() - 10.4167).abs() < 1e-3);
//! ```

use crate::types::{DspError, DspResult};
use serde::{Deserialize, Serialize};

/// Interpolation headroom: the pipeline needs a few samples of symbol period
/// on either side of the 8-tap window.
pub(crate) const MIN_SAMPLES_PER_SYMBOL: f32 = 5.0;

/// DQPSK receiver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemodConfig {
    /// Channel symbol rate, symbols per second.
    pub symbol_rate: u32,
    /// Channel sample rate, Hz.
    pub sample_rate: f32,
    /// Equalizer half-length N; the filter spans 2N+1 symbols.
    pub equalizer_half_length: usize,
    /// LMS adaptation step size.
    pub equalizer_step: f32,
    /// Proportional gain of the symbol timing loop.
    pub sample_counter_gain: f32,
    /// Multiplier applied to the per-sample phase-jump noise gate
    /// (`2π / samples_per_symbol · multiplier`). Empirically chosen; treat
    /// as tunable.
    pub noise_multiplier: f32,
    /// Correlation score above which a sync pattern is declared.
    pub sync_threshold: f32,
    /// Enable the experimental closed-form equalizer retune on sync
    /// detection.
    pub sync_retune: bool,
}

impl Default for DemodConfig {
    /// DMR channel defaults: 4800 symbols/s in a 50 kHz channel.
    fn default() -> Self {
        Self {
            symbol_rate: 4800,
            sample_rate: 50_000.0,
            equalizer_half_length: 12,
            equalizer_step: 0.1,
            sample_counter_gain: 0.070,
            noise_multiplier: 1.2,
            sync_threshold: 80.0,
            sync_retune: false,
        }
    }
}

impl DemodConfig {
    /// Nominal samples per symbol for this configuration.
    pub fn samples_per_symbol(&self) -> f32 {
        self.sample_rate / self.symbol_rate as f32
    }

    /// Integral gain of the symbol period estimator, derived from the
    /// proportional gain so the two loop paths stay proportioned.
    pub fn observed_gain(&self) -> f32 {
        0.05 * self.sample_counter_gain * self.sample_counter_gain
    }

    /// Validate the configuration. No partial state is created on failure.
    pub fn validate(&self) -> DspResult<()> {
        if self.symbol_rate == 0 {
            return Err(DspError::InvalidSymbolRate(self.symbol_rate));
        }
        let minimum = MIN_SAMPLES_PER_SYMBOL * self.symbol_rate as f32;
        if !self.sample_rate.is_finite() || self.sample_rate < minimum {
            return Err(DspError::InvalidSampleRate {
                sample_rate: self.sample_rate,
                minimum,
            });
        }
        if self.equalizer_half_length == 0 {
            return Err(DspError::InvalidEqualizerLength(self.equalizer_half_length));
        }
        for (name, value) in [
            ("equalizer_step", self.equalizer_step),
            ("sample_counter_gain", self.sample_counter_gain),
            ("noise_multiplier", self.noise_multiplier),
            ("sync_threshold", self.sync_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DspError::InvalidGain { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = DemodConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.samples_per_symbol() - 50_000.0 / 4800.0).abs() < 1e-6);
        assert!((config.observed_gain() - 0.05 * 0.070 * 0.070).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_zero_symbol_rate() {
        let config = DemodConfig {
            symbol_rate: 0,
            ..DemodConfig::default()
        };
        assert_eq!(config.validate(), Err(DspError::InvalidSymbolRate(0)));
    }

    #[test]
    fn test_rejects_undersampled_channel() {
        // A sample rate at only twice the symbol rate leaves no room for the
        // interpolation window.
        let config = DemodConfig {
            sample_rate: 9600.0,
            ..DemodConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DspError::InvalidSampleRate { .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_rates() {
        for bad in [f32::NAN, f32::INFINITY, -50_000.0] {
            let config = DemodConfig {
                sample_rate: bad,
                ..DemodConfig::default()
            };
            assert!(config.validate().is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn test_rejects_bad_gains() {
        let config = DemodConfig {
            equalizer_step: 0.0,
            ..DemodConfig::default()
        };
        assert!(matches!(config.validate(), Err(DspError::InvalidGain { .. })));

        let config = DemodConfig {
            noise_multiplier: f32::NAN,
            ..DemodConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = DemodConfig {
            sync_retune: true,
            noise_multiplier: 1.5,
            ..DemodConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: DemodConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: DemodConfig = serde_json::from_str(r#"{"symbol_rate": 2400}"#).unwrap();
        assert_eq!(config.symbol_rate, 2400);
        assert_eq!(config.sample_rate, 50_000.0);
    }
}
