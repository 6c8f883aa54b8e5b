//! Core types for the DMR receiver
//!
//! This module defines the fundamental types shared across the demodulation
//! pipeline, particularly the complex I/Q sample batch format handed to the
//! receiver by the source stage.
//!
//! ## Understanding I/Q Samples
//!
//! The channel is represented as complex baseband: the I (in-phase) rail is
//! the real component and the Q (quadrature) rail the imaginary component.
//! Batches keep the two rails as separate `f32` arrays so the differential
//! decoder can run the same interpolation kernel over each rail without
//! de-interleaving.

use num_complex::Complex32;

/// A single complex baseband sample.
pub type IQSample = Complex32;

/// A real-valued sample (one rail, or a differential phase in radians).
pub type Sample = f32;

/// Result type for receiver operations.
pub type DspResult<T> = Result<T, DspError>;

/// A batch of complex baseband samples as separate I and Q rails.
///
/// The two rails always have equal length. The timestamp is the capture time
/// of the first sample, in nanoseconds, and is monotonically non-decreasing
/// across batches from a well-behaved source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplexSamples {
    /// In-phase rail.
    pub i: Vec<f32>,
    /// Quadrature rail.
    pub q: Vec<f32>,
    /// Capture timestamp of the first sample, nanoseconds.
    pub timestamp: u64,
}

impl ComplexSamples {
    /// Create a batch from its rails.
    pub fn new(i: Vec<f32>, q: Vec<f32>, timestamp: u64) -> DspResult<Self> {
        if i.len() != q.len() {
            return Err(DspError::RailLengthMismatch {
                i: i.len(),
                q: q.len(),
            });
        }
        Ok(Self { i, q, timestamp })
    }

    /// Number of complex samples in the batch.
    pub fn len(&self) -> usize {
        self.i.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.i.is_empty()
    }

    /// View sample `index` as a complex number.
    pub fn sample(&self, index: usize) -> IQSample {
        Complex32::new(self.i[index], self.q[index])
    }
}

/// Errors that can occur while configuring or feeding the receiver.
///
/// Numeric degeneracy inside the loops (non-finite equalizer output or taps,
/// non-finite symbol period estimate) is deliberately *not* an error: those
/// values are substituted and processing continues, trading transient
/// accuracy for liveness.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DspError {
    #[error("invalid sample rate {sample_rate} Hz: must be finite and at least {minimum} Hz")]
    InvalidSampleRate { sample_rate: f32, minimum: f32 },

    #[error("invalid symbol rate: must be a positive number of symbols per second")]
    InvalidSymbolRate(u32),

    #[error("invalid equalizer half-length {0}: must be at least 1")]
    InvalidEqualizerLength(usize),

    #[error("invalid loop gain {name}: {value} must be finite and positive")]
    InvalidGain { name: &'static str, value: f32 },

    #[error("I/Q rail length mismatch: i={i}, q={q}")]
    RailLengthMismatch { i: usize, q: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_construction() {
        let batch = ComplexSamples::new(vec![1.0, 2.0], vec![3.0, 4.0], 42).unwrap();
        assert_eq!(batch.len(), 2);
        assert!(!batch.is_empty());
        assert_eq!(batch.timestamp, 42);
        assert_eq!(batch.sample(1), Complex32::new(2.0, 4.0));
    }

    #[test]
    fn test_rail_mismatch_rejected() {
        let err = ComplexSamples::new(vec![1.0, 2.0], vec![3.0], 0).unwrap_err();
        assert_eq!(err, DspError::RailLengthMismatch { i: 2, q: 1 });
    }

    #[test]
    fn test_empty_batch() {
        let batch = ComplexSamples::default();
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }
}
