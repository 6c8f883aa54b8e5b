//! DQPSK Demodulator Facade
//!
//! Owns the residual-sample overlap buffer, runs the differential decoder
//! block-wise over each arriving batch, and forwards the decoded phase
//! stream to the symbol processor. The processor's observed symbol period
//! feeds back after every block to reposition the differential
//! interpolation point.
//!
//! ## Algorithm
//!
//! Differential decoding needs, for every incoming sample, a second sample
//! one symbol period later. The facade therefore keeps a tail of
//! `floor(samples_per_symbol) + 4` samples from the previous batch in front
//! of the new one: the "previous" sample of pair `x` is the raw buffer
//! entry at `x`, and the "current" sample is interpolated at
//! `x + floor(samples_per_symbol) − 4` plus the fractional remainder µ,
//! which centers the 8-tap interpolator with four taps on each side. The
//! product of the current sample and the conjugate of the previous one
//! yields a phasor whose angle is the transmitted symbol's phase
//! transition.
//!
//! ## Example
//!
//! ```rust
//! use dmrx_core::config::DemodConfig;
//! use dmrx_core::demodulator::DqpskDemodulator;
//! use dmrx_core::types::ComplexSamples;
//!
//! let mut demod = DqpskDemodulator::new(DemodConfig::default()).unwrap();
//! let batch = ComplexSamples::new(vec![0.0; 256], vec![0.0; 256], 0).unwrap();
//! let dibits = demod.receive(&batch).unwrap();
//! assert!(!dibits.is_empty());
//! ```

use crate::config::{DemodConfig, MIN_SAMPLES_PER_SYMBOL};
use crate::dibit::Dibit;
use crate::interpolator;
use crate::symbol_processor::{DemodStats, SymbolProcessor};
use crate::types::{ComplexSamples, DspError, DspResult};
use num_complex::Complex32;

/// Samples decoded per inner block before the interpolation point is
/// refreshed from the timing loop.
const BLOCK_WIDTH: usize = 8;

/// Streaming DQPSK demodulator for one radio channel.
#[derive(Debug, Clone)]
pub struct DqpskDemodulator {
    symbol_rate: u32,
    sample_rate: f32,
    samples_per_symbol: f32,
    /// Fractional part of the observed symbol period.
    mu: f32,
    /// Integer start of the 8-tap window, one symbol period downstream.
    interpolation_offset: usize,
    /// Residual samples carried between batches.
    overlap: usize,
    i_buffer: Vec<f32>,
    q_buffer: Vec<f32>,
    processor: SymbolProcessor,
}

impl DqpskDemodulator {
    /// Create a demodulator for the given configuration.
    ///
    /// Fails without side effects if the configuration is invalid.
    pub fn new(config: DemodConfig) -> DspResult<Self> {
        config.validate()?;
        let samples_per_symbol = config.samples_per_symbol();
        let mut demodulator = Self {
            symbol_rate: config.symbol_rate,
            sample_rate: config.sample_rate,
            samples_per_symbol,
            mu: 0.0,
            interpolation_offset: 0,
            overlap: 0,
            i_buffer: Vec::new(),
            q_buffer: Vec::new(),
            processor: SymbolProcessor::new(&config),
        };
        demodulator.update_observed(samples_per_symbol);
        demodulator.i_buffer = vec![0.0; demodulator.overlap];
        demodulator.q_buffer = vec![0.0; demodulator.overlap];
        tracing::debug!(
            symbol_rate = demodulator.symbol_rate,
            sample_rate = demodulator.sample_rate,
            samples_per_symbol,
            "demodulator configured"
        );
        Ok(demodulator)
    }

    /// Configured symbol rate, symbols per second.
    pub fn symbol_rate(&self) -> u32 {
        self.symbol_rate
    }

    /// Configured sample rate, Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Nominal samples per symbol.
    pub fn samples_per_symbol(&self) -> f32 {
        self.samples_per_symbol
    }

    /// Current symbol period estimate from the tracking loop.
    pub fn observed_samples_per_symbol(&self) -> f32 {
        self.processor.observed_samples_per_symbol()
    }

    /// Running counters from the symbol processor.
    pub fn stats(&self) -> DemodStats {
        self.processor.stats()
    }

    /// Change the channel sample rate. Resets all loop state.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> DspResult<()> {
        let minimum = MIN_SAMPLES_PER_SYMBOL * self.symbol_rate as f32;
        if !sample_rate.is_finite() || sample_rate < minimum {
            return Err(DspError::InvalidSampleRate {
                sample_rate,
                minimum,
            });
        }
        self.sample_rate = sample_rate;
        self.samples_per_symbol = sample_rate / self.symbol_rate as f32;
        self.processor
            .set_samples_per_symbol(self.samples_per_symbol);
        self.reset();
        Ok(())
    }

    /// Drop all signal state and re-arm the loops. Idempotent.
    pub fn reset(&mut self) {
        self.processor.reset();
        self.update_observed(self.samples_per_symbol);
        self.i_buffer.clear();
        self.i_buffer.resize(self.overlap, 0.0);
        self.q_buffer.clear();
        self.q_buffer.resize(self.overlap, 0.0);
        tracing::debug!("demodulator reset");
    }

    /// Demodulate a batch of complex samples and return the dibits decided
    /// during it. The returned batch may be empty.
    pub fn receive(&mut self, samples: &ComplexSamples) -> DspResult<Vec<Dibit>> {
        if samples.i.len() != samples.q.len() {
            return Err(DspError::RailLengthMismatch {
                i: samples.i.len(),
                q: samples.q.len(),
            });
        }
        let batch = samples.len();
        if batch == 0 {
            return Ok(Vec::new());
        }

        // Move the residual tail in front of the incoming batch.
        let overlap = self.overlap;
        let carried = self.i_buffer.len();
        self.i_buffer.copy_within(carried - overlap.., 0);
        self.q_buffer.copy_within(carried - overlap.., 0);
        self.i_buffer.resize(batch + overlap, 0.0);
        self.q_buffer.resize(batch + overlap, 0.0);
        self.i_buffer[overlap..].copy_from_slice(&samples.i);
        self.q_buffer[overlap..].copy_from_slice(&samples.q);

        let mut phases = [0.0f32; BLOCK_WIDTH];
        let mut x = 0;
        while x < batch {
            let width = BLOCK_WIDTH.min(batch - x);
            differential_phases(
                &self.i_buffer[x..],
                &self.q_buffer[x..],
                self.interpolation_offset,
                self.mu,
                &mut phases[..width],
            );
            self.processor.process(&phases[..width]);
            let observed = self.processor.observed_samples_per_symbol();
            self.update_observed(observed);
            x += width;
        }

        Ok(self.processor.take_symbols())
    }

    /// Recompute the interpolation placement from a symbol period estimate.
    fn update_observed(&mut self, samples_per_symbol: f32) {
        self.mu = samples_per_symbol.fract();
        self.interpolation_offset = samples_per_symbol.floor() as usize - 4;
        self.overlap = samples_per_symbol.floor() as usize + 4;
    }
}

/// Differentially decode `out.len()` samples.
///
/// For each pair, the "previous" member is the raw sample at `x` and the
/// "current" member is both rails interpolated at `interpolation_offset + x`
/// with fraction `mu`; the output is the angle of
/// `current · conj(previous)`, the rotation from previous to current.
pub fn differential_phases(
    i: &[f32],
    q: &[f32],
    interpolation_offset: usize,
    mu: f32,
    out: &mut [f32],
) {
    for (x, phase) in out.iter_mut().enumerate() {
        let previous = Complex32::new(i[x], q[x]);
        let index = interpolation_offset + x;
        let current = Complex32::new(
            interpolator::filter(i, index, mu),
            interpolator::filter(q, index, mu),
        );
        let differential = current * previous.conj();
        *phase = differential.im.atan2(differential.re);
    }
}
