//! # DMR DQPSK Receiver Core
//!
//! This crate recovers two-bit symbols (dibits) from a digitally sampled,
//! complex-baseband radio channel carrying the differentially encoded QPSK
//! modulation used by the DMR land-mobile-radio protocol. It implements the
//! synchronous demodulation and symbol-recovery pipeline; channel filtering
//! upstream and frame/message decoding downstream are the caller's business.
//!
//! ## Signal Flow
//!
//! ```text
//!            I/Q batches (50 ksps)
//!                    │
//!      ┌─────────────▼──────────────┐
//!      │ DqpskDemodulator            │  overlap buffer, per-block
//!      │  · differential decoder     │  fractional-delay interpolation,
//!      │  · polyphase interpolator   │  phase = arg(cur · conj(prev))
//!      └─────────────┬──────────────┘
//!                    │ differential phases (1 per sample)
//!      ┌─────────────▼──────────────┐
//!      │ SymbolProcessor             │  symbol instant selection,
//!      │  · timing error detector    │  period tracking loop,
//!      │  · LMS equalizer            │  decision re-evaluation,
//!      │  · sync correlator          │  24-dibit aligned emission
//!      └─────────────┬──────────────┘
//!                    │
//!               Vec<Dibit>
//! ```
//!
//! The pipeline is single-threaded and synchronous: `receive` runs to
//! completion and returns the dibits decided during the batch, in strict
//! input order with a fixed 24-dibit latency.
//!
//! ## Example
//!
//! ```rust
//! use dmrx_core::prelude::*;
//!
//! let mut demod = DqpskDemodulator::new(DemodConfig::default()).unwrap();
//! let batch = ComplexSamples::new(vec![0.0; 256], vec![0.0; 256], 0).unwrap();
//! let dibits = demod.receive(&batch).unwrap();
//! assert!(dibits.len() >= 20);
//! ```

pub mod config;
pub mod demodulator;
pub mod dibit;
pub mod dibit_delay_line;
pub mod interpolator;
pub mod lms_equalizer;
pub mod logging;
pub mod symbol_processor;
pub mod sync_detector;
pub mod sync_pattern;
pub mod timing_error;
pub mod types;

// Re-export main types
pub use config::DemodConfig;
pub use demodulator::DqpskDemodulator;
pub use dibit::Dibit;
pub use symbol_processor::{DemodStats, SymbolProcessor};
pub use types::{ComplexSamples, DspError, DspResult, IQSample, Sample};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::DemodConfig;
    pub use crate::demodulator::DqpskDemodulator;
    pub use crate::dibit::Dibit;
    pub use crate::symbol_processor::DemodStats;
    pub use crate::types::{ComplexSamples, DspError, DspResult};
}
