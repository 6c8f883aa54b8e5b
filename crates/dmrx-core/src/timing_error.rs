//! DQPSK Timing Error Detector
//!
//! Decision-directed timing error for the symbol tracking loop. The error is
//! the distance from the interpolated symbol phase to the decided symbol's
//! ideal phase, signed by the direction the phasor is rotating across the
//! symbol instant: the two delay-line neighbors straddling the interpolated
//! point reveal whether the trajectory is rising or falling, which tells the
//! loop which way to push the sampling instant.
//!
//! ## Example
//!
//! ```rust
//! use dmrx_core::dibit::Dibit;
//! use dmrx_core::timing_error;
//! use std::f32::consts::FRAC_PI_4;
//!
//! // Sampled exactly at the ideal point: no correction.
//! let e = timing_error::calculate(Dibit::D00PlusOne, 0.6, FRAC_PI_4, 0.9);
//! assert_eq!(e, 0.0);
//! ```

use crate::dibit::Dibit;
use std::f32::consts::FRAC_PI_8;

/// Largest correction fed to the loop, radians.
pub const MAX_TIMING_ERROR: f32 = FRAC_PI_8;

/// Timing error in radians for one symbol decision.
///
/// `preceding` and `following` are the raw delay-line samples immediately
/// before and after the interpolated `sample`.
pub fn calculate(symbol: Dibit, preceding: f32, sample: f32, following: f32) -> f32 {
    let mut error = symbol.ideal_phase() - sample;

    if error > 0.0 {
        error = error.min(MAX_TIMING_ERROR);
    } else {
        error = error.max(-MAX_TIMING_ERROR);
    }

    if preceding < following {
        error
    } else {
        -error
    }
}
