//! Polyphase Fractional-Delay Interpolator
//!
//! 8-tap FIR interpolator with 128 pre-computed fractional-delay phases,
//! used on both I/Q rails of the differential decoder and on the phase
//! delay line of the symbol processor. The fractional position µ ∈ [0, 1)
//! is quantized to 128ths of a sample; the interpolated point lies between
//! `samples[offset + 3]` and `samples[offset + 4]`.
//!
//! ## Algorithm
//!
//! Each table row is an 8-tap windowed-sinc sub-filter for one fractional
//! delay, normalized to unity gain. Row 0 is the exact unit impulse
//! `[0, 0, 0, 1, 0, 0, 0, 0]`, so `filter(s, offset, 0.0)` returns
//! `s[offset + 3]` bit-exactly; row 64 (µ = 0.5) is palindromic, so a
//! symmetric input interpolates to its exact midpoint. The table is built
//! once and shared by every pipeline instance.
//!
//! Two kernels compute the inner product: a plain scalar loop and a
//! lane-oriented variant (`simd` cargo feature) that separates the eight
//! multiplies from the in-order horizontal add so LLVM can vectorize the
//! multiply stage on SSE/AVX/NEON. Both perform the same operations in the
//! same order and return bitwise identical results.
//!
//! ## Example
//!
//! ```rust
//! use dmrx_core::interpolator;
//!
//! let samples = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
//! assert_eq!(interpolator::filter(&samples, 0, 0.0), 4.0);
//! let mid = interpolator::filter(&samples, 0, 0.5);
//! assert!((mid - 4.5).abs() < 1e-3);
//! ```

use std::f64::consts::PI;
use std::sync::OnceLock;

/// Taps per polyphase row.
pub const TAPS_PER_PHASE: usize = 8;

/// Number of quantized fractional-delay phases.
pub const PHASE_STEPS: usize = 128;

static TAPS: OnceLock<[[f32; TAPS_PER_PHASE]; PHASE_STEPS]> = OnceLock::new();

/// The shared 128×8 tap table.
///
/// Read-only after initialization; safe to share across pipeline instances.
pub fn taps() -> &'static [[f32; TAPS_PER_PHASE]; PHASE_STEPS] {
    TAPS.get_or_init(compute_tap_table)
}

/// Interpolate at fractional position `offset + 3 + mu`.
///
/// `samples` must hold at least `offset + 8` entries. `mu` outside [0, 1)
/// is clamped onto the nearest table row.
#[inline]
pub fn filter(samples: &[f32], offset: usize, mu: f32) -> f32 {
    #[cfg(feature = "simd")]
    {
        filter_lanes(samples, offset, mu)
    }
    #[cfg(not(feature = "simd"))]
    {
        filter_scalar(samples, offset, mu)
    }
}

/// Scalar multiply-accumulate kernel.
#[inline]
pub fn filter_scalar(samples: &[f32], offset: usize, mu: f32) -> f32 {
    let row = &taps()[phase_index(mu)];
    let window = &samples[offset..offset + TAPS_PER_PHASE];

    let mut accumulator = 0.0f32;
    for x in 0..TAPS_PER_PHASE {
        accumulator += row[x] * window[x];
    }
    accumulator
}

/// Lane-oriented kernel: vectorizable multiply stage, in-order horizontal
/// add. Performs the identical operation sequence as [`filter_scalar`], so
/// the result is bitwise equal.
#[inline]
pub fn filter_lanes(samples: &[f32], offset: usize, mu: f32) -> f32 {
    let row = &taps()[phase_index(mu)];
    let window = &samples[offset..offset + TAPS_PER_PHASE];

    let mut products = [0.0f32; TAPS_PER_PHASE];
    for x in 0..TAPS_PER_PHASE {
        products[x] = row[x] * window[x];
    }

    let mut accumulator = 0.0f32;
    for p in products {
        accumulator += p;
    }
    accumulator
}

/// Quantize µ onto a table row, clamping out-of-range requests.
#[inline]
fn phase_index(mu: f32) -> usize {
    // A negative float saturates to 0 on the usize cast.
    ((mu * PHASE_STEPS as f32) as usize).min(PHASE_STEPS - 1)
}

/// Build the polyphase table from the windowed-sinc prototype.
fn compute_tap_table() -> [[f32; TAPS_PER_PHASE]; PHASE_STEPS] {
    let mut table = [[0.0f32; TAPS_PER_PHASE]; PHASE_STEPS];
    for (step, row) in table.iter_mut().enumerate() {
        let mu = step as f64 / PHASE_STEPS as f64;
        let coeffs = compute_sinc_coeffs(mu);
        for (dst, src) in row.iter_mut().zip(coeffs) {
            *dst = src as f32;
        }
    }
    table
}

/// Windowed-sinc coefficients for one fractional delay, unity-gain
/// normalized. Uses a 4-term Nuttall window; sinc values at integer offsets
/// are snapped to their exact 0/1 values so row 0 is a clean impulse.
fn compute_sinc_coeffs(mu: f64) -> [f64; TAPS_PER_PHASE] {
    let mut coeffs = [0.0f64; TAPS_PER_PHASE];
    let half = TAPS_PER_PHASE as f64 / 2.0;

    for (i, c) in coeffs.iter_mut().enumerate() {
        let n = i as f64 - (half - 1.0) - mu;

        let nearest = n.round();
        let sinc = if (n - nearest).abs() < 1e-9 {
            if nearest == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            (PI * n).sin() / (PI * n)
        };

        let t = (i as f64 + (1.0 - mu)) / TAPS_PER_PHASE as f64;
        let window = 0.355768 - 0.487396 * (2.0 * PI * t).cos() + 0.144232 * (4.0 * PI * t).cos()
            - 0.012604 * (6.0 * PI * t).cos();

        *c = sinc * window;
    }

    let sum: f64 = coeffs.iter().sum();
    if sum.abs() > 1e-10 {
        for c in coeffs.iter_mut() {
            *c /= sum;
        }
    }

    coeffs
}
