//! DQPSK Dibit Symbols
//!
//! A dibit is a two-bit symbol carried by one DQPSK phase transition. The
//! four constellation points sit at ±π/4 and ±3π/4 radians; the outer points
//! carry the ±3 deviation used by DMR and the inner points the ±1 deviation.
//!
//! ## Example
//!
//! ```rust
//! use dmrx_core::dibit::Dibit;
//! use std::f32::consts::FRAC_PI_4;
//!
//! let symbol = Dibit::decide(FRAC_PI_4);
//! assert_eq!(symbol, Dibit::D00PlusOne);
//! assert_eq!(symbol.value(), 0b00);
//! assert!((symbol.ideal_phase() - FRAC_PI_4).abs() < 1e-7);
//! ```

use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

/// Decision threshold between the inner and outer constellation points.
const DECISION_POSITIVE: f32 = FRAC_PI_2;
const DECISION_NEGATIVE: f32 = -FRAC_PI_2;

const IDEAL_PLUS_1: f32 = FRAC_PI_4;
const IDEAL_PLUS_3: f32 = 3.0 * FRAC_PI_4;
const IDEAL_MINUS_1: f32 = -FRAC_PI_4;
const IDEAL_MINUS_3: f32 = -3.0 * FRAC_PI_4;
const COMPONENT: f32 = FRAC_1_SQRT_2;
const NEG_COMPONENT: f32 = -FRAC_1_SQRT_2;

/// A two-bit DQPSK symbol.
///
/// The discriminant names follow the DMR air interface convention: bit pair
/// then signed symbol deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dibit {
    /// Bits `00`, deviation +1, ideal phase +π/4.
    D00PlusOne,
    /// Bits `01`, deviation +3, ideal phase +3π/4.
    D01PlusThree,
    /// Bits `10`, deviation −1, ideal phase −π/4.
    D10MinusOne,
    /// Bits `11`, deviation −3, ideal phase −3π/4.
    D11MinusThree,
}

impl Dibit {
    /// The two-bit value transmitted for this symbol.
    pub const fn value(self) -> u8 {
        match self {
            Dibit::D00PlusOne => 0b00,
            Dibit::D01PlusThree => 0b01,
            Dibit::D10MinusOne => 0b10,
            Dibit::D11MinusThree => 0b11,
        }
    }

    /// Symbol for a two-bit value (only the low two bits are considered).
    pub const fn from_value(value: u8) -> Dibit {
        match value & 0b11 {
            0b00 => Dibit::D00PlusOne,
            0b01 => Dibit::D01PlusThree,
            0b10 => Dibit::D10MinusOne,
            _ => Dibit::D11MinusThree,
        }
    }

    /// Ideal differential phase angle in radians at the symbol instant.
    pub const fn ideal_phase(self) -> f32 {
        match self {
            Dibit::D00PlusOne => IDEAL_PLUS_1,
            Dibit::D01PlusThree => IDEAL_PLUS_3,
            Dibit::D10MinusOne => IDEAL_MINUS_1,
            Dibit::D11MinusThree => IDEAL_MINUS_3,
        }
    }

    /// Ideal in-phase component of the constellation point.
    pub const fn ideal_i(self) -> f32 {
        match self {
            Dibit::D00PlusOne | Dibit::D10MinusOne => COMPONENT,
            Dibit::D01PlusThree | Dibit::D11MinusThree => NEG_COMPONENT,
        }
    }

    /// Ideal quadrature component of the constellation point.
    pub const fn ideal_q(self) -> f32 {
        match self {
            Dibit::D00PlusOne | Dibit::D01PlusThree => COMPONENT,
            Dibit::D10MinusOne | Dibit::D11MinusThree => NEG_COMPONENT,
        }
    }

    /// Hard decision: map a differential phase angle to the closest symbol.
    ///
    /// The quadrants partition the circle at 0 and ±π/2:
    /// `φ > π/2` → `D01PlusThree`, `0 < φ ≤ π/2` → `D00PlusOne`,
    /// `−π/2 ≤ φ ≤ 0` → `D10MinusOne`, `φ < −π/2` → `D11MinusThree`.
    pub fn decide(phase: f32) -> Dibit {
        if phase > 0.0 {
            if phase > DECISION_POSITIVE {
                Dibit::D01PlusThree
            } else {
                Dibit::D00PlusOne
            }
        } else if phase < DECISION_NEGATIVE {
            Dibit::D11MinusThree
        } else {
            Dibit::D10MinusOne
        }
    }
}
