//! Shared utilities for integration tests

#![allow(dead_code)]

pub use approx::assert_relative_eq;

use lanewise_core::{IntLane, Lane, Vector};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const EPSILON: f64 = 1e-6;

/// Slice lengths around every vector width this crate supports
pub fn edge_case_lengths() -> Vec<usize> {
    vec![
        0,  // Empty
        1,  // Single element
        2,  // f64 width
        3,  // f64 width + 1
        4,  // f32 width
        5,  // f32 width + 1
        7,  // Remainder only for u16
        8,  // u16 width
        9,  // u16 width + 1
        15, // u8 width - 1
        16, // u8 width
        17, // u8 width + 1
        31, // Prime
        33, // Two u8 vectors + 1
        100,
        127,
    ]
}

/// Float values that exercise signed zero, infinities, NaN and rounding ties
pub fn special_f32() -> Vec<f32> {
    vec![
        0.0,
        -0.0,
        0.5,
        -0.5,
        1.5,
        2.5,
        -2.5,
        3.5,
        f32::MIN_POSITIVE,
        f32::EPSILON,
        f32::MAX,
        f32::MIN,
        f32::INFINITY,
        f32::NEG_INFINITY,
        f32::NAN,
        8388609.0,
        -2147483904.0,
        2147483648.0,
    ]
}

/// Deterministic generator so failures reproduce
pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Random lanes drawn from the full bit pattern space
pub fn random_vector<T: Lane, const N: usize>(rng: &mut ChaCha8Rng) -> Vector<T, N> {
    Vector::from_array(std::array::from_fn(|_| T::from_bits(<T::Unsigned as IntLane>::truncate_from(rng.gen()))))
}

/// Random vectors mixed with special values in the float case
pub fn random_f32x4(rng: &mut ChaCha8Rng) -> Vector<f32, 4> {
    let specials = special_f32();
    Vector::from_array(std::array::from_fn(|_| {
        if rng.gen_bool(0.3) {
            specials[rng.gen_range(0..specials.len())]
        } else {
            rng.gen_range(-1.0e4f32..1.0e4)
        }
    }))
}

/// Assert two float slices are equal within tolerance, NaN matching NaN
pub fn assert_floats_equal(actual: &[f64], expected: &[f64], op: &str) {
    assert_eq!(actual.len(), expected.len(), "{op} length mismatch");
    for (&a, &e) in actual.iter().zip(expected) {
        if e.is_nan() {
            assert!(a.is_nan(), "{op}: expected NaN, got {a}");
        } else {
            assert_relative_eq!(a, e, epsilon = EPSILON);
        }
    }
}
