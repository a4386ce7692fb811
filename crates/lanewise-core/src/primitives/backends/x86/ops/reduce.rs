//! Butterfly reductions for 32- and 64-bit lanes
//!
//! Partners come from `pshufd` with the same pairing (`i ^ 1`, then `i ^ 2`)
//! as every other backend, so float sums agree bit for bit.

use std::arch::x86_64::*;

use crate::lane::{Lane, LaneType};
use crate::primitives::backends::x86::dispatch::full;
use crate::primitives::backends::x86::utils::*;
use crate::vector::Vector;

pub fn butterfly<T: Lane, const N: usize>(
    v: Vector<T, N>,
    op: impl Fn(Vector<T, N>, Vector<T, N>) -> Vector<T, N>,
) -> Option<Vector<T, N>> {
    // Safety: full vectors only
    unsafe {
        match full::<T, N>()? {
            LaneType::U32 | LaneType::I32 | LaneType::F32 => {
                let pairs = op(v, from_si(_mm_shuffle_epi32::<0xB1>(to_si(&v))));
                Some(op(pairs, from_si(_mm_shuffle_epi32::<0x4E>(to_si(&pairs)))))
            }
            LaneType::U64 | LaneType::I64 | LaneType::F64 => {
                Some(op(v, from_si(_mm_shuffle_epi32::<0x4E>(to_si(&v)))))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Emu128Backend, Ops, Primitives};

    #[test]
    fn test_matches_emulated_order() {
        let be = Emu128Backend;
        let v = Vector::<f32, 4>::from_array([1e8, 1.0, -1e8, 0.5]);
        let sum = butterfly(v, |a, b| be.add(a, b)).unwrap_or_default();
        assert!(sum.bit_eq(&be.sum_of_lanes(v.tag(), v)));

        let q = Vector::<i64, 2>::from_array([i64::MAX, 1]);
        let sum = butterfly(q, |a, b| be.add(a, b)).map(|v| v.to_array());
        assert_eq!(sum, Some([i64::MIN; 2]));
        assert!(butterfly(Vector::<u8, 16>::splat(1), |a, _| a).is_none());
    }
}
