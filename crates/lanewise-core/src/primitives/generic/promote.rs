use crate::lane::{Narrow, UnsignedLane, Widen};
use crate::primitives::Ops;
use crate::tag::Tag;
use crate::vector::Vector;

use super::lanes_of;

pub fn promote_to<B: Ops, T: Widen, const N: usize>(
    be: &B,
    dw: Tag<T::Wide, N>,
    v: Vector<T, N>,
) -> Vector<T::Wide, N> {
    let lanes = lanes_of(be, v);
    let wide: [T::Wide; N] = std::array::from_fn(|i| lanes[i].lane_promote());
    be.load_u(dw, &wide)
}

pub fn promote_lower_to<B: Ops, T: Widen, const N: usize, const H: usize>(
    be: &B,
    dw: Tag<T::Wide, H>,
    v: Vector<T, N>,
) -> Vector<T::Wide, H> {
    be.promote_to(dw, be.lower_half(Tag::<T, H>::new(), v))
}

pub fn promote_upper_to<B: Ops, T: Widen, const N: usize, const H: usize>(
    be: &B,
    dw: Tag<T::Wide, H>,
    v: Vector<T, N>,
) -> Vector<T::Wide, H> {
    be.promote_to(dw, be.upper_half(Tag::<T, H>::new(), v))
}

pub fn demote_to<B: Ops, T: Narrow, const N: usize>(
    be: &B,
    dn: Tag<T::Narrow, N>,
    v: Vector<T, N>,
) -> Vector<T::Narrow, N> {
    let lanes = lanes_of(be, v);
    let narrow: [T::Narrow; N] = std::array::from_fn(|i| lanes[i].lane_demote());
    be.load_u(dn, &narrow)
}

/// Demoted `a` in the lower half, demoted `b` in the upper half
pub fn ordered_demote2_to<B: Ops, T: Narrow, const N: usize, const M: usize>(
    be: &B,
    dn: Tag<T::Narrow, M>,
    a: Vector<T, N>,
    b: Vector<T, N>,
) -> Vector<T::Narrow, M> {
    const { assert!(M == 2 * N, "demoted pair fills one vector") }
    let dh = Tag::<T::Narrow, N>::new();
    be.combine(dn, be.demote_to(dh, b), be.demote_to(dh, a))
}

/// Low half of every lane of `a`, then of `b`
pub fn ordered_truncate2_to<B: Ops, T: UnsignedLane + Narrow, const N: usize, const M: usize>(
    be: &B,
    dn: Tag<T::Narrow, M>,
    a: Vector<T, N>,
    b: Vector<T, N>,
) -> Vector<T::Narrow, M> {
    const { assert!(M == 2 * N, "truncated pair fills one vector") }
    // little-endian lanes: the low half of wide lane i is narrow lane 2i
    be.concat_even(be.bit_cast(dn, b), be.bit_cast(dn, a))
}
