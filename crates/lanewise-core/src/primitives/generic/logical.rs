use crate::lane::{FloatLane, Lane, SignedLane};
use crate::primitives::Ops;
use crate::tag::Tag;
use crate::vector::{Mask, Vector};

use super::{all_ones, msb_only};

pub fn not<B: Ops, T: Lane, const N: usize>(be: &B, v: Vector<T, N>) -> Vector<T, N> {
    be.xor(v, all_ones(be, v.tag()))
}

pub fn xor3<B: Ops, T: Lane, const N: usize>(
    be: &B,
    a: Vector<T, N>,
    b: Vector<T, N>,
    c: Vector<T, N>,
) -> Vector<T, N> {
    be.xor(be.xor(a, b), c)
}

pub fn or3<B: Ops, T: Lane, const N: usize>(
    be: &B,
    a: Vector<T, N>,
    b: Vector<T, N>,
    c: Vector<T, N>,
) -> Vector<T, N> {
    be.or(be.or(a, b), c)
}

pub fn or_and<B: Ops, T: Lane, const N: usize>(
    be: &B,
    o: Vector<T, N>,
    a1: Vector<T, N>,
    a2: Vector<T, N>,
) -> Vector<T, N> {
    be.or(o, be.and(a1, a2))
}

pub fn if_vec_then_else<B: Ops, T: Lane, const N: usize>(
    be: &B,
    mask: Vector<T, N>,
    yes: Vector<T, N>,
    no: Vector<T, N>,
) -> Vector<T, N> {
    be.or(be.and(mask, yes), be.and_not(mask, no))
}

pub fn copy_sign<B: Ops, T: FloatLane, const N: usize>(
    be: &B,
    magn: Vector<T, N>,
    sign: Vector<T, N>,
) -> Vector<T, N> {
    be.if_vec_then_else(msb_only(be, magn.tag()), sign, magn)
}

pub fn copy_sign_to_abs<B: Ops, T: FloatLane, const N: usize>(
    be: &B,
    abs: Vector<T, N>,
    sign: Vector<T, N>,
) -> Vector<T, N> {
    be.or(abs, be.and(msb_only(be, abs.tag()), sign))
}

pub fn if_then_else<B: Ops, T: Lane, const N: usize>(
    be: &B,
    m: Mask<T, N>,
    yes: Vector<T, N>,
    no: Vector<T, N>,
) -> Vector<T, N> {
    be.if_vec_then_else(be.vec_from_mask(yes.tag(), m), yes, no)
}

pub fn if_then_else_zero<B: Ops, T: Lane, const N: usize>(
    be: &B,
    m: Mask<T, N>,
    yes: Vector<T, N>,
) -> Vector<T, N> {
    be.and(be.vec_from_mask(yes.tag(), m), yes)
}

pub fn if_then_zero_else<B: Ops, T: Lane, const N: usize>(
    be: &B,
    m: Mask<T, N>,
    no: Vector<T, N>,
) -> Vector<T, N> {
    be.and_not(be.vec_from_mask(no.tag(), m), no)
}

pub fn if_negative_then_else<B: Ops, T: SignedLane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    yes: Vector<T, N>,
    no: Vector<T, N>,
) -> Vector<T, N> {
    let d = v.tag();
    let di = d.to_signed();
    let negative = be.lt(be.bit_cast(di, v), be.zero(di));
    be.if_then_else(be.rebind_mask(d, negative), yes, no)
}

pub fn zero_if_negative<B: Ops, T: SignedLane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
) -> Vector<T, N> {
    be.if_negative_then_else(v, be.zero(v.tag()), v)
}

#[inline(always)]
fn via_vec<B: Ops, T: Lane, const N: usize>(
    be: &B,
    a: Mask<T, N>,
    b: Mask<T, N>,
    op: impl Fn(Vector<T, N>, Vector<T, N>) -> Vector<T, N>,
) -> Mask<T, N> {
    let d = Tag::<T, N>::new();
    be.mask_from_vec(op(be.vec_from_mask(d, a), be.vec_from_mask(d, b)))
}

pub fn mask_not<B: Ops, T: Lane, const N: usize>(be: &B, m: Mask<T, N>) -> Mask<T, N> {
    let d = Tag::<T, N>::new();
    be.mask_from_vec(be.not(be.vec_from_mask(d, m)))
}

pub fn mask_and<B: Ops, T: Lane, const N: usize>(be: &B, a: Mask<T, N>, b: Mask<T, N>)
    -> Mask<T, N> {
    via_vec(be, a, b, |x, y| be.and(x, y))
}

pub fn mask_or<B: Ops, T: Lane, const N: usize>(be: &B, a: Mask<T, N>, b: Mask<T, N>)
    -> Mask<T, N> {
    via_vec(be, a, b, |x, y| be.or(x, y))
}

pub fn mask_xor<B: Ops, T: Lane, const N: usize>(be: &B, a: Mask<T, N>, b: Mask<T, N>)
    -> Mask<T, N> {
    via_vec(be, a, b, |x, y| be.xor(x, y))
}

pub fn mask_and_not<B: Ops, T: Lane, const N: usize>(
    be: &B,
    a: Mask<T, N>,
    b: Mask<T, N>,
) -> Mask<T, N> {
    via_vec(be, a, b, |x, y| be.and_not(x, y))
}

pub fn exclusive_neither<B: Ops, T: Lane, const N: usize>(
    be: &B,
    a: Mask<T, N>,
    b: Mask<T, N>,
) -> Mask<T, N> {
    be.mask_not(be.mask_or(a, b))
}
