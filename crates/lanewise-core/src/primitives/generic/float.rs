use crate::lane::{FloatLane, Lane};
use crate::primitives::Ops;
use crate::tag::Tag;
use crate::vector::{Mask, Vector};

/// Lanes whose magnitude is below `2^MANTISSA_BITS`; false for NaN
#[inline(always)]
fn has_fraction_bits<B: Ops, T: FloatLane, const N: usize>(be: &B, v: Vector<T, N>) -> Mask<T, N> {
    be.lt(be.abs(v), be.set(v.tag(), T::MANTISSA_END))
}

pub fn round<B: Ops, T: FloatLane, const N: usize>(be: &B, v: Vector<T, N>) -> Vector<T, N> {
    let d = v.tag();
    let end = be.set(d, T::MANTISSA_END);
    // adding 2^MANTISSA_BITS leaves no fraction bits; the addition rounds half to even
    let rounded = be.sub(be.add(be.abs(v), end), end);
    be.if_then_else(has_fraction_bits(be, v), be.copy_sign(rounded, v), v)
}

pub fn trunc<B: Ops, T: FloatLane, const N: usize>(be: &B, v: Vector<T, N>) -> Vector<T, N> {
    let d = v.tag();
    let di = d.to_signed();
    let integral = be.convert_to_float(d, be.convert_to_int(di, v));
    be.if_then_else(has_fraction_bits(be, v), be.copy_sign(integral, v), v)
}

pub fn ceil<B: Ops, T: FloatLane, const N: usize>(be: &B, v: Vector<T, N>) -> Vector<T, N> {
    let t = be.trunc(v);
    // select rather than add zero so that -0.5 keeps its sign
    be.if_then_else(be.lt(t, v), be.add(t, be.set(v.tag(), T::ONE)), t)
}

pub fn floor<B: Ops, T: FloatLane, const N: usize>(be: &B, v: Vector<T, N>) -> Vector<T, N> {
    let t = be.trunc(v);
    be.if_then_else(be.gt(t, v), be.sub(t, be.set(v.tag(), T::ONE)), t)
}

pub fn nearest_int<B: Ops, T: FloatLane, const N: usize>(
    be: &B,
    d: Tag<T::Signed, N>,
    v: Vector<T, N>,
) -> Vector<T::Signed, N> {
    be.convert_to_int(d, be.round(v))
}

pub fn is_nan<B: Ops, T: FloatLane, const N: usize>(be: &B, v: Vector<T, N>) -> Mask<T, N> {
    be.ne(v, v)
}

pub fn is_inf<B: Ops, T: FloatLane, const N: usize>(be: &B, v: Vector<T, N>) -> Mask<T, N> {
    be.eq(be.abs(v), be.inf(v.tag()))
}

pub fn is_finite<B: Ops, T: FloatLane, const N: usize>(be: &B, v: Vector<T, N>) -> Mask<T, N> {
    be.lt(be.abs(v), be.inf(v.tag()))
}
