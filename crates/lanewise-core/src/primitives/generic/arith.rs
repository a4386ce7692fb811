use crate::lane::{IntLane, Lane, SignedIntLane, SignedLane, UnsignedLane};
use crate::primitives::Ops;
use crate::tag::Tag;
use crate::vector::{Mask, Vector};

use super::{is_float, is_signed_int, lanes_of, msb_only};

/// Negation for any lane type: sign flip for floats, `0 - v` for integers
#[inline(always)]
fn negate<B: Ops, T: Lane, const N: usize>(be: &B, v: Vector<T, N>) -> Vector<T, N> {
    if is_float::<T>() {
        be.xor(v, msb_only(be, v.tag()))
    } else {
        be.sub(be.zero(v.tag()), v)
    }
}

pub fn neg<B: Ops, T: SignedLane, const N: usize>(be: &B, v: Vector<T, N>) -> Vector<T, N> {
    negate(be, v)
}

pub fn abs<B: Ops, T: SignedLane, const N: usize>(be: &B, v: Vector<T, N>) -> Vector<T, N> {
    if is_float::<T>() {
        be.and_not(msb_only(be, v.tag()), v)
    } else {
        // the minimum negates to itself and stays the maximum of the pair
        be.max(v, be.neg(v))
    }
}

pub fn abs_diff<B: Ops, T: Lane, const N: usize>(
    be: &B,
    a: Vector<T, N>,
    b: Vector<T, N>,
) -> Vector<T, N> {
    if is_float::<T>() {
        be.and_not(msb_only(be, a.tag()), be.sub(a, b))
    } else {
        be.sub(be.max(a, b), be.min(a, b))
    }
}

/// Sum of `|a - b|` over each group of eight bytes
pub fn sums_of8_abs_diff<B: Ops, const N: usize, const M: usize>(
    be: &B,
    d64: Tag<u64, M>,
    a: Vector<u8, N>,
    b: Vector<u8, N>,
) -> Vector<u64, M> {
    const { assert!(N == 8 * M, "eight bytes per u64 lane") }
    let diff = lanes_of(be, be.abs_diff(a, b));
    let sums: [u64; M] =
        std::array::from_fn(|i| diff[8 * i..8 * i + 8].iter().map(|&x| u64::from(x)).sum());
    be.load_u(d64, &sums)
}

pub fn mul_add<B: Ops, T: Lane, const N: usize>(
    be: &B,
    mul: Vector<T, N>,
    x: Vector<T, N>,
    add: Vector<T, N>,
) -> Vector<T, N> {
    be.add(be.mul(mul, x), add)
}

pub fn neg_mul_add<B: Ops, T: Lane, const N: usize>(
    be: &B,
    mul: Vector<T, N>,
    x: Vector<T, N>,
    add: Vector<T, N>,
) -> Vector<T, N> {
    be.sub(add, be.mul(mul, x))
}

pub fn mul_sub<B: Ops, T: Lane, const N: usize>(
    be: &B,
    mul: Vector<T, N>,
    x: Vector<T, N>,
    sub: Vector<T, N>,
) -> Vector<T, N> {
    be.sub(be.mul(mul, x), sub)
}

pub fn neg_mul_sub<B: Ops, T: Lane, const N: usize>(
    be: &B,
    mul: Vector<T, N>,
    x: Vector<T, N>,
    sub: Vector<T, N>,
) -> Vector<T, N> {
    be.sub(negate(be, be.mul(mul, x)), sub)
}

/// Signed overflow mask from the sign bits of `flags`, saturating towards the sign of `a`
#[inline(always)]
fn saturate_signed<B: Ops, T: IntLane, const N: usize>(
    be: &B,
    a: Vector<T, N>,
    flags: Vector<T, N>,
    wrapped: Vector<T, N>,
) -> Vector<T, N> {
    let d = a.tag();
    let overflow = be.shift_right_same(flags, T::BITS - 1);
    let limit = be.xor(be.set(d, T::HIGHEST), be.shift_right_same(a, T::BITS - 1));
    be.if_vec_then_else(overflow, limit, wrapped)
}

pub fn saturated_add<B: Ops, T: IntLane, const N: usize>(
    be: &B,
    a: Vector<T, N>,
    b: Vector<T, N>,
) -> Vector<T, N> {
    let sum = be.add(a, b);
    if is_signed_int::<T>() {
        // overflow iff a and b agree in sign and the sum does not
        let flags = be.and_not(be.xor(a, b), be.xor(a, sum));
        saturate_signed(be, a, flags, sum)
    } else {
        let wrapped = be.lt(sum, a);
        be.if_then_else(wrapped, be.set(a.tag(), T::HIGHEST), sum)
    }
}

pub fn saturated_sub<B: Ops, T: IntLane, const N: usize>(
    be: &B,
    a: Vector<T, N>,
    b: Vector<T, N>,
) -> Vector<T, N> {
    let diff = be.sub(a, b);
    if is_signed_int::<T>() {
        // overflow iff a and b differ in sign and the difference differs from a
        let flags = be.and(be.xor(a, b), be.xor(a, diff));
        saturate_signed(be, a, flags, diff)
    } else {
        be.if_then_zero_else(be.lt(a, b), diff)
    }
}

pub fn average_round<B: Ops, T: UnsignedLane, const N: usize>(
    be: &B,
    a: Vector<T, N>,
    b: Vector<T, N>,
) -> Vector<T, N> {
    be.sub(be.or(a, b), be.shift_right_same(be.xor(a, b), 1))
}

pub fn shift_left<const K: u32, B: Ops, T: IntLane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
) -> Vector<T, N> {
    const { assert!(K < T::BITS, "shift count exceeds lane width") }
    be.shift_left_same(v, K)
}

pub fn shift_right<const K: u32, B: Ops, T: IntLane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
) -> Vector<T, N> {
    const { assert!(K < T::BITS, "shift count exceeds lane width") }
    be.shift_right_same(v, K)
}

pub fn rotate_right<const K: u32, B: Ops, T: IntLane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
) -> Vector<T, N> {
    const { assert!(K < T::BITS, "rotate count exceeds lane width") }
    if K == 0 {
        return v;
    }
    let d = v.tag();
    let u = be.bit_cast(d.to_unsigned(), v);
    let rotated = be.or(
        be.shift_right_same(u, K),
        be.shift_left_same(u, T::BITS - K),
    );
    be.bit_cast(d, rotated)
}

pub fn shift_left_same<B: Ops, T: IntLane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    bits: u32,
) -> Vector<T, N> {
    let counts = be.set(v.tag(), T::truncate_from(u64::from(bits % T::BITS)));
    be.shl(v, counts)
}

pub fn shift_right_same<B: Ops, T: IntLane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    bits: u32,
) -> Vector<T, N> {
    let counts = be.set(v.tag(), T::truncate_from(u64::from(bits % T::BITS)));
    be.shr(v, counts)
}

pub fn broadcast_sign_bit<B: Ops, T: SignedIntLane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
) -> Vector<T, N> {
    be.shift_right_same(v, T::BITS - 1)
}

pub fn ne<B: Ops, T: Lane, const N: usize>(be: &B, a: Vector<T, N>, b: Vector<T, N>)
    -> Mask<T, N> {
    be.mask_not(be.eq(a, b))
}

pub fn gt<B: Ops, T: Lane, const N: usize>(be: &B, a: Vector<T, N>, b: Vector<T, N>)
    -> Mask<T, N> {
    be.lt(b, a)
}

pub fn le<B: Ops, T: Lane, const N: usize>(be: &B, a: Vector<T, N>, b: Vector<T, N>)
    -> Mask<T, N> {
    // not `!gt`: NaN operands must compare false
    be.mask_or(be.lt(a, b), be.eq(a, b))
}

pub fn ge<B: Ops, T: Lane, const N: usize>(be: &B, a: Vector<T, N>, b: Vector<T, N>)
    -> Mask<T, N> {
    be.le(b, a)
}
