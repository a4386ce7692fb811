//! Property tests: every backend and the generic compositions agree lane for lane
//!
//! The emulated backend is checked against scalar lane arithmetic, its native
//! overrides against the generic compositions, and on x86-64 the SSE2 backend
//! against the emulated one.

mod common;

use lanewise_core::primitives::{generic, Emu128Backend, Ops, Primitives};
#[cfg(target_arch = "x86_64")]
use lanewise_core::primitives::Sse2Backend;
use lanewise_core::{FloatLane, IntLane, Lane, Mask, Tag, UnsignedLane, Vector};
use proptest::prelude::*;

/// Equal bit patterns, or both NaN
fn same_lanes<T: FloatLane, const N: usize>(a: Vector<T, N>, b: Vector<T, N>) -> bool {
    a.to_array()
        .iter()
        .zip(b.to_array().iter())
        .all(|(x, y)| x.to_bits() == y.to_bits() || (x.is_nan() && y.is_nan()))
}

fn lanewise<T: Lane, const N: usize>(
    a: [T; N],
    b: [T; N],
    f: impl Fn(T, T) -> T,
) -> Vector<T, N> {
    Vector::from_array(std::array::from_fn(|i| f(a[i], b[i])))
}

fn mask_from<T: Lane, const N: usize>(pick: [bool; N]) -> Mask<T, N> {
    Mask::from_bools(pick)
}

/// Primitive on every backend against a scalar reference
macro_rules! check_primitive {
    ($op:ident, $a:expr, $b:expr, $want:expr) => {{
        let (a, b) = ($a, $b);
        prop_assert_eq!(Emu128Backend.$op(a, b), $want, "emu128 {}", stringify!($op));
        #[cfg(target_arch = "x86_64")]
        prop_assert_eq!(Sse2Backend.$op(a, b), $want, "sse2 {}", stringify!($op));
    }};
}

/// Native override on every backend against the generic composition
macro_rules! check_composite {
    ($op:ident ( $($arg:expr),* )) => {{
        let want = generic::$op(&Emu128Backend, $($arg),*);
        prop_assert_eq!(Emu128Backend.$op($($arg),*), want, "emu128 {}", stringify!($op));
        #[cfg(target_arch = "x86_64")]
        prop_assert_eq!(Sse2Backend.$op($($arg),*), want, "sse2 {}", stringify!($op));
    }};
}

/// Float variant of `check_composite`, NaN payloads aside
macro_rules! check_float_composite {
    ($op:ident ( $($arg:expr),* )) => {{
        let want = generic::$op(&Emu128Backend, $($arg),*);
        prop_assert!(same_lanes(Emu128Backend.$op($($arg),*), want), "emu128 {}", stringify!($op));
        #[cfg(target_arch = "x86_64")]
        prop_assert!(same_lanes(Sse2Backend.$op($($arg),*), want), "sse2 {}", stringify!($op));
    }};
}

proptest! {
    #[test]
    fn prop_u8_arithmetic(a in prop::array::uniform16(any::<u8>()), b in prop::array::uniform16(any::<u8>())) {
        let (va, vb) = (Vector::from_array(a), Vector::from_array(b));
        check_primitive!(add, va, vb, lanewise(a, b, u8::wrapping_add));
        check_primitive!(sub, va, vb, lanewise(a, b, u8::wrapping_sub));
        check_primitive!(min, va, vb, lanewise(a, b, std::cmp::min));
        check_primitive!(max, va, vb, lanewise(a, b, std::cmp::max));
        check_primitive!(saturated_add, va, vb, lanewise(a, b, u8::saturating_add));
        check_primitive!(saturated_sub, va, vb, lanewise(a, b, u8::saturating_sub));
        check_primitive!(
            average_round, va, vb,
            lanewise(a, b, |x, y| ((x as u16 + y as u16 + 1) >> 1) as u8)
        );
        check_composite!(saturated_add(va, vb));
        check_composite!(average_round(va, vb));
        check_composite!(sums_of8_abs_diff(Tag::<u64, 2>::new(), va, vb));
        check_composite!(promote_upper_to(Tag::<u16, 8>::new(), va));
    }

    #[test]
    fn prop_i16_arithmetic(a in prop::array::uniform8(any::<i16>()), b in prop::array::uniform8(any::<i16>())) {
        let (va, vb) = (Vector::from_array(a), Vector::from_array(b));
        check_primitive!(mul, va, vb, lanewise(a, b, i16::wrapping_mul));
        check_primitive!(saturated_add, va, vb, lanewise(a, b, i16::saturating_add));
        check_primitive!(saturated_sub, va, vb, lanewise(a, b, i16::saturating_sub));
        check_primitive!(lt, va, vb, mask_from(std::array::from_fn(|i| a[i] < b[i])));
        check_primitive!(eq, va, vb, mask_from(std::array::from_fn(|i| a[i] == b[i])));
        let emu = Emu128Backend;
        prop_assert_eq!(emu.shift_right::<5, _, 8>(va), generic::shift_right::<5, _, _, 8>(&emu, va));
        prop_assert_eq!(emu.shift_left::<15, _, 8>(va), generic::shift_left::<15, _, _, 8>(&emu, va));
        #[cfg(target_arch = "x86_64")]
        {
            prop_assert_eq!(Sse2Backend.shift_right::<5, _, 8>(va), emu.shift_right::<5, _, 8>(va));
            prop_assert_eq!(Sse2Backend.shift_left::<15, _, 8>(va), emu.shift_left::<15, _, 8>(va));
        }
        check_composite!(broadcast_sign_bit(va));
        check_composite!(neg(va));
        check_composite!(abs(va));
        check_composite!(promote_lower_to(Tag::<i32, 4>::new(), va));
        check_composite!(demote_to(Tag::<i8, 8>::new(), va));
        check_composite!(ordered_demote2_to(Tag::<i8, 16>::new(), va, vb));
        prop_assert_eq!(
            &Emu128Backend.ordered_demote2_to(Tag::<i8, 16>::new(), va, vb).to_array()[..8],
            &a.map(|x| x.clamp(-128, 127) as i8)[..]
        );
    }

    #[test]
    fn prop_32bit_lanes(a in prop::array::uniform4(any::<u32>()), b in prop::array::uniform4(any::<u32>())) {
        let (va, vb) = (Vector::from_array(a), Vector::from_array(b));
        check_primitive!(mul, va, vb, lanewise(a, b, u32::wrapping_mul));
        check_primitive!(min, va, vb, lanewise(a, b, std::cmp::min));
        check_primitive!(lt, va, vb, mask_from(std::array::from_fn(|i| a[i] < b[i])));

        let d = Tag::<u32, 4>::new();
        check_composite!(sum_of_lanes(d, va));
        check_composite!(max_of_lanes(d, va));
        check_composite!(population_count(va));
        check_composite!(leading_zero_count(va));
        prop_assert_eq!(
            Emu128Backend.rotate_right::<7, _, 4>(va),
            lanewise(a, a, |x, _| x.rotate_right(7))
        );

        let s: Vector<i32, 4> = Emu128Backend.bit_cast(Tag::<i32, 4>::new(), va);
        check_composite!(shift_right_same(s, 31));
        check_composite!(min_of_lanes(Tag::<i32, 4>::new(), s));
        check_composite!(ordered_truncate2_to(Tag::<u16, 8>::new(), va, vb));
        check_composite!(demote_to(Tag::<u16, 4>::new(), va));
        check_composite!(ordered_demote2_to(Tag::<i16, 8>::new(), s, s));
    }

    #[test]
    fn prop_64bit_lanes(a in prop::array::uniform2(any::<i64>()), b in prop::array::uniform2(any::<i64>())) {
        let (va, vb) = (Vector::from_array(a), Vector::from_array(b));
        check_primitive!(add, va, vb, lanewise(a, b, i64::wrapping_add));
        check_primitive!(mul, va, vb, lanewise(a, b, i64::wrapping_mul));
        check_primitive!(eq, va, vb, mask_from(std::array::from_fn(|i| a[i] == b[i])));
        check_primitive!(lt, va, vb, mask_from(std::array::from_fn(|i| a[i] < b[i])));
        check_composite!(shift_left_same(va, 13));
        check_composite!(if_negative_then_else(va, vb, va));
        check_composite!(sum_of_lanes(Tag::<i64, 2>::new(), va));
    }

    #[test]
    fn prop_f32_arithmetic(a in prop::array::uniform4(any::<f32>()), b in prop::array::uniform4(any::<f32>())) {
        let (va, vb) = (Vector::from_array(a), Vector::from_array(b));
        let backends_agree = |x: Vector<f32, 4>, y: Vector<f32, 4>| same_lanes(x, y);

        prop_assert!(backends_agree(Emu128Backend.add(va, vb), lanewise(a, b, |x, y| x + y)));
        prop_assert!(backends_agree(Emu128Backend.div(va, vb), lanewise(a, b, |x, y| x / y)));
        prop_assert!(backends_agree(Emu128Backend.min(va, vb), lanewise(a, b, f32::lane_min)));
        prop_assert!(backends_agree(Emu128Backend.max(va, vb), lanewise(a, b, f32::lane_max)));
        #[cfg(target_arch = "x86_64")]
        {
            let (sse, emu) = (Sse2Backend, Emu128Backend);
            prop_assert!(backends_agree(sse.add(va, vb), emu.add(va, vb)));
            prop_assert!(backends_agree(sse.mul(va, vb), emu.mul(va, vb)));
            prop_assert!(backends_agree(sse.div(va, vb), emu.div(va, vb)));
            prop_assert!(backends_agree(sse.sqrt(va), emu.sqrt(va)));
            prop_assert!(backends_agree(sse.min(va, vb), emu.min(va, vb)));
            prop_assert!(backends_agree(sse.max(va, vb), emu.max(va, vb)));
        }

        check_float_composite!(round(va));
        check_float_composite!(trunc(va));
        check_float_composite!(ceil(va));
        check_float_composite!(floor(va));
        check_float_composite!(copy_sign(va, vb));
        check_float_composite!(sum_of_lanes(va.tag(), va));

        let di = Tag::<i32, 4>::new();
        let want: Vector<i32, 4> = Vector::from_array(a.map(f32::to_int_saturating));
        prop_assert_eq!(Emu128Backend.convert_to_int(di, va), want);
        #[cfg(target_arch = "x86_64")]
        prop_assert_eq!(Sse2Backend.convert_to_int(di, va), want);
        check_composite!(nearest_int(di, va));
        check_float_composite!(promote_lower_to(Tag::<f64, 2>::new(), va));
        check_float_composite!(promote_upper_to(Tag::<f64, 2>::new(), va));
    }

    #[test]
    fn prop_f64_arithmetic(a in prop::array::uniform2(any::<f64>()), b in prop::array::uniform2(any::<f64>())) {
        let (va, vb) = (Vector::from_array(a), Vector::from_array(b));
        prop_assert!(same_lanes(Emu128Backend.sub(va, vb), lanewise(a, b, |x, y| x - y)));
        #[cfg(target_arch = "x86_64")]
        {
            let (sse, emu) = (Sse2Backend, Emu128Backend);
            prop_assert!(same_lanes(sse.sub(va, vb), emu.sub(va, vb)));
            prop_assert!(same_lanes(sse.min(va, vb), emu.min(va, vb)));
            prop_assert_eq!(sse.lt(va, vb), emu.lt(va, vb));
            prop_assert_eq!(sse.eq(va, vb), emu.eq(va, vb));
        }
        check_float_composite!(round(va));
        check_float_composite!(floor(va));
        check_float_composite!(max_of_lanes(va.tag(), va));
        check_composite!(is_nan(va));
        check_composite!(is_finite(va));
        check_float_composite!(ordered_demote2_to(Tag::<f32, 4>::new(), va, vb));
    }

    #[test]
    fn prop_permutations(a in prop::array::uniform16(any::<u8>()), b in prop::array::uniform16(any::<u8>()), pick in prop::array::uniform16(any::<bool>())) {
        let (va, vb) = (Vector::<u8, 16>::from_array(a), Vector::<u8, 16>::from_array(b));
        let m = Mask::<u8, 16>::from_bools(pick);
        check_composite!(reverse(va));
        check_composite!(reverse2(va));
        check_composite!(interleave_lower(va, vb));
        check_composite!(interleave_upper(va, vb));
        check_composite!(odd_even(va, vb));
        check_composite!(concat_even(va, vb));
        check_composite!(compress(va, m));
        check_composite!(expand(va, m));
        check_composite!(reverse_bits(va));
        check_composite!(bits_from_mask(m));
        check_composite!(find_last_true(m));
        check_composite!(set_before_first(m));

        let want = Vector::from_array(std::array::from_fn(|i| {
            if b[i] & 0x80 != 0 { 0 } else { a[(b[i] & 15) as usize] }
        }));
        check_primitive!(table_lookup_bytes, va, vb, want);
    }

    #[test]
    fn prop_partial_vectors(a in prop::array::uniform4(any::<u16>()), b in prop::array::uniform4(any::<u16>())) {
        let (va, vb) = (Vector::<u16, 4>::from_array(a), Vector::<u16, 4>::from_array(b));
        check_primitive!(add, va, vb, lanewise(a, b, u16::wrapping_add));
        check_primitive!(saturated_sub, va, vb, lanewise(a, b, u16::saturating_sub));
        check_composite!(reverse(va));
        check_composite!(interleave_lower(va, vb));
        check_composite!(sum_of_lanes(va.tag(), va));
        check_composite!(bits_from_mask(Emu128Backend.lt(va, vb)));
    }
}

#[test]
fn test_random_lanes_all_backends_agree() {
    let mut rng = common::rng(0x5eed);
    for _ in 0..256 {
        let a: Vector<u16, 8> = common::random_vector(&mut rng);
        let b: Vector<u16, 8> = common::random_vector(&mut rng);
        let emu = Emu128Backend;
        let shl = emu.shl(a, b);
        let want = Vector::from_array(std::array::from_fn(|i| {
            a.lane(i).lane_shl(b.lane(i) as u32)
        }));
        assert_eq!(shl, want);
        assert_eq!(
            emu.average_round(a, b).to_array(),
            std::array::from_fn::<u16, 8, _>(|i| a.lane(i).lane_average_round(b.lane(i)))
        );
        #[cfg(target_arch = "x86_64")]
        {
            assert_eq!(Sse2Backend.shl(a, b), shl);
            assert_eq!(Sse2Backend.average_round(a, b), emu.average_round(a, b));
        }

        let f = common::random_f32x4(&mut rng);
        let d = f.tag();
        assert!(same_lanes(emu.round(f), generic::round(&emu, f)));
        assert_eq!(emu.is_nan(f), generic::is_nan(&emu, f));
        #[cfg(target_arch = "x86_64")]
        assert!(same_lanes(Sse2Backend.sum_of_lanes(d, f), emu.sum_of_lanes(d, f)));
        let _ = d;
    }
}
