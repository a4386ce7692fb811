//! Slice algorithms at every remainder length, on every backend

mod common;

use common::edge_case_lengths;
use lanewise_core::algo;
use lanewise_core::primitives::{Emu128Backend, Ops, Primitives, ScalarBackend};
#[cfg(target_arch = "x86_64")]
use lanewise_core::primitives::Sse2Backend;
use lanewise_core::{Error, Tag};

fn check_lengths<B: Ops>(be: &B) {
    let d = Tag::<f32, 4>::new();
    let dw = Tag::<u8, 16>::new();
    for len in edge_case_lengths() {
        let input: Vec<f32> = (0..len).map(|i| i as f32 * 0.5 - 3.0).collect();

        // guard element past the slice must survive every write
        let mut data = input.clone();
        data.push(f32::MAX);
        let half = be.set(d, 0.5);
        algo::transform(be, d, &mut data[..len], |v| be.mul(v, half));
        let want: Vec<f32> = input.iter().map(|x| x * 0.5).collect();
        assert_eq!(&data[..len], want.as_slice(), "transform len {len}");
        assert_eq!(data[len], f32::MAX);

        let mut kept = vec![0.0f32; len];
        let zero = be.zero(d);
        let n = algo::copy_if(be, d, &input, &mut kept, |v| be.ge(v, zero)).unwrap();
        let want: Vec<f32> = input.iter().copied().filter(|&x| x >= 0.0).collect();
        assert_eq!(&kept[..n], want.as_slice(), "copy_if len {len}");

        let found = algo::find_if(be, d, &input, |v| be.gt(v, zero));
        assert_eq!(found, input.iter().position(|&x| x > 0.0), "find_if len {len}");

        let mut bytes = vec![1u8; len + 1];
        algo::fill(be, dw, 7, &mut bytes[..len]);
        assert!(bytes[..len].iter().all(|&b| b == 7));
        assert_eq!(bytes[len], 1);

        let mut idx = vec![0u8; len];
        algo::generate(be, dw, &mut idx, |i| i);
        assert!(idx.iter().enumerate().all(|(i, &x)| x == i as u8));

        let mut copy = vec![0u8; len];
        algo::copy(be, dw, &idx, &mut copy).unwrap();
        assert_eq!(copy, idx);
        algo::replace(be, dw, &mut copy, 3, 200);
        assert_eq!(algo::find(be, dw, 200, &copy), (len > 3).then_some(3));
    }
}

#[test]
fn test_every_remainder_length() {
    check_lengths(&Emu128Backend);
    #[cfg(target_arch = "x86_64")]
    check_lengths(&Sse2Backend);
}

#[test]
fn test_single_lane_backend() {
    let be = ScalarBackend;
    let d = Tag::<i64, 1>::new();
    let mut data: Vec<i64> = (0..10).collect();
    let other: Vec<i64> = (0..10).rev().collect();
    algo::transform1(&be, d, &mut data, &other, |a, b| be.add(a, b)).unwrap();
    assert!(data.iter().all(|&x| x == 9));
    assert_eq!(algo::find(&be, d, 9, &data), Some(0));
}

#[test]
fn test_length_mismatch_is_an_error() {
    let be = Emu128Backend;
    let d = Tag::<u32, 4>::new();
    let mut data = vec![0u32; 8];
    let short = vec![1u32; 7];
    let err = algo::transform2(&be, d, &mut data, &short, &short, |v, _, _| v).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(err.to_string().contains("transform2"));

    let mut small = vec![0u32; 3];
    assert!(algo::copy_if(&be, d, &data, &mut small, |v| be.eq(v, v)).is_err());
}
