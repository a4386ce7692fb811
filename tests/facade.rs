//! The facade crate exposes the whole core surface

use lanewise::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[test]
fn test_prelude_covers_a_kernel() -> anyhow::Result<()> {
    let be = active();
    let d = Tag::<i32, 4>::new();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let data: Vec<i32> = (0..37).map(|_| rng.gen_range(-100..100)).collect();

    let mut clamped = data.clone();
    let (lo, hi) = (be.set(d, -50), be.set(d, 50));
    algo::transform(&be, d, &mut clamped, |v| be.clamp(v, lo, hi));
    for (c, x) in clamped.iter().zip(&data) {
        assert_eq!(*c, (*x).clamp(-50, 50));
    }

    let mut sums = data.clone();
    algo::transform1(&be, d, &mut sums, &clamped, |a, b| be.sub(a, b))?;
    assert!(sums.iter().all(|s| s.abs() <= 50));
    Ok(())
}

#[test]
fn test_target_diagnostics() -> anyhow::Result<()> {
    let info = TargetInfo::current();
    assert_eq!(info.version, lanewise::VERSION);
    assert!(info.compiled.contains(&info.target));

    let json = info.to_json()?;
    let back: TargetInfo = serde_json::from_str(&json)?;
    assert_eq!(back, info);

    assert_eq!("emu128".parse::<Target>()?, Target::Emu128);
    assert!("neon".parse::<Target>().is_err());
    Ok(())
}
