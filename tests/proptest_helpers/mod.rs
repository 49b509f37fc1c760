#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub const CANVAS: u32 = 120;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// An axis-aligned square `(x0, y0, side)` kept one pixel clear of the
/// canvas edge.
pub fn arb_square(min_side: u32, max_side: u32) -> impl Strategy<Value = (u32, u32, u32)> {
    (min_side..=max_side).prop_flat_map(|side| {
        let max_origin = CANVAS - side - 1;
        (1..=max_origin, 1..=max_origin, Just(side))
    })
}

/// Two squares in separate horizontal bands, so they never touch.
pub fn arb_square_pair() -> impl Strategy<Value = ((u32, u32, u32), (u32, u32, u32))> {
    let band = CANVAS / 2;
    (5u32..=20, 5u32..=20).prop_flat_map(move |(s1, s2)| {
        (
            (1..=CANVAS - s1 - 1, 1..=band - s1 - 1, Just(s1)),
            (1..=CANVAS - s2 - 1, band + 1..=CANVAS - s2 - 1, Just(s2)),
        )
    })
}
