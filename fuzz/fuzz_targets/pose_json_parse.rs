//! Fuzz target for the pose bridge's landmark JSON.
//!
//! Feeds arbitrary bytes to `parse_landmarks`, checking for panics,
//! crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use posemark::pose::parse_landmarks;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = parse_landmarks(data);
});
