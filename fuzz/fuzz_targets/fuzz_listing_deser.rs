#![no_main]

use apicompat_core::{Comparator, Listing};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(listing) = Listing::from_json(text) else {
        return;
    };

    // A loaded listing re-serializes and compares clean against itself.
    let json = listing.to_json().expect("loaded listing should serialize");
    let reloaded = Listing::from_json(&json).expect("serialized listing should reload");
    assert!(Comparator::new(&listing, &reloaded).compare().passed());
});
