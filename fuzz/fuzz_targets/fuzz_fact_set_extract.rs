#![no_main]

use apicompat_core::{extract_listing, FactSet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(facts) = serde_json::from_slice::<FactSet>(data) else {
        return;
    };

    // Cyclic or dangling references must not panic or hang extraction.
    if let Ok(listing) = extract_listing(&facts) {
        let _ = listing.to_json();
    }
});
