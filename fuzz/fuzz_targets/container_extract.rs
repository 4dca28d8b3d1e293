#![no_main]

//! Fuzz target for raw EXIF parsing followed by photo extraction.
//!
//! Arbitrary bytes go through `ExifTagStore::from_raw`; whatever parses is run through the
//! photo schema under both timestamp policies and dumped. None of it may panic.

use exifmap_container::ExifTagStore;
use exifmap_domain::{ExtractOptions, TagStore, TimestampPolicy, extract_photo};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(store) = ExifTagStore::from_raw(data.to_vec()) else {
        return;
    };

    for timestamps in [TimestampPolicy::Strict, TimestampPolicy::Lenient] {
        let _ = extract_photo(&store, ExtractOptions { timestamps });
    }

    for name in store.tag_names() {
        if let Ok(raw) = store.get(&name) {
            let _ = raw.display();
            let _ = raw.int64(0);
            let _ = raw.rational(0);
            let _ = raw.string();
        }
    }
});
