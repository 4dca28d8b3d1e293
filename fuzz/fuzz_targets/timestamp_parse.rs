#![no_main]

//! Fuzz target for EXIF timestamp parsing.

use exifmap_domain::EXIF_TIME_LAYOUT;
use exifmap_domain::decode::parse_exif_timestamp;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Only the exact fixed-width layout parses, so formatting gives back the input.
    if let Ok(ts) = parse_exif_timestamp(s) {
        let again = ts.format(EXIF_TIME_LAYOUT).to_string();
        assert_eq!(again, s.trim_end_matches('\0'));
        assert_eq!(parse_exif_timestamp(&again).ok(), Some(ts));
    }
});
