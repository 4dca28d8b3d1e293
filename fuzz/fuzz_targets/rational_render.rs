#![no_main]

//! Fuzz target for rational construction and rendering.

use arbitrary::Arbitrary;
use exifmap_types::Rational;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    num: i64,
    den: i64,
    places: u8,
}

fuzz_target!(|input: Input| {
    let Ok(r) = Rational::new(input.num, input.den) else {
        return;
    };

    let _ = r.to_decimal_string(usize::from(input.places % 32));
    let fraction = r.to_fraction_string();
    assert!(!fraction.is_empty());
    assert_eq!(r.reduced(), r);
});
