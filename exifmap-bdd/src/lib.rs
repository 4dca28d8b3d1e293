//! BDD harness (cucumber-rs).
//!
//! Scenarios live in `features/` and run through `tests/cucumber.rs`; this crate only exists to
//! keep them out of the production crates.
