//! Validators for conversion output.

pub mod artifacts;
pub mod cube;
pub mod roundtrip;
