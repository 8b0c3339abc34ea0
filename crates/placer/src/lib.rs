//! ob-placer: randomized limit-order batch placement, library interface for
//! the binary and integration tests.

pub mod driver;
pub mod synth;
