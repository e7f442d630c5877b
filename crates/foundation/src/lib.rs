pub mod color;
pub mod math;

// Foundation crate: small, well-tested primitives only.
pub use color::*;
