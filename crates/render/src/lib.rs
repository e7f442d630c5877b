//! Track rendering geometry and GPU buffer cache.
//!
//! Turns a GPS track into renderable vertex data for a 3D globe: the main
//! path buffer (with optional per-vertex gradient colors and extrusion),
//! direction-arrow overlay geometry, state-dependent color resolution, and
//! a per-track buffer cache that avoids per-frame reallocation.
//!
//! The host renderer is abstracted behind [`PathTessellator`] and
//! [`GpuResources`]; everything here is synchronous and confined to the
//! render thread, except cross-thread invalidation via [`ExpiryFlag`].

pub mod arrows;
pub mod buffers;
pub mod cache;
pub mod draw;
pub mod highlight;
pub mod host;
pub mod transform;

#[cfg(test)]
pub(crate) mod fixtures;

pub use buffers::*;
pub use cache::*;
pub use draw::*;
pub use host::*;
