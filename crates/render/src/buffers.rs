//! Growable CPU-side vertex buffers.
//!
//! Buffers are keyed by logical role and refilled in place across frames:
//! `clear` resets the used length without touching capacity, and capacity
//! only ever grows. This keeps allocation churn near zero for paths whose
//! length changes slowly between recomputes.

/// Logical role of one buffer within a track's buffer set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferRole {
    /// Main path vertices (position, optionally interleaved color).
    Main,
    /// Vertical connector lines of an extruded path.
    ExtrusionVerticals,
    /// Position marker anchor points.
    Markers,
    /// Direction-arrow pole points.
    ArrowPosition,
    /// Direction-arrow filled triangles.
    ArrowSurface,
    /// Direction-arrow triangle edges (line list).
    ArrowBorder,
}

/// Stride and color-channel layout of a vertex buffer, in `f32` elements.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: usize,
    pub color_offset: Option<usize>,
}

impl Default for VertexLayout {
    fn default() -> Self {
        Self::position()
    }
}

impl VertexLayout {
    /// Three floats per vertex: x, y, z.
    pub const fn position() -> Self {
        Self {
            stride: 3,
            color_offset: None,
        }
    }

    /// Seven floats per vertex: x, y, z, r, g, b, a.
    pub const fn position_color() -> Self {
        Self {
            stride: 7,
            color_offset: Some(3),
        }
    }
}

/// A flat `f32` vertex buffer whose capacity never shrinks.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VertexBuffer {
    data: Vec<f32>,
}

impl VertexBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the used length; capacity is retained for the next fill.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Grow backing storage to hold at least `len` floats. Never shrinks.
    pub fn ensure_capacity(&mut self, len: usize) {
        if self.data.capacity() < len {
            self.data.reserve(len - self.data.len());
        }
    }

    pub fn push(&mut self, values: &[f32]) {
        self.data.extend_from_slice(values);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn byte_len(&self) -> usize {
        self.data.len() * size_of::<f32>()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}
