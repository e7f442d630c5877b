//! Per-track render data and GPU buffer bookkeeping.
//!
//! Lifecycle of a path's render data: `Uninitialized → Filled → Expired →
//! Filled → …`. Filled data is reused across frames without recomputation
//! until explicitly invalidated; invalidation is a flag write that may come
//! from another thread (at-least-once semantics, a redundant invalidation
//! just causes a redundant recompute).

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use foundation::math::ReferencePoint;
use track::{Appearance, TrackId, TrackPoint};

use crate::buffers::{BufferRole, VertexBuffer, VertexLayout};
use crate::host::{BufferHandle, GpuError, GpuResources};

/// Shared invalidation flag for one path's render data.
///
/// Cloned out to whatever thread reacts to track edits or appearance
/// changes; the next draw on the render thread observes the write.
#[derive(Debug, Clone, Default)]
pub struct ExpiryFlag(Arc<AtomicBool>);

impl ExpiryFlag {
    pub fn expire(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_expired(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Read and clear the flag.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::Relaxed)
    }
}

/// Ephemeral render data of one path, recomputed when expired.
#[derive(Debug, Default)]
pub struct PathRenderData {
    pub tessellated: Vec<TrackPoint>,
    pub reference: ReferencePoint,
    pub layout: VertexLayout,
    pub main: VertexBuffer,
    pub arrow_positions: VertexBuffer,
    pub arrow_surface: VertexBuffer,
    pub arrow_border: VertexBuffer,
    filled: bool,
    dirty: bool,
    expiry: ExpiryFlag,
}

impl PathRenderData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filled(&self) -> bool {
        self.filled
    }

    /// True until the first successful fill, and again after invalidation.
    pub fn needs_recompute(&self) -> bool {
        !self.filled || self.expiry.is_expired()
    }

    /// Mark a successful recompute; the data now needs an upload.
    pub fn mark_filled(&mut self) {
        self.filled = true;
        self.dirty = true;
    }

    /// Whether a fill happened since the last successful upload.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Call only after every buffer of a fill reached the GPU.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn set_expired(&self) {
        self.expiry.expire();
    }

    pub fn expiry_flag(&self) -> ExpiryFlag {
        self.expiry.clone()
    }

    /// CPU-side contents for a logical buffer role.
    ///
    /// The extrusion-verticals and marker buffers draw from the main vertex
    /// data with a different topology, so they upload the same contents.
    pub fn role_data(&self, role: BufferRole) -> &VertexBuffer {
        match role {
            BufferRole::Main | BufferRole::ExtrusionVerticals | BufferRole::Markers => &self.main,
            BufferRole::ArrowPosition => &self.arrow_positions,
            BufferRole::ArrowSurface => &self.arrow_surface,
            BufferRole::ArrowBorder => &self.arrow_border,
        }
    }

    /// Total uploaded bytes across the given roles, for cache accounting.
    pub fn total_bytes(&self, roles: &[BufferRole]) -> usize {
        roles.iter().map(|&r| self.role_data(r).byte_len()).sum()
    }
}

/// Logical buffers needed under the current feature flags, in upload order.
pub fn active_roles(appearance: &Appearance) -> Vec<BufferRole> {
    let mut roles = vec![BufferRole::Main];
    if appearance.extruded {
        roles.push(BufferRole::ExtrusionVerticals);
    }
    if appearance.show_position_markers {
        roles.push(BufferRole::Markers);
    }
    if appearance.arrows_visible {
        roles.extend([
            BufferRole::ArrowPosition,
            BufferRole::ArrowSurface,
            BufferRole::ArrowBorder,
        ]);
    }
    roles
}

/// Number of GPU buffers a track needs under the current feature flags.
pub fn required_buffer_count(appearance: &Appearance) -> usize {
    1 + usize::from(appearance.extruded)
        + usize::from(appearance.show_position_markers)
        + if appearance.arrows_visible { 3 } else { 0 }
}

/// One track's render data plus its GPU buffer handles.
#[derive(Debug, Default)]
pub struct RenderEntry {
    pub data: PathRenderData,
    handles: Vec<BufferHandle>,
    roles: Vec<BufferRole>,
}

impl RenderEntry {
    pub fn handle_for(&self, role: BufferRole) -> Option<BufferHandle> {
        // A failed reallocation leaves roles without handles; none then.
        self.roles
            .iter()
            .position(|&r| r == role)
            .and_then(|i| self.handles.get(i).copied())
    }

    /// Make the handle set match the current feature flags.
    ///
    /// A changed flag changes the required handle count; all handles are
    /// then discarded and reallocated as a set. Returns `true` when fresh
    /// handles were allocated (everything must be uploaded).
    pub fn ensure_handles(
        &mut self,
        key: TrackId,
        appearance: &Appearance,
        gpu: &mut impl GpuResources,
    ) -> Result<bool, GpuError> {
        let roles = active_roles(appearance);
        if self.roles == roles && self.handles.len() == roles.len() {
            return Ok(false);
        }

        if !self.handles.is_empty() {
            gpu.discard(key);
            self.handles.clear();
        }

        let bytes = self.data.total_bytes(&roles);
        self.handles = gpu.allocate(key, roles.len(), bytes)?;
        self.roles = roles;
        Ok(true)
    }

    /// Upload every logical buffer's current contents.
    pub fn upload_all(&self, gpu: &mut impl GpuResources) -> Result<(), GpuError> {
        for (&role, &handle) in self.roles.iter().zip(&self.handles) {
            gpu.upload(handle, self.data.role_data(role).as_slice())?;
        }
        Ok(())
    }
}

/// All per-track render entries, keyed by the track's stable id.
#[derive(Debug, Default)]
pub struct RenderCache {
    entries: BTreeMap<TrackId, RenderEntry>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, key: TrackId) -> Option<&RenderEntry> {
        self.entries.get(&key)
    }

    pub fn entry_or_default(&mut self, key: TrackId) -> &mut RenderEntry {
        self.entries.entry(key).or_default()
    }

    /// Invalidate a track's render data. Returns `false` for unknown keys.
    pub fn set_expired(&self, key: TrackId) -> bool {
        match self.entries.get(&key) {
            Some(entry) => {
                entry.data.set_expired();
                true
            }
            None => false,
        }
    }

    /// Shareable invalidation flag for a track, if it has an entry.
    pub fn expiry_flag(&self, key: TrackId) -> Option<ExpiryFlag> {
        self.entries.get(&key).map(|e| e.data.expiry_flag())
    }

    /// Drop a track's entry and its GPU handles.
    pub fn remove(&mut self, key: TrackId, gpu: &mut impl GpuResources) -> bool {
        match self.entries.remove(&key) {
            Some(entry) => {
                if !entry.handles.is_empty() {
                    gpu.discard(key);
                }
                true
            }
            None => false,
        }
    }
}
