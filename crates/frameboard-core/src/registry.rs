//! The frame registry: every live frame, the id allocator, z-order, and the lock flag.

use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::error::{FrameResult, FrameboardError};
use crate::frame::{FrameDocument, FrameRecord};
use crate::geometry::{Point, Size, Viewport};
use crate::ids::IdAllocator;

/// Owned dashboard state. Controllers take `&mut CollectionState`; nothing
/// here is global.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState {
    ids: IdAllocator,
    frames: BTreeMap<u32, FrameRecord>,
    z_counter: u32,
    locked: bool,
}

impl Default for CollectionState {
    fn default() -> Self {
        Self {
            ids: IdAllocator::new(),
            frames: BTreeMap::new(),
            z_counter: 1,
            locked: false,
        }
    }
}

impl CollectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a stored document. Frames without a usable id and
    /// duplicate ids are dropped; ids missing below `frameCount` become reusable.
    pub fn from_document(doc: &FrameDocument, cfg: &LayoutConfig) -> Self {
        let mut frames = BTreeMap::new();
        for info in &doc.frames {
            let Some(id) = info.id else {
                tracing::warn!("skipping stored frame without a usable id");
                continue;
            };
            if frames.contains_key(&id) {
                tracing::warn!(id, "skipping duplicate stored frame id");
                continue;
            }
            frames.insert(id, FrameRecord::from_info(id, info, cfg));
        }
        let ids = IdAllocator::rebuild(doc.frame_count, frames.keys().copied());
        Self {
            ids,
            frames,
            z_counter: 1,
            locked: false,
        }
    }

    /// Full snapshot for saving (never a diff).
    pub fn to_document(&self) -> FrameDocument {
        FrameDocument {
            frame_count: self.ids.high_water(),
            frames: self.frames.values().map(FrameRecord::to_info).collect(),
        }
    }

    /// Add a frame with the next id and constrain it into `viewport`.
    pub fn create(
        &mut self,
        position: Point,
        size: Size,
        title: impl FnOnce(u32) -> String,
        body: impl Into<String>,
        viewport: &Viewport,
    ) -> u32 {
        let id = self.ids.allocate();
        let mut record = FrameRecord::new(id, position, size, title(id), body);
        record.constrain(viewport);
        self.frames.insert(id, record);
        id
    }

    /// Remove a frame and return its id to the free set.
    pub fn remove(&mut self, id: u32) -> FrameResult<FrameRecord> {
        let record = self
            .frames
            .remove(&id)
            .ok_or(FrameboardError::UnknownFrame(id))?;
        self.ids.release(id);
        Ok(record)
    }

    pub fn get(&self, id: u32) -> Option<&FrameRecord> {
        self.frames.get(&id)
    }

    pub fn get_mut(&mut self, id: u32) -> FrameResult<&mut FrameRecord> {
        self.frames
            .get_mut(&id)
            .ok_or(FrameboardError::UnknownFrame(id))
    }

    pub fn frames(&self) -> impl Iterator<Item = &FrameRecord> {
        self.frames.values()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// Put a frame above every other one.
    pub fn raise(&mut self, id: u32) -> FrameResult<u32> {
        let z = self.z_counter + 1;
        let record = self.get_mut(id)?;
        record.z_order = z;
        self.z_counter = z;
        Ok(z)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Re-apply the viewport constraint to every frame.
    pub fn constrain_all(&mut self, viewport: &Viewport) {
        for record in self.frames.values_mut() {
            record.constrain(viewport);
        }
    }
}
