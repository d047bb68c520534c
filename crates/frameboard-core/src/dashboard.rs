//! Dashboard: the event surface of the frame board.
//!
//! Owns the registry, the active interaction session, and the persistence
//! manager. Every completed interaction ends in [`Dashboard::persist`], the
//! only place a save is started. Backend writes run as detached tasks and
//! are never cancelled; a later save simply lands after an earlier one.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::carousel::{is_carousel, Carousel, CAROUSEL_MARKUP};
use crate::config::LayoutConfig;
use crate::error::{FrameResult, FrameboardError};
use crate::frame::MinimizeState;
use crate::geometry::{Point, Size, Viewport};
use crate::interaction::{HitTarget, Session};
use crate::persistence::{LoadSource, PersistenceManager};
use crate::registry::CollectionState;
use crate::spreadsheet::{GridOp, Spreadsheet};
use crate::store::HttpFrameStore;
use crate::view::{FrameView, DELETE_PROMPT};

/// Interaction that just completed and needs the layout saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTrigger {
    Create,
    Delete,
    DragEnd,
    ResizeEnd,
    MinimizeToggle,
    TitleEdit,
    BodyEdit,
    GridEdit,
    CellEdit,
}

/// Asks the user before a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub struct Dashboard {
    state: CollectionState,
    config: LayoutConfig,
    persistence: PersistenceManager,
    session: Option<Session>,
    pending: JoinSet<bool>,
    images: Vec<String>,
    carousels: BTreeMap<u32, Carousel>,
}

impl Dashboard {
    pub fn new(config: LayoutConfig, persistence: PersistenceManager) -> Self {
        Self {
            state: CollectionState::new(),
            config,
            persistence,
            session: None,
            pending: JoinSet::new(),
            images: Vec::new(),
            carousels: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> &CollectionState {
        &self.state
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Replace the in-memory layout with the stored one (backend, cache, or empty).
    pub async fn restore(&mut self, viewport: &Viewport) -> LoadSource {
        let outcome = self.persistence.load().await;
        self.state = CollectionState::from_document(&outcome.document, &self.config);
        self.state.constrain_all(viewport);
        self.session = None;
        self.sync_carousels();
        info!(frames = self.state.len(), source = ?outcome.source, "frame layout restored");
        outcome.source
    }

    /// Add a note frame near the top-right corner, below the header band.
    pub fn add_frame(&mut self, viewport: &Viewport) -> u32 {
        self.add_with_body(viewport, Spreadsheet::default().to_markup())
    }

    /// Add a frame hosting the photo carousel.
    pub fn add_carousel_frame(&mut self, viewport: &Viewport) -> u32 {
        let id = self.add_with_body(viewport, CAROUSEL_MARKUP.to_string());
        self.sync_carousels();
        id
    }

    fn add_with_body(&mut self, viewport: &Viewport, body: String) -> u32 {
        let cfg = &self.config;
        let position = Point::new(
            viewport.width - cfg.frame_width - cfg.new_frame_right_margin,
            viewport.header_band + cfg.new_frame_top_offset,
        );
        let size = Size::new(cfg.frame_width, cfg.frame_height);
        let id = self
            .state
            .create(position, size, |id| format!("New Frame {id}"), body, viewport);
        info!(id, "frame added");
        self.persist(SaveTrigger::Create);
        id
    }

    /// Delete a frame once `confirm` agrees. Returns whether it was deleted.
    pub fn request_delete(&mut self, id: u32, confirm: &impl Confirm) -> FrameResult<bool> {
        if self.state.get(id).is_none() {
            return Err(FrameboardError::UnknownFrame(id));
        }
        if !confirm.confirm(DELETE_PROMPT) {
            debug!(id, "frame delete declined");
            return Ok(false);
        }
        self.state.remove(id)?;
        self.carousels.remove(&id);
        if self.session.is_some_and(|s| s.frame_id() == id) {
            self.session = None;
        }
        info!(id, "frame deleted");
        self.persist(SaveTrigger::Delete);
        Ok(true)
    }

    /// Pointer pressed on part of a frame. Returns whether a drag or resize began.
    pub fn pointer_down(&mut self, id: u32, target: HitTarget, pointer: Point) -> FrameResult<bool> {
        self.session = Session::begin(&mut self.state, id, target, pointer)?;
        Ok(self.session.is_some())
    }

    /// Pointer moved anywhere on the page.
    pub fn pointer_move(&mut self, pointer: Point, viewport: &Viewport) -> FrameResult<()> {
        if let Some(session) = self.session {
            session.update(&mut self.state, pointer, viewport, &self.config)?;
        }
        Ok(())
    }

    /// Pointer released: end the session and save.
    pub fn pointer_up(&mut self) -> FrameResult<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        session.finish(&mut self.state)?;
        let trigger = match session {
            Session::Drag(_) => SaveTrigger::DragEnd,
            Session::Resize(_) => SaveTrigger::ResizeEnd,
        };
        self.persist(trigger);
        Ok(())
    }

    /// Collapse or expand a frame. An expanded frame is pulled back inside
    /// `viewport`, since it may have been moved while collapsed.
    pub fn toggle_minimize(&mut self, id: u32, viewport: &Viewport) -> FrameResult<MinimizeState> {
        let frame = self.state.get_mut(id)?;
        let state = frame.toggle_minimize(&self.config);
        frame.constrain(viewport);
        self.persist(SaveTrigger::MinimizeToggle);
        Ok(state)
    }

    /// Title edit committed (blur).
    pub fn set_title(&mut self, id: u32, title: impl Into<String>) -> FrameResult<()> {
        self.state.get_mut(id)?.title = title.into();
        self.persist(SaveTrigger::TitleEdit);
        Ok(())
    }

    /// Body edit committed (blur). The markup is kept verbatim.
    pub fn set_body(&mut self, id: u32, body: impl Into<String>) -> FrameResult<()> {
        self.state.get_mut(id)?.body = body.into();
        self.sync_carousels();
        self.persist(SaveTrigger::BodyEdit);
        Ok(())
    }

    /// Structural spreadsheet edit. Returns `false`, without saving, when the
    /// body is not a grid or the edit was refused. Only the table is rewritten.
    pub fn grid(&mut self, id: u32, op: GridOp) -> FrameResult<bool> {
        let frame = self.state.get_mut(id)?;
        let Some((mut grid, span)) = Spreadsheet::locate(&frame.body) else {
            return Ok(false);
        };
        if !grid.apply(op) {
            debug!(id, ?op, "grid edit refused");
            return Ok(false);
        }
        frame.body = grid.splice_into(&frame.body, span);
        self.persist(SaveTrigger::GridEdit);
        Ok(true)
    }

    /// Cell edit committed (blur). `markup` is the cell's inner markup.
    pub fn set_cell(&mut self, id: u32, row: usize, col: usize, markup: impl Into<String>) -> FrameResult<bool> {
        let frame = self.state.get_mut(id)?;
        let Some((mut grid, span)) = Spreadsheet::locate(&frame.body) else {
            return Ok(false);
        };
        if !grid.set_cell(row, col, markup) {
            return Ok(false);
        }
        frame.body = grid.splice_into(&frame.body, span);
        self.persist(SaveTrigger::CellEdit);
        Ok(true)
    }

    /// Flip "frames locked". Locking drops any drag or resize in progress.
    pub fn toggle_lock(&mut self) -> bool {
        let locked = !self.state.is_locked();
        self.state.set_locked(locked);
        if locked {
            self.session = None;
        }
        info!(locked, "frames lock toggled");
        locked
    }

    /// Window resized or header reflowed: pull every frame back into view.
    pub fn viewport_resized(&mut self, viewport: &Viewport) {
        self.state.constrain_all(viewport);
    }

    /// Image URLs from the backend listing, shared by every carousel frame.
    pub fn set_images(&mut self, images: Vec<String>) {
        self.images = images;
        for carousel in self.carousels.values_mut() {
            carousel.set_images(self.images.clone());
        }
    }

    /// Pull the image listing from the backend and hand it to the carousels.
    /// On failure the current images are kept. Returns how many images are shown.
    pub async fn refresh_images(&mut self, source: &HttpFrameStore) -> usize {
        match source.list_images().await {
            Ok(images) => {
                info!(count = images.len(), "carousel images refreshed");
                self.set_images(images);
            }
            Err(e) => warn!(error = %e, "image listing unavailable; keeping current images"),
        }
        self.images.len()
    }

    pub fn carousel(&self, id: u32) -> Option<&Carousel> {
        self.carousels.get(&id)
    }

    /// Advance carousel timers. Returns the frames whose image changed.
    pub fn tick(&mut self, dt: Duration) -> Vec<u32> {
        self.carousels
            .iter_mut()
            .filter_map(|(id, c)| c.tick(dt).then_some(*id))
            .collect()
    }

    /// What to render. Carousel frames show their current image; the stored
    /// body stays the bare marker.
    pub fn views(&self) -> Vec<FrameView> {
        let locked = self.state.is_locked();
        self.state
            .frames()
            .map(|f| {
                let mut view = FrameView::new(f, locked);
                if let Some(carousel) = self.carousels.get(&f.id) {
                    view.body = carousel.to_markup();
                }
                view
            })
            .collect()
    }

    /// Single save entry point: snapshot the whole layout, cache it now, and
    /// hand the backend write to a detached task.
    pub fn persist(&mut self, trigger: SaveTrigger) {
        while self.pending.try_join_next().is_some() {}

        let doc = self.state.to_document();
        debug!(?trigger, frames = doc.frames.len(), "persisting frame layout");
        self.persistence.write_cache(&doc);

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(?trigger, "no async runtime; backend save skipped");
            return;
        };
        let manager = self.persistence.clone();
        self.pending
            .spawn_on(async move { manager.write_backend(&doc).await }, &handle);
    }

    /// Wait for every backend write started so far. Returns how many succeeded.
    pub async fn flush(&mut self) -> usize {
        let mut ok = 0;
        while let Some(result) = self.pending.join_next().await {
            match result {
                Ok(true) => ok += 1,
                Ok(false) => {}
                Err(e) => warn!(error = %e, "backend save task failed"),
            }
        }
        ok
    }

    fn sync_carousels(&mut self) {
        let interval = self.config.carousel_interval();
        let ids: Vec<u32> = self
            .state
            .frames()
            .filter(|f| is_carousel(&f.body))
            .map(|f| f.id)
            .collect();
        self.carousels.retain(|id, _| ids.contains(id));
        for id in ids {
            self.carousels
                .entry(id)
                .or_insert_with(|| Carousel::new(self.images.clone(), interval));
        }
    }
}
