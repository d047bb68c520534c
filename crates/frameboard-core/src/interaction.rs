//! Drag and resize sessions.
//!
//! A session is created on pointer-down, updated on every pointer-move, and
//! dropped on pointer-up. It carries the start state so nothing has to be
//! captured in long-lived closures.

use crate::config::LayoutConfig;
use crate::error::FrameResult;
use crate::frame::FrameRecord;
use crate::geometry::{Point, Size, Viewport};
use crate::registry::CollectionState;

/// The part of a frame widget under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Empty header area: the drag handle.
    Header,
    /// Close control in the header.
    Close,
    /// Minimize control in the header.
    Minimize,
    /// Editable title inside the header.
    Title,
    /// Frame body, including spreadsheet cells and carousel images.
    Body,
    /// Bottom-right resize handle.
    Resizer,
}

impl HitTarget {
    /// Only the bare header starts a drag; controls and editable content
    /// keep the pointer for themselves.
    pub fn starts_drag(self) -> bool {
        matches!(self, HitTarget::Header)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub frame_id: u32,
    offset: Point,
}

impl DragSession {
    /// Begin dragging `frame` from pointer position `pointer`.
    pub fn begin(frame: &FrameRecord, pointer: Point) -> Self {
        Self {
            frame_id: frame.id,
            offset: Point::new(pointer.x - frame.position.x, pointer.y - frame.position.y),
        }
    }

    /// Position the frame under `pointer`, constrained by the current viewport.
    pub fn update(&self, frame: &mut FrameRecord, pointer: Point, viewport: &Viewport) {
        let target = Point::new(pointer.x - self.offset.x, pointer.y - self.offset.y);
        frame.position = viewport.constrain(target, frame.size);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    pub frame_id: u32,
    start_pointer: Point,
    start_size: Size,
}

impl ResizeSession {
    pub fn begin(frame: &FrameRecord, pointer: Point) -> Self {
        Self {
            frame_id: frame.id,
            start_pointer: pointer,
            start_size: frame.size,
        }
    }

    /// Grow or shrink by the pointer delta. The size never drops below the
    /// configured floor, except where the far edges would otherwise leave the
    /// viewport. A minimized frame only changes width.
    pub fn update(&self, frame: &mut FrameRecord, pointer: Point, viewport: &Viewport, cfg: &LayoutConfig) {
        let max = viewport.max_size_at(frame.position);
        let width = (self.start_size.width + pointer.x - self.start_pointer.x)
            .max(cfg.min_frame_width)
            .min(max.width);
        frame.size.width = width;
        if frame.is_minimized() {
            return;
        }
        let height = (self.start_size.height + pointer.y - self.start_pointer.y)
            .max(cfg.min_frame_height)
            .min(max.height);
        frame.size.height = height;
    }

    /// Commit the final height as the one to restore after a minimize.
    pub fn finish(&self, frame: &mut FrameRecord) {
        if !frame.is_minimized() {
            frame.remember_height();
        }
    }
}

/// The single interaction in progress, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Session {
    Drag(DragSession),
    Resize(ResizeSession),
}

impl Session {
    pub fn frame_id(&self) -> u32 {
        match self {
            Session::Drag(s) => s.frame_id,
            Session::Resize(s) => s.frame_id,
        }
    }

    /// Start a session for a pointer-down on `target` of frame `id`.
    /// Returns `None` when the target does not start one or frames are locked.
    pub fn begin(state: &mut CollectionState, id: u32, target: HitTarget, pointer: Point) -> FrameResult<Option<Self>> {
        if state.is_locked() {
            return Ok(None);
        }
        match target {
            HitTarget::Resizer => {
                let frame = state.get_mut(id)?;
                Ok(Some(Session::Resize(ResizeSession::begin(frame, pointer))))
            }
            t if t.starts_drag() => {
                state.raise(id)?;
                let frame = state.get_mut(id)?;
                Ok(Some(Session::Drag(DragSession::begin(frame, pointer))))
            }
            _ => Ok(None),
        }
    }

    pub fn update(&self, state: &mut CollectionState, pointer: Point, viewport: &Viewport, cfg: &LayoutConfig) -> FrameResult<()> {
        let frame = state.get_mut(self.frame_id())?;
        match self {
            Session::Drag(s) => s.update(frame, pointer, viewport),
            Session::Resize(s) => s.update(frame, pointer, viewport, cfg),
        }
        Ok(())
    }

    pub fn finish(self, state: &mut CollectionState) -> FrameResult<()> {
        let frame = state.get_mut(self.frame_id())?;
        if let Session::Resize(s) = self {
            s.finish(frame);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport::new(1000.0, 700.0, 50.0);

    fn state_with_frame() -> (CollectionState, u32) {
        let mut state = CollectionState::new();
        let id = state.create(
            Point::new(100.0, 100.0),
            Size::new(200.0, 150.0),
            |id| format!("New Frame {id}"),
            "",
            &VIEW,
        );
        (state, id)
    }

    #[test]
    fn drag_keeps_pointer_offset() {
        let (mut state, id) = state_with_frame();
        let session = Session::begin(&mut state, id, HitTarget::Header, Point::new(130.0, 110.0))
            .unwrap()
            .unwrap();
        session.update(&mut state, Point::new(330.0, 410.0), &VIEW, &LayoutConfig::default()).unwrap();
        assert_eq!(state.get(id).unwrap().position, Point::new(300.0, 400.0));
    }

    #[test]
    fn drag_is_clamped_to_viewport_below_band() {
        let (mut state, id) = state_with_frame();
        let session = Session::begin(&mut state, id, HitTarget::Header, Point::new(100.0, 100.0))
            .unwrap()
            .unwrap();
        let cfg = LayoutConfig::default();
        session.update(&mut state, Point::new(-300.0, -300.0), &VIEW, &cfg).unwrap();
        assert_eq!(state.get(id).unwrap().position, Point::new(0.0, 50.0));
        session.update(&mut state, Point::new(5000.0, 5000.0), &VIEW, &cfg).unwrap();
        assert_eq!(state.get(id).unwrap().position, Point::new(800.0, 550.0));
    }

    #[test]
    fn drag_recomputes_bounds_from_live_viewport() {
        let (mut state, id) = state_with_frame();
        let session = Session::begin(&mut state, id, HitTarget::Header, Point::new(100.0, 100.0))
            .unwrap()
            .unwrap();
        let taller_header = Viewport::new(1000.0, 700.0, 120.0);
        session.update(&mut state, Point::new(100.0, 60.0), &taller_header, &LayoutConfig::default()).unwrap();
        assert_eq!(state.get(id).unwrap().position.y, 120.0);
    }

    #[test]
    fn drag_start_raises_frame() {
        let (mut state, id) = state_with_frame();
        let before = state.get(id).unwrap().z_order;
        Session::begin(&mut state, id, HitTarget::Header, Point::new(100.0, 100.0)).unwrap();
        assert!(state.get(id).unwrap().z_order > before);
    }

    #[test]
    fn controls_and_editable_content_do_not_start_sessions() {
        let (mut state, id) = state_with_frame();
        for target in [HitTarget::Close, HitTarget::Minimize, HitTarget::Title, HitTarget::Body] {
            let session = Session::begin(&mut state, id, target, Point::new(110.0, 105.0)).unwrap();
            assert!(session.is_none(), "{target:?} must not start a session");
        }
    }

    #[test]
    fn locked_frames_ignore_pointer_down() {
        let (mut state, id) = state_with_frame();
        state.set_locked(true);
        assert!(Session::begin(&mut state, id, HitTarget::Header, Point::new(100.0, 100.0)).unwrap().is_none());
        assert!(Session::begin(&mut state, id, HitTarget::Resizer, Point::new(300.0, 250.0)).unwrap().is_none());
    }

    #[test]
    fn resize_adds_delta_and_stops_at_viewport_edge() {
        let (mut state, id) = state_with_frame();
        let cfg = LayoutConfig::default();
        let session = Session::begin(&mut state, id, HitTarget::Resizer, Point::new(300.0, 250.0))
            .unwrap()
            .unwrap();
        assert!(matches!(session, Session::Resize(_)));
        session.update(&mut state, Point::new(350.0, 300.0), &VIEW, &cfg).unwrap();
        assert_eq!(state.get(id).unwrap().size, Size::new(250.0, 200.0));
        session.update(&mut state, Point::new(5000.0, 5000.0), &VIEW, &cfg).unwrap();
        assert_eq!(state.get(id).unwrap().size, Size::new(900.0, 600.0));
        session.finish(&mut state).unwrap();
        assert_eq!(state.get(id).unwrap().restore_height(), Some(600.0));
    }

    #[test]
    fn resize_does_not_move_the_frame_or_raise_it() {
        let (mut state, id) = state_with_frame();
        let session = Session::begin(&mut state, id, HitTarget::Resizer, Point::new(300.0, 250.0))
            .unwrap()
            .unwrap();
        session.update(&mut state, Point::new(310.0, 260.0), &VIEW, &LayoutConfig::default()).unwrap();
        let frame = state.get(id).unwrap();
        assert_eq!(frame.position, Point::new(100.0, 100.0));
        assert_eq!(frame.z_order, 0);
    }

    #[test]
    fn resize_respects_minimum_size() {
        let (mut state, id) = state_with_frame();
        let cfg = LayoutConfig::default();
        let session = Session::begin(&mut state, id, HitTarget::Resizer, Point::new(300.0, 250.0))
            .unwrap()
            .unwrap();
        session.update(&mut state, Point::new(-1000.0, -1000.0), &VIEW, &cfg).unwrap();
        assert_eq!(
            state.get(id).unwrap().size,
            Size::new(cfg.min_frame_width, cfg.min_frame_height)
        );
    }

    #[test]
    fn resizing_minimized_frame_changes_width_only() {
        let (mut state, id) = state_with_frame();
        let cfg = LayoutConfig::default();
        state.get_mut(id).unwrap().toggle_minimize(&cfg);
        let session = Session::begin(&mut state, id, HitTarget::Resizer, Point::new(300.0, 130.0))
            .unwrap()
            .unwrap();
        session.update(&mut state, Point::new(400.0, 400.0), &VIEW, &cfg).unwrap();
        session.finish(&mut state).unwrap();
        let frame = state.get(id).unwrap();
        assert_eq!(frame.size, Size::new(300.0, cfg.collapsed_height()));
        assert_eq!(frame.restore_height(), Some(150.0));
    }

    #[test]
    fn viewport_edge_wins_over_minimum_size() {
        let (mut state, id) = state_with_frame();
        let cfg = LayoutConfig::default();
        state.get_mut(id).unwrap().position = Point::new(960.0, 680.0);
        let session = Session::begin(&mut state, id, HitTarget::Resizer, Point::new(990.0, 690.0))
            .unwrap()
            .unwrap();
        session.update(&mut state, Point::new(900.0, 600.0), &VIEW, &cfg).unwrap();
        assert_eq!(state.get(id).unwrap().size, Size::new(40.0, 20.0));
    }
}
