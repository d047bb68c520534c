//! Frameboard core library.
//! Frame registry, layout geometry, drag/resize sessions, content plugins,
//! and the persistence manager shared by the dashboard and its backend store.

pub mod carousel;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod ids;
pub mod interaction;
pub mod persistence;
pub mod registry;
pub mod spreadsheet;
pub mod store;
pub mod view;

pub use carousel::{is_carousel, Carousel, CAROUSEL_MARKUP};
pub use clock::{format_clock, local_clock, CLOCK_TICK};
pub use config::LayoutConfig;
pub use dashboard::{Confirm, Dashboard, SaveTrigger};
pub use error::{FrameResult, FrameboardError};
pub use frame::{FrameDocument, FrameInfo, FrameRecord, MinimizeState};
pub use geometry::{Point, Size, Viewport};
pub use ids::IdAllocator;
pub use interaction::{DragSession, HitTarget, ResizeSession, Session};
pub use persistence::{LoadOutcome, LoadSource, PersistenceManager, SaveReport};
pub use registry::CollectionState;
pub use spreadsheet::{GridOp, Spreadsheet};
pub use store::{FileCache, FrameStore, HttpFrameStore, ImageListing, JsonFileStore, LocalCache, MemoryCache, MemoryStore};
pub use view::{escape_html, FrameView, DELETE_PROMPT};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
