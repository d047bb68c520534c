//! Frame records, the persisted layout document, and the minimize toggle.

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::LayoutConfig;
use crate::geometry::{Point, Size, Viewport};

/// Persisted layout document, shared by the backend store and the local cache.
///
/// ```json
/// { "frameCount": 3, "frames": [ { "id": 1, "left": 10, "top": 90, "width": 200,
///   "height": 150, "minimized": false, "title": "Notes", "content": "..." } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDocument {
    /// Id high-water mark at save time.
    #[serde(default)]
    pub frame_count: u32,
    #[serde(default)]
    pub frames: Vec<FrameInfo>,
}

impl FrameDocument {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// One frame as stored. Every field is optional on the way in; older layouts
/// stored ids as strings and some omitted geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInfo {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub left: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub top: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub width: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub height: Option<f64>,
    #[serde(default)]
    pub minimized: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let id = match value {
        Some(serde_json::Value::Number(n)) => n.as_u64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(id
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let n = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().trim_end_matches("px").parse::<f64>().ok(),
        _ => None,
    };
    Ok(n.filter(|n| n.is_finite()))
}

/// Two-state minimize machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinimizeState {
    Expanded,
    Minimized,
}

/// The authoritative in-memory copy of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub id: u32,
    pub position: Point,
    /// Displayed size. While minimized, `height` is the collapsed height.
    pub size: Size,
    restore_height: Option<f64>,
    minimized: bool,
    pub title: String,
    /// Markup blob: plain text, spreadsheet table, or carousel marker.
    pub body: String,
    /// Stacking order; not persisted.
    pub z_order: u32,
}

impl FrameRecord {
    pub fn new(id: u32, position: Point, size: Size, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            position,
            size,
            restore_height: Some(size.height),
            minimized: false,
            title: title.into(),
            body: body.into(),
            z_order: 0,
        }
    }

    /// Rebuild a record from its stored form. A stored minimized frame comes
    /// back collapsed, remembering the stored height for restoration.
    pub fn from_info(id: u32, info: &FrameInfo, cfg: &LayoutConfig) -> Self {
        let size = Size::new(
            info.width.unwrap_or(cfg.frame_width),
            info.height.unwrap_or(cfg.frame_height),
        );
        let position = Point::new(info.left.unwrap_or(0.0), info.top.unwrap_or(0.0));
        let mut record = Self::new(id, position, size, info.title.clone(), info.content.clone());
        if info.minimized {
            record.minimize(cfg.collapsed_height());
        }
        record
    }

    /// Stored form. The height written is always the remembered expanded height.
    pub fn to_info(&self) -> FrameInfo {
        FrameInfo {
            id: Some(self.id),
            left: Some(self.position.x),
            top: Some(self.position.y),
            width: Some(self.size.width),
            height: Some(self.persisted_height()),
            minimized: self.minimized,
            title: self.title.clone(),
            content: self.body.clone(),
        }
    }

    pub fn persisted_height(&self) -> f64 {
        self.restore_height.unwrap_or(self.size.height)
    }

    pub fn restore_height(&self) -> Option<f64> {
        self.restore_height
    }

    /// Record the current displayed height as the one to restore.
    pub fn remember_height(&mut self) {
        self.restore_height = Some(self.size.height);
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn state(&self) -> MinimizeState {
        if self.minimized {
            MinimizeState::Minimized
        } else {
            MinimizeState::Expanded
        }
    }

    /// Collapse to `collapsed_height`. No-op when already minimized so the
    /// remembered height is never overwritten by the collapsed one.
    pub fn minimize(&mut self, collapsed_height: f64) {
        if self.minimized {
            return;
        }
        self.restore_height = Some(self.size.height);
        self.size.height = collapsed_height;
        self.minimized = true;
    }

    /// Back to the remembered height, or `fallback_height` if none is known.
    pub fn expand(&mut self, fallback_height: f64) {
        if !self.minimized {
            return;
        }
        self.size.height = self.restore_height.unwrap_or(fallback_height);
        self.minimized = false;
    }

    pub fn toggle_minimize(&mut self, cfg: &LayoutConfig) -> MinimizeState {
        match self.state() {
            MinimizeState::Expanded => self.minimize(cfg.collapsed_height()),
            MinimizeState::Minimized => self.expand(cfg.frame_height),
        }
        self.state()
    }

    /// Pull the frame back inside `viewport`.
    pub fn constrain(&mut self, viewport: &Viewport) {
        self.position = viewport.constrain(self.position, self.size);
    }
}
