//! Layout configuration for the frame dashboard.
//!
//! Every value has a default matching the stock dashboard; a TOML file and
//! `FRAMEBOARD__*` environment variables may override them.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FrameResult;

fn default_frame_width() -> f64 {
    200.0
}

fn default_frame_height() -> f64 {
    150.0
}

fn default_new_frame_right_margin() -> f64 {
    50.0
}

fn default_new_frame_top_offset() -> f64 {
    10.0
}

fn default_frame_header_height() -> f64 {
    24.0
}

fn default_minimize_padding() -> f64 {
    6.0
}

fn default_min_frame_width() -> f64 {
    60.0
}

fn default_min_frame_height() -> f64 {
    30.0
}

fn default_carousel_interval_ms() -> u64 {
    5_000
}

/// Layout constants for frames.
///
/// | Key | Default | Description |
/// |-----|---------|-------------|
/// | frame_width | 200 | Width of a newly added frame; also the restore fallback. |
/// | frame_height | 150 | Height of a newly added frame; fallback when no restore height is known. |
/// | new_frame_right_margin | 50 | Gap between a new frame and the right viewport edge. |
/// | new_frame_top_offset | 10 | Gap between a new frame and the header band. |
/// | frame_header_height | 24 | Rendered height of a frame's own header bar. |
/// | minimize_padding | 6 | Extra pixels kept under a collapsed header so its controls stay clickable. |
/// | min_frame_width / min_frame_height | 60 / 30 | Resize floor. |
/// | carousel_interval_ms | 5000 | Photo carousel rotation period. |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_frame_width")]
    pub frame_width: f64,
    #[serde(default = "default_frame_height")]
    pub frame_height: f64,
    #[serde(default = "default_new_frame_right_margin")]
    pub new_frame_right_margin: f64,
    #[serde(default = "default_new_frame_top_offset")]
    pub new_frame_top_offset: f64,
    #[serde(default = "default_frame_header_height")]
    pub frame_header_height: f64,
    #[serde(default = "default_minimize_padding")]
    pub minimize_padding: f64,
    #[serde(default = "default_min_frame_width")]
    pub min_frame_width: f64,
    #[serde(default = "default_min_frame_height")]
    pub min_frame_height: f64,
    #[serde(default = "default_carousel_interval_ms")]
    pub carousel_interval_ms: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
            new_frame_right_margin: default_new_frame_right_margin(),
            new_frame_top_offset: default_new_frame_top_offset(),
            frame_header_height: default_frame_header_height(),
            minimize_padding: default_minimize_padding(),
            min_frame_width: default_min_frame_width(),
            min_frame_height: default_min_frame_height(),
            carousel_interval_ms: default_carousel_interval_ms(),
        }
    }
}

impl LayoutConfig {
    /// Load from an optional TOML file, then `FRAMEBOARD__*` environment overrides.
    /// A missing file is not an error; unset keys keep their defaults.
    pub fn load(path: Option<&Path>) -> FrameResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path.filter(|p| p.exists()) {
            builder = builder.add_source(config::File::from(path));
        }
        let built = builder
            .add_source(config::Environment::with_prefix("FRAMEBOARD").separator("__"))
            .build()?;
        Ok(built.try_deserialize()?)
    }

    /// Height of a collapsed frame.
    pub fn collapsed_height(&self) -> f64 {
        self.frame_header_height + self.minimize_padding
    }

    pub fn carousel_interval(&self) -> Duration {
        Duration::from_millis(self.carousel_interval_ms)
    }
}
