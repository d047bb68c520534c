//! Frame view model: what the page renders for one frame.

use crate::frame::FrameRecord;

/// Confirmation text shown before a frame is deleted.
pub const DELETE_PROMPT: &str = "ARE YOU SURE YOU WANT TO DELETE THE FRAME?";

#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub id: u32,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: u32,
    pub minimized: bool,
    pub locked: bool,
    pub title: String,
    pub body: String,
}

impl FrameView {
    pub fn new(record: &FrameRecord, locked: bool) -> Self {
        Self {
            id: record.id,
            left: record.position.x,
            top: record.position.y,
            width: record.size.width,
            height: record.size.height,
            z_index: record.z_order,
            minimized: record.is_minimized(),
            locked,
            title: record.title.clone(),
            body: record.body.clone(),
        }
    }

    pub fn class_list(&self) -> String {
        let mut classes = String::from("frame");
        if self.minimized {
            classes.push_str(" minimized");
        }
        if self.locked {
            classes.push_str(" locked");
        }
        classes
    }

    pub fn style(&self) -> String {
        format!(
            "left: {}px; top: {}px; width: {}px; height: {}px; z-index: {};",
            self.left, self.top, self.width, self.height, self.z_index
        )
    }

    /// Widget markup: header (close, minimize, editable title), body, resizer.
    /// The body is emitted verbatim; the title is escaped.
    pub fn to_html(&self) -> String {
        format!(
            concat!(
                r#"<div class="{}" data-id="{}" style="{}">"#,
                r#"<div class="frame-header"><span class="close">&#10006;</span><span class="minimize">&#95;</span>"#,
                r#"<div class="title" contenteditable="true">{}</div></div>"#,
                r#"<div class="content">{}</div>"#,
                r#"<div class="resizer"></div></div>"#
            ),
            self.class_list(),
            self.id,
            self.style(),
            escape_html(&self.title),
            self.body
        )
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
