//! Photo carousel content plugin.

use std::time::Duration;

/// Body markup that turns a frame into a carousel.
pub const CAROUSEL_MARKUP: &str = r#"<div class="carousel" data-carousel="true"></div>"#;

/// True when a frame body hosts the carousel.
pub fn is_carousel(body: &str) -> bool {
    body.contains("data-carousel")
}

/// Rotates through image URLs on a fixed interval. Rotation is display state
/// only and is never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    images: Vec<String>,
    index: usize,
    interval: Duration,
    elapsed: Duration,
}

impl Carousel {
    pub fn new(images: Vec<String>, interval: Duration) -> Self {
        Self {
            images,
            index: 0,
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Replace the image list (after a fresh listing), keeping the position when possible.
    pub fn set_images(&mut self, images: Vec<String>) {
        self.images = images;
        if self.index >= self.images.len() {
            self.index = 0;
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.images.get(self.index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Show the next image, wrapping at the end.
    pub fn advance(&mut self) -> Option<&str> {
        if self.images.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.images.len();
        self.current()
    }

    /// Feed timer time. Advances once per full interval elapsed; returns
    /// whether the visible image changed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.images.len() < 2 || self.interval.is_zero() {
            return false;
        }
        self.elapsed += dt;
        let mut changed = false;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.advance();
            changed = true;
        }
        changed
    }

    /// Markup for the visible image.
    pub fn to_markup(&self) -> String {
        match self.current() {
            Some(src) => format!(
                r#"<div class="carousel" data-carousel="true"><img src="{}" alt=""></div>"#,
                crate::view::escape_html(src)
            ),
            None => CAROUSEL_MARKUP.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images() -> Vec<String> {
        vec!["/a.png".into(), "/b.png".into(), "/c.png".into()]
    }

    #[test]
    fn detects_marker() {
        assert!(is_carousel(CAROUSEL_MARKUP));
        assert!(!is_carousel("<table></table>"));
    }

    #[test]
    fn advance_wraps() {
        let mut c = Carousel::new(images(), Duration::from_secs(5));
        assert_eq!(c.current(), Some("/a.png"));
        c.advance();
        c.advance();
        assert_eq!(c.advance(), Some("/a.png"));
    }

    #[test]
    fn tick_advances_per_full_interval() {
        let mut c = Carousel::new(images(), Duration::from_secs(5));
        assert!(!c.tick(Duration::from_secs(4)));
        assert!(c.tick(Duration::from_secs(1)));
        assert_eq!(c.current(), Some("/b.png"));
        assert!(c.tick(Duration::from_secs(11)));
        assert_eq!(c.current(), Some("/a.png"));
    }

    #[test]
    fn empty_carousel_is_inert() {
        let mut c = Carousel::new(Vec::new(), Duration::from_secs(5));
        assert_eq!(c.advance(), None);
        assert!(!c.tick(Duration::from_secs(60)));
        assert_eq!(c.to_markup(), CAROUSEL_MARKUP);
    }

    #[test]
    fn shrinking_image_list_resets_position() {
        let mut c = Carousel::new(images(), Duration::from_secs(5));
        c.advance();
        c.advance();
        c.set_images(vec!["/z.png".into()]);
        assert_eq!(c.current(), Some("/z.png"));
        assert!(c.to_markup().contains(r#"src="/z.png""#));
    }
}
