/// Scroll geometry of the conversation viewport, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    pub scroll_height: f32,
    pub scroll_top: f32,
    pub client_height: f32,
}

impl ViewportMetrics {
    pub fn distance_from_bottom(&self) -> f32 {
        (self.scroll_height - self.scroll_top - self.client_height).max(0.0)
    }
}

/// What changed in the conversation since the view last drew it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRequest {
    /// The revealing turn now shows this many characters
    Reveal(usize),
    /// A turn was appended or finished revealing
    Bottom,
}

/// Decides whether the view follows newly revealed text
#[derive(Debug, Clone, Copy)]
pub struct ScrollPolicy {
    pub threshold_px: f32,
}

impl Default for ScrollPolicy {
    fn default() -> Self {
        Self { threshold_px: 50.0 }
    }
}

impl ScrollPolicy {
    pub fn new(threshold_px: f32) -> Self {
        Self { threshold_px }
    }

    /// `metrics` must be taken before the new character is laid out. A
    /// user who scrolled up to read is left alone, except at the very start
    /// of a turn so it always comes into view.
    pub fn should_follow(&self, metrics: Option<ViewportMetrics>, revealed_chars: usize) -> bool {
        if revealed_chars <= 2 {
            return true;
        }
        match metrics {
            None => true,
            Some(m) => m.distance_from_bottom() <= self.threshold_px,
        }
    }

    pub fn should_scroll(&self, metrics: Option<ViewportMetrics>, request: ScrollRequest) -> bool {
        match request {
            ScrollRequest::Reveal(revealed_chars) => self.should_follow(metrics, revealed_chars),
            ScrollRequest::Bottom => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(scroll_top: f32) -> Option<ViewportMetrics> {
        Some(ViewportMetrics {
            scroll_height: 1000.0,
            scroll_top,
            client_height: 400.0,
        })
    }

    #[test]
    fn test_follows_near_bottom() {
        let policy = ScrollPolicy::default();
        assert!(policy.should_follow(at(600.0), 10));
        assert!(policy.should_follow(at(550.0), 10));
        assert!(!policy.should_follow(at(549.0), 10));
    }

    #[test]
    fn test_first_two_chars_always_follow() {
        let policy = ScrollPolicy::default();
        assert!(policy.should_follow(at(0.0), 1));
        assert!(policy.should_follow(at(0.0), 2));
        assert!(!policy.should_follow(at(0.0), 3));
    }

    #[test]
    fn test_bottom_request_always_scrolls() {
        let policy = ScrollPolicy::default();
        assert!(policy.should_scroll(at(0.0), ScrollRequest::Bottom));
        assert!(!policy.should_scroll(at(0.0), ScrollRequest::Reveal(10)));
        assert!(policy.should_scroll(at(600.0), ScrollRequest::Reveal(10)));
    }

    #[test]
    fn test_unknown_geometry_follows() {
        assert!(ScrollPolicy::default().should_follow(None, 40));
    }
}
