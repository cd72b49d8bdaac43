//! Device-to-screen coordinate mapping and the on-screen button layout

use crate::device::{Capability, PenSample};

/// A point in screen space (device display pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// Map a raw digitizer sample to screen pixels.
///
/// Truncating integer division matches the device pixel grid. The
/// capability must have been validated (nonzero ranges) at session
/// start; zero ranges are a session-start error, never a per-sample one.
pub fn map_to_screen(sample: &PenSample, cap: &Capability) -> Point {
    let x = u64::from(sample.x) * u64::from(cap.screen_width) / u64::from(cap.tablet_max_x);
    let y = u64::from(sample.y) * u64::from(cap.screen_height) / u64::from(cap.tablet_max_y);
    Point {
        x: x as u32,
        y: y as u32,
    }
}

/// The three on-screen buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Cancel,
    Clear,
    Accept,
}

/// A button rectangle in screen space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Fixed button dimensions, anchored to the bottom edge
pub const BUTTON_WIDTH: u32 = 100;
pub const BUTTON_HEIGHT: u32 = 40;
pub const BUTTON_MARGIN: u32 = 10;

/// Minimum screen size for which the layout is guaranteed disjoint
pub const MIN_SCREEN_WIDTH: u32 = 360;
pub const MIN_SCREEN_HEIGHT: u32 = 120;

/// The three fixed button regions, computed once per screen size
#[derive(Debug, Clone, Copy)]
pub struct ButtonLayout {
    pub cancel: Rect,
    pub clear: Rect,
    pub accept: Rect,
}

impl ButtonLayout {
    /// Cancel bottom-left, Clear bottom-center, Accept bottom-right
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        let y = screen_height.saturating_sub(BUTTON_HEIGHT + BUTTON_MARGIN);
        let button = |x: u32| Rect {
            x,
            y,
            width: BUTTON_WIDTH,
            height: BUTTON_HEIGHT,
        };

        Self {
            cancel: button(BUTTON_MARGIN),
            clear: button((screen_width.saturating_sub(BUTTON_WIDTH)) / 2),
            accept: button(screen_width.saturating_sub(BUTTON_WIDTH + BUTTON_MARGIN)),
        }
    }

    /// Hit test in the fixed order Cancel, Clear, Accept. The order is
    /// authoritative and preserved even though the regions are laid out
    /// disjoint; first match wins.
    pub fn hit(&self, p: Point) -> Option<ButtonId> {
        if self.cancel.contains(p) {
            Some(ButtonId::Cancel)
        } else if self.clear.contains(p) {
            Some(ButtonId::Clear)
        } else if self.accept.contains(p) {
            Some(ButtonId::Accept)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(sw: u32, sh: u32, mx: u32, my: u32) -> Capability {
        Capability {
            screen_width: sw,
            screen_height: sh,
            tablet_max_x: mx,
            tablet_max_y: my,
        }
    }

    fn sample(x: u16, y: u16) -> PenSample {
        PenSample {
            x,
            y,
            switch_state: 1,
        }
    }

    #[test]
    fn mapping_stays_on_screen() {
        let cap = cap(800, 480, 2048, 2048);
        for &(x, y) in &[(0u16, 0u16), (1, 1), (1024, 512), (2047, 2047)] {
            let p = map_to_screen(&sample(x, y), &cap);
            assert!(p.x < 800, "x={} mapped to {}", x, p.x);
            assert!(p.y < 480, "y={} mapped to {}", y, p.y);
        }
    }

    #[test]
    fn mapping_is_monotonic() {
        let cap = cap(800, 480, 2048, 2048);
        let mut last = map_to_screen(&sample(0, 0), &cap);
        for raw in 1..2048u16 {
            let p = map_to_screen(&sample(raw, raw), &cap);
            assert!(p.x >= last.x);
            assert!(p.y >= last.y);
            last = p;
        }
    }

    #[test]
    fn mapping_truncates() {
        // 3 * 100 / 7 = 42.85.. -> 42
        let cap = cap(100, 100, 7, 7);
        let p = map_to_screen(&sample(3, 3), &cap);
        assert_eq!(p.x, 42);
        assert_eq!(p.y, 42);
    }

    fn overlaps(a: Rect, b: Rect) -> bool {
        a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom()
    }

    #[test]
    fn regions_are_disjoint_at_minimum_size() {
        for (w, h) in [(360u32, 120u32), (360, 200), (640, 240), (800, 480), (1024, 600)] {
            let layout = ButtonLayout::new(w, h);
            assert!(!overlaps(layout.cancel, layout.clear), "{}x{}", w, h);
            assert!(!overlaps(layout.clear, layout.accept), "{}x{}", w, h);
            assert!(!overlaps(layout.cancel, layout.accept), "{}x{}", w, h);
        }
    }

    #[test]
    fn hit_order_is_cancel_clear_accept() {
        let layout = ButtonLayout::new(640, 240);
        let inside = |r: Rect| Point {
            x: r.x + r.width / 2,
            y: r.y + r.height / 2,
        };
        assert_eq!(layout.hit(inside(layout.cancel)), Some(ButtonId::Cancel));
        assert_eq!(layout.hit(inside(layout.clear)), Some(ButtonId::Clear));
        assert_eq!(layout.hit(inside(layout.accept)), Some(ButtonId::Accept));
        assert_eq!(layout.hit(Point { x: 320, y: 10 }), None);
    }
}
