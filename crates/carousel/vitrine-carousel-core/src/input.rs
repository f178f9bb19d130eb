//! Input adapter: normalizes drags, keys and clicks into navigation intents.
//!
//! One adapter per instance. It tracks only what gestures need (hover, drag
//! start) and never touches carousel state; the instance applies the
//! returned [`Intent`]s.

use serde::{Deserialize, Serialize};

/// Normalized key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
    Char(char),
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            " " | "Spacebar" => Key::Space,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other,
                }
            }
        }
    }
}

/// On-page control buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    Prev,
    Next,
    PlayPause,
    Shuffle,
    Fullscreen,
}

/// Raw input addressed to one instance's interaction region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerEnter,
    PointerLeave,
    DragStart { x: f32, y: f32 },
    DragEnd { x: f32, y: f32 },
    DragCancel,
    Control(Control),
    /// Pagination dot or thumbnail selected.
    Select(usize),
    /// Card clicked in a multi-card track.
    SelectCard(usize),
}

/// What the state machine is asked to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Next,
    Prev,
    GoTo(usize),
    TogglePlay,
    ToggleShuffle,
    ToggleFullscreen,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Point {
    x: f32,
    y: f32,
}

#[derive(Debug, Clone)]
pub struct InputAdapter {
    threshold: f32,
    limit: f32,
    fullscreen_key: Option<char>,
    hovered: bool,
    drag_start: Option<Point>,
}

impl InputAdapter {
    /// `fullscreen_key` is `None` for carousels without fullscreen support.
    /// A `limit` that is not a positive finite number leaves coordinates
    /// unclamped apart from the `f32` range.
    pub fn new(threshold: f32, limit: f32, fullscreen_key: Option<char>) -> Self {
        let limit = if limit.is_finite() && limit > 0.0 {
            limit
        } else {
            f32::MAX
        };
        Self {
            threshold,
            limit,
            fullscreen_key,
            hovered: false,
            drag_start: None,
        }
    }

    pub fn pointer_enter(&mut self) {
        self.hovered = true;
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = false;
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    fn clamp(&self, x: f32, y: f32) -> Option<Point> {
        // `limit` is positive and finite, see `new`.
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some(Point {
            x: x.clamp(-self.limit, self.limit),
            y: y.clamp(-self.limit, self.limit),
        })
    }

    /// Record a gesture start. Malformed coordinates are ignored.
    pub fn drag_start(&mut self, x: f32, y: f32) -> bool {
        match self.clamp(x, y) {
            Some(p) => {
                self.drag_start = Some(p);
                true
            }
            None => false,
        }
    }

    pub fn drag_cancel(&mut self) {
        self.drag_start = None;
    }

    /// Finish a gesture. The drag ends even when no swipe is recognised.
    pub fn drag_end(&mut self, x: f32, y: f32) -> Option<Intent> {
        let start = self.drag_start.take()?;
        let end = self.clamp(x, y)?;
        self.classify(end.x - start.x, end.y - start.y)
    }

    /// Horizontal displacement must pass the threshold and dominate the
    /// vertical one. Leftward (negative dx) advances.
    pub fn classify(&self, dx: f32, dy: f32) -> Option<Intent> {
        if dx.abs() > self.threshold && dx.abs() > dy.abs() {
            Some(if dx < 0.0 { Intent::Next } else { Intent::Prev })
        } else {
            None
        }
    }

    /// Keys only count while the pointer is over this instance.
    pub fn key(&self, key: Key) -> Option<Intent> {
        if !self.hovered {
            return None;
        }
        match key {
            Key::ArrowLeft => Some(Intent::Prev),
            Key::ArrowRight => Some(Intent::Next),
            Key::Space => Some(Intent::TogglePlay),
            Key::Char(c) => match self.fullscreen_key {
                Some(fk) if c.eq_ignore_ascii_case(&fk) => Some(Intent::ToggleFullscreen),
                _ => None,
            },
            Key::Other => None,
        }
    }

    pub fn control(&self, control: Control) -> Intent {
        match control {
            Control::Prev => Intent::Prev,
            Control::Next => Intent::Next,
            Control::PlayPause => Intent::TogglePlay,
            Control::Shuffle => Intent::ToggleShuffle,
            Control::Fullscreen => Intent::ToggleFullscreen,
        }
    }

    pub fn select(&self, index: usize) -> Intent {
        Intent::GoTo(index)
    }

    /// Only an off-center card navigates; the current one is left alone.
    pub fn select_card(&self, index: usize, current: usize) -> Option<Intent> {
        (index != current).then_some(Intent::GoTo(index))
    }
}
