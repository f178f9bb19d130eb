//! Responsive layout math for paginated carousels.
//!
//! Values are measured from the tree on every call and never cached, so a
//! resize is always reflected in the next `per_view`.

use crate::host::UiTree;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    pub slide_width: f32,
    pub gap: f32,
    pub viewport_width: f32,
}

#[inline]
fn non_negative(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

impl Geometry {
    /// Measure the first slide, the track gap and the visible box.
    pub fn measure<T: UiTree>(
        tree: &T,
        viewport: &T::Node,
        track: &T::Node,
        first_slide: Option<&T::Node>,
        fallback_gap: f32,
    ) -> Self {
        Self {
            slide_width: first_slide.map(|n| tree.width(n)).unwrap_or(0.0),
            gap: tree.gap(track).unwrap_or(fallback_gap),
            viewport_width: tree.width(viewport),
        }
    }

    /// Distance between the left edges of two neighbouring slides.
    pub fn step(&self) -> f32 {
        non_negative(self.slide_width) + non_negative(self.gap)
    }

    /// Slides fully visible at once; never below 1.
    pub fn per_view(&self) -> usize {
        let step = self.step();
        if step <= 0.0 {
            return 1;
        }
        let raw = (non_negative(self.viewport_width) / step).floor();
        (raw as usize).max(1)
    }

    /// Largest start index that still fills the viewport.
    pub fn max_index(&self, slide_count: usize) -> usize {
        slide_count.saturating_sub(self.per_view())
    }

    /// Track translation (px) that left-aligns `index`.
    pub fn offset_for(&self, index: usize) -> f32 {
        // `0.0 - x` keeps index 0 at +0.0, so CSS never sees "-0px".
        0.0 - index as f32 * self.step()
    }
}
