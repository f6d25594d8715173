use std::ops::{RangeFrom, RangeInclusive};

use crate::foundation::error::{DeckError, DeckResult};

/// 1-based animation step within a slide.
pub type Step = u32;

/// Axis-aligned rectangle in page pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width, non-negative for well-formed layouts.
    pub width: f64,
    /// Height, non-negative for well-formed layouts.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its origin and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn x2(self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn y2(self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center.
    pub fn middle_x(self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    pub fn middle_y(self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Origin as `(x, y)`.
    pub fn position(self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Size as `(width, height)`.
    pub fn size(self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Move each edge inwards by the given amounts.
    pub fn shrink(self, left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            x: self.x + left,
            y: self.y + top,
            width: self.width - left - right,
            height: self.height - top - bottom,
        }
    }
}

/// A node's natural size plus per-axis fill flags.
///
/// This is a request, not an allocation: the parent's arrangement decides the final rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizeRequest {
    /// Natural width.
    pub width: f64,
    /// Natural height.
    pub height: f64,
    /// Expand to the full available width.
    pub fill_x: bool,
    /// Expand to the full available height.
    pub fill_y: bool,
}

impl SizeRequest {
    /// Fixed-size request without fill flags. Negative sizes clamp to zero.
    pub fn fixed(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            fill_x: false,
            fill_y: false,
        }
    }

    /// Request with explicit fill flags.
    pub fn with_fill(width: f64, height: f64, fill_x: bool, fill_y: bool) -> Self {
        Self {
            fill_x,
            fill_y,
            ..Self::fixed(width, height)
        }
    }

    /// Grow to at least `width` x `height`, keeping fill flags.
    pub fn ensure(self, width: f64, height: f64) -> Self {
        Self {
            width: self.width.max(width),
            height: self.height.max(height),
            ..self
        }
    }

    /// Add `dx`/`dy` to the natural size, keeping fill flags.
    pub fn resize(self, dx: f64, dy: f64) -> Self {
        Self {
            width: self.width + dx,
            height: self.height + dy,
            ..self
        }
    }
}

/// Element-wise maximum of several requests (size and fill flags).
///
/// Used for superimposed layers, which are sized to the largest one. An empty slice yields a
/// zero-sized request.
pub fn merge_size_requests(requests: &[SizeRequest]) -> SizeRequest {
    requests
        .iter()
        .fold(SizeRequest::default(), |acc, r| SizeRequest {
            width: acc.width.max(r.width),
            height: acc.height.max(r.height),
            fill_x: acc.fill_x || r.fill_x,
            fill_y: acc.fill_y || r.fill_y,
        })
}

/// Inclusive step interval during which a node is visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ShowRange {
    start: Step,
    end: Option<Step>,
}

impl Default for ShowRange {
    fn default() -> Self {
        Self {
            start: 1,
            end: None,
        }
    }
}

impl ShowRange {
    /// Create a validated range. `end = None` means visible from `start` onwards.
    pub fn new(start: Step, end: Option<Step>) -> DeckResult<Self> {
        if start == 0 {
            return Err(DeckError::construction("show range start must be >= 1"));
        }
        if let Some(end) = end
            && end < start
        {
            return Err(DeckError::construction(format!(
                "show range start ({start}) must be <= end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Visible from `start` onwards.
    pub fn from_step(start: Step) -> DeckResult<Self> {
        Self::new(start, None)
    }

    /// First visible step.
    pub fn start(self) -> Step {
        self.start
    }

    /// Last visible step, `None` when unbounded.
    pub fn end(self) -> Option<Step> {
        self.end
    }

    /// `start <= step <= end` (end unbounded when absent).
    pub fn contains(self, step: Step) -> bool {
        self.start <= step && self.end.is_none_or(|end| step <= end)
    }

    /// The step this range contributes to a slide's step count: its end, or its start if unbounded.
    pub fn last_step(self) -> Step {
        self.end.unwrap_or(self.start)
    }
}

/// Values accepted wherever a visibility range is expected: a start step (unbounded), a
/// `(start, end)` pair, `start..=end`, `start..`, or a ready-made [`ShowRange`].
pub trait IntoShowRange {
    /// Validate and convert.
    fn into_show_range(self) -> DeckResult<ShowRange>;
}

impl IntoShowRange for ShowRange {
    fn into_show_range(self) -> DeckResult<ShowRange> {
        Ok(self)
    }
}

impl IntoShowRange for Step {
    fn into_show_range(self) -> DeckResult<ShowRange> {
        ShowRange::from_step(self)
    }
}

impl IntoShowRange for (Step, Step) {
    fn into_show_range(self) -> DeckResult<ShowRange> {
        ShowRange::new(self.0, Some(self.1))
    }
}

impl IntoShowRange for RangeInclusive<Step> {
    fn into_show_range(self) -> DeckResult<ShowRange> {
        ShowRange::new(*self.start(), Some(*self.end()))
    }
}

impl IntoShowRange for RangeFrom<Step> {
    fn into_show_range(self) -> DeckResult<ShowRange> {
        ShowRange::from_step(self.start)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
