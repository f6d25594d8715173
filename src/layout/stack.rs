use crate::foundation::core::{Rect, SizeRequest};
use crate::foundation::error::{DeckError, DeckResult};

/// Main axis of a stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Children advance downwards.
    Vertical,
    /// Children advance rightwards.
    Horizontal,
}

impl Axis {
    fn main(self, w: f64, h: f64) -> f64 {
        match self {
            Axis::Vertical => h,
            Axis::Horizontal => w,
        }
    }

    fn cross(self, w: f64, h: f64) -> f64 {
        match self {
            Axis::Vertical => w,
            Axis::Horizontal => h,
        }
    }

    fn fills_main(self, r: &SizeRequest) -> bool {
        match self {
            Axis::Vertical => r.fill_y,
            Axis::Horizontal => r.fill_x,
        }
    }

    fn fills_cross(self, r: &SizeRequest) -> bool {
        match self {
            Axis::Vertical => r.fill_x,
            Axis::Horizontal => r.fill_y,
        }
    }
}

/// Natural size of a stack: children summed on the main axis with `padding` between them, the
/// largest child on the cross axis. Fill flags are not propagated.
pub fn stack_request(children: &[SizeRequest], padding: f64, axis: Axis) -> SizeRequest {
    if children.is_empty() {
        return SizeRequest::default();
    }
    let main = children.iter().map(|r| axis.main(r.width, r.height)).sum::<f64>()
        + gaps(children.len(), padding);
    let cross = children
        .iter()
        .map(|r| axis.cross(r.width, r.height))
        .fold(0.0, f64::max);
    match axis {
        Axis::Vertical => SizeRequest::fixed(cross, main),
        Axis::Horizontal => SizeRequest::fixed(main, cross),
    }
}

/// Place children along `axis` inside `rect`.
///
/// The group is centered on the main axis. On the cross axis a child spans the whole rect when
/// it asks to fill (or `force_cross_fill` is set), otherwise it is centered at its natural size.
/// Children asking to fill the main axis cannot be honoured and are reported as an
/// [`DeckError::Arrangement`] error naming their indices.
pub fn arrange(
    rect: Rect,
    children: &[SizeRequest],
    padding: f64,
    axis: Axis,
    force_cross_fill: bool,
) -> DeckResult<Vec<Rect>> {
    let offending: Vec<usize> = children
        .iter()
        .enumerate()
        .filter(|(_, r)| axis.fills_main(r))
        .map(|(idx, _)| idx)
        .collect();
    if !offending.is_empty() {
        return Err(DeckError::arrangement(format!(
            "children {offending:?} request fill along the {} stack axis",
            match axis {
                Axis::Vertical => "vertical",
                Axis::Horizontal => "horizontal",
            }
        )));
    }

    let total = children.iter().map(|r| axis.main(r.width, r.height)).sum::<f64>()
        + gaps(children.len(), padding);
    let avail_main = axis.main(rect.width, rect.height);
    let avail_cross = axis.cross(rect.width, rect.height);
    let (origin_main, origin_cross) = match axis {
        Axis::Vertical => (rect.y, rect.x),
        Axis::Horizontal => (rect.x, rect.y),
    };

    let mut pos = origin_main + (avail_main - total) / 2.0;
    let mut out = Vec::with_capacity(children.len());
    for r in children {
        let main = axis.main(r.width, r.height);
        let (cross_pos, cross) = if force_cross_fill || axis.fills_cross(r) {
            (origin_cross, avail_cross)
        } else {
            let natural = axis.cross(r.width, r.height);
            (origin_cross + (avail_cross - natural) / 2.0, natural)
        };
        out.push(match axis {
            Axis::Vertical => Rect::new(cross_pos, pos, cross, main),
            Axis::Horizontal => Rect::new(pos, cross_pos, main, cross),
        });
        pos += main + padding;
    }
    Ok(out)
}

fn gaps(count: usize, padding: f64) -> f64 {
    count.saturating_sub(1) as f64 * padding
}

#[cfg(test)]
#[path = "../../tests/unit/layout/stack.rs"]
mod tests;
