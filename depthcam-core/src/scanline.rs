//! Scanline triangle fill with perspective-correct depth.
//!
//! The triangle is sorted by row and split at the middle vertex into a
//! flat-bottom and a flat-top half:
//!
//! ```text
//!        top
//!        /\
//!       /  \
//!  mid /----\ split      <- split lies on the long edge top → bottom
//!      \     \
//!        \    \
//!          \   \
//!            \  \
//!              \ \
//!               bottom
//! ```
//!
//! Each half is walked row by row between its two bounding edges. Along the
//! edges and across each span the reciprocal depth `1/d` is interpolated
//! linearly, which is exact for a planar triangle under perspective
//! projection.
//!
//! Pixel `(x, y)` is sampled at the image point `(x, y)`, the point the ray
//! caster shoots its ray through. A row is covered when `y` lies in
//! `[y_top, y_bottom)` of a half, a column when `x` lies in `[x_left, x_right)`
//! of the span, so triangles sharing an edge neither overlap nor leave gaps
//! between them.

use nalgebra::Point2;

use crate::framebuffer::{FrameBuffer, OwnerId, RasterizeResult};

/// Projected vertex carrying its reciprocal depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub x: f32,
    pub y: f32,
    pub inv_depth: f32,
}

impl ScreenVertex {
    /// Vertex at `pixel` with positive distance `depth` along the view axis.
    pub fn new(pixel: Point2<f32>, depth: f32) -> Self {
        Self {
            x: pixel.x,
            y: pixel.y,
            inv_depth: 1.0 / depth,
        }
    }
}

/// Attribution written alongside every depth the fill stores.
#[derive(Debug, Clone, Copy)]
pub struct FillTag {
    pub owner: Option<OwnerId>,
    pub triangle: u32,
}

/// Index of the first pixel sampled at or after `coord`.
///
/// `coord` is clamped to `[-1, limit + 1]` before the cast, so coordinates far
/// off the image stay far from the ends of `i32`.
#[inline]
fn first_sample(coord: f32, limit: usize) -> i32 {
    coord.clamp(-1.0, limit as f32 + 1.0).ceil() as i32
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Twice the signed area in image coordinates (y down). Negative for
/// front-facing triangles.
#[inline]
pub fn signed_area(p1: &ScreenVertex, p2: &ScreenVertex, p3: &ScreenVertex) -> f32 {
    (p2.x - p1.x) * (p3.y - p1.y) - (p3.x - p1.x) * (p2.y - p1.y)
}

/// One bounding edge of a flat half, walked from `from` down to `to`.
#[derive(Debug, Clone, Copy)]
struct Edge {
    from: ScreenVertex,
    to: ScreenVertex,
}

impl Edge {
    /// X and reciprocal depth where the edge crosses row `y`.
    #[inline]
    fn at_row(&self, y: f32) -> (f32, f32) {
        let height = self.to.y - self.from.y;
        if height <= 0.0 {
            return (self.from.x, self.from.inv_depth);
        }
        let t = (y - self.from.y) / height;
        (
            lerp(self.from.x, self.to.x, t),
            lerp(self.from.inv_depth, self.to.inv_depth, t),
        )
    }
}

/// Part of one row between the left and right edge.
#[derive(Debug, Clone, Copy)]
struct Span {
    x_left: f32,
    x_right: f32,
    inv_left: f32,
    inv_right: f32,
}

/// Fill one triangle into `frame` under the nearest-wins rule.
///
/// Back-facing and degenerate triangles are skipped. `bounds` grows by the
/// triangle's pixel rectangle (clamped to the image) whenever the triangle
/// reaches the image. Returns the number of pixels written.
pub fn fill_triangle(
    frame: &mut FrameBuffer,
    vertices: [ScreenVertex; 3],
    tag: FillTag,
    bounds: &mut RasterizeResult,
) -> usize {
    let [p1, p2, p3] = vertices;
    let (width, height) = (frame.width(), frame.height());

    let area = signed_area(&p1, &p2, &p3);
    let front_facing = area < 0.0;
    if !front_facing {
        // Back-facing, zero area or NaN
        return 0;
    }

    let min_x = first_sample(p1.x.min(p2.x).min(p3.x), width);
    let max_x = first_sample(p1.x.max(p2.x).max(p3.x), width) - 1;
    let min_y = first_sample(p1.y.min(p2.y).min(p3.y), height);
    let max_y = first_sample(p1.y.max(p2.y).max(p3.y), height) - 1;

    let covers_no_sample = min_x > max_x || min_y > max_y;
    if covers_no_sample {
        return 0;
    }
    let outside_image =
        max_x < 0 || max_y < 0 || min_x >= width as i32 || min_y >= height as i32;
    if outside_image {
        return 0;
    }

    bounds.expand(min_x, min_y, max_x, max_y, width, height);

    let mut sorted = vertices;
    sorted.sort_unstable_by(|a, b| a.y.total_cmp(&b.y));
    let [top, mid, bottom] = sorted;

    let row_span = bottom.y - top.y;
    if row_span <= 0.0 {
        return 0;
    }

    let t = (mid.y - top.y) / row_span;
    let split = ScreenVertex {
        x: lerp(top.x, bottom.x, t),
        y: mid.y,
        inv_depth: lerp(top.inv_depth, bottom.inv_depth, t),
    };
    let (left, right) = if split.x < mid.x {
        (split, mid)
    } else {
        (mid, split)
    };

    let upper = fill_half(
        frame,
        Edge { from: top, to: left },
        Edge { from: top, to: right },
        top.y,
        mid.y,
        tag,
    );
    let lower = fill_half(
        frame,
        Edge { from: left, to: bottom },
        Edge { from: right, to: bottom },
        mid.y,
        bottom.y,
        tag,
    );
    upper + lower
}

/// Fill rows `y` in `[y_start, y_end)` between two edges.
fn fill_half(
    frame: &mut FrameBuffer,
    left: Edge,
    right: Edge,
    y_start: f32,
    y_end: f32,
    tag: FillTag,
) -> usize {
    let zero_row_span = y_end - y_start <= 0.0;
    if zero_row_span {
        return 0;
    }

    let height = frame.height();
    let first = first_sample(y_start, height).max(0);
    let last = (first_sample(y_end, height) - 1).min(height as i32 - 1);

    let mut written = 0;
    for y in first..=last {
        let (x_left, inv_left) = left.at_row(y as f32);
        let (x_right, inv_right) = right.at_row(y as f32);
        let span = Span {
            x_left,
            x_right,
            inv_left,
            inv_right,
        };
        written += fill_span(frame, y as usize, span, tag);
    }
    written
}

/// Fill the pixels of row `y` with `x` in `[x_left, x_right)`.
fn fill_span(frame: &mut FrameBuffer, y: usize, span: Span, tag: FillTag) -> usize {
    let span_width = span.x_right - span.x_left;
    let zero_column_span = span_width <= 0.0;
    if zero_column_span {
        return 0;
    }

    let width = frame.width();
    let first = first_sample(span.x_left, width).max(0);
    let last = (first_sample(span.x_right, width) - 1).min(width as i32 - 1);
    if first > last {
        return 0;
    }

    let inv_step = (span.inv_right - span.inv_left) / span_width;
    let mut inv_depth = span.inv_left + (first as f32 - span.x_left) * inv_step;

    let mut written = 0;
    for x in first..=last {
        let depth = 1.0 / inv_depth;
        if frame.plot(x as usize, y, depth, tag.owner, tag.triangle) {
            written += 1;
        }
        inv_depth += inv_step;
    }
    written
}
