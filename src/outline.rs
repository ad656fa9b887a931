//! Fixed-point Outlines
//!
//! The rasterizer and stroker consume outlines in 26.6 fixed point:
//! points with a tag marking on-curve points and cubic control points,
//! and the index of the last point of each contour.
//!
//! [`FixedOutlineBuffer`] converts a [`Path`] into this form.  Its storage
//! is reused between conversions and only ever grows, so a worker that
//! converts many paths stops allocating once it has seen the largest one.

use crate::path::{Path, PathCommand, Point};
use crate::raster::FillRule;
use crate::stroke::{LineCap, LineJoin, StrokeStyle, StrokerLineCap, StrokerLineJoin};

/// Fractional bits of a 26.6 coordinate
pub const FIXED_SHIFT : u32 = 6;
/// Scale of a 26.6 coordinate
pub const FIXED_SCALE : f64 = (1 << FIXED_SHIFT) as f64;
/// Scale of a 16.16 value
pub const FIXED_16_16 : f64 = (1 << 16) as f64;

/// Convert to a 26.6 fixed point value, rounding to the nearest 1/64
/// rather than truncating toward zero
pub fn to_fixed(v: f64) -> i64 {
    (v * FIXED_SCALE).round() as i64
}
/// Convert from a 26.6 fixed point value
pub fn from_fixed(v: i64) -> f64 {
    v as f64 / FIXED_SCALE
}

/// Point in 26.6 fixed point
#[derive(Debug,Default,Copy,Clone,PartialEq,Eq)]
pub struct FixedPoint {
    pub x: i64,
    pub y: i64,
}

impl FixedPoint {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
    pub fn from_point(p: &Point) -> Self {
        Self { x: to_fixed(p.x), y: to_fixed(p.y) }
    }
    pub fn to_point(&self) -> Point {
        Point::new(from_fixed(self.x), from_fixed(self.y))
    }
}

/// Point Tag
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum PointTag {
    /// Point lies on the curve
    On,
    /// Control point of a cubic bezier
    Cubic,
}

/// Outline in 26.6 fixed point
#[derive(Debug,Default,Clone)]
pub struct FixedOutline {
    /// Points of all contours
    pub points: Vec<FixedPoint>,
    /// Tag of each point, parallel to `points`
    pub tags: Vec<PointTag>,
    /// Index of the last point of each contour
    pub contours: Vec<usize>,
    /// Fill rule used when rasterizing
    pub fill_rule: FillRule,
    /// Last contour was explicitly closed
    pub closed: bool,
}

impl FixedOutline {
    pub fn new() -> Self {
        Self::default()
    }
    /// Number of points
    pub fn n_points(&self) -> usize {
        self.points.len()
    }
    /// Number of contours
    pub fn n_contours(&self) -> usize {
        self.contours.len()
    }
    /// Index range of the points of contour `c`
    pub fn contour_range(&self, c: usize) -> std::ops::Range<usize> {
        let start = if c == 0 { 0 } else { self.contours[c-1] + 1 };
        start .. self.contours[c] + 1
    }
    /// Add an on-curve point
    pub fn push_on(&mut self, p: FixedPoint) {
        self.points.push(p);
        self.tags.push(PointTag::On);
    }
    /// Mark the last point as the end of a contour
    pub fn end_contour(&mut self) {
        let start = self.contours.last().map(|&c| c + 1).unwrap_or(0);
        if self.points.len() > start {
            self.contours.push(self.points.len() - 1);
        }
    }
    /// Flatten contour `c` into points in pixel units
    ///
    /// Cubic segments are subdivided until flat within `tolerance` pixels.
    /// The contour is not explicitly closed, the first point is not repeated.
    pub fn flatten_contour(&self, c: usize, tolerance: f64, out: &mut Vec<Point>) {
        out.clear();
        let range = self.contour_range(c);
        let pts = &self.points[range.clone()];
        let tags = &self.tags[range];
        let mut i = 0;
        while i < pts.len() {
            match tags[i] {
                PointTag::Cubic if i + 2 < pts.len() && !out.is_empty() => {
                    let p0 = out[out.len()-1];
                    flatten_cubic(p0,
                                  pts[i].to_point(),
                                  pts[i+1].to_point(),
                                  pts[i+2].to_point(),
                                  tolerance, 0, out);
                    i += 3;
                },
                _ => {
                    out.push(pts[i].to_point());
                    i += 1;
                }
            }
        }
    }
}

const MAX_FLATTEN_DEPTH : u32 = 10;

/// Subdivide a cubic bezier until the control points are within
/// `tolerance` of the chord; the end point is pushed, the start is not
pub fn flatten_cubic(p0: Point, p1: Point, p2: Point, p3: Point,
                     tolerance: f64, depth: u32, out: &mut Vec<Point>) {
    let dx = p3.x - p0.x;
    let dy = p3.y - p0.y;
    let d2 = ((p1.x - p3.x) * dy - (p1.y - p3.y) * dx).abs();
    let d3 = ((p2.x - p3.x) * dy - (p2.y - p3.y) * dx).abs();
    let flatness = (d2 + d3) * (d2 + d3);
    let tolerance_sq = tolerance * tolerance * (dx * dx + dy * dy);
    let degenerate = dx * dx + dy * dy < 1e-12
        && crate::path::len(&p0, &p1) < tolerance
        && crate::path::len(&p0, &p2) < tolerance;

    if depth >= MAX_FLATTEN_DEPTH || degenerate || flatness <= tolerance_sq {
        out.push(p3);
        return;
    }
    let mid = |a: Point, b: Point| Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5);
    let p01 = mid(p0, p1);
    let p12 = mid(p1, p2);
    let p23 = mid(p2, p3);
    let p012 = mid(p01, p12);
    let p123 = mid(p12, p23);
    let p0123 = mid(p012, p123);
    flatten_cubic(p0, p01, p012, p0123, tolerance, depth + 1, out);
    flatten_cubic(p0123, p123, p23, p3, tolerance, depth + 1, out);
}

/// Stroke parameters in engine units
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct StrokeParams {
    /// Pen radius, 26.6
    pub radius: i64,
    /// Miter limit, 16.16
    pub miter_limit: i64,
    pub cap: StrokerLineCap,
    pub join: StrokerLineJoin,
    /// Source outline ended with a closed contour
    pub closed: bool,
}

impl Default for StrokeParams {
    fn default() -> Self {
        Self { radius: 0, miter_limit: 4 << 16,
               cap: StrokerLineCap::Butt,
               join: StrokerLineJoin::Miter,
               closed: false }
    }
}

/// Reusable outline storage owned by a single worker
#[derive(Debug,Default)]
pub struct FixedOutlineBuffer {
    pub outline: FixedOutline,
    pub stroke: StrokeParams,
}

impl FixedOutlineBuffer {
    pub fn new() -> Self {
        Self::default()
    }
    /// Set logical sizes to zero, capacity is untouched
    pub fn reset(&mut self) {
        self.outline.points.clear();
        self.outline.tags.clear();
        self.outline.contours.clear();
        self.outline.fill_rule = FillRule::NonZero;
    }
    /// Reset and make room for `points` points in `contours` contours
    ///
    /// Every contour may add one point when closed, so point storage is
    /// sized for `points + contours`.  Storage is reallocated only when
    /// the current capacity is too small.
    pub fn grow(&mut self, points: usize, contours: usize) {
        self.reset();
        let n = points + contours;
        self.outline.points.reserve(n);
        self.outline.tags.reserve(n);
        self.outline.contours.reserve(contours);
    }
    /// Capacity of the point and contour storage
    pub fn capacity(&self) -> (usize, usize) {
        (self.outline.points.capacity().min(self.outline.tags.capacity()),
         self.outline.contours.capacity())
    }
    /// Convert a Path into the outline
    pub fn convert_path(&mut self, path: &Path) -> &FixedOutline {
        let points = path.points();
        self.grow(points.len(), path.segments());

        let mut index = 0;
        for cmd in path.commands() {
            debug_assert!(index + cmd.num_points() <= points.len(),
                          "path has fewer points than its commands require");
            match cmd {
                PathCommand::MoveTo => {
                    self.move_to(&points[index]);
                    index += 1;
                },
                PathCommand::LineTo => {
                    self.line_to(&points[index]);
                    index += 1;
                },
                PathCommand::CubicTo => {
                    self.cubic_to(&points[index], &points[index+1], &points[index+2]);
                    index += 3;
                },
                PathCommand::Close => self.close(),
            }
        }
        self.outline.end_contour();
        tracing::trace!(points = self.outline.n_points(),
                        contours = self.outline.n_contours(),
                        "convert path");
        &self.outline
    }
    /// Convert a stroke style into engine units
    ///
    /// The stroke width is a diameter, the stroker takes the pen radius.
    /// Joins other than `Round` and `Bevel` stroke as `Miter`, caps other
    /// than `Square` and `Round` as `Butt`.
    pub fn convert_stroke(&mut self, style: &StrokeStyle) -> StrokeParams {
        let cap = match style.cap {
            LineCap::Square => StrokerLineCap::Square,
            LineCap::Round  => StrokerLineCap::Round,
            _               => StrokerLineCap::Butt,
        };
        let join = match style.join {
            LineJoin::Bevel => StrokerLineJoin::Bevel,
            LineJoin::Round => StrokerLineJoin::Round,
            _               => StrokerLineJoin::Miter,
        };
        self.stroke = StrokeParams {
            radius: to_fixed(style.width / 2.0),
            miter_limit: (style.miter_limit * FIXED_16_16) as i64,
            cap,
            join,
            closed: self.outline.closed,
        };
        self.stroke
    }
    fn move_to(&mut self, p: &Point) {
        self.outline.end_contour();
        self.outline.push_on(FixedPoint::from_point(p));
        self.outline.closed = false;
    }
    fn line_to(&mut self, p: &Point) {
        self.outline.push_on(FixedPoint::from_point(p));
        self.outline.closed = false;
    }
    fn cubic_to(&mut self, c1: &Point, c2: &Point, p: &Point) {
        let o = &mut self.outline;
        o.points.push(FixedPoint::from_point(c1));
        o.tags.push(PointTag::Cubic);
        o.points.push(FixedPoint::from_point(c2));
        o.tags.push(PointTag::Cubic);
        o.push_on(FixedPoint::from_point(p));
        o.closed = false;
    }
    fn close(&mut self) {
        let start = self.outline.contours.last().map(|&c| c + 1).unwrap_or(0);
        // Contour needs at least one point
        if self.outline.points.len() == start {
            self.outline.closed = false;
            return;
        }
        let first = self.outline.points[start];
        self.outline.push_on(first);
        self.outline.closed = true;
    }
}
