//! Path Stroking
//!
//! # Example
//!
//!     use raster_rle::{FixedOutlineBuffer, LineCap, LineJoin, Path, StrokeStyle, Stroker};
//!
//!     // Input Path
//!     let mut path = Path::new();
//!     path.move_to(  0.0,   0.0);
//!     path.line_to(100.0, 100.0);
//!     path.line_to(200.0,  50.0);
//!
//!     // Style
//!     let style = StrokeStyle::new(2.5)
//!         .line_cap(LineCap::Square)
//!         .line_join(LineJoin::Miter)
//!         .miter_limit(5.0);
//!
//!     // Stroke
//!     let mut buf = FixedOutlineBuffer::new();
//!     buf.convert_path(&path);
//!     let params = buf.convert_stroke(&style);
//!     let mut stroker = Stroker::new();
//!     stroker.set(params.radius, params.cap, params.join, params.miter_limit);
//!     stroker.parse_outline(&buf.outline, !params.closed);
//!     let (points, contours) = stroker.counts();
//!     buf.grow(points, contours);
//!     stroker.export(&mut buf.outline);
//!     assert_eq!(buf.outline.n_contours(), 1);
//!

use crate::outline::{FixedOutline, FixedPoint, FIXED_16_16, from_fixed};
use crate::path::{Point, len, cross};

use std::f64::consts::PI;

/// Line End or Cap Style
#[derive(Debug,Copy,Clone,PartialEq,Eq,Default)]
pub enum LineCap {
    #[default]
    Butt,
    Square,
    Round,
}
/// Lines Join Style on the outside
///
/// The stroker supports `Miter`, `Round` and `Bevel`; the remaining
/// variants stroke as `Miter`
#[derive(Debug,Copy,Clone,PartialEq,Eq,Default)]
pub enum LineJoin {
    #[default]
    Miter,
    MiterRevert,
    Round,
    Bevel,
    MiterRound,
}

/// Stroke Style
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct StrokeStyle {
    /// Line Cap Style
    pub cap: LineCap,
    /// Line Join Style
    pub join: LineJoin,
    /// Width of line in pixels
    pub width: f64,
    /// Maximum Length of miter at segment intersection, in widths
    pub miter_limit: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self { cap: LineCap::Butt, join: LineJoin::Miter,
               width: 1.0, miter_limit: 4.0 }
    }
}

impl StrokeStyle {
    /// Create a new style with width `width` and default cap and join
    pub fn new(width: f64) -> Self {
        Self { width, .. Self::default() }
    }
    /// Set Line cap style
    pub fn line_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }
    /// Set Line Join style
    pub fn line_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }
    /// Set miter limit
    pub fn miter_limit(mut self, miter_limit: f64) -> Self {
        self.miter_limit = miter_limit;
        self
    }
}

/// Cap style understood by the Stroker
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum StrokerLineCap {
    Butt, Round, Square,
}
/// Join style understood by the Stroker
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum StrokerLineJoin {
    Round, Bevel, Miter,
}

macro_rules! prev {
    ($i:expr, $n:expr) => ( ($i + $n - 1) % $n )
}
macro_rules! curr {
    ($i:expr, $n:expr) => ( $i )
}
macro_rules! next {
    ($i:expr, $n:expr) => ( ($i + 1) % $n )
}

/// Flattening tolerance for curves in the source outline, pixels
const CURVE_TOLERANCE : f64 = 0.05;

/// Outline Stroker
///
/// Expands an outline into the outline of the area covered by a pen of
/// the given radius.  A stroker is reused across outlines: `set` the
/// style, `parse_outline`, read the `counts` to size the destination,
/// then `export`.
#[derive(Debug)]
pub struct Stroker {
    /// Half width of line in pixels
    width: f64,
    /// Absolute value of the width in pixel
    width_abs: f64,
    /// Minimum Limit to determine if segments are almost co-linear
    width_eps: f64,
    /// Sign of the width, +1.0
    width_sign: f64,
    /// Maximum Length of miter at segment intersection, in half widths
    miter_limit: f64,
    /// Maximum Length of the inner miter at segment intersections
    inner_miter_limit: f64,
    /// Approximation scale
    approx_scale: f64,
    line_cap: StrokerLineCap,
    line_join: StrokerLineJoin,
    /// Stroked points of all contours, pixels
    points: Vec<Point>,
    /// Index one past the last point of each stroked contour
    ends: Vec<usize>,
    /// Scratch for the flattened source contour
    source: Vec<Point>,
}

impl Default for Stroker {
    fn default() -> Self {
        Self::new()
    }
}

impl Stroker {
    /// Create a new Stroker
    pub fn new() -> Self {
        Self {
            width: 0.5,
            width_abs: 0.5,
            width_eps: 0.5/1024.0,
            width_sign: 1.0,
            miter_limit: 4.0,
            inner_miter_limit: 1.01,
            approx_scale: 1.0,
            line_cap: StrokerLineCap::Butt,
            line_join: StrokerLineJoin::Miter,
            points: vec![],
            ends: vec![],
            source: vec![],
        }
    }
    /// Set the stroke style
    ///
    /// `radius` is the pen radius in 26.6, `miter_limit` is 16.16
    pub fn set(&mut self, radius: i64, cap: StrokerLineCap, join: StrokerLineJoin, miter_limit: i64) {
        self.width = from_fixed(radius);
        self.width_abs = self.width.abs();
        self.width_sign = if self.width < 0.0 { -1.0 } else { 1.0 };
        self.line_cap = cap;
        self.line_join = join;
        self.miter_limit = (miter_limit as f64 / FIXED_16_16).max(1.0);
        self.rewind();
    }
    /// Drop any stroked contours, keeping storage
    pub fn rewind(&mut self) {
        self.points.clear();
        self.ends.clear();
    }
    /// Stroke every contour of `outline`
    ///
    /// Contours are stroked as open lines with caps when `opened` is set,
    /// otherwise as closed polygons
    pub fn parse_outline(&mut self, outline: &FixedOutline, opened: bool) {
        self.rewind();
        let mut source = std::mem::take(&mut self.source);
        for c in 0 .. outline.n_contours() {
            outline.flatten_contour(c, CURVE_TOLERANCE, &mut source);
            clean_path(&mut source, !opened);
            self.stroke_contour(&source, !opened);
        }
        self.source = source;
        tracing::trace!(points = self.points.len(), contours = self.ends.len(),
                        "stroke outline");
    }
    /// Number of points and contours of the stroked outline
    pub fn counts(&self) -> (usize, usize) {
        (self.points.len(), self.ends.len())
    }
    /// Write the stroked outline into `outline`
    ///
    /// The outline must have been reset, see
    /// [`FixedOutlineBuffer::grow`](struct.FixedOutlineBuffer.html#method.grow)
    pub fn export(&self, outline: &mut FixedOutline) {
        let mut start = 0;
        for &end in &self.ends {
            for p in &self.points[start .. end] {
                outline.push_on(FixedPoint::from_point(p));
            }
            outline.end_contour();
            start = end;
        }
        outline.fill_rule = crate::raster::FillRule::NonZero;
        outline.closed = true;
    }

    fn end_contour(&mut self) {
        if self.points.len() > self.ends.last().copied().unwrap_or(0) {
            self.ends.push(self.points.len());
        }
    }

    fn stroke_contour(&mut self, v: &[Point], closed: bool) {
        let n = v.len();
        if n == 0 {
            return;
        }
        if n == 1 {
            self.stroke_dot(&v[0]);
            return;
        }
        if closed && n >= 3 {
            // Outer Contour
            for i in 0 .. n {
                self.calc_join(&v[prev!(i,n)], &v[curr!(i,n)], &v[next!(i,n)]);
            }
            self.end_contour();
            // Inner Contour, opposite direction
            for i in (0 .. n).rev() {
                self.calc_join(&v[next!(i,n)], &v[curr!(i,n)], &v[prev!(i,n)]);
            }
            self.end_contour();
            return;
        }
        // Open line, forward along one side and back along the other
        self.calc_cap(&v[0], &v[1]);
        for i in 1 .. n-1 {
            self.calc_join(&v[i-1], &v[i], &v[i+1]);
        }
        self.calc_cap(&v[n-1], &v[n-2]);
        for i in (1 .. n-1).rev() {
            self.calc_join(&v[i+1], &v[i], &v[i-1]);
        }
        self.end_contour();
    }

    /// Single point, drawn only by Square and Round caps
    fn stroke_dot(&mut self, p: &Point) {
        let w = self.width_abs;
        match self.line_cap {
            StrokerLineCap::Butt => {},
            StrokerLineCap::Square => {
                self.points.push(Point::new(p.x - w, p.y - w));
                self.points.push(Point::new(p.x + w, p.y - w));
                self.points.push(Point::new(p.x + w, p.y + w));
                self.points.push(Point::new(p.x - w, p.y + w));
                self.end_contour();
            },
            StrokerLineCap::Round => {
                let da = 2.0 * (w / (w + 0.125 / self.approx_scale)).acos();
                let n = ((2.0 * PI / da).ceil() as usize).max(4);
                for i in 0 .. n {
                    let a = 2.0 * PI * i as f64 / n as f64;
                    self.points.push(Point::new(p.x + a.cos() * w, p.y + a.sin() * w));
                }
                self.end_contour();
            },
        }
    }

    /// Calculate Line End Cap at `v0`, for the segment towards `v1`
    fn calc_cap(&mut self, v0: &Point, v1: &Point) {
        let dx = v1.x-v0.x;
        let dy = v1.y-v0.y;
        let len = (dx*dx + dy*dy).sqrt();
        let dx1 = self.width * dy / len;
        let dy1 = self.width * dx / len;

        match self.line_cap {
            StrokerLineCap::Square => {
                let dx2 = dy1 * self.width_sign;
                let dy2 = dx1 * self.width_sign;
                self.points.push(Point::new(v0.x - dx1 - dx2, v0.y + dy1 - dy2));
                self.points.push(Point::new(v0.x + dx1 - dx2, v0.y - dy1 - dy2));
            },
            StrokerLineCap::Butt => {
                self.points.push(Point::new(v0.x - dx1, v0.y + dy1));
                self.points.push(Point::new(v0.x + dx1, v0.y - dy1));
            },
            StrokerLineCap::Round => {
                let da = 2.0 * (self.width_abs / (self.width_abs + 0.125 / self.approx_scale)).acos();
                let n = (PI / da).round() as usize;

                let da = PI / (n + 1) as f64;
                self.points.push(Point::new(v0.x - dx1, v0.y + dy1));
                if self.width_sign > 0.0 {
                    let mut a1 = dy1.atan2(-dx1);
                    a1 += da;
                    for _ in 0 .. n {
                        self.points.push(Point::new(v0.x + a1.cos() * self.width,
                                                    v0.y + a1.sin() * self.width));
                        a1 += da;
                    }
                } else {
                    let mut a1 = (-dy1).atan2(dx1);
                    a1 -= da;
                    for _ in 0 .. n {
                        self.points.push(Point::new(v0.x + a1.cos() * self.width,
                                                    v0.y + a1.sin() * self.width));
                        a1 -= da;
                    }
                }
                self.points.push(Point::new(v0.x + dx1, v0.y - dy1));
            }
        }
    }

    /// Calculate an Arc around (x,y) from offset (dx1,dy1) to (dx2,dy2)
    fn calc_arc(&mut self, x: f64, y: f64, dx1: f64, dy1: f64, dx2: f64, dy2: f64) {
        // Starting and Ending Angle
        let mut a1 = (dy1 * self.width_sign).atan2(dx1 * self.width_sign);
        let mut a2 = (dy2 * self.width_sign).atan2(dx2 * self.width_sign);

        let mut da = 2.0 * (self.width_abs / (self.width_abs + 0.125 / self.approx_scale)).acos();
        self.points.push(Point::new(x + dx1, y + dy1));
        if self.width_sign > 0.0 {
            // Require a1 > a2
            if a1 > a2 {
                a2 += 2.0 * PI;
            }
            let n = ((a2 - a1) / da) as i64;
            da = (a2 - a1) / (n + 1) as f64;
            a1 += da;
            for _ in 0 .. n {
                self.points.push(Point::new(x + a1.cos() * self.width,
                                            y + a1.sin() * self.width));
                a1 += da;
            }
        } else {
            // Require: a2 < a1
            if a1 < a2 {
                a2 -= 2.0 * PI;
            }
            let n = ((a1 - a2) / da) as i64;
            da = (a1 - a2) / (n + 1) as f64;
            a1 -= da;
            for _ in 0 .. n {
                self.points.push(Point::new(x + a1.cos() * self.width,
                                            y + a1.sin() * self.width));
                a1 -= da;
            }
        }
        self.points.push(Point::new(x + dx2, y + dy2));
    }

    /// Calculate a Miter Join at p1
    #[allow(clippy::too_many_arguments)]
    fn calc_miter(&mut self,
                  p0: &Point, p1: &Point, p2: &Point,
                  dx1: f64, dy1: f64, dx2: f64, dy2: f64,
                  revert: bool, mlimit: f64, dbevel: f64) {
        let mut xi  = p1.x;
        let mut yi  = p1.y;
        let mut di  = 1.0;
        let lim = self.width_abs * mlimit;
        let mut miter_limit_exceeded = true; // Assume the worst
        let mut intersection_failed  = true; // Assume the worst

        if let Some((xit,yit)) = calc_intersection(p0.x + dx1, p0.y - dy1,
                                                   p1.x + dx1, p1.y - dy1,
                                                   p1.x + dx2, p1.y - dy2,
                                                   p2.x + dx2, p2.y - dy2) {
            xi = xit;
            yi = yit;
            di = len(p1, &Point::new(xi,yi));
            if di <= lim {
                // Inside the miter limit
                self.points.push(Point::new(xi, yi));
                miter_limit_exceeded = false;
            }
            intersection_failed = false;
        } else {
            // Intersection failed, the three points lie on a straight line.
            // The next segment either continues the previous one or goes back,
            // decided by which side of the perpendicular at p1 both lie on.
            let pz = Point::new(p1.x + dx1, p1.y - dy1);
            if (cross(p0, p1, &pz) < 0.0) == (cross(p1, p2, &pz) < 0.0) {
                self.points.push(Point::new(p1.x + dx1, p1.y - dy1));
                miter_limit_exceeded = false;
            }
        }

        if miter_limit_exceeded {
            if revert {
                // Simple bevel, compatible with SVG and PDF
                self.points.push(Point::new(p1.x + dx1, p1.y - dy1));
                self.points.push(Point::new(p1.x + dx2, p1.y - dy2));
            } else if intersection_failed {
                let mlimit = mlimit * self.width_sign;
                self.points.push(Point::new(p1.x + dx1 + dy1 * mlimit,
                                            p1.y - dy1 + dx1 * mlimit));
                self.points.push(Point::new(p1.x + dx2 - dy2 * mlimit,
                                            p1.y - dy2 - dx2 * mlimit));
            } else {
                // Truncate the miter at the limit
                let x1 = p1.x + dx1;
                let y1 = p1.y - dy1;
                let x2 = p1.x + dx2;
                let y2 = p1.y - dy2;
                let di = (lim - dbevel) / (di - dbevel);
                self.points.push(Point::new(x1 + (xi - x1) * di,
                                            y1 + (yi - y1) * di));
                self.points.push(Point::new(x2 + (xi - x2) * di,
                                            y2 + (yi - y2) * di));
            }
        }
    }

    /// Calculate the Join of Two Line Segments at p1
    ///
    /// [SVG Line Joins](https://www.w3.org/TR/SVG/painting.html#LineJoin)
    fn calc_join(&mut self, p0: &Point, p1: &Point, p2: &Point) {
        let len1 = len(p1,p0);
        let len2 = len(p2,p1);
        if len1 == 0.0 || len2 == 0.0 {
            return;
        }
        // Perpendicular offsets of both segments
        let dx1 = self.width * (p1.y-p0.y) / len1;
        let dy1 = self.width * (p1.x-p0.x) / len1;
        let dx2 = self.width * (p2.y-p1.y) / len2;
        let dy2 = self.width * (p2.x-p1.x) / len2;
        let cp = cross(p0, p1, p2);

        if cp != 0.0 && cp.is_sign_positive() == self.width.is_sign_positive() {
            // Inner Join
            let limit = (len1.min(len2) / self.width_abs).max(self.inner_miter_limit);
            self.calc_miter(p0, p1, p2, dx1, dy1, dx2, dy2, true, limit, 0.0);
            return;
        }
        // Outer Join
        let dx = (dx1 + dx2) / 2.0;
        let dy = (dy1 + dy2) / 2.0;
        let dbevel = (dx*dx + dy*dy).sqrt();

        if self.line_join != StrokerLineJoin::Miter
            && self.approx_scale * (self.width_abs - dbevel) < self.width_eps {
            // Almost collinear, a single point looks the same as a bevel
            // or round join
            match calc_intersection(p0.x + dx1, p0.y - dy1,
                                    p1.x + dx1, p1.y - dy1,
                                    p1.x + dx2, p1.y - dy2,
                                    p2.x + dx2, p2.y - dy2) {
                Some((x, y)) => self.points.push(Point::new(x, y)),
                None => self.points.push(Point::new(p1.x + dx1, p1.y - dy1)),
            }
            return;
        }
        match self.line_join {
            StrokerLineJoin::Miter =>
                self.calc_miter(p0, p1, p2, dx1, dy1, dx2, dy2,
                                false, self.miter_limit, dbevel),
            StrokerLineJoin::Round =>
                self.calc_arc(p1.x, p1.y, dx1, -dy1, dx2, -dy2),
            StrokerLineJoin::Bevel => {
                self.points.push(Point::new(p1.x + dx1, p1.y - dy1));
                self.points.push(Point::new(p1.x + dx2, p1.y - dy2));
            },
        }
    }
}

/// Calculate Intersection of two lines
///
/// Parallel Line are return as `None` otherwise the Intersection
///    (`px`,`py`) is returned
///
/// [Line-Line Intersection at Wikipedia](https://en.wikipedia.org/wiki/Line%E2%80%93line_intersection#Given_two_points_on_each_line)
///
/// Lines are specified to pairs of points
///   - (`ax`, `ay`) -> (`bx`, `by`)
///   - (`cx`, `cy`) -> (`dx`, `dy`)
#[allow(clippy::too_many_arguments)]
fn calc_intersection(ax: f64, ay: f64, bx: f64, by: f64,
                     cx: f64, cy: f64, dx: f64, dy: f64)
                     -> Option<(f64, f64)> {
    let intersection_epsilon = 1.0e-30;
    let num = (ay-cy) * (dx-cx) - (ax-cx) * (dy-cy);
    let den = (bx-ax) * (dy-cy) - (by-ay) * (dx-cx);
    // Lines are Parallel or Co-Linear
    if den.abs() < intersection_epsilon {
        return None;
    }
    let r = num / den;
    Some((ax + r * (bx-ax), ay + r * (by-ay)))
}

/// Remove repeated vertices in place
///
/// Repeated vertices are within 1e-6 of the previous one.  Closed
/// contours also lose trailing vertices equal to the first.
fn clean_path(v: &mut Vec<Point>, closed: bool) {
    let mut last: Option<Point> = None;
    v.retain(|p| {
        let keep = match last {
            Some(q) => len(&q, p) >= 1e-6,
            None => true,
        };
        if keep {
            last = Some(*p);
        }
        keep
    });
    if closed {
        while v.len() > 1 && len(&v[0], &v[v.len()-1]) < 1e-6 {
            v.pop();
        }
    }
}
