//! Scanline Rasterizer
//!
//! Outlines are accumulated into cells (see [`RasterizerCell`]), then swept
//! one scanline at a time.  Each scanline produces a batch of spans handed
//! to a callback:
//!
//!   - a cell with a non-zero area is a partially covered pixel and
//!     becomes a span of length 1
//!   - the run between two cells has the accumulated cover of every cell
//!     to its left and becomes one span
//!
//! Spans within a batch are ordered left to right and do not overlap,
//! batches are produced top to bottom.

use crate::POLY_SUBPIXEL_SHIFT;
use crate::POLY_SUBPIXEL_SCALE;

use crate::clip::Clip;
use crate::cell::RasterizerCell;
use crate::outline::FixedOutline;
use crate::path::Point;
use crate::scan::Span;
use crate::Rasterize;

use std::cmp::min;
use std::cmp::max;

/// Flattening tolerance for cubic curves, pixels
const CURVE_TOLERANCE : f64 = 0.1;

/// Largest pixel coordinate reaching the cells, in either direction
///
/// Geometry is clipped to this range, which keeps cell coordinates within
/// `Span` and bounds the number of scanlines of one outline
pub const MAX_COORD : f64 = 32767.0;

/// Largest subpixel coordinate accepted from the caller
const MAX_SUBPIXEL : i64 = 1 << 50;

pub struct RasConvInt {
}
impl RasConvInt {
    /// Pixels to subpixels, saturating far outside the clip range
    pub fn upscale(v: f64) -> i64 {
        ((v * POLY_SUBPIXEL_SCALE as f64).round() as i64).clamp(-MAX_SUBPIXEL, MAX_SUBPIXEL)
    }
}

/// Rule deciding which regions of a self-intersecting outline are inside
#[derive(Debug,PartialEq,Eq,Copy,Clone,Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

#[derive(Debug,PartialEq,Copy,Clone,Default)]
pub enum PathStatus {
    #[default]
    Initial,
    Closed,
    MoveTo,
    LineTo
}

/// Anti-Aliased Scanline Rasterizer
///
/// Owned by a single thread and reused; cell and span storage is kept
/// between outlines.  Output is always clipped to `MAX_COORD`.
#[derive(Debug)]
pub struct Rasterizer {
    clipper: Clip,
    outline: RasterizerCell,
    status: PathStatus,
    x0: i64,
    y0: i64,
    fill_rule: FillRule,
    /// Spans of the current scanline
    spans: Vec<Span>,
    /// Flattened contour scratch
    contour: Vec<Point>,
}

impl Rasterize for Rasterizer {
    fn reset(&mut self) {
        self.outline.reset();
        self.status = PathStatus::Initial;
    }
    fn render<F: FnMut(&[Span])>(&mut self, outline: &FixedOutline, mut spans: F) {
        self.reset();
        self.fill_rule = outline.fill_rule;
        self.add_outline(outline);
        if !self.rewind_scanlines() {
            return;
        }
        for y in self.outline.min_y ..= self.outline.max_y {
            self.sweep_scanline(y);
            if !self.spans.is_empty() {
                spans(&self.spans);
            }
        }
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        let mut ras = Self {
            clipper: Clip::new(),
            outline: RasterizerCell::new(),
            status: PathStatus::Initial,
            x0: 0,
            y0: 0,
            fill_rule: FillRule::NonZero,
            spans: vec![],
            contour: vec![],
        };
        ras.reset_clipping();
        ras
    }
    /// Restrict output to the rectangle (x1,y1) - (x2,y2), pixels
    ///
    /// The rectangle is limited to `MAX_COORD`
    pub fn clip_box(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let c = |v: f64| RasConvInt::upscale(v.clamp(-MAX_COORD, MAX_COORD));
        self.clipper.clip_box(c(x1), c(y1), c(x2), c(y2));
    }
    /// Go back to clipping at `MAX_COORD`
    pub fn reset_clipping(&mut self) {
        self.clipper.reset_clipping();
        self.clip_box(-MAX_COORD, -MAX_COORD, MAX_COORD, MAX_COORD);
    }
    /// Scanlines covered by the last outline
    pub fn rows(&self) -> usize {
        self.outline.rows()
    }
    pub fn move_to_d(&mut self, x: f64, y: f64) {
        self.close_polygon();
        self.x0 = RasConvInt::upscale( x );
        self.y0 = RasConvInt::upscale( y );
        self.clipper.move_to(self.x0,self.y0);
        self.status = PathStatus::MoveTo;
    }
    pub fn line_to_d(&mut self, x: f64, y: f64) {
        let x = RasConvInt::upscale( x );
        let y = RasConvInt::upscale( y );
        self.clipper.line_to(&mut self.outline, x,y);
        self.status = PathStatus::LineTo;
    }
    pub fn close_polygon(&mut self) {
        if self.status == PathStatus::LineTo {
            self.clipper.line_to(&mut self.outline, self.x0, self.y0);
            self.status = PathStatus::Closed;
        }
    }
    /// Add every contour of the outline, each implicitly closed
    fn add_outline(&mut self, outline: &FixedOutline) {
        let mut contour = std::mem::take(&mut self.contour);
        for c in 0 .. outline.n_contours() {
            outline.flatten_contour(c, CURVE_TOLERANCE, &mut contour);
            if let Some((first, rest)) = contour.split_first() {
                self.move_to_d(first.x, first.y);
                for p in rest {
                    self.line_to_d(p.x, p.y);
                }
                self.close_polygon();
            }
        }
        self.contour = contour;
    }
    fn rewind_scanlines(&mut self) -> bool {
        self.close_polygon();
        self.outline.sort_cells();
        self.outline.total_cells() != 0
    }
    /// Collect the spans of scanline `y`
    fn sweep_scanline(&mut self, y: i64) {
        self.spans.clear();
        let cells = self.outline.scanline_cells(y);
        let mut cover = 0;
        let mut i = 0;
        while i < cells.len() {
            let mut x = cells[i].x;
            let mut area = cells[i].area;
            cover += cells[i].cover;
            i += 1;
            // Accumulate all cells with the same x
            while i < cells.len() && cells[i].x == x {
                area += cells[i].area;
                cover += cells[i].cover;
                i += 1;
            }
            if area != 0 {
                let alpha = self.calculate_alpha((cover << (POLY_SUBPIXEL_SHIFT + 1)) - area);
                if alpha > 0 {
                    self.spans.push(Span::new(x as i32, y as i32, 1, alpha));
                }
                x += 1;
            }
            if i < cells.len() && cells[i].x > x {
                let alpha = self.calculate_alpha(cover << (POLY_SUBPIXEL_SHIFT + 1));
                if alpha > 0 {
                    self.spans.push(Span::new(x as i32, y as i32, (cells[i].x - x) as u32, alpha));
                }
            }
        }
    }
    /// Convert accumulated area to coverage following the fill rule
    pub fn calculate_alpha(&self, area: i64) -> u8 {
        let aa_shift  = 8;
        let aa_scale  = 1 << aa_shift;
        let aa_scale2 = aa_scale * 2;
        let aa_mask   = aa_scale  - 1;
        let aa_mask2  = aa_scale2 - 1;

        let mut cover = area >> (POLY_SUBPIXEL_SHIFT*2 + 1 - aa_shift);
        cover = cover.abs();
        if self.fill_rule == FillRule::EvenOdd {
            cover &= aa_mask2;
            if cover > aa_scale {
                cover = aa_scale2 - cover;
            }
        }
        max(0, min(cover, aa_mask)) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::FixedOutlineBuffer;
    use crate::path::Path;
    use crate::scan::CoverageSpans;

    fn fill(path: &Path, rule: FillRule) -> CoverageSpans {
        let mut buf = FixedOutlineBuffer::new();
        buf.convert_path(path);
        buf.outline.fill_rule = rule;
        let mut ras = Rasterizer::new();
        let mut out = CoverageSpans::new();
        ras.render(&buf.outline, |spans| out.add_spans(spans));
        out
    }

    #[test]
    fn pixel_aligned_square_is_fully_covered() {
        let spans = fill(&Path::rect(0.0, 0.0, 10.0, 10.0), FillRule::NonZero);
        assert_eq!(spans.len(), 10);
        for (y, s) in spans.iter().enumerate() {
            assert_eq!(*s, Span::new(0, y as i32, 10, 255));
        }
    }

    #[test]
    fn half_pixel_edges_are_partial() {
        let spans = fill(&Path::rect(0.5, 0.0, 4.0, 2.0), FillRule::NonZero);
        assert_eq!(spans.coverage_at(0, 0), 128);
        assert_eq!(spans.coverage_at(1, 0), 255);
        assert_eq!(spans.coverage_at(4, 1), 128);
        assert_eq!(spans.coverage_at(5, 1), 0);
    }

    #[test]
    fn spans_are_ordered_and_disjoint() {
        let mut path = Path::new();
        path.move_to(3.3, 0.7);
        path.cubic_to(20.0, -4.0, 30.0, 25.0, 12.1, 18.9);
        path.line_to(-2.5, 9.4);
        path.close();
        let spans = fill(&path, FillRule::NonZero);
        assert!(!spans.is_empty());
        for w in spans.spans().windows(2) {
            if w[0].y == w[1].y {
                assert!(w[0].end() <= w[1].x, "{:?} {:?}", w[0], w[1]);
            } else {
                assert!(w[0].y < w[1].y);
            }
        }
    }

    #[test]
    fn even_odd_leaves_overlap_empty() {
        let mut path = Path::rect(0.0, 0.0, 10.0, 10.0);
        let inner = Path::rect(2.0, 2.0, 6.0, 6.0);
        path.move_to(2.0, 2.0);
        for p in &inner.points()[1..] {
            path.line_to(p.x, p.y);
        }
        path.close();
        let nonzero = fill(&path, FillRule::NonZero);
        let evenodd = fill(&path, FillRule::EvenOdd);
        assert_eq!(nonzero.coverage_at(5, 5), 255);
        assert_eq!(evenodd.coverage_at(5, 5), 0);
        assert_eq!(evenodd.coverage_at(1, 5), 255);
    }

    #[test]
    fn clip_box_limits_spans() {
        let mut buf = FixedOutlineBuffer::new();
        buf.convert_path(&Path::rect(-5.0, -5.0, 20.0, 20.0));
        let mut ras = Rasterizer::new();
        ras.clip_box(0.0, 0.0, 8.0, 8.0);
        let mut out = CoverageSpans::new();
        ras.render(&buf.outline, |spans| out.add_spans(spans));
        let b = out.bounding_box().unwrap();
        assert_eq!((b.x1, b.y1, b.x2, b.y2), (0, 0, 7, 7));
        assert_eq!(out.area(), 64 * 255);
    }

    #[test]
    fn empty_outline_emits_nothing() {
        let mut ras = Rasterizer::new();
        let mut calls = 0;
        ras.render(&FixedOutline::new(), |_| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn far_off_geometry_is_clipped() {
        let right = fill(&Path::rect(3e9, 0.0, 2.0, 2.0), FillRule::NonZero);
        assert!(right.is_empty(), "{:?}", right);
        let below = fill(&Path::rect(0.0, -3e9, 2.0, 2.0), FillRule::NonZero);
        assert!(below.is_empty(), "{:?}", below);

        let wide = fill(&Path::rect(-1e12, 0.0, 1e12 + 5.0, 2.0), FillRule::NonZero);
        let b = wide.bounding_box().unwrap();
        assert_eq!((b.x1, b.y1, b.x2, b.y2), (-32767, 0, 4, 1));
        assert_eq!(wide.coverage_at(0, 1), 255);
        assert_eq!(wide.coverage_at(-30000, 0), 255);
    }

    #[test]
    fn tall_outline_does_not_slow_later_ones() {
        let mut buf = FixedOutlineBuffer::new();
        let mut ras = Rasterizer::new();

        buf.convert_path(&Path::rect(0.0, 0.0, 1.0, 1e7));
        let mut tall = CoverageSpans::new();
        ras.render(&buf.outline, |spans| tall.add_spans(spans));
        assert!(ras.rows() <= 32768);
        assert_eq!(tall.len(), 32767);
        assert_eq!(tall.spans().last(), Some(&Span::new(0, 32766, 1, 255)));

        buf.convert_path(&Path::rect(1.0, 1.0, 2.0, 2.0));
        let mut small = CoverageSpans::new();
        ras.render(&buf.outline, |spans| small.add_spans(spans));
        assert_eq!(ras.rows(), 3);
        assert_eq!(small.spans(), &[Span::new(1, 1, 2, 255), Span::new(1, 2, 2, 255)]);
    }

    #[test]
    fn reset_clipping_keeps_coordinate_limit() {
        let mut ras = Rasterizer::new();
        ras.clip_box(-1e9, -1e9, 1e9, 1e9);
        ras.reset_clipping();
        let mut buf = FixedOutlineBuffer::new();
        buf.convert_path(&Path::rect(40000.0, 0.0, 2.0, 2.0));
        let mut out = CoverageSpans::new();
        ras.render(&buf.outline, |spans| out.add_spans(spans));
        assert!(out.is_empty());
    }
}
