//! Coverage Spans

use crate::clip::Rectangle;

/// Horizontal run of pixels on one scanline with a single coverage
#[derive(Debug,Default,Copy,Clone,PartialEq,Eq)]
pub struct Span {
    /// First pixel of the run
    pub x: i32,
    /// Scanline
    pub y: i32,
    /// Number of pixels
    pub len: u32,
    /// Coverage, 0 to 255
    pub coverage: u8,
}

impl Span {
    pub fn new(x: i32, y: i32, len: u32, coverage: u8) -> Self {
        Self { x, y, len, coverage }
    }
    /// One past the last pixel of the run
    pub fn end(&self) -> i32 {
        self.x + self.len as i32
    }
}

/// Ordered collection of coverage spans
///
/// Spans are kept in the order they were added, the rasterizer adds them
/// top to bottom and left to right
#[derive(Debug,Default,Clone,PartialEq,Eq)]
pub struct CoverageSpans {
    spans: Vec<Span>,
}

impl CoverageSpans {
    pub fn new() -> Self {
        Self::default()
    }
    /// Append a batch of spans as given
    pub fn add_spans(&mut self, spans: &[Span]) {
        self.spans.extend_from_slice(spans);
    }
    /// Remove all spans, keeping storage
    pub fn clear(&mut self) {
        self.spans.clear();
    }
    pub fn len(&self) -> usize {
        self.spans.len()
    }
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Span> {
        self.spans.iter()
    }
    /// Spans on scanline `y`
    pub fn scanline(&self, y: i32) -> impl Iterator<Item = &Span> {
        self.spans.iter().filter(move |s| s.y == y)
    }
    /// Coverage of pixel (x,y), 0 when no span covers it
    pub fn coverage_at(&self, x: i32, y: i32) -> u8 {
        self.scanline(y)
            .find(|s| x >= s.x && x < s.end())
            .map(|s| s.coverage)
            .unwrap_or(0)
    }
    /// Sum of `len * coverage` over all spans
    pub fn area(&self) -> u64 {
        self.spans.iter().map(|s| u64::from(s.len) * u64::from(s.coverage)).sum()
    }
    /// Smallest rectangle containing every span, corners inclusive
    pub fn bounding_box(&self) -> Option<Rectangle<i32>> {
        let (first, rest) = self.spans.split_first()?;
        let mut r = Rectangle::new(first.x, first.y, first.end() - 1, first.y);
        for s in rest {
            r.expand(s.x, s.y);
            r.expand(s.end() - 1, s.y);
        }
        Some(r)
    }
}

impl IntoIterator for CoverageSpans {
    type Item = Span;
    type IntoIter = std::vec::IntoIter<Span>;
    fn into_iter(self) -> Self::IntoIter {
        self.spans.into_iter()
    }
}

impl<'a> IntoIterator for &'a CoverageSpans {
    type Item = &'a Span;
    type IntoIter = std::slice::Iter<'a, Span>;
    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

impl From<Vec<Span>> for CoverageSpans {
    fn from(spans: Vec<Span>) -> Self {
        Self { spans }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_keep_receipt_order() {
        let mut c = CoverageSpans::new();
        c.add_spans(&[Span::new(5, 1, 2, 255)]);
        c.add_spans(&[Span::new(0, 0, 3, 10), Span::new(4, 0, 1, 20)]);
        let ys: Vec<_> = c.iter().map(|s| (s.y, s.x)).collect();
        assert_eq!(ys, vec![(1, 5), (0, 0), (0, 4)]);
    }

    #[test]
    fn coverage_lookup_and_area() {
        let c = CoverageSpans::from(vec![Span::new(2, 3, 4, 255), Span::new(6, 3, 1, 128)]);
        assert_eq!(c.coverage_at(2, 3), 255);
        assert_eq!(c.coverage_at(5, 3), 255);
        assert_eq!(c.coverage_at(6, 3), 128);
        assert_eq!(c.coverage_at(7, 3), 0);
        assert_eq!(c.coverage_at(2, 4), 0);
        assert_eq!(c.area(), 4 * 255 + 128);
        let b = c.bounding_box().unwrap();
        assert_eq!((b.x1, b.y1, b.x2, b.y2), (2, 3, 6, 3));
    }
}
