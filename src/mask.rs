//! Coverage Masks
//!
//! Paint coverage spans into a grayscale image, for inspecting and
//! comparing results.

use crate::scan::CoverageSpans;

use image::{GrayImage, Luma};
use std::path::Path;

/// Paint spans into a `width` x `height` image, 0 where nothing is covered
///
/// Spans, or parts of spans, outside the image are dropped
pub fn to_gray_image(spans: &CoverageSpans, width: u32, height: u32) -> GrayImage {
    let mut img = GrayImage::new(width, height);
    for s in spans {
        if s.y < 0 || s.y as i64 >= i64::from(height) {
            continue;
        }
        let x0 = i64::from(s.x).max(0);
        let x1 = i64::from(s.end()).min(i64::from(width));
        for x in x0 .. x1 {
            img.put_pixel(x as u32, s.y as u32, Luma([s.coverage]));
        }
    }
    img
}

/// Write the mask of `spans` to `filename`, format from the extension
pub fn save<P: AsRef<Path>>(spans: &CoverageSpans, width: u32, height: u32, filename: P) -> image::ImageResult<()> {
    to_gray_image(spans, width, height).save(filename)
}

/// Number of differing pixels between two masks of the same size
///
/// `None` when the sizes differ
pub fn mask_diff(a: &GrayImage, b: &GrayImage) -> Option<usize> {
    if a.dimensions() != b.dimensions() {
        return None;
    }
    let n = a.pixels().zip(b.pixels()).filter(|(p, q)| p != q).count();
    if n > 0 {
        tracing::trace!(pixels = n, "masks differ");
    }
    Some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::Span;

    #[test]
    fn spans_are_clipped() {
        let spans = CoverageSpans::from(vec![
            Span::new(-2, 0, 4, 255),
            Span::new(3, 1, 10, 128),
            Span::new(0, -1, 4, 255),
            Span::new(0, 4, 4, 255),
        ]);
        let img = to_gray_image(&spans, 4, 4);
        assert_eq!(img.get_pixel(0, 0)[0], 255);
        assert_eq!(img.get_pixel(1, 0)[0], 255);
        assert_eq!(img.get_pixel(2, 0)[0], 0);
        assert_eq!(img.get_pixel(3, 1)[0], 128);
        assert_eq!(img.get_pixel(0, 3)[0], 0);
    }

    #[test]
    fn diff_counts_pixels() {
        let a = to_gray_image(&CoverageSpans::from(vec![Span::new(0, 0, 2, 10)]), 3, 3);
        let b = to_gray_image(&CoverageSpans::from(vec![Span::new(1, 0, 2, 10)]), 3, 3);
        assert_eq!(mask_diff(&a, &a), Some(0));
        assert_eq!(mask_diff(&a, &b), Some(2));
        assert_eq!(mask_diff(&a, &GrayImage::new(2, 2)), None);
    }
}
