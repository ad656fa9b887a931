
use raster_rle::{FillRule, Path, SchedulerConfig, SpanGenerator, Span};
use std::time::{Duration, Instant};

fn generator() -> SpanGenerator {
    SpanGenerator::new(SchedulerConfig::default().with_workers(2)).unwrap()
}

#[test]
fn fill_square() {
    let gen = generator();
    let spans = gen.generate_fill(Path::rect(0.0, 0.0, 10.0, 10.0), FillRule::NonZero)
        .wait()
        .unwrap();
    assert_eq!(spans.len(), 10);
    for (y, s) in spans.iter().enumerate() {
        assert_eq!(*s, Span::new(0, y as i32, 10, 255));
    }
}

#[test]
fn fill_half_pixel_edges() {
    let gen = generator();
    let spans = gen.generate_fill(Path::rect(0.5, 0.0, 4.0, 2.0), FillRule::NonZero)
        .wait()
        .unwrap();
    for y in 0 .. 2 {
        assert_eq!(spans.coverage_at(0, y), 128);
        assert_eq!(spans.coverage_at(2, y), 255);
        assert_eq!(spans.coverage_at(4, y), 128);
        assert_eq!(spans.coverage_at(5, y), 0);
    }
}

#[test]
fn spans_are_ordered() {
    let gen = generator();
    let mut path = Path::new();
    path.move_to(10.0, 0.0);
    path.line_to(20.0, 20.0);
    path.line_to(0.0, 20.0);
    path.close();
    let spans = gen.generate_fill(path, FillRule::NonZero).wait().unwrap();
    assert!(!spans.is_empty());
    for w in spans.spans().windows(2) {
        let (a, b) = (w[0], w[1]);
        assert!(a.y < b.y || (a.y == b.y && a.end() <= b.x), "{:?} {:?}", a, b);
    }
    let bbox = spans.bounding_box().unwrap();
    assert_eq!((bbox.x1, bbox.y1, bbox.x2, bbox.y2), (0, 0, 19, 19));
}

fn overlapping_rects() -> Path {
    let mut path = Path::new();
    for x in [0.0, 2.0] {
        path.move_to(x, 0.0);
        path.line_to(x + 4.0, 0.0);
        path.line_to(x + 4.0, 4.0);
        path.line_to(x, 4.0);
        path.close();
    }
    path
}

#[test]
fn fill_rules_on_overlap() {
    let gen = generator();
    let nonzero = gen.generate_fill(overlapping_rects(), FillRule::NonZero);
    let evenodd = gen.generate_fill(overlapping_rects(), FillRule::EvenOdd);
    let nonzero = nonzero.wait().unwrap();
    let evenodd = evenodd.wait().unwrap();

    assert_eq!(nonzero.area(), 6 * 4 * 255);
    assert_eq!(nonzero.coverage_at(3, 1), 255);

    assert_eq!(evenodd.area(), 4 * 4 * 255);
    assert_eq!(evenodd.coverage_at(1, 1), 255);
    assert_eq!(evenodd.coverage_at(3, 1), 0);
    assert_eq!(evenodd.coverage_at(5, 1), 255);
}

#[test]
fn fill_cubic() {
    let gen = generator();
    let mut path = Path::new();
    path.move_to(0.0, 0.0);
    path.line_to(10.0, 0.0);
    path.cubic_to(15.0, 0.0, 15.0, 10.0, 10.0, 10.0);
    path.line_to(0.0, 10.0);
    path.close();
    let spans = gen.generate_fill(path, FillRule::NonZero).wait().unwrap();
    assert_eq!(spans.coverage_at(5, 5), 255);
    assert_eq!(spans.coverage_at(12, 5), 255);
    assert_eq!(spans.coverage_at(14, 5), 0);
    let bbox = spans.bounding_box().unwrap();
    assert_eq!(bbox.x2, 13);
}

#[test]
fn empty_path_resolves_immediately() {
    let gen = generator();
    let f = gen.generate_fill(Path::new(), FillRule::NonZero);
    assert!(f.try_get().unwrap().unwrap().is_empty());
}

#[test]
fn degenerate_path_has_no_spans() {
    let gen = generator();
    let mut path = Path::new();
    path.move_to(1.0, 1.0);
    path.line_to(5.0, 1.0);
    let spans = gen.generate_fill(path, FillRule::NonZero).wait().unwrap();
    assert!(spans.is_empty());
}

#[test]
fn global_generator() {
    let spans = raster_rle::generate_fill(Path::rect(1.0, 1.0, 2.0, 2.0), FillRule::EvenOdd)
        .wait()
        .unwrap();
    assert_eq!(spans.spans(), &[Span::new(1, 1, 2, 255), Span::new(1, 2, 2, 255)]);
}

#[test]
fn far_off_fill_has_no_spans() {
    let gen = generator();
    let right = gen.generate_fill(Path::rect(3e9, 0.0, 2.0, 2.0), FillRule::NonZero);
    let left = gen.generate_fill(Path::rect(-3e9, 5.0, 2.0, 2.0), FillRule::EvenOdd);
    assert!(right.wait().unwrap().is_empty());
    assert!(left.wait().unwrap().is_empty());
}

#[test]
fn huge_fill_is_clipped() {
    let gen = generator();
    let spans = gen.generate_fill(Path::rect(-1e10, 0.0, 2e10, 3.0), FillRule::NonZero)
        .wait()
        .unwrap();
    assert_eq!(spans.len(), 3);
    for s in spans.iter() {
        assert_eq!((s.x, s.end(), s.coverage), (-32767, 32767, 255));
    }
}

#[test]
fn tall_stroke_then_small_fills_on_one_worker() {
    let gen = SpanGenerator::new(SchedulerConfig::default().with_workers(1)).unwrap();
    let mut line = Path::new();
    line.move_to(0.5, -5e6);
    line.line_to(0.5, 5e6);
    let tall = gen.generate_stroke(line, raster_rle::StrokeStyle::new(1.0))
        .wait_timeout(Duration::from_secs(10))
        .unwrap();
    let b = tall.bounding_box().unwrap();
    assert_eq!((b.x1, b.y1, b.x2, b.y2), (0, -32767, 0, 32766));

    let start = Instant::now();
    for _ in 0 .. 20 {
        let spans = gen.generate_fill(Path::rect(0.0, 0.0, 2.0, 2.0), FillRule::NonZero)
            .wait()
            .unwrap();
        assert_eq!(spans.spans(), &[Span::new(0, 0, 2, 255), Span::new(0, 1, 2, 255)]);
    }
    assert!(start.elapsed() < Duration::from_secs(2), "{:?}", start.elapsed());
}
