
use raster_rle::mask;
use raster_rle::{FillRule, Path, SchedulerConfig, SpanGenerator, StrokeStyle};

#[test]
fn mask_of_frame() {
    let gen = SpanGenerator::new(SchedulerConfig::default().with_workers(1)).unwrap();
    let spans = gen.generate_stroke(Path::rect(4.0, 4.0, 10.0, 10.0), StrokeStyle::new(2.0))
        .wait()
        .unwrap();
    let img = mask::to_gray_image(&spans, 20, 20);
    assert_eq!(img.get_pixel(3, 3)[0], 255);
    assert_eq!(img.get_pixel(9, 4)[0], 255);
    assert_eq!(img.get_pixel(9, 9)[0], 0);
    assert_eq!(img.get_pixel(0, 0)[0], 0);
}

#[test]
fn mask_save_and_compare() {
    let gen = SpanGenerator::new(SchedulerConfig::default().with_workers(1)).unwrap();
    let spans = gen.generate_fill(Path::rect(2.5, 2.0, 6.0, 5.0), FillRule::NonZero)
        .wait()
        .unwrap();
    let file = std::env::temp_dir().join(format!("raster_rle_mask_{}.png", std::process::id()));
    mask::save(&spans, 12, 10, &file).unwrap();

    let read = image::open(&file).unwrap().to_luma8();
    std::fs::remove_file(&file).unwrap();
    let expected = mask::to_gray_image(&spans, 12, 10);
    assert_eq!(mask::mask_diff(&read, &expected), Some(0));
    assert_eq!(read.get_pixel(2, 3)[0], 128);
    assert_eq!(read.get_pixel(5, 3)[0], 255);
}
