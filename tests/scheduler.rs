
use raster_rle::{FillRule, Path, RasterError, RasterRequest, Scheduler, SchedulerConfig,
                 SpanGenerator, StrokeStyle};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn concurrent_submitters() {
    init_logging();
    let scheduler = Arc::new(Scheduler::new(SchedulerConfig::default().with_workers(3)).unwrap());
    let gen = SpanGenerator::with_scheduler(Arc::clone(&scheduler));
    let handles: Vec<_> = (0 .. 4).map(|t| {
        let gen = gen.clone();
        thread::spawn(move || {
            let futures: Vec<_> = (1 ..= 25u64)
                .map(|n| (n, gen.generate_fill(Path::rect(t as f64, 0.0, n as f64, n as f64),
                                               FillRule::NonZero)))
                .collect();
            for (n, f) in futures {
                let spans = f.wait().unwrap();
                assert_eq!(spans.area(), n * n * 255);
                assert_eq!(spans.len() as u64, n);
                assert!(spans.iter().all(|s| s.x == t));
            }
        })
    }).collect();
    for h in handles {
        h.join().unwrap();
    }
}

#[test]
fn fill_and_stroke_interleaved() {
    let gen = SpanGenerator::new(SchedulerConfig::default().with_workers(2)).unwrap();
    let mut fills = Vec::new();
    let mut strokes = Vec::new();
    for _ in 0 .. 20 {
        fills.push(gen.generate_fill(Path::rect(0.0, 0.0, 10.0, 10.0), FillRule::EvenOdd));
        strokes.push(gen.generate_stroke(Path::rect(0.0, 0.0, 10.0, 10.0), StrokeStyle::new(2.0)));
    }
    for f in fills {
        assert_eq!(f.wait().unwrap().area(), 100 * 255);
    }
    for s in strokes {
        assert_eq!(s.wait().unwrap().area(), 80 * 255);
    }
}

#[test]
fn shutdown_cancels_queued_tasks() {
    init_logging();
    let config = SchedulerConfig::default().with_workers(1).with_steal_rounds(1);
    let mut scheduler = Scheduler::new(config).unwrap();
    let futures: Vec<_> = (0 .. 200).map(|_| {
        let request = RasterRequest::Stroke {
            path: Path::rect(0.0, 0.0, 400.0, 400.0),
            style: StrokeStyle::new(3.0),
        };
        scheduler.submit(request)
    }).collect();
    let canceled = scheduler.shutdown();

    let mut done = 0;
    let mut dropped = 0;
    for f in futures {
        match f.wait_timeout(Duration::from_secs(10)) {
            Ok(spans) => {
                assert!(!spans.is_empty());
                done += 1;
            },
            Err(RasterError::Canceled) => dropped += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    assert_eq!(dropped, canceled);
    assert_eq!(done + dropped, 200);
}

#[test]
fn drop_waits_for_running_tasks() {
    let gen = SpanGenerator::new(SchedulerConfig::default().with_workers(2)).unwrap();
    let futures: Vec<_> = (0 .. 10)
        .map(|_| gen.generate_fill(Path::rect(0.0, 0.0, 50.0, 50.0), FillRule::NonZero))
        .collect();
    drop(gen);
    for f in futures {
        match f.wait() {
            Ok(spans) => assert_eq!(spans.area(), 2500 * 255),
            Err(e) => assert!(matches!(e, RasterError::Canceled)),
        }
    }
}

#[test]
fn dropped_future_does_not_stall_worker() {
    let gen = SpanGenerator::new(SchedulerConfig::default().with_workers(1)).unwrap();
    for _ in 0 .. 10 {
        drop(gen.generate_fill(Path::rect(0.0, 0.0, 8.0, 8.0), FillRule::NonZero));
    }
    let spans = gen.generate_fill(Path::rect(0.0, 0.0, 2.0, 2.0), FillRule::NonZero)
        .wait()
        .unwrap();
    assert_eq!(spans.area(), 4 * 255);
}

#[test]
fn env_config() {
    let config = SchedulerConfig::from_env();
    assert!(config.validate().is_ok());
    let scheduler = Scheduler::new(config.clone()).unwrap();
    assert_eq!(scheduler.workers(), config.workers);
}
