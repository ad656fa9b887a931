//! Span Generator
//!
//! Front door of the crate: turn a path into a [`SpanFuture`] without
//! blocking.
//!
//! ```
//! use raster_rle::{generate_fill, FillRule, Path};
//!
//! let spans = generate_fill(Path::rect(0.0, 0.0, 4.0, 2.0), FillRule::NonZero)
//!     .wait()
//!     .unwrap();
//! assert_eq!(spans.len(), 2);
//! assert_eq!(spans.coverage_at(3, 1), 255);
//! ```

use crate::config::SchedulerConfig;
use crate::error::RasterResult;
use crate::path::Path;
use crate::raster::FillRule;
use crate::scan::CoverageSpans;
use crate::scheduler::Scheduler;
use crate::stroke::StrokeStyle;
use crate::task::{RasterRequest, SpanFuture};

use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<SpanGenerator> = OnceLock::new();

/// Submits fill and stroke requests to a [`Scheduler`]
///
/// Cheap to clone, clones share the scheduler
#[derive(Debug,Clone)]
pub struct SpanGenerator {
    scheduler: Arc<Scheduler>,
}

impl SpanGenerator {
    /// Start a generator with its own scheduler
    pub fn new(config: SchedulerConfig) -> RasterResult<Self> {
        Ok(Self::with_scheduler(Arc::new(Scheduler::new(config)?)))
    }
    /// Use an existing scheduler
    pub fn with_scheduler(scheduler: Arc<Scheduler>) -> Self {
        Self { scheduler }
    }
    /// Process wide generator, started on first use
    ///
    /// Configured from the environment, see [`SchedulerConfig::from_env`].
    /// Falls back to a single worker when the configured pool cannot be
    /// started.
    pub fn global() -> &'static SpanGenerator {
        GLOBAL.get_or_init(|| {
            let config = SchedulerConfig::from_env();
            match Self::new(config.clone()) {
                Ok(g) => g,
                Err(e) => {
                    tracing::debug!(error = %e, workers = config.workers,
                                    "raster scheduler failed, using one worker");
                    let fallback = SchedulerConfig::default().with_workers(1);
                    match Self::new(fallback) {
                        Ok(g) => g,
                        Err(e) => panic!("unable to start raster worker: {e}"),
                    }
                }
            }
        })
    }
    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }
    /// Fill `path` using `rule`
    pub fn generate_fill(&self, path: Path, rule: FillRule) -> SpanFuture {
        self.generate(RasterRequest::Fill { path, rule })
    }
    /// Stroke `path` using `style`
    pub fn generate_stroke(&self, path: Path, style: StrokeStyle) -> SpanFuture {
        self.generate(RasterRequest::Stroke { path, style })
    }
    fn generate(&self, request: RasterRequest) -> SpanFuture {
        if request.path().is_empty() {
            return SpanFuture::ready(CoverageSpans::new());
        }
        self.scheduler.submit(request)
    }
}

/// Fill `path` on the process wide generator
pub fn generate_fill(path: Path, rule: FillRule) -> SpanFuture {
    SpanGenerator::global().generate_fill(path, rule)
}

/// Stroke `path` on the process wide generator
pub fn generate_stroke(path: Path, style: StrokeStyle) -> SpanFuture {
    SpanGenerator::global().generate_stroke(path, style)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_ready() {
        let g = SpanGenerator::new(SchedulerConfig::default().with_workers(1)).unwrap();
        let f = g.generate_fill(Path::new(), FillRule::EvenOdd);
        assert!(f.try_get().unwrap().unwrap().is_empty());
        let f = g.generate_stroke(Path::new(), StrokeStyle::default());
        assert!(f.try_get().unwrap().unwrap().is_empty());
    }

    #[test]
    fn clones_share_scheduler() {
        let g = SpanGenerator::new(SchedulerConfig::default().with_workers(2)).unwrap();
        let h = g.clone();
        assert!(Arc::ptr_eq(g.scheduler(), h.scheduler()));
        let a = g.generate_fill(Path::rect(0.0, 0.0, 3.0, 3.0), FillRule::NonZero);
        let b = h.generate_fill(Path::rect(0.0, 0.0, 2.0, 2.0), FillRule::NonZero);
        assert_eq!(a.wait().unwrap().area(), 9 * 255);
        assert_eq!(b.wait().unwrap().area(), 4 * 255);
    }

    #[test]
    fn global_generator_is_shared() {
        let a = SpanGenerator::global() as *const SpanGenerator;
        let b = SpanGenerator::global() as *const SpanGenerator;
        assert_eq!(a, b);
        assert!(SpanGenerator::global().scheduler().workers() >= 1);
    }
}
