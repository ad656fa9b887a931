
//! Parallel antialiased path rasterization into coverage spans
//!
//! Paths are filled or stroked on a pool of worker threads; each request
//! returns a [`SpanFuture`] resolving to the [`CoverageSpans`] of the
//! shape.
//!
//! ```
//! use raster_rle::{FillRule, Path, SchedulerConfig, SpanGenerator, StrokeStyle};
//!
//! let gen = SpanGenerator::new(SchedulerConfig::default().with_workers(2)).unwrap();
//! let fill = gen.generate_fill(Path::rect(0.0, 0.0, 10.0, 10.0), FillRule::NonZero);
//! let stroke = gen.generate_stroke(Path::rect(0.0, 0.0, 10.0, 10.0), StrokeStyle::new(2.0));
//! assert_eq!(fill.wait().unwrap().coverage_at(5, 5), 255);
//! assert_eq!(stroke.wait().unwrap().coverage_at(5, 5), 0);
//! ```
//!
//! How does this work
//! ```text
//!    generate_fill / generate_stroke
//!      Scheduler::submit()       -- round robin over worker queues
//!  Worker
//!      try_pop()                 -- own queue, then steal
//!      pop()                     -- block on own queue
//!      FixedOutlineBuffer
//!        convert_path()          -- 26.6 points, tags, contours
//!        convert_stroke()
//!      Stroker                   -- stroke only
//!        parse_outline()
//!        export()
//!      Rasterizer::render()
//!        line()
//!         render_hline()
//!          set_curr_cell()
//!        sort_cells()
//!        sweep_scanline()        -- one batch of spans per scanline
//!      fulfil SpanFuture
//! ```

pub mod path;
pub mod clip;
pub mod cell;
pub mod outline;
pub mod stroke;
pub mod raster;
pub mod scan;
pub mod error;
pub mod config;
pub mod queue;
pub mod task;
pub mod scheduler;
pub mod generator;
pub mod mask;

pub use path::{Path, PathCommand, Point};
pub use clip::Rectangle;
pub use outline::*;
pub use stroke::*;
pub use raster::*;
pub use scan::*;
pub use error::*;
pub use config::*;
pub use queue::*;
pub use task::*;
pub use scheduler::*;
pub use generator::*;

const POLY_SUBPIXEL_SHIFT : i64 = 8;
const POLY_SUBPIXEL_SCALE : i64 = 1<<POLY_SUBPIXEL_SHIFT;
const POLY_SUBPIXEL_MASK  : i64 = POLY_SUBPIXEL_SCALE - 1;

/// Rasterize an outline into coverage spans
pub trait Rasterize {
    /// Discard any accumulated state
    fn reset(&mut self);
    /// Rasterize `outline`, calling `spans` with one batch per scanline
    ///
    /// Batches arrive top to bottom, spans within a batch left to right
    /// and disjoint
    fn render<F: FnMut(&[Span])>(&mut self, outline: &FixedOutline, spans: F);
}
