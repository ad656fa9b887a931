//! Raster Tasks
//!
//! A task bundles one fill or stroke request with the sending half of a
//! single-shot channel.  The receiving half, a [`SpanFuture`], goes back to
//! the caller.

use crate::error::{RasterError, RasterResult};
use crate::outline::FixedOutlineBuffer;
use crate::path::Path;
use crate::raster::{FillRule, Rasterizer};
use crate::scan::CoverageSpans;
use crate::stroke::{StrokeStyle, Stroker};
use crate::Rasterize;

use std::sync::mpsc::{sync_channel, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::time::Duration;

/// What to rasterize
#[derive(Debug,Clone,PartialEq)]
pub enum RasterRequest {
    Fill { path: Path, rule: FillRule },
    Stroke { path: Path, style: StrokeStyle },
}

impl RasterRequest {
    pub fn path(&self) -> &Path {
        match self {
            RasterRequest::Fill { path, .. } => path,
            RasterRequest::Stroke { path, .. } => path,
        }
    }
    pub fn is_stroke(&self) -> bool {
        matches!(self, RasterRequest::Stroke { .. })
    }
}

/// Per-thread state used to execute tasks
///
/// Built once per worker and reused for every task it runs
#[derive(Debug,Default)]
pub struct Worker {
    pub outline: FixedOutlineBuffer,
    pub stroker: Stroker,
    pub rasterizer: Rasterizer,
}

impl Worker {
    pub fn new() -> Self {
        Self::default()
    }
    /// Rasterize a request into `spans`
    #[tracing::instrument(level = "trace", skip_all, fields(stroke = request.is_stroke()))]
    pub fn execute(&mut self, request: &RasterRequest, spans: &mut CoverageSpans) {
        match request {
            RasterRequest::Fill { path, rule } => {
                self.outline.convert_path(path);
                self.outline.outline.fill_rule = *rule;
            },
            RasterRequest::Stroke { path, style } => {
                self.outline.convert_path(path);
                let params = self.outline.convert_stroke(style);
                self.stroker.set(params.radius, params.cap, params.join, params.miter_limit);
                self.stroker.parse_outline(&self.outline.outline, !params.closed);
                let (points, contours) = self.stroker.counts();
                self.outline.grow(points, contours);
                self.stroker.export(&mut self.outline.outline);
            },
        }
        self.rasterizer.render(&self.outline.outline, |batch| spans.add_spans(batch));
    }
}

/// One rasterization request and the promise fulfilled with its spans
#[derive(Debug)]
pub struct RasterTask {
    request: RasterRequest,
    sender: SyncSender<CoverageSpans>,
}

impl RasterTask {
    /// Create a task and the future receiving its spans
    pub fn new(request: RasterRequest) -> (Self, SpanFuture) {
        let (sender, receiver) = sync_channel(1);
        (Self { request, sender }, SpanFuture { receiver })
    }
    pub fn fill(path: Path, rule: FillRule) -> (Self, SpanFuture) {
        Self::new(RasterRequest::Fill { path, rule })
    }
    pub fn stroke(path: Path, style: StrokeStyle) -> (Self, SpanFuture) {
        Self::new(RasterRequest::Stroke { path, style })
    }
    /// Execute the task and fulfil its promise, consuming the task
    pub fn run(self, worker: &mut Worker) {
        let mut spans = CoverageSpans::new();
        worker.execute(&self.request, &mut spans);
        tracing::trace!(stroke = self.request.is_stroke(), spans = spans.len(), "task done");
        // The caller may have dropped the future, nobody is waiting then
        let _ = self.sender.send(spans);
    }
}

/// Receiving half of a task's promise
///
/// Resolves exactly once.  A task dropped without running, for example
/// when the scheduler shuts down first, resolves as
/// [`RasterError::Canceled`].
#[derive(Debug)]
pub struct SpanFuture {
    receiver: Receiver<CoverageSpans>,
}

impl SpanFuture {
    /// A future that is already resolved with `spans`
    pub fn ready(spans: CoverageSpans) -> Self {
        let (sender, receiver) = sync_channel(1);
        // Capacity one, the send cannot block or fail
        let _ = sender.send(spans);
        Self { receiver }
    }
    /// Block until the spans are available
    pub fn wait(self) -> RasterResult<CoverageSpans> {
        self.receiver.recv().map_err(|_| RasterError::Canceled)
    }
    /// Block for at most `timeout`
    pub fn wait_timeout(&self, timeout: Duration) -> RasterResult<CoverageSpans> {
        self.receiver.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => RasterError::Timeout,
            RecvTimeoutError::Disconnected => RasterError::Canceled,
        })
    }
    /// Take the spans if they are available, without blocking
    pub fn try_get(&self) -> Option<RasterResult<CoverageSpans>> {
        match self.receiver.try_recv() {
            Ok(spans) => Some(Ok(spans)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(RasterError::Canceled)),
        }
    }
}
