//! Task Scheduler
//!
//! A fixed pool of workers, one queue per worker.  Tasks are submitted
//! round-robin; a worker takes from its own queue first and steals from
//! the others before blocking.

use crate::config::SchedulerConfig;
use crate::error::RasterResult;
use crate::queue::WorkerQueue;
use crate::task::{RasterRequest, RasterTask, SpanFuture, Worker};

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

type Queues = Arc<Vec<WorkerQueue<RasterTask>>>;

/// Raster Task Scheduler
///
/// Dropping the scheduler stops it: tasks already running complete, tasks
/// still queued are dropped and their futures resolve as canceled.
#[derive(Debug)]
pub struct Scheduler {
    queues: Queues,
    threads: Vec<JoinHandle<()>>,
    index: AtomicUsize,
}

impl Scheduler {
    /// Start the workers described by `config`
    pub fn new(config: SchedulerConfig) -> RasterResult<Self> {
        config.validate()?;
        let count = config.workers;
        let queues: Queues = Arc::new((0 .. count).map(|_| WorkerQueue::new()).collect());
        let mut scheduler = Self { queues, threads: Vec::with_capacity(count), index: AtomicUsize::new(0) };
        for i in 0 .. count {
            let queues = Arc::clone(&scheduler.queues);
            let rounds = config.steal_rounds;
            let handle = std::thread::Builder::new()
                .name(format!("{}-{}", config.thread_name, i))
                .spawn(move || run(i, &queues, rounds));
            match handle {
                Ok(handle) => scheduler.threads.push(handle),
                // Dropping the scheduler stops the workers already started
                Err(e) => return Err(e.into()),
            }
        }
        tracing::debug!(workers = count, steal_rounds = config.steal_rounds, "raster scheduler started");
        Ok(scheduler)
    }
    /// Number of workers
    pub fn workers(&self) -> usize {
        self.queues.len()
    }
    /// Queue a request, returning its future immediately
    pub fn submit(&self, request: RasterRequest) -> SpanFuture {
        let (task, future) = RasterTask::new(request);
        self.submit_task(task);
        future
    }
    /// Queue an already built task
    ///
    /// Queues are tried round-robin without blocking, falling back to a
    /// blocking push on the first one
    pub fn submit_task(&self, task: RasterTask) {
        let count = self.queues.len();
        let i = self.index.fetch_add(1, Ordering::Relaxed);
        let mut task = task;
        for n in 0 .. count {
            match self.queues[(i + n) % count].try_push(task) {
                Ok(()) => return,
                Err(t) => task = t,
            }
        }
        if let Err(task) = self.queues[i % count].push(task) {
            // Dropping the task cancels its future
            tracing::debug!("raster task submitted after shutdown");
            drop(task);
        }
    }
    /// Stop every worker and wait for them to finish
    ///
    /// Returns the number of queued tasks that were canceled
    pub fn shutdown(&mut self) -> usize {
        for q in self.queues.iter() {
            q.done();
        }
        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                tracing::debug!("raster worker panicked");
            }
        }
        let canceled: usize = self.queues.iter().map(|q| q.drain().len()).sum();
        tracing::debug!(canceled, "raster scheduler stopped");
        canceled
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if !self.threads.is_empty() {
            self.shutdown();
        }
    }
}

/// Worker loop for queue `i`
fn run(i: usize, queues: &[WorkerQueue<RasterTask>], steal_rounds: usize) {
    let count = queues.len();
    let mut worker = Worker::new();
    loop {
        let mut task = None;
        for n in 0 .. count * steal_rounds {
            task = queues[(i + n) % count].try_pop();
            if task.is_some() {
                break;
            }
        }
        let task = match task.or_else(|| queues[i].pop()) {
            Some(task) => task,
            None => break,
        };
        if !guarded(&mut worker, |w| task.run(w)) {
            tracing::debug!(worker = i, "raster task panicked");
        }
    }
    tracing::trace!(worker = i, "raster worker exit");
}

/// Run `job` on the worker state, keeping the worker alive if it panics
///
/// The state is rebuilt after a panic and `false` is returned.  Whatever
/// `job` owns is dropped while unwinding, so a task's future resolves as
/// canceled.
fn guarded<F: FnOnce(&mut Worker)>(worker: &mut Worker, job: F) -> bool {
    match std::panic::catch_unwind(AssertUnwindSafe(|| job(worker))) {
        Ok(()) => true,
        Err(_) => {
            *worker = Worker::new();
            false
        }
    }
}
