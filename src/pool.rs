//! Thread Pool (SPEC_FULL.md §4.13 / §5): a single process-wide priority
//! work queue consumed by worker threads. Workers sleep on a condition
//! variable when the queue is empty and suspend only there; once a task
//! starts it runs to completion barring cooperative cancellation checked by
//! the task itself.

use parking_lot::{Condvar, Mutex};
use std::collections::BinaryHeap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

struct QueuedTask {
    priority: i64,
    id: TaskId,
    job: Box<dyn FnOnce() + Send>,
}

impl PartialEq for QueuedTask {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}
impl Eq for QueuedTask {}
impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // BinaryHeap is a max-heap: the highest priority value runs first.
        self.priority.cmp(&other.priority)
    }
}

struct Shared {
    queue: Mutex<BinaryHeap<QueuedTask>>,
    cv: Condvar,
    shutdown: AtomicBool,
    next_id: AtomicU64,
}

/// A process-wide thread pool with a priority queue. Closer chunks preempt
/// farther ones by submitting with a higher `priority` (SPEC_FULL.md §5:
/// "priority derived from squared distance to the player chunk").
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// `worker_count` should already be resolved (half of hardware
    /// concurrency, minimum 1 — see `config::PoolConfig::resolved_worker_count`).
    pub fn new(worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);
        let shared = Arc::new(Shared {
            queue: Mutex::new(BinaryHeap::new()),
            cv: Condvar::new(),
            shutdown: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
        });

        let workers = (0..worker_count)
            .map(|idx| {
                let shared = shared.clone();
                std::thread::Builder::new()
                    .name(format!("voxcore-worker-{idx}"))
                    .spawn(move || worker_loop(shared))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Self { shared, workers }
    }

    /// Submits a task. Higher `priority` runs sooner; callers typically pass
    /// `i64::MAX - distance_squared` so that nearer chunks preempt farther
    /// ones.
    pub fn submit(&self, priority: i64, job: impl FnOnce() + Send + 'static) -> TaskId {
        let id = TaskId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        let mut queue = self.shared.queue.lock();
        queue.push(QueuedTask {
            priority,
            id,
            job: Box::new(job),
        });
        drop(queue);
        self.shared.cv.notify_one();
        id
    }

    pub fn queue_len(&self) -> usize {
        self.shared.queue.lock().len()
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        let job = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(task) = queue.pop() {
                    break Some(task.job);
                }
                if shared.shutdown.load(Ordering::Acquire) {
                    break None;
                }
                shared.cv.wait(&mut queue);
            }
        };

        let Some(job) = job else { break };

        // SPEC_FULL.md §7: a mesh/terrain exception inside a task is caught
        // at the task boundary and treated as cancellation, never
        // propagated across the thread boundary.
        if let Err(panic) = catch_unwind(AssertUnwindSafe(job)) {
            log::error!("worker task panicked, discarding output: {:?}", panic_message(&panic));
        }
    }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        self.shared.cv.notify_all();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
