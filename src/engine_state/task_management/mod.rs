//! # Task Management System
//!
//! A fixed pool of worker threads draining one shared task queue, driven in
//! fan-out/join batches.
//!
//! ## Architecture Overview
//! - `WorkDispatcher`: owns the workers and the sending side of the queue
//! - `Task`: a unit of work a worker can run
//! - `SliceTask`: a contiguous run of batch items sharing one operation
//! - `BatchBarrier`: counts per-item completions for the submitting thread
//!
//! ## Batch Lifecycle
//! 1. `run_batch` partitions N items into at most `worker_count` contiguous slices
//! 2. One `SliceTask` per slice is pushed onto the queue
//! 3. Workers run the operation over each item of their slice in order
//! 4. Every item reports success or its panic message to the barrier
//! 5. The submitter blocks until all N items reported, then gets one result
//!
//! ## Fault Isolation
//! Each item runs under `catch_unwind`. A panicking item does not take down its
//! worker or its slice; the rest of the batch still runs and the failures come
//! back together as `DispatchError::TasksFailed`.
//!
//! ## Example Usage
//! ```ignore
//! let dispatcher = WorkDispatcher::new(None);
//! dispatcher.run_batch(chunks, |chunk| chunk.get_mut().generate_blocks(&generator))?;
//! ```

mod barrier;
pub mod task;

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use crossbeam_channel::{bounded, unbounded, Sender};
use log::{debug, info};

use barrier::BatchBarrier;
use task::{SliceTask, Task};

use super::error::DispatchError;

/// Fixed-size worker pool with batch fan-out and join.
pub struct WorkDispatcher {
    task_sender: Option<Sender<Box<dyn Task>>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkDispatcher {
    /// Starts `worker_count` workers, or one per available hardware thread when `None`.
    /// Always starts at least one.
    pub fn new(worker_count: Option<usize>) -> Self {
        let worker_count = worker_count
            .unwrap_or_else(|| thread::available_parallelism().map_or(1, usize::from))
            .max(1);

        let (task_sender, task_receiver) = unbounded::<Box<dyn Task>>();

        let workers = (0..worker_count)
            .map(|_| {
                let task_receiver = task_receiver.clone();
                thread::spawn(move || {
                    while let Ok(task) = task_receiver.recv() {
                        task.process();
                    }
                })
            })
            .collect();

        info!("Started work dispatcher with {worker_count} worker(s)");

        WorkDispatcher {
            task_sender: Some(task_sender),
            workers,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Runs `operation` once for every item across the pool and blocks until all are done.
    ///
    /// Items are split into contiguous slices, one per worker at most. Within a
    /// slice, items run in order on one thread.
    ///
    /// # Errors
    /// `TasksFailed` listing every item whose operation panicked, after the whole
    /// batch has finished. `Disconnected` if the pool is gone.
    pub fn run_batch<T, F>(&self, items: Vec<T>, operation: F) -> Result<(), DispatchError>
    where
        T: Send + 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        let item_count = items.len();
        if item_count == 0 {
            return Ok(());
        }

        let task_sender = self.task_sender.as_ref().ok_or(DispatchError::Disconnected)?;
        let slice_count = self.workers.len().min(item_count);
        let slice_len = item_count.div_ceil(slice_count);

        let (outcome_sender, outcome_receiver) = bounded(item_count);
        let barrier = BatchBarrier::new(outcome_receiver, item_count);
        let operation = Arc::new(operation);

        let mut items = items.into_iter();
        let mut first_index = 0;
        while first_index < item_count {
            let slice: Vec<T> = items.by_ref().take(slice_len).collect();
            let len = slice.len();
            let task = SliceTask {
                first_index,
                items: slice,
                operation: Arc::clone(&operation),
                outcomes: outcome_sender.clone(),
            };
            task_sender
                .send(Box::new(task))
                .map_err(|_| DispatchError::Disconnected)?;
            first_index += len;
        }
        // Only the tasks hold senders now; if they all die the barrier disconnects.
        drop(outcome_sender);

        debug!("Dispatched {item_count} item(s) in {slice_count} slice(s) of up to {slice_len}");
        barrier.wait()
    }
}

impl Drop for WorkDispatcher {
    fn drop(&mut self) {
        // Closing the queue ends each worker's receive loop.
        self.task_sender.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
        info!("Stopped work dispatcher");
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    use crate::engine_state::error::TaskFailure;

    use super::*;

    #[test]
    fn runs_every_item_exactly_once() {
        let dispatcher = WorkDispatcher::new(Some(4));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        dispatcher
            .run_batch((0..103).collect(), move |item: &usize| sink.lock().unwrap().push(*item))
            .unwrap();

        let mut seen = seen.lock().unwrap().clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..103).collect::<Vec<_>>());
    }

    #[test]
    fn slices_never_outnumber_workers() {
        let dispatcher = WorkDispatcher::new(Some(3));
        let threads = Arc::new(Mutex::new(HashSet::new()));
        let sink = Arc::clone(&threads);

        dispatcher
            .run_batch((0..50).collect::<Vec<u32>>(), move |_| {
                sink.lock().unwrap().insert(thread::current().id());
            })
            .unwrap();

        let used = threads.lock().unwrap().len();
        assert!((1..=3).contains(&used));
        assert_eq!(dispatcher.worker_count(), 3);
    }

    #[test]
    fn empty_batch_returns_immediately() {
        let dispatcher = WorkDispatcher::new(Some(2));
        assert_eq!(dispatcher.run_batch(Vec::<u8>::new(), |_| unreachable!()), Ok(()));
    }

    #[test]
    fn zero_workers_is_raised_to_one() {
        let dispatcher = WorkDispatcher::new(Some(0));
        assert_eq!(dispatcher.worker_count(), 1);
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        dispatcher
            .run_batch(vec![(); 10], move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn panicking_items_are_reported_and_the_rest_still_run() {
        let dispatcher = WorkDispatcher::new(Some(2));
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);

        let result = dispatcher.run_batch((0..20).collect::<Vec<usize>>(), move |item| {
            if item % 7 == 3 {
                panic!("item {item} exploded");
            }
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(
            result,
            Err(DispatchError::TasksFailed {
                failures: vec![
                    TaskFailure {
                        index: 3,
                        message: "item 3 exploded".to_string()
                    },
                    TaskFailure {
                        index: 10,
                        message: "item 10 exploded".to_string()
                    },
                    TaskFailure {
                        index: 17,
                        message: "item 17 exploded".to_string()
                    },
                ]
            })
        );
        assert_eq!(count.load(Ordering::SeqCst), 17);

        // The pool survives and serves the next batch.
        assert_eq!(dispatcher.run_batch(vec![1, 2, 3], |_| {}), Ok(()));
    }
}
