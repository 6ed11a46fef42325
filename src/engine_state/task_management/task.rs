//! # Task System Core Traits
//!
//! A `Task` is a self-contained unit of work shipped to a worker thread. The
//! dispatcher only ever submits `SliceTask`s: a contiguous run of batch items
//! plus the shared per-item operation.
//!
//! ## Task Lifecycle
//! 1. `WorkDispatcher::run_batch` splits its items into slices
//! 2. Each slice becomes a boxed `SliceTask` on the shared queue
//! 3. A worker calls `process()`, which runs the operation on every item in turn
//! 4. Each item reports an `ItemOutcome` to the batch barrier
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - The operation is shared between slices behind an `Arc`, so it must be `Sync`

use std::{
    any::Any,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
};

use crossbeam_channel::Sender;

use super::barrier::ItemOutcome;

/// A unit of work executed on a worker thread.
///
/// Tasks own everything they touch and report results through channels they
/// carry, never through return values.
pub trait Task: Send {
    /// Runs the task to completion on the current worker thread.
    fn process(self: Box<Self>);
}

/// A contiguous slice of a batch.
pub(super) struct SliceTask<T, F> {
    /// Batch index of `items[0]`
    pub first_index: usize,
    pub items: Vec<T>,
    pub operation: Arc<F>,
    pub outcomes: Sender<ItemOutcome>,
}

impl<T, F> Task for SliceTask<T, F>
where
    T: Send,
    F: Fn(&T) + Send + Sync,
{
    fn process(self: Box<Self>) {
        let SliceTask {
            first_index,
            items,
            operation,
            outcomes,
        } = *self;

        for (offset, item) in items.into_iter().enumerate() {
            let result = catch_unwind(AssertUnwindSafe(|| operation(&item))).map_err(panic_message);
            // Items are released before reporting, so once the barrier opens no
            // worker still holds anything from the batch.
            drop(item);
            // A closed barrier means the submitter is gone; nothing left to report to.
            let _ = outcomes.send(ItemOutcome {
                index: first_index + offset,
                result,
            });
        }
    }
}

/// Extracts the human-readable part of a panic payload.
pub(super) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
