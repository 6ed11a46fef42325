use crossbeam_channel::Receiver;

use crate::engine_state::error::{DispatchError, TaskFailure};

/// Completion report for one batch item.
#[derive(Debug)]
pub(super) struct ItemOutcome {
    pub index: usize,
    pub result: Result<(), String>,
}

/// Countdown barrier for a single batch.
///
/// Waits for exactly one outcome per item, then folds the failures into one result.
pub(super) struct BatchBarrier {
    outcomes: Receiver<ItemOutcome>,
    remaining: usize,
}

impl BatchBarrier {
    pub fn new(outcomes: Receiver<ItemOutcome>, item_count: usize) -> Self {
        BatchBarrier {
            outcomes,
            remaining: item_count,
        }
    }

    /// Blocks until every item has reported.
    pub fn wait(mut self) -> Result<(), DispatchError> {
        let mut failures = Vec::new();
        while self.remaining > 0 {
            let outcome = self.outcomes.recv().map_err(|_| DispatchError::Disconnected)?;
            self.remaining -= 1;
            if let Err(message) = outcome.result {
                failures.push(TaskFailure {
                    index: outcome.index,
                    message,
                });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            failures.sort_by_key(|failure| failure.index);
            Err(DispatchError::TasksFailed { failures })
        }
    }
}
