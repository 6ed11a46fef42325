use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted chunk handle with read-write locking.
///
/// `MtResource` is how a chunk owned by the grid is lent to worker threads for the
/// duration of one batch. It uses an `Arc<RwLock<T>>` internally; the grid keeps the
/// only long-lived handle, and worker tasks drop their clones before the batch barrier
/// releases the controller thread.
///
/// # Examples
///
/// ```ignore
/// let counter = MtResource::new(0);
/// let worker_handle = counter.clone();
///
/// std::thread::spawn(move || *worker_handle.get_mut() += 1)
///     .join()
///     .unwrap();
///
/// assert_eq!(*counter.get(), 1);
/// ```
///
/// # Performance Considerations
/// - Read operations (`get()`) can occur concurrently
/// - Write operations (`get_mut()`) are exclusive and will block other operations
/// - Within a batch every chunk is written by exactly one task, so locks are uncontended
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read-only guard that allows reading the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned, i.e. a task panicked while writing to it.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap()
    }

    /// Returns a mutable guard that allows modifying the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned, i.e. a task panicked while writing to it.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap()
    }

    /// Whether a writer panicked while holding the lock.
    pub fn is_poisoned(&self) -> bool {
        self.resource.is_poisoned()
    }

    /// Number of live handles to this resource, including `self`.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.resource)
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_value() {
        let resource = MtResource::new(1u32);
        let other = resource.clone();
        *other.get_mut() += 1;
        assert_eq!(*resource.get(), 2);
        assert_eq!(resource.handle_count(), 2);
        drop(other);
        assert_eq!(resource.handle_count(), 1);
    }

    #[test]
    fn panicking_writer_poisons_the_lock() {
        let resource = MtResource::new(0u32);
        let writer = resource.clone();
        let result = std::thread::spawn(move || {
            let _guard = writer.get_mut();
            panic!("writer failed");
        })
        .join();
        assert!(result.is_err());
        assert!(resource.is_poisoned());
    }
}
