pub mod dispose_bag;

use std::fmt;

use parking_lot::Mutex;

pub use dispose_bag::DisposeBag;

type Cleanup = Box<dyn FnOnce() + Send + 'static>;

/// A one-shot cancellation handle.
///
/// The cleanup action runs exactly once: on the first call to [`Disposable::dispose`],
/// or when the handle is dropped if it was never disposed explicitly.
/// Dropping the handle returned by a `subscribe` call therefore ends that subscription.
#[must_use = "dropping a Disposable runs its cleanup immediately"]
pub struct Disposable {
    cleanup: Mutex<Option<Cleanup>>,
}

impl Disposable {
    pub fn new<F>(cleanup: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            cleanup: Mutex::new(Some(Box::new(cleanup))),
        }
    }

    /// A handle with nothing to clean up, already considered disposed.
    pub fn empty() -> Self {
        Self {
            cleanup: Mutex::new(None),
        }
    }

    /// Runs the cleanup action if it has not run yet. Further calls are no-ops.
    pub fn dispose(&self) {
        // take under the lock, run outside of it so cleanup may touch this handle's owners
        let cleanup = self.cleanup.lock().take();

        if let Some(cleanup) = cleanup {
            cleanup();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.cleanup.lock().is_none()
    }

    /// Moves this handle into `bag`, which disposes it when cleared or dropped.
    pub fn disposed_by(self, bag: &DisposeBag) {
        bag.insert(self);
    }
}

impl Drop for Disposable {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.get_mut().take() {
            cleanup();
        }
    }
}

impl fmt::Debug for Disposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
