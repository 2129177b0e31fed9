pub(crate) mod context;
pub(crate) mod registry;

use std::{fmt, sync::Arc};

use futures::task::Spawn;

use self::registry::Core;
use crate::Disposable;

/// A read-oriented handle onto a subject.
///
/// Clones share the same registry and value, there is no independent identity.
/// Obtained from [`Subject::as_observable`](crate::Subject::as_observable) so that
/// holders can subscribe but not push values.
pub struct Observable<T> {
    pub(crate) core: Arc<Core<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T> Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(core: Arc<Core<T>>) -> Self {
        Self { core }
    }

    /// Registers `observer`, called with `(new_value, old_value)` on every update.
    ///
    /// If the subject replays (behavior or replay flavour), `observer` is called with the
    /// replayed values, `old_value` being `None`, before this returns.
    /// The subscription lasts until the returned [`Disposable`] is disposed or dropped.
    pub fn subscribe<F>(&self, observer: F) -> Disposable
    where
        F: Fn(&T, Option<&T>) + Send + Sync + 'static,
    {
        self.core.subscribe(Arc::new(observer), None)
    }

    /// Like [`subscribe`](Self::subscribe), but live updates are delivered by spawning onto
    /// `context` instead of being called in place.
    ///
    /// Replayed values are still delivered synchronously. Delivery is fire-and-forget:
    /// disposing after an update has been spawned does not cancel that delivery, and
    /// notifications spawned for different updates may run in any order the context picks.
    pub fn subscribe_on<S, F>(&self, context: S, observer: F) -> Disposable
    where
        S: Spawn + Send + Sync + 'static,
        F: Fn(&T, Option<&T>) + Send + Sync + 'static,
    {
        self.core.subscribe(Arc::new(observer), Some(Arc::new(context)))
    }

    /// Drops all registrations at once. The dispose hook does not run, and disposing the
    /// handles of the removed subscriptions afterwards does nothing.
    pub fn remove_all_observers(&self) {
        self.core.remove_all_observers();
    }

    pub fn observer_count(&self) -> usize {
        self.core.observer_count()
    }

    /// The current value of the underlying subject.
    ///
    /// # Panics
    ///
    /// Panics unless the subject always holds a value, i.e. it is a
    /// [`BehaviorSubject`](crate::BehaviorSubject). Publish and replay subjects expose their
    /// optional values on the subject type itself.
    pub fn value(&self) -> T {
        match self.core.current() {
            Some(value) => value,
            None => panic!(
                "Observable::value called on an observable without a current value; \
                 only a BehaviorSubject can be read without subscribing"
            ),
        }
    }
}

impl<T> fmt::Debug for Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.observer_count())
            .finish()
    }
}
