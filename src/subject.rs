pub mod behavior_subject;
pub mod publish_subject;
pub mod replay_subject;

use futures::task::Spawn;

use crate::{Disposable, Observable};

/// An observable that also accepts pushed values.
pub trait Subject {
    type Item: Clone + Send + Sync + 'static;

    /// Stores `value` and notifies every current observer with `(value, previous)`.
    fn update(&self, value: Self::Item);

    /// Same as [`update`](Self::update).
    fn on_next(&self, value: Self::Item) {
        self.update(value);
    }

    /// A subscribe-only view sharing this subject's registry and value.
    fn as_observable(&self) -> Observable<Self::Item>;

    fn subscribe<F>(&self, observer: F) -> Disposable
    where
        F: Fn(&Self::Item, Option<&Self::Item>) + Send + Sync + 'static,
    {
        self.as_observable().subscribe(observer)
    }

    fn subscribe_on<S, F>(&self, context: S, observer: F) -> Disposable
    where
        S: Spawn + Send + Sync + 'static,
        F: Fn(&Self::Item, Option<&Self::Item>) + Send + Sync + 'static,
    {
        self.as_observable().subscribe_on(context, observer)
    }

    fn remove_all_observers(&self) {
        self.as_observable().remove_all_observers();
    }
}
