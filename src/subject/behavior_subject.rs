use crate::{
    observable::registry::{Core, Kind},
    Observable,
};

use super::Subject;

/// Holds a current value at all times and hands it to every new subscriber.
pub struct BehaviorSubject<T> {
    inner: Observable<T>,
}

/// A [`BehaviorSubject`] used as a plain observable variable.
pub type Variable<T> = BehaviorSubject<T>;

impl<T> Clone for BehaviorSubject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Subject for BehaviorSubject<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;

    fn update(&self, value: Self::Item) {
        self.inner.core.update(value);
    }

    fn as_observable(&self) -> Observable<Self::Item> {
        self.inner.clone()
    }
}

impl<T> BehaviorSubject<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(value: T) -> Self {
        Self {
            inner: Observable::new(Core::new(Kind::Behavior(value), None)),
        }
    }

    /// `on_dispose` runs every time one of this subject's subscriptions is disposed.
    pub fn with_dispose_hook<F>(value: T, on_dispose: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            inner: Observable::new(Core::new(Kind::Behavior(value), Some(Box::new(on_dispose)))),
        }
    }

    pub fn value(&self) -> T {
        self.inner.value()
    }

    /// Same as [`update`](Subject::update).
    pub fn set(&self, value: T) {
        self.update(value);
    }
}

impl<T> Default for BehaviorSubject<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}
