use crate::{
    observable::registry::{Core, Kind},
    Observable,
};

use super::Subject;

/// Emits only the values pushed after a subscription was made.
pub struct PublishSubject<T> {
    inner: Observable<T>,
}

impl<T> Clone for PublishSubject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Subject for PublishSubject<T>
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

impl<T> PublishSubject<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Observable::new(Core::new(Kind::Publish(None), None)),
        }
    }

    /// `on_dispose` runs every time one of this subject's subscriptions is disposed.
    pub fn with_dispose_hook<F>(on_dispose: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            inner: Observable::new(Core::new(Kind::Publish(None), Some(Box::new(on_dispose)))),
        }
    }

    /// The latest pushed value, `None` before the first update.
    pub fn value(&self) -> Option<T> {
        self.inner.core.latest()
    }
}

impl<T> Default for PublishSubject<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
