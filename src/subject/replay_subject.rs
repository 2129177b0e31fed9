use std::collections::VecDeque;

use crate::{
    observable::registry::{Core, Kind},
    Observable,
};

use super::Subject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReplayStrategy {
    BufferSize(usize),
    Unbounded,
}

/// Buffers pushed values and replays them, oldest first, to every new subscriber before
/// live updates.
pub struct ReplaySubject<T> {
    inner: Observable<T>,
}

impl<T> Clone for ReplaySubject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Subject for ReplaySubject<T>
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

impl<T> ReplaySubject<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Keeps the last `size` values, dropping the oldest on overflow.
    pub fn buffer_size(size: usize) -> Self {
        Self::with_strategy(ReplayStrategy::BufferSize(size), None)
    }

    /// Keeps every value ever pushed.
    pub fn unbounded() -> Self {
        Self::with_strategy(ReplayStrategy::Unbounded, None)
    }

    /// `on_dispose` runs every time one of this subject's subscriptions is disposed.
    pub fn with_dispose_hook<F>(size: usize, on_dispose: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::with_strategy(ReplayStrategy::BufferSize(size), Some(Box::new(on_dispose)))
    }

    fn with_strategy(
        strategy: ReplayStrategy,
        on_dispose: Option<crate::observable::registry::DisposeHook>,
    ) -> Self {
        let kind = Kind::Replay {
            buffer: VecDeque::new(),
            strategy,
            last: None,
        };

        Self {
            inner: Observable::new(Core::new(kind, on_dispose)),
        }
    }

    /// The buffered values, oldest first.
    pub fn values(&self) -> Vec<T> {
        self.inner.core.buffered()
    }

    /// The latest pushed value, even if it no longer fits the buffer.
    pub fn value(&self) -> Option<T> {
        self.inner.core.latest()
    }
}
