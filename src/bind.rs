use crate::{Disposable, Observable};

impl<T> Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Feeds every delivered value into `setter`, e.g. to mirror it into some external
    /// property. Replayed values are fed too, so a behavior subject sets it immediately.
    pub fn bind<F>(&self, setter: F) -> Disposable
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.subscribe(move |value, _| setter(value.clone()))
    }
}
