use std::fmt;

use parking_lot::Mutex;

use super::Disposable;

/// Owns any number of [`Disposable`]s and disposes them together, in insertion order,
/// when cleared or dropped.
#[derive(Default)]
pub struct DisposeBag {
    items: Mutex<Vec<Disposable>>,
}

impl DisposeBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, disposable: Disposable) {
        self.items.lock().push(disposable);
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Disposes every member. The bag stays usable afterwards.
    pub fn clear(&self) {
        // members are disposed outside the lock, a cleanup may insert into this bag again
        let items = std::mem::take(&mut *self.items.lock());

        tracing::trace!(count = items.len(), "clearing dispose bag");

        for item in items {
            item.dispose();
        }
    }
}

impl Drop for DisposeBag {
    fn drop(&mut self) {
        for item in self.items.get_mut().drain(..) {
            item.dispose();
        }
    }
}

impl Extend<Disposable> for DisposeBag {
    fn extend<I: IntoIterator<Item = Disposable>>(&mut self, iter: I) {
        self.items.get_mut().extend(iter);
    }
}

impl FromIterator<Disposable> for DisposeBag {
    fn from_iter<I: IntoIterator<Item = Disposable>>(iter: I) -> Self {
        Self {
            items: Mutex::new(iter.into_iter().collect()),
        }
    }
}

impl fmt::Debug for DisposeBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisposeBag").field("len", &self.len()).finish()
    }
}
