use std::sync::Arc;

use futures::task::{Spawn, SpawnExt};

/// Where an observer wants to be called.
///
/// Any [`Spawn`] works, e.g. `futures::executor::ThreadPool`. Each notification is spawned
/// as its own task and the updating call returns without waiting for it, so a subscription
/// disposed after an update may still see that update on its context.
pub(crate) type ExecutionContext = Arc<dyn Spawn + Send + Sync + 'static>;

pub(crate) type Observer<T> = Arc<dyn Fn(&T, Option<&T>) + Send + Sync + 'static>;

pub(crate) fn dispatch<T>(
    observer: &Observer<T>,
    context: Option<&ExecutionContext>,
    value: &T,
    old_value: Option<&T>,
) where
    T: Clone + Send + Sync + 'static,
{
    let Some(context) = context else {
        observer(value, old_value);
        return;
    };

    let observer = Arc::clone(observer);
    let value = value.clone();
    let old_value = old_value.cloned();

    if let Err(err) = context.spawn(async move { observer(&value, old_value.as_ref()) }) {
        tracing::warn!(%err, "execution context refused a notification, dropping it");
    }
}
