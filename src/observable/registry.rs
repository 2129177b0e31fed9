use std::{
    cell::RefCell,
    collections::{BTreeMap, VecDeque},
    fmt,
    sync::{Arc, Weak},
};

use parking_lot::ReentrantMutex;

use super::context::{dispatch, ExecutionContext, Observer};
use crate::{subject::replay_subject::ReplayStrategy, Disposable};

pub(crate) type DisposeHook = Box<dyn Fn() + Send + Sync + 'static>;

/// Identifies one registration on one observable. Never reused by that observable.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The value held by a subject, tagged by how it replays to new subscribers.
pub(crate) enum Kind<T> {
    /// Latest value, if any; never replayed.
    Publish(Option<T>),
    /// Always present, replayed to every new subscriber.
    Behavior(T),
    /// Last emitted values, oldest first, bounded according to `strategy`.
    Replay {
        buffer: VecDeque<T>,
        strategy: ReplayStrategy,
        last: Option<T>,
    },
}

impl<T: Clone> Kind<T> {
    /// Stores `value`, returning the previously emitted one and any values evicted from
    /// the replay buffer. Both are handed back so they drop outside the state borrow.
    fn store(&mut self, value: T) -> (Option<T>, Vec<T>) {
        match self {
            Kind::Publish(current) => (current.replace(value), Vec::new()),
            Kind::Behavior(current) => (Some(std::mem::replace(current, value)), Vec::new()),
            Kind::Replay {
                buffer,
                strategy,
                last,
            } => {
                let mut evicted = Vec::new();

                match strategy {
                    ReplayStrategy::BufferSize(0) => {}
                    ReplayStrategy::BufferSize(size) => {
                        while buffer.len() >= *size {
                            evicted.extend(buffer.pop_front());
                        }

                        buffer.push_back(value.clone());
                    }
                    ReplayStrategy::Unbounded => buffer.push_back(value.clone()),
                }

                (last.replace(value), evicted)
            }
        }
    }

    fn replay(&self) -> Vec<T> {
        match self {
            Kind::Publish(_) => Vec::new(),
            Kind::Behavior(current) => vec![current.clone()],
            Kind::Replay { buffer, .. } => buffer.iter().cloned().collect(),
        }
    }

    fn latest(&self) -> Option<T> {
        match self {
            Kind::Publish(current) => current.clone(),
            Kind::Behavior(current) => Some(current.clone()),
            Kind::Replay { last, .. } => last.clone(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Kind::Publish(_) => "publish",
            Kind::Behavior(_) => "behavior",
            Kind::Replay { .. } => "replay",
        }
    }
}

struct Entry<T> {
    observer: Observer<T>,
    context: Option<ExecutionContext>,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            observer: Arc::clone(&self.observer),
            context: self.context.clone(),
        }
    }
}

struct State<T> {
    observers: BTreeMap<SubscriptionId, Entry<T>>,
    next_id: u64,
    kind: Kind<T>,
}

/// Registry and held value shared by every subject flavour.
///
/// All access goes through one `ReentrantMutex`, so an observer may subscribe, dispose or
/// update on the same instance from inside its callback. The `RefCell` is only borrowed for
/// short bookkeeping sections, never while an observer runs.
pub(crate) struct Core<T> {
    state: ReentrantMutex<RefCell<State<T>>>,
    on_dispose: Option<DisposeHook>,
}

impl<T> Core<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(kind: Kind<T>, on_dispose: Option<DisposeHook>) -> Arc<Self> {
        Arc::new(Self {
            state: ReentrantMutex::new(RefCell::new(State {
                observers: BTreeMap::new(),
                next_id: 0,
                kind,
            })),
            on_dispose,
        })
    }

    /// Replays whatever the kind holds to `observer`, synchronously, then registers it.
    pub(crate) fn subscribe(
        self: &Arc<Self>,
        observer: Observer<T>,
        context: Option<ExecutionContext>,
    ) -> Disposable {
        let guard = self.state.lock();
        let replay = guard.borrow().kind.replay();

        for value in &replay {
            observer(value, None);
        }

        let id = {
            let mut state = guard.borrow_mut();
            let id = SubscriptionId(state.next_id);

            state.next_id += 1;
            state.observers.insert(id, Entry { observer, context });

            tracing::trace!(
                %id,
                kind = state.kind.name(),
                replayed = replay.len(),
                observers = state.observers.len(),
                "subscribed"
            );

            id
        };

        drop(guard);

        let core: Weak<Self> = Arc::downgrade(self);

        Disposable::new(move || {
            if let Some(core) = core.upgrade() {
                core.unsubscribe(id);
            }
        })
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let guard = self.state.lock();
        let removed = guard.borrow_mut().observers.remove(&id);

        let Some(removed) = removed else {
            return;
        };

        // the observer may own subscriptions on this same core, drop it with the state released
        drop(removed);

        tracing::trace!(%id, "unsubscribed");

        if let Some(on_dispose) = &self.on_dispose {
            on_dispose();
        }
    }

    /// Stores `value` and notifies a snapshot of the registered observers.
    ///
    /// Registrations added or removed by an observer during this call take effect
    /// from the next update on.
    pub(crate) fn update(&self, value: T) {
        let guard = self.state.lock();
        let (old_value, evicted, entries) = {
            let mut state = guard.borrow_mut();
            let (old_value, evicted) = state.kind.store(value.clone());
            let entries = state.observers.values().cloned().collect::<Vec<_>>();

            (old_value, evicted, entries)
        };

        drop(evicted);

        tracing::trace!(observers = entries.len(), "notifying observers");

        for entry in &entries {
            dispatch(
                &entry.observer,
                entry.context.as_ref(),
                &value,
                old_value.as_ref(),
            );
        }

        drop(guard);
    }

    /// Drops every registration without running the dispose hook.
    pub(crate) fn remove_all_observers(&self) {
        let guard = self.state.lock();
        let removed = std::mem::take(&mut guard.borrow_mut().observers);

        tracing::debug!(count = removed.len(), "removing all observers");

        drop(removed);
    }

    pub(crate) fn observer_count(&self) -> usize {
        self.state.lock().borrow().observers.len()
    }

    pub(crate) fn latest(&self) -> Option<T> {
        self.state.lock().borrow().kind.latest()
    }

    /// The current value, only for kinds where it can never be absent.
    pub(crate) fn current(&self) -> Option<T> {
        match &self.state.lock().borrow().kind {
            Kind::Behavior(current) => Some(current.clone()),
            _ => None,
        }
    }

    pub(crate) fn buffered(&self) -> Vec<T> {
        self.state.lock().borrow().kind.replay()
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::{Core, Kind};
    use crate::subject::replay_subject::ReplayStrategy;

    type Log = Arc<Mutex<Vec<(i32, Option<i32>)>>>;

    fn recorder(log: &Log) -> super::Observer<i32> {
        let log = Arc::clone(log);

        Arc::new(move |value: &i32, old: Option<&i32>| log.lock().push((*value, old.copied())))
    }

    #[test]
    fn smoke() {
        let core = Core::new(Kind::Publish(None), None);
        let log = Log::default();
        let _sub = core.subscribe(recorder(&log), None);

        core.update(1);
        core.update(2);

        assert_eq!(*log.lock(), [(1, None), (2, Some(1))]);
    }

    #[test]
    fn ids_are_never_reused() {
        let core = Core::new(Kind::Publish(None), None);
        let log = Log::default();

        let first = core.subscribe(recorder(&log), None);
        first.dispose();
        let _second = core.subscribe(recorder(&log), None);

        let state = core.state.lock();
        let ids = state.borrow().observers.keys().copied().collect::<Vec<_>>();

        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].0, 1);
        assert_eq!(state.borrow().next_id, 2);
    }

    #[test]
    fn replay_buffer_evicts_oldest() {
        let core = Core::new(
            Kind::Replay {
                buffer: Default::default(),
                strategy: ReplayStrategy::BufferSize(2),
                last: None,
            },
            None,
        );

        for value in 1..=4 {
            core.update(value);
        }

        assert_eq!(core.buffered(), [3, 4]);
        assert_eq!(core.latest(), Some(4));
    }

    #[test]
    fn zero_capacity_replay_keeps_last_only() {
        let core = Core::new(
            Kind::Replay {
                buffer: Default::default(),
                strategy: ReplayStrategy::BufferSize(0),
                last: None,
            },
            None,
        );

        core.update(1);
        core.update(2);

        assert!(core.buffered().is_empty());
        assert_eq!(core.latest(), Some(2));
    }

    #[test]
    fn dispose_hook_runs_once_per_removed_entry() {
        let hits = Arc::new(Mutex::new(0));
        let core = {
            let hits = Arc::clone(&hits);

            Core::new(Kind::Behavior(0), Some(Box::new(move || *hits.lock() += 1)))
        };
        let log = Log::default();

        let a = core.subscribe(recorder(&log), None);
        let b = core.subscribe(recorder(&log), None);

        a.dispose();
        a.dispose();

        assert_eq!(*hits.lock(), 1);

        core.remove_all_observers();
        drop(b);

        assert_eq!(*hits.lock(), 1);
        assert_eq!(core.observer_count(), 0);
    }

    #[test]
    fn removing_an_observer_that_owns_a_subscription_on_the_same_core() {
        let core = Core::new(Kind::Publish(None), None);
        let log = Log::default();
        let inner = core.subscribe(recorder(&log), None);
        let outer = core.subscribe(
            Arc::new(move |_: &i32, _: Option<&i32>| {
                let _keep = &inner;
            }),
            None,
        );

        assert_eq!(core.observer_count(), 2);

        outer.dispose();

        assert_eq!(core.observer_count(), 0);

        core.update(1);

        assert!(log.lock().is_empty());
    }

    #[test]
    fn remove_all_with_an_observer_owning_a_subscription_on_the_same_core() {
        let hits = Arc::new(Mutex::new(0));
        let core = {
            let hits = Arc::clone(&hits);

            Core::new(Kind::Publish(None), Some(Box::new(move || *hits.lock() += 1)))
        };
        let log = Log::default();
        let inner = core.subscribe(recorder(&log), None);
        let _outer = core.subscribe(
            Arc::new(move |_: &i32, _: Option<&i32>| {
                let _keep = &inner;
            }),
            None,
        );

        core.remove_all_observers();

        assert_eq!(core.observer_count(), 0);
        assert_eq!(*hits.lock(), 0);
    }

    #[test]
    fn evicting_a_buffered_subscription_on_the_same_core() {
        let core = Core::<Arc<crate::Disposable>>::new(
            Kind::Replay {
                buffer: Default::default(),
                strategy: ReplayStrategy::BufferSize(1),
                last: None,
            },
            None,
        );
        let sub = core.subscribe(
            Arc::new(|_: &Arc<crate::Disposable>, _: Option<&Arc<crate::Disposable>>| {}),
            None,
        );

        core.update(Arc::new(sub));

        assert_eq!(core.observer_count(), 1);

        core.update(Arc::new(crate::Disposable::empty()));

        assert_eq!(core.observer_count(), 0);
        assert_eq!(core.buffered().len(), 1);
    }

    #[test]
    fn dispose_after_drop_is_a_no_op() {
        let core = Core::new(Kind::Publish(None), None);
        let log = Log::default();
        let sub = core.subscribe(recorder(&log), None);

        drop(core);
        sub.dispose();

        assert!(sub.is_disposed());
    }

    #[test]
    fn reentrant_update_from_observer() {
        let core = Core::new(Kind::Publish(None), None);
        let log = Log::default();
        let _sub = {
            let weak = Arc::downgrade(&core);
            let log = Arc::clone(&log);

            core.subscribe(
                Arc::new(move |value: &i32, old: Option<&i32>| {
                    log.lock().push((*value, old.copied()));

                    if *value < 3 {
                        if let Some(core) = weak.upgrade() {
                            core.update(value + 1);
                        }
                    }
                }),
                None,
            )
        };

        core.update(1);

        assert_eq!(*log.lock(), [(1, None), (2, Some(1)), (3, Some(2))]);
    }

    #[test]
    fn subscription_added_during_notification_waits_for_next_update() {
        let core = Core::new(Kind::Publish(None), None);
        let log = Log::default();
        let late: Arc<Mutex<Vec<crate::Disposable>>> = Default::default();
        let _sub = {
            let weak = Arc::downgrade(&core);
            let log = Arc::clone(&log);
            let late = Arc::clone(&late);

            core.subscribe(
                Arc::new(move |_: &i32, _: Option<&i32>| {
                    if let Some(core) = weak.upgrade() {
                        late.lock().push(core.subscribe(recorder(&log), None));
                    }
                }),
                None,
            )
        };

        core.update(1);

        assert!(log.lock().is_empty());

        core.update(2);

        assert_eq!(*log.lock(), [(2, Some(1))]);

        late.lock().clear();
    }

    #[test]
    fn disposal_during_notification_does_not_skip_others() {
        let core = Core::new(Kind::Publish(None), None);
        let log = Log::default();
        let victim: Arc<Mutex<Option<crate::Disposable>>> = Default::default();
        let _first = {
            let victim = Arc::clone(&victim);

            core.subscribe(
                Arc::new(move |_: &i32, _: Option<&i32>| {
                    if let Some(it) = victim.lock().take() {
                        it.dispose();
                    }
                }),
                None,
            )
        };

        *victim.lock() = Some(core.subscribe(recorder(&log), None));
        let _third = core.subscribe(recorder(&log), None);

        core.update(1);
        core.update(2);

        // the disposed observer still sees the in-flight update, the third sees both
        assert_eq!(*log.lock(), [(1, None), (1, None), (2, Some(1))]);
    }
}
