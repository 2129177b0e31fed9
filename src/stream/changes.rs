use std::{
    pin::Pin,
    task::{Context, Poll},
};

use futures::{
    channel::mpsc::{self, UnboundedReceiver},
    stream::FusedStream,
    Stream,
};
use pin_project_lite::pin_project;

use super::Change;
use crate::{Disposable, Observable};

pin_project! {
    /// Stream for the [`changes`](Observable::changes) method.
    ///
    /// Owns its subscription: dropping the stream disposes it. The stream ends once the
    /// subject it was created from has been dropped and every buffered change was yielded.
    #[must_use = "streams do nothing unless polled"]
    pub struct Changes<T> {
        #[pin]
        receiver: UnboundedReceiver<Change<T>>,
        subscription: Disposable,
    }
}

impl<T> Changes<T> {
    /// Stops receiving further changes. Already buffered changes are still yielded.
    pub fn dispose(&self) {
        self.subscription.dispose();
    }
}

impl<T> Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Subscribes and exposes the notifications as a [`Stream`].
    ///
    /// Replayed values are buffered before this returns, live ones as they are pushed.
    pub fn changes(&self) -> Changes<T> {
        let (sender, receiver) = mpsc::unbounded();
        let subscription = self.subscribe(move |value, old_value| {
            // the receiver going away is the only failure, nothing left to notify then
            let _ = sender.unbounded_send(Change::new(value.clone(), old_value.cloned()));
        });

        Changes {
            receiver,
            subscription,
        }
    }
}

impl<T> Stream for Changes<T> {
    type Item = Change<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().receiver.poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.receiver.size_hint()
    }
}

impl<T> FusedStream for Changes<T> {
    fn is_terminated(&self) -> bool {
        self.receiver.is_terminated()
    }
}
