//! Live subscriptions backed by a background task.
//!
//! A [`Subscription`] is a `Stream` fed by a task it owns. Dropping the
//! subscription (or calling [`Subscription::unsubscribe`]) aborts the task,
//! which in turn drops any upstream subscription the task was reading from.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Items buffered between the producer task and the consumer.
const SUBSCRIPTION_BUFFER: usize = 16;

#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Subscription<T> {
    /// Spawn `producer` on the current runtime and stream what it sends.
    ///
    /// The producer should stop once `send` fails; that means the consumer
    /// is gone.
    pub fn spawn<F, Fut>(producer: F) -> Self
    where
        F: FnOnce(mpsc::Sender<T>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let task = tokio::spawn(producer(tx));
        Self { rx, task }
    }
}

impl<T> Subscription<T> {
    /// Stop receiving updates.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.get_mut().rx.poll_recv(cx)
    }
}
