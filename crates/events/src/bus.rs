//! Event publishing/subscription abstraction (mechanics only).
//!
//! UI-side observers (cart badge, cart review page, checkout summary) subscribe
//! to an aggregate's events and re-read derived values when one arrives. The
//! bus only distributes; the aggregate stays the source of truth.
//!
//! - **Synchronous**: `publish` returns once every live subscriber has the message queued
//! - **Ordered per publisher**: a subscriber sees messages in publish order
//! - **No persistence**: a subscriber only sees messages published after it subscribed

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvError, RecvTimeoutError, TryRecvError};
use std::time::Duration;

/// A subscription to an event stream.
///
/// Each subscription gets a copy of every event published after it was
/// created (broadcast semantics). Dropping it unsubscribes.
///
/// ```ignore
/// let subscription = bus.subscribe();
/// cart.add(&product, 1);
/// for event in subscription.drain() {
///     render_badge(cart.item_count());
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Collect every message already queued, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// `publish()` can fail (e.g. poisoned lock, closed transport). Failures are
/// surfaced to the caller, which decides whether they matter: observation is
/// best-effort and must never roll back a mutation that already happened.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
