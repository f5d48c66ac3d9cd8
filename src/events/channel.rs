//! Event channel implementation using crossbeam-channel.
//!
//! Carries events from the batch run to whatever renders them.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Sends events from the core library.
///
/// A thin wrapper around crossbeam's Sender that can be cloned and moved
/// to another thread.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event without blocking.
    ///
    /// If the receiver is dropped, the event is silently discarded.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receives events from the core library.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event is received
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Returns an iterator over received events
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Constructor for sender/receiver pairs.
pub struct EventChannel;

impl EventChannel {
    /// Create a new unbounded event channel.
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A sender whose receiver is already gone, for runs without a UI.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}
