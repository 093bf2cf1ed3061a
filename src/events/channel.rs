//! Event plumbing between the scanner and whatever renders its progress.

use crossbeam_channel::{unbounded, IntoIter, Receiver, Sender};

use super::Event;

/// Sending half handed to the scanner and cleanup executor.
///
/// A detached sender (see [`null_sender`]) drops every event without
/// touching a channel, so headless scans pay nothing for reporting.
#[derive(Clone)]
pub struct EventSender {
    inner: Option<Sender<Event>>,
}

impl EventSender {
    /// Whether anyone can receive events from this sender.
    ///
    /// Per-file events clone paths; callers skip building them when this
    /// is false.
    pub fn is_active(&self) -> bool {
        self.inner.is_some()
    }

    /// Send an event. Events sent after the receiver is dropped are discarded.
    pub fn send(&self, event: Event) {
        if let Some(ref sender) = self.inner {
            let _ = sender.send(event);
        }
    }
}

/// Receiving half. Iterating it blocks until every sender is dropped, which
/// is how a progress thread learns that the scan and any cleanup are over.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl IntoIterator for EventReceiver {
    type Item = Event;
    type IntoIter = IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

/// Constructor for connected sender/receiver pairs.
pub struct EventChannel;

impl EventChannel {
    /// Unbounded, so workers never stall on a slow progress renderer.
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender {
                inner: Some(sender),
            },
            EventReceiver { inner: receiver },
        )
    }
}

/// A sender with no receiver, for headless runs.
pub fn null_sender() -> EventSender {
    EventSender { inner: None }
}
