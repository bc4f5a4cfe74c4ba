//! Event channel implementation using crossbeam-channel.
//!
//! Provides a thread-safe way to send events from worker threads
//! to whatever is observing the batch.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Sends events from the engine.
///
/// Cloneable and `Send`, so each worker can hold its own handle.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event. Non-blocking if the channel isn't full.
    ///
    /// If the receiver is dropped, the event is silently discarded.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receives events from the engine.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Iterate over events until every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Factory for sender/receiver pairs.
pub struct EventChannel;

impl EventChannel {
    /// Create a new unbounded event channel.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A no-op event sender for callers that don't observe progress.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{BatchEvent, BatchProgressUpdate};
    use std::path::PathBuf;
    use std::thread;

    #[test]
    fn events_can_be_sent_across_threads() {
        let (sender, receiver) = EventChannel::new();

        let handle = thread::spawn(move || {
            sender.send(Event::Batch(BatchEvent::Progress(BatchProgressUpdate {
                completed: 5,
                total: 25,
                current_path: PathBuf::from("/test/a.png"),
            })));
        });

        handle.join().unwrap();

        match receiver.iter().next().unwrap() {
            Event::Batch(BatchEvent::Progress(p)) => assert_eq!(p.completed, 5),
            _ => panic!("Wrong event type"),
        };
    }

    #[test]
    fn null_sender_does_not_panic() {
        let sender = null_sender();
        sender.send(Event::Batch(BatchEvent::Cancelled));
    }
}
