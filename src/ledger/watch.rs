use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

/// A live read: a stream of full result-set snapshots. The initial snapshot
/// is queued at subscribe time; every later write that succeeds queues a
/// fresh one. Cancellation is dropping the subscription.
pub(crate) struct Subscription<T> {
    rx: Receiver<T>,
}

impl<T> Subscription<T> {
    /// Blocks until the next snapshot. Returns `None` once the publishing
    /// repository is gone.
    pub(crate) fn recv(&self) -> Option<T> {
        self.rx.recv().ok()
    }

    /// Returns the next snapshot if one is already queued.
    pub(crate) fn try_recv(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Drains the queue and returns the most recent snapshot, if any.
    /// Useful when the observer only cares about current state.
    pub(crate) fn latest(&self) -> Option<T> {
        let mut last = None;
        loop {
            match self.rx.try_recv() {
                Ok(v) => last = Some(v),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return last,
            }
        }
    }
}

pub(crate) fn subscription<T>() -> (Sender<T>, Subscription<T>) {
    let (tx, rx) = channel();
    (tx, Subscription { rx })
}
