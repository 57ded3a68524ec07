use std::path::PathBuf;

use tokio::sync::mpsc;

/// Notifications emitted by the model and the filesystem watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Filesystem change detected by the watcher.
    FsChange(Vec<PathBuf>),
    /// The model's root path changed and the new listing is in place.
    RootPathChanged(PathBuf),
}

pub type EventSender = mpsc::UnboundedSender<Event>;

/// Owns the event channel; hand out senders with [`EventHandler::sender`].
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: EventSender,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { rx, tx }
    }

    /// Get a sender clone for the model or the watcher.
    pub fn sender(&self) -> EventSender {
        self.tx.clone()
    }

    /// Receive the next event. Never returns `None` while the handler owns a sender.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Non-blocking receive.
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sent_events_are_received_in_order() {
        let mut handler = EventHandler::new();
        let tx = handler.sender();
        tx.send(Event::RootPathChanged(PathBuf::from("/a"))).unwrap();
        tx.send(Event::FsChange(vec![PathBuf::from("/a/b")])).unwrap();

        assert_eq!(handler.try_next(), Some(Event::RootPathChanged(PathBuf::from("/a"))));
        assert_eq!(handler.try_next(), Some(Event::FsChange(vec![PathBuf::from("/a/b")])));
        assert_eq!(handler.try_next(), None);
    }

    #[tokio::test]
    async fn next_awaits_event() {
        let mut handler = EventHandler::new();
        let tx = handler.sender();
        tokio::spawn(async move {
            let _ = tx.send(Event::FsChange(Vec::new()));
        });
        assert_eq!(handler.next().await, Some(Event::FsChange(Vec::new())));
    }
}
