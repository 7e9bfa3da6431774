//! Event fan-out to live subscribers.

use tokio::sync::broadcast;

use crate::events::EventStream;

/// Re-broadcasts sink events as text lines to any number of subscribers.
///
/// Subscribers that fall behind lose their oldest lines; the hub never
/// waits for a subscriber.
#[derive(Debug, Clone)]
pub struct EventHub {
    tx: broadcast::Sender<String>,
}

impl EventHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Drain `stream` until it closes or shutdown is signalled.
    pub async fn run(self, mut stream: EventStream, mut shutdown: broadcast::Receiver<()>) {
        tracing::debug!("Event hub starting");
        loop {
            tokio::select! {
                next = stream.next() => match next {
                    // No subscribers is fine.
                    Some(event) => { let _ = self.tx.send(event.to_string()); }
                    None => break,
                },
                _ = shutdown.recv() => break,
            }
        }
        tracing::debug!("Event hub stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, EventSink};
    use crate::lifecycle::Shutdown;
    use crate::target::Target;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_fans_out_to_all_subscribers() {
        let (sink, stream) = EventSink::channel(8);
        let hub = EventHub::new(8);
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();
        let shutdown = Shutdown::new();
        let task = tokio::spawn(hub.clone().run(stream, shutdown.subscribe()));

        let from = Arc::new(Target::parse("http://a:1").unwrap());
        let to = Arc::new(Target::parse("http://b:2").unwrap());
        sink.emit(Event::Switched { from, to });

        let expected = "Switching active target to: http://b:2 (from http://a:1)";
        assert_eq!(first.recv().await.unwrap(), expected);
        assert_eq!(second.recv().await.unwrap(), expected);

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("hub should stop on shutdown")
            .unwrap();
    }

    #[tokio::test]
    async fn test_stops_when_sinks_are_dropped() {
        let (sink, stream) = EventSink::channel(1);
        let hub = EventHub::new(1);
        let shutdown = Shutdown::new();
        let task = tokio::spawn(hub.run(stream, shutdown.subscribe()));

        drop(sink);
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("hub should stop once the sink is gone")
            .unwrap();
    }
}
