//! Event sink port
//!
//! Receives the ordered [`DeliberationEvent`] stream of a run. Implementations
//! live in the presentation and infrastructure layers (live progress, JSONL
//! log) and must not block: events are delivered from call tasks.

use roundtable_domain::DeliberationEvent;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Consumer of deliberation events
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &DeliberationEvent);
}

/// No-op sink for when events are not needed
pub struct NoEvents;

impl EventSink for NoEvents {
    fn on_event(&self, _event: &DeliberationEvent) {}
}

/// Forwards every event into an unbounded channel.
///
/// Events sent after the receiver is dropped are discarded.
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<DeliberationEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::UnboundedSender<DeliberationEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DeliberationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelEventSink {
    fn on_event(&self, event: &DeliberationEvent) {
        let _ = self.tx.send(event.clone());
    }
}

/// A sink that delegates to multiple inner sinks, in order.
pub struct CompositeEventSink {
    delegates: Vec<Arc<dyn EventSink>>,
}

impl CompositeEventSink {
    pub fn new(delegates: Vec<Arc<dyn EventSink>>) -> Self {
        Self { delegates }
    }

    pub fn push(&mut self, sink: Arc<dyn EventSink>) {
        self.delegates.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl EventSink for CompositeEventSink {
    fn on_event(&self, event: &DeliberationEvent) {
        for d in &self.delegates {
            d.on_event(event);
        }
    }
}
