//! Cache Events Module
//!
//! Structured observability events and the sinks that receive them.
//!
//! The engine owns a single `EventSink` injected at construction; events are
//! a pure output channel and never feed back into cache state.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, info, warn};

// == Event Kind ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Hit,
    Miss,
    Expired,
    Evicted,
    Set,
    Delete,
    Clear,
    Saved,
    Loaded,
    ParseError,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Hit => "hit",
            EventKind::Miss => "miss",
            EventKind::Expired => "expired",
            EventKind::Evicted => "evicted",
            EventKind::Set => "set",
            EventKind::Delete => "delete",
            EventKind::Clear => "clear",
            EventKind::Saved => "saved",
            EventKind::Loaded => "loaded",
            EventKind::ParseError => "parse-error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Cache Event ==
/// One observable cache occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEvent {
    pub kind: EventKind,
    /// Engine clock reading when the event was emitted (Unix milliseconds)
    pub timestamp_ms: u64,
    /// Affected key, when the event concerns a single key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Human-readable description naming the affected key(s)
    pub message: String,
}

impl CacheEvent {
    pub fn new(kind: EventKind, timestamp_ms: u64, message: impl Into<String>) -> Self {
        Self {
            kind,
            timestamp_ms,
            key: None,
            message: message.into(),
        }
    }

    /// Attaches the affected key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

// == Event Sink ==
/// Receiver for cache events.
pub trait EventSink: Send {
    fn emit(&mut self, event: CacheEvent);
}

impl<F> EventSink for F
where
    F: FnMut(CacheEvent) + Send,
{
    fn emit(&mut self, event: CacheEvent) {
        (self)(event)
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: CacheEvent) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: CacheEvent) {
        let key = event.key.as_deref().unwrap_or("-");
        match event.kind {
            EventKind::ParseError => warn!(kind = %event.kind, key, "{}", event.message),
            EventKind::Hit | EventKind::Miss => {
                debug!(kind = %event.kind, key, "{}", event.message)
            }
            _ => info!(kind = %event.kind, key, "{}", event.message),
        }
    }
}

// == Event Log ==
/// Bounded in-memory event history, newest last.
///
/// Clones share the same buffer, so a host can keep one handle for display
/// while the engine owns another as its sink.
#[derive(Debug, Clone)]
pub struct EventLog {
    inner: Arc<Mutex<VecDeque<CacheEvent>>>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl EventLog {
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Returns the retained events, oldest first.
    pub fn events(&self) -> Vec<CacheEvent> {
        match self.inner.lock() {
            Ok(events) => events.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    /// Returns the kinds of the retained events, oldest first.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events().into_iter().map(|e| e.kind).collect()
    }

    pub fn len(&self) -> usize {
        match self.inner.lock() {
            Ok(events) => events.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        match self.inner.lock() {
            Ok(mut events) => events.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    fn push(&self, event: CacheEvent) {
        let mut events = match self.inner.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: CacheEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&EventKind::ParseError).unwrap();
        assert_eq!(json, r#""parse-error""#);
        assert_eq!(EventKind::ParseError.to_string(), "parse-error");
    }

    #[test]
    fn test_event_serialize() {
        let event = CacheEvent::new(EventKind::Hit, 42, "Hit 'a'").with_key("a");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["kind"], "hit");
        assert_eq!(json["timestampMs"], 42);
        assert_eq!(json["key"], "a");
        assert_eq!(json["message"], "Hit 'a'");
    }

    #[test]
    fn test_event_log_is_bounded() {
        let mut log = EventLog::new(2);
        log.emit(CacheEvent::new(EventKind::Set, 1, "one"));
        log.emit(CacheEvent::new(EventKind::Set, 2, "two"));
        log.emit(CacheEvent::new(EventKind::Set, 3, "three"));

        let messages: Vec<_> = log.events().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["two", "three"]);
        assert_eq!(log.len(), 2);

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_event_log_clones_share_buffer() {
        let log = EventLog::default();
        let mut sink = log.clone();

        sink.emit(CacheEvent::new(EventKind::Clear, 0, "cleared"));

        assert_eq!(log.kinds(), vec![EventKind::Clear]);
        log.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_closure_sink() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&seen);
        let mut sink = move |event: CacheEvent| captured.lock().unwrap().push(event.kind);

        sink.emit(CacheEvent::new(EventKind::Miss, 0, "miss"));

        assert_eq!(*seen.lock().unwrap(), vec![EventKind::Miss]);
    }
}
