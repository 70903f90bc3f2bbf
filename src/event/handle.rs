//! Shared handle exposing a request's wide event to handler code

use super::WideEvent;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle to the accumulator of one in-flight request.
///
/// Handlers write through it; the lifecycle middleware takes the accumulator
/// out exactly once to flush it. Writes after that point are dropped with a
/// warning.
#[derive(Debug, Clone)]
pub struct WideEventHandle {
    request_id: Arc<str>,
    event: Arc<Mutex<Option<WideEvent>>>,
}

impl WideEventHandle {
    pub fn new(event: WideEvent) -> Self {
        Self {
            request_id: Arc::from(event.request_id()),
            event: Arc::new(Mutex::new(Some(event))),
        }
    }

    /// The resolved request ID.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Store or replace the field group named `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, data: &T) {
        match self.lock().as_mut() {
            Some(event) => event.set(key, data),
            None => tracing::warn!(
                request_id = %self.request_id,
                key,
                "Wide event already flushed, dropping field group"
            ),
        }
    }

    /// Store or replace the error payload.
    pub fn error<T: Serialize + ?Sized>(&self, payload: &T) {
        match self.lock().as_mut() {
            Some(event) => event.error(payload),
            None => tracing::warn!(
                request_id = %self.request_id,
                "Wide event already flushed, dropping error payload"
            ),
        }
    }

    /// Take the accumulator out. Returns `None` once it has been taken.
    pub fn take(&self) -> Option<WideEvent> {
        self.lock().take()
    }

    pub fn is_flushed(&self) -> bool {
        self.lock().is_none()
    }

    fn lock(&self) -> MutexGuard<'_, Option<WideEvent>> {
        self.event.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderMode;
    use serde_json::json;

    #[test]
    fn test_take_happens_once() {
        let handle = WideEventHandle::new(WideEvent::new("req-1", "GET", "/", RenderMode::Json));
        let clone = handle.clone();

        assert!(!handle.is_flushed());
        assert!(clone.take().is_some());
        assert!(handle.take().is_none());
        assert!(handle.is_flushed());
    }

    #[test]
    fn test_writes_through_clones() {
        let handle = WideEventHandle::new(WideEvent::new("req-1", "GET", "/", RenderMode::Json));
        let clone = handle.clone();

        clone.set("user", &json!({"id": 7}));
        handle.error(&json!({"type": "NotFound"}));

        let event = handle.take().unwrap();
        assert_eq!(event.field_count(), 1);
        assert!(event.has_error());
    }

    #[test]
    fn test_writes_after_take_are_dropped() {
        let handle = WideEventHandle::new(WideEvent::new("req-1", "GET", "/", RenderMode::Json));
        let _event = handle.take();

        handle.set("late", &json!({"x": 1}));
        handle.error(&json!({"type": "Late"}));
        assert!(handle.take().is_none());
    }

    #[test]
    fn test_request_id_survives_take() {
        let handle = WideEventHandle::new(WideEvent::new("abc", "GET", "/", RenderMode::Json));
        let _ = handle.take();
        assert_eq!(handle.request_id(), "abc");
    }
}
