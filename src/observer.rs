//! Diagnostic observers for container traceability.
//!
//! Observers receive an event for every fresh service build (cache hits are
//! silent) and for every configuration change. They are called outside the
//! container lock, so an observer may itself query the container.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;

/// Observer trait for container events.
///
/// Only the resolution hooks are required; configuration hooks default to
/// doing nothing.
///
/// # Performance
///
/// Observer calls are made synchronously on the resolving thread. Keep
/// implementations lightweight.
///
/// # Examples
///
/// ```
/// use ferrous_locator::{Container, DiObserver};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     built: Mutex<Vec<String>>,
/// }
///
/// impl DiObserver for Recorder {
///     fn resolving(&self, _id: &str) {}
///
///     fn resolved(&self, id: &str, _duration: Duration) {
///         self.built.lock().unwrap().push(id.to_string());
///     }
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let container = Container::new();
/// container.add_observer(recorder.clone());
/// container.set_factory("clock", |_| 0u64)?;
///
/// container.get::<u64>("clock")?;
/// container.get::<u64>("clock")?; // cached, not observed
///
/// assert_eq!(*recorder.built.lock().unwrap(), vec!["clock"]);
/// # Ok::<(), ferrous_locator::DiError>(())
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before a service's factory runs.
    fn resolving(&self, id: &str);

    /// Called after the factory and extension queue completed.
    ///
    /// `duration` covers both.
    fn resolved(&self, id: &str, duration: Duration);

    /// Called when the factory or a decorator returned an error.
    fn resolution_failed(&self, _id: &str, _error: &DiError) {}

    /// Called after a definition was stored.
    fn defined(&self, _id: &str) {}

    /// Called after a decorator was queued.
    fn extended(&self, _id: &str) {}

    /// Called once, when the container is first frozen.
    fn frozen(&self) {}
}

/// Registered observers, notified in registration order.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn resolving(&self, id: &str) {
        for observer in &self.observers {
            observer.resolving(id);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, id: &str, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(id, duration);
        }
    }

    pub(crate) fn resolution_failed(&self, id: &str, error: &DiError) {
        for observer in &self.observers {
            observer.resolution_failed(id, error);
        }
    }

    pub(crate) fn defined(&self, id: &str) {
        for observer in &self.observers {
            observer.defined(id);
        }
    }

    pub(crate) fn extended(&self, id: &str) {
        for observer in &self.observers {
            observer.extended(id);
        }
    }

    pub(crate) fn frozen(&self) {
        for observer in &self.observers {
            observer.frozen();
        }
    }
}

/// Built-in observer that forwards events to the `log` facade.
///
/// Resolution events are logged at `debug`, configuration events at
/// `trace`, failures at `warn`. Install any `log` backend to see them.
///
/// # Examples
///
/// ```
/// use ferrous_locator::{Container, LoggingObserver};
/// use std::sync::Arc;
///
/// let container = Container::new();
/// container.add_observer(Arc::new(LoggingObserver::new()));
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "[ferrous-locator]".to_string(),
        }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, id: &str) {
        log::debug!("{} Resolving: {}", self.prefix, id);
    }

    fn resolved(&self, id: &str, duration: Duration) {
        log::debug!("{} Resolved: {} in {:?}", self.prefix, id, duration);
    }

    fn resolution_failed(&self, id: &str, error: &DiError) {
        log::warn!("{} Failed to resolve {}: {}", self.prefix, id, error);
    }

    fn defined(&self, id: &str) {
        log::trace!("{} Defined: {}", self.prefix, id);
    }

    fn extended(&self, id: &str) {
        log::trace!("{} Extended: {}", self.prefix, id);
    }

    fn frozen(&self) {
        log::trace!("{} Container frozen", self.prefix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl DiObserver for Recorder {
        fn resolving(&self, id: &str) {
            self.events.lock().unwrap().push(format!("resolving {}", id));
        }

        fn resolved(&self, id: &str, _duration: Duration) {
            self.events.lock().unwrap().push(format!("resolved {}", id));
        }

        fn frozen(&self) {
            self.events.lock().unwrap().push("frozen".to_string());
        }
    }

    #[test]
    fn observers_are_notified_in_order() {
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());

        let mut observers = Observers::default();
        observers.add(first.clone());
        observers.add(second.clone());

        observers.resolving("a");
        observers.resolved("a", Duration::from_millis(1));
        observers.defined("ignored by default");
        observers.frozen();

        let expected = vec!["resolving a", "resolved a", "frozen"];
        assert_eq!(*first.events.lock().unwrap(), expected);
        assert_eq!(*second.events.lock().unwrap(), expected);
    }

    #[test]
    fn logging_observer_prefix() {
        assert_eq!(LoggingObserver::new().prefix(), "[ferrous-locator]");
        assert_eq!(LoggingObserver::with_prefix("[app]").prefix(), "[app]");
        // No backend installed; calls must be no-ops.
        let observer = LoggingObserver::default();
        observer.resolving("a");
        observer.resolution_failed("a", &DiError::NotFound("a".into()));
    }
}
