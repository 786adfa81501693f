//! Extension queues: ordered decorators replayed on every fresh build.

use std::any::type_name;
use std::sync::Arc;

use crate::container::Container;
use crate::definition::AnyArc;
use crate::error::{DiError, DiResult};

/// Type-erased decorator. `Ok(None)` keeps the current value.
pub(crate) type Decorator =
    Arc<dyn Fn(AnyArc, &Container) -> DiResult<Option<AnyArc>> + Send + Sync>;

/// Wraps a typed, fallible decorator for storage in a queue.
///
/// `id` names the service in a `TypeMismatch` error.
pub(crate) fn erase<T, F>(id: &str, decorator: F) -> Decorator
where
    T: Send + Sync + 'static,
    F: Fn(Arc<T>, &Container) -> DiResult<Option<Arc<T>>> + Send + Sync + 'static,
{
    let id = id.to_string();
    Arc::new(move |current: AnyArc, container: &Container| -> DiResult<Option<AnyArc>> {
        let typed = current.downcast::<T>().map_err(|_| DiError::TypeMismatch {
            id: id.clone(),
            expected: type_name::<T>(),
        })?;
        Ok(decorator(typed, container)?.map(|next| next as AnyArc))
    })
}

/// Ordered chain of decorators for one service id.
///
/// Decorators run left to right. Each receives the current value and the
/// container; returning `Some` replaces the value, returning `None` keeps
/// it, which lets a decorator mutate a service in place (through interior
/// mutability) without handing anything back.
///
/// The container is passed in at replay time instead of being stored, so
/// a queue never keeps its owner alive.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::Container;
/// use std::sync::{Arc, Mutex};
///
/// let container = Container::new();
/// container.set_factory("log", |_| Mutex::new(String::new()))?;
/// container.extend::<Mutex<String>, _>("log", |log, _| {
///     log.lock().unwrap().push('a');
///     None
/// })?;
/// container.extend::<Mutex<String>, _>("log", |log, _| {
///     log.lock().unwrap().push('b');
///     Some(log)
/// })?;
///
/// let log = container.get::<Mutex<String>>("log")?;
/// assert_eq!(*log.lock().unwrap(), "ab");
/// # Ok::<(), ferrous_locator::DiError>(())
/// ```
#[derive(Clone, Default)]
pub struct ExtensionQueue {
    queue: Vec<Decorator>,
}

impl ExtensionQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Appends a typed decorator.
    pub fn add<T, F>(&mut self, decorator: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(Arc<T>, &Container) -> Option<Arc<T>> + Send + Sync + 'static,
    {
        // A standalone queue has no service id; name the type instead.
        let label = type_name::<T>();
        self.push(erase::<T, _>(label, move |current, c| Ok(decorator(current, c))))
    }

    pub(crate) fn push(&mut self, decorator: Decorator) -> &mut Self {
        self.queue.push(decorator);
        self
    }

    /// Folds `service` through every decorator in add order.
    pub fn get_service(&self, service: AnyArc, container: &Container) -> DiResult<AnyArc> {
        let mut current = service;
        for decorator in &self.queue {
            if let Some(next) = decorator(current.clone(), container)? {
                current = next;
            }
        }
        Ok(current)
    }

    /// Number of decorators in the queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
