//! Service definition types.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::container::Container;
use crate::error::DiResult;

/// Type-erased Arc for storage
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Type-erased factory invoked with the container on every fresh build
pub(crate) type FactoryFn = Arc<dyn Fn(&Container) -> DiResult<AnyArc> + Send + Sync>;

/// Raw definition stored under a service id.
///
/// Whether a definition is a literal or a factory is decided when it is
/// built, never inferred from the stored value. A closure stored with
/// [`Definition::value`] is handed back as-is by `get`, not called.
///
/// Cloning is cheap: both variants hold shared pointers, so `raw` returns a
/// copy that points at the same literal or factory.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{Container, Definition};
///
/// let container = Container::new();
/// container.set("answer", Definition::value(42u32))?;
/// container.set("greeting", Definition::factory(|_| "hello".to_string()))?;
///
/// assert_eq!(*container.get::<u32>("answer")?, 42);
/// assert_eq!(*container.get::<String>("greeting")?, "hello");
/// assert!(container.raw("greeting")?.is_factory());
/// # Ok::<(), ferrous_locator::DiError>(())
/// ```
#[derive(Clone)]
pub enum Definition {
    /// Literal returned verbatim
    Value(AnyArc),
    /// Callable producing a new instance from the container
    Factory(FactoryFn),
}

impl Definition {
    /// Wraps a literal value.
    pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
        Definition::Value(Arc::new(value))
    }

    /// Wraps an already shared literal value.
    pub fn shared<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Definition::Value(value)
    }

    /// Wraps an infallible factory.
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> T + Send + Sync + 'static,
    {
        Definition::Factory(Arc::new(move |c: &Container| -> DiResult<AnyArc> {
            Ok(Arc::new(factory(c)))
        }))
    }

    /// Wraps a fallible factory.
    ///
    /// Errors returned by the factory, including errors from nested `get`
    /// calls, propagate unchanged to the caller of `get`/`get_new`.
    pub fn try_factory<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> DiResult<T> + Send + Sync + 'static,
    {
        Definition::Factory(Arc::new(move |c: &Container| -> DiResult<AnyArc> {
            factory(c).map(|v| Arc::new(v) as AnyArc)
        }))
    }

    /// Returns true if this definition is a factory.
    pub fn is_factory(&self) -> bool {
        matches!(self, Definition::Factory(_))
    }

    /// Returns the literal downcast to `T`, or `None` for factories and
    /// literals of another type.
    pub fn downcast_value<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        match self {
            Definition::Value(v) => v.clone().downcast::<T>().ok(),
            Definition::Factory(_) => None,
        }
    }

    /// Returns true when both definitions share the same literal or factory.
    pub fn ptr_eq(&self, other: &Definition) -> bool {
        match (self, other) {
            (Definition::Value(a), Definition::Value(b)) => Arc::ptr_eq(a, b),
            (Definition::Factory(a), Definition::Factory(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Produces an instance: calls the factory, or clones the literal's Arc.
    pub(crate) fn instantiate(&self, container: &Container) -> DiResult<AnyArc> {
        match self {
            Definition::Value(v) => Ok(v.clone()),
            Definition::Factory(f) => f(container),
        }
    }

    pub(crate) fn kind(&self) -> DefinitionKind {
        match self {
            Definition::Value(_) => DefinitionKind::Value,
            Definition::Factory(_) => DefinitionKind::Factory,
        }
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Value(_) => f.write_str("Definition::Value(..)"),
            Definition::Factory(_) => f.write_str("Definition::Factory(..)"),
        }
    }
}

/// Definition variant without its payload, for introspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Value,
    Factory,
}
