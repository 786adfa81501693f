//! Service descriptors for introspection and diagnostics.

use crate::definition::DefinitionKind;

/// Snapshot of one defined service.
///
/// Produced by [`Container::descriptors`](crate::Container::descriptors).
///
/// # Use Cases
///
/// - **Debugging**: list what is defined and what has been built
/// - **Health checks**: verify container configuration at startup
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{Container, DefinitionKind};
///
/// let container = Container::new();
/// container.set_value("port", 8080u16)?;
/// container.set_factory("server", |_| "server".to_string())?;
/// container.alias("http", "server");
/// container.extend::<String, _>("server", |_, _| None)?;
/// container.get::<u16>("port")?;
///
/// let descriptors = container.descriptors();
/// assert_eq!(descriptors.len(), 2);
///
/// let port = &descriptors[0];
/// assert_eq!(port.id, "port");
/// assert_eq!(port.kind, DefinitionKind::Value);
/// assert!(port.instantiated);
///
/// let server = &descriptors[1];
/// assert!(server.is_factory());
/// assert_eq!(server.aliases, vec!["http"]);
/// assert_eq!(server.extensions, 1);
/// assert!(!server.instantiated);
/// # Ok::<(), ferrous_locator::DiError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// The service id
    pub id: String,
    /// Literal or factory
    pub kind: DefinitionKind,
    /// Aliases currently pointing at this id, sorted
    pub aliases: Vec<String>,
    /// Number of queued decorators
    pub extensions: usize,
    /// Whether `get` has cached an instance
    pub instantiated: bool,
}

impl ServiceDescriptor {
    pub fn is_factory(&self) -> bool {
        self.kind == DefinitionKind::Factory
    }

    /// Returns true if at least one decorator is queued.
    pub fn is_extended(&self) -> bool {
        self.extensions > 0
    }
}
