//! # ferrous-locator
//!
//! A string-keyed service container: store literal values or factories
//! under ids, build them lazily, share aliases, decorate definitions after
//! the fact, and freeze the configuration once bootstrap is done.
//!
//! ## Features
//!
//! - **Lazy and memoized**: `get` builds on first access and caches,
//!   `get_new` always builds a fresh instance
//! - **Explicit definitions**: literal vs factory is part of the API, never
//!   guessed from the stored value
//! - **Aliases**: flattened when created, resolved with a single lookup
//! - **Extension queues**: decorators replayed in order on every build
//! - **Freeze**: lock configuration; resolution keeps working
//! - **Thread-safe**: one lock, never held while user code runs
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_locator::Container;
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let container = Container::new();
//! container
//!     .set_value("dsn", "postgres://localhost".to_string())?
//!     .try_set_factory("db", |c| {
//!         Ok(Database { connection_string: (*c.get::<String>("dsn")?).clone() })
//!     })?
//!     .try_set_factory("users", |c| Ok(UserService { db: c.get("db")? }))?;
//!
//! let users = container.get::<UserService>("users")?;
//! assert_eq!(users.db.connection_string, "postgres://localhost");
//!
//! // Same instance on every `get`, a new one from `get_new`.
//! assert!(Arc::ptr_eq(&users, &container.get::<UserService>("users")?));
//! assert!(!Arc::ptr_eq(&users, &container.get_new::<UserService>("users")?));
//! # Ok::<(), ferrous_locator::DiError>(())
//! ```
//!
//! ## Extending and freezing
//!
//! ```rust
//! use ferrous_locator::{Container, DiError};
//! use std::sync::{Arc, Mutex};
//!
//! let container = Container::new();
//! container.set_factory("tags", |_| Mutex::new(Vec::<&'static str>::new()))?;
//! container.extend::<Mutex<Vec<&'static str>>, _>("tags", |tags, _| {
//!     tags.lock().unwrap().push("audited");
//!     None // mutated in place, keep the same value
//! })?;
//!
//! container.freeze();
//! assert!(matches!(container.set_value("late", 1u8), Err(DiError::Frozen(_))));
//!
//! let tags = container.get::<Mutex<Vec<&'static str>>>("tags")?;
//! assert_eq!(*tags.lock().unwrap(), vec!["audited"]);
//! # Ok::<(), ferrous_locator::DiError>(())
//! ```

// Module declarations
pub mod config;
pub mod container;
pub mod definition;
pub mod descriptors;
pub mod error;
pub mod extension;
pub mod observer;
pub mod provider;

// Internal modules
mod internal;

// Re-export core types
pub use config::env_key_to_id;
pub use container::Container;
pub use definition::{AnyArc, Definition, DefinitionKind};
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult, FrozenAction};
pub use extension::ExtensionQueue;
pub use observer::{DiObserver, LoggingObserver};
pub use provider::ServiceProvider;
