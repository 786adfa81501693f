//! Error types for the service container.

use std::fmt;

/// The configuration change a frozen container refused.
///
/// Each variant carries the name used in the error message: the service id
/// for definitions and extensions, the provider name for registrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrozenAction {
    /// `set` of a new or replacement definition
    Define(String),
    /// `extend` of an existing definition
    Extend(String),
    /// `register` of a service provider
    Register(String),
}

/// Container errors
///
/// Represents the conditions that can occur while configuring the container
/// or resolving services from it.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{Container, DiError};
///
/// let container = Container::new();
/// match container.get::<String>("undefined") {
///     Err(DiError::NotFound(id)) => {
///         assert_eq!(id, "undefined");
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_locator::{DiError, FrozenAction};
///
/// let not_found = DiError::NotFound("mailer".to_string());
/// let frozen = DiError::Frozen(FrozenAction::Define("mailer".to_string()));
///
/// assert_eq!(not_found.to_string(), "The service \"mailer\" does not exist.");
/// assert_eq!(
///     frozen.to_string(),
///     "The container is frozen and is not possible to define the new service \"mailer\"."
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// No definition exists for the (alias-resolved) id
    NotFound(String),
    /// A configuration change was attempted after `freeze()`
    Frozen(FrozenAction),
    /// `extend` targeted an id without a definition
    InvalidArgument(String),
    /// The stored value is not of the requested type
    TypeMismatch {
        id: String,
        expected: &'static str,
    },
    /// A service build re-entered itself (includes path)
    Circular(Vec<String>),
    /// Maximum nested build depth exceeded
    DepthExceeded(usize),
    /// A fallible factory or decorator reported a failure
    Factory(String),
    /// Parameters could not be loaded
    Config(String),
}

impl DiError {
    /// Builds a [`DiError::Factory`] from any displayable failure.
    ///
    /// Handy inside fallible factories: `.map_err(DiError::factory)?`.
    pub fn factory(err: impl fmt::Display) -> Self {
        DiError::Factory(err.to_string())
    }

    /// Returns true for errors caused by a missing definition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DiError::NotFound(_) | DiError::InvalidArgument(_))
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotFound(id) | DiError::InvalidArgument(id) => {
                write!(f, "The service \"{}\" does not exist.", id)
            }
            DiError::Frozen(action) => match action {
                FrozenAction::Define(id) => write!(
                    f,
                    "The container is frozen and is not possible to define the new service \"{}\".",
                    id
                ),
                FrozenAction::Extend(id) => write!(
                    f,
                    "The container is frozen and is not possible to extend the service \"{}\".",
                    id
                ),
                FrozenAction::Register(name) => write!(
                    f,
                    "The container is frozen and is not possible to register the provider \"{}\".",
                    name
                ),
            },
            DiError::TypeMismatch { id, expected } => {
                write!(f, "The service \"{}\" is not of type {}.", id, expected)
            }
            DiError::Circular(path) => {
                write!(f, "Circular service build: {}", path.join(" -> "))
            }
            DiError::DepthExceeded(depth) => write!(f, "Max build depth {} exceeded", depth),
            DiError::Factory(msg) => write!(f, "Factory failed: {}", msg),
            DiError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for container operations
///
/// A convenience alias for `Result<T, DiError>` used throughout the crate.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{DiResult, DiError};
///
/// fn failing_operation() -> DiResult<()> {
///     Err(DiError::NotFound("some_service".to_string()))
/// }
///
/// assert!(failing_operation().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
