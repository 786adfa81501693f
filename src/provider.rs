//! Service providers for modular registration.

use std::any::type_name;

use crate::container::Container;
use crate::error::DiResult;

/// A bundle of definitions that registers itself on a [`Container`].
///
/// Providers should only configure the container (`set`, `alias`,
/// `extend`, nested `register`). Resolving services during registration
/// is not prevented but defeats lazy construction.
///
/// Closures `Fn(&Container) -> DiResult<()>` are providers too.
///
/// # Example
///
/// ```rust
/// use ferrous_locator::{Container, DiResult, ServiceProvider};
///
/// struct Mailer { host: String }
///
/// struct MailProvider;
///
/// impl ServiceProvider for MailProvider {
///     fn register(&self, container: &Container) -> DiResult<()> {
///         container
///             .set_value("mail.host", "smtp.local".to_string())?
///             .try_set_factory("mailer", |c| {
///                 Ok(Mailer { host: (*c.get::<String>("mail.host")?).clone() })
///             })?;
///         Ok(())
///     }
/// }
///
/// let container = Container::new();
/// container.register(&MailProvider)?;
/// assert_eq!(container.get::<Mailer>("mailer")?.host, "smtp.local");
/// # Ok::<(), ferrous_locator::DiError>(())
/// ```
pub trait ServiceProvider {
    /// Registers this provider's services on `container`.
    fn register(&self, container: &Container) -> DiResult<()>;

    /// Name used in diagnostics, the implementing type's name by default.
    fn name(&self) -> &str {
        type_name::<Self>()
    }
}

impl<F> ServiceProvider for F
where
    F: Fn(&Container) -> DiResult<()>,
{
    fn register(&self, container: &Container) -> DiResult<()> {
        self(container)
    }
}
