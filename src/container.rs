//! The service container.
//!
//! Definitions, the instance cache, the alias table and the extension
//! queues live behind a single lock. The lock is never held while user code
//! (factories, decorators, providers, observers) runs, so factories are
//! free to call back into the container on the same thread.

use std::any::type_name;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::definition::{AnyArc, Definition};
use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult, FrozenAction};
use crate::extension::{self, ExtensionQueue};
use crate::internal::{BuildGuard, Map, RwLock};
use crate::observer::{DiObserver, Observers};
use crate::provider::ServiceProvider;

/// String-keyed service container.
///
/// Services are registered as [`Definition`]s and built lazily: `get`
/// builds on first access and memoizes the result, `get_new` builds a fresh
/// instance every time. Ids can be aliased, definitions can be extended
/// with decorators, and the whole configuration can be locked with
/// [`freeze`](Container::freeze).
///
/// `Container` is a cheap handle: clones share the same tables.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::Container;
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let container = Container::new();
/// container
///     .set_value("db.url", "postgres://localhost".to_string())?
///     .try_set_factory("db", |c| {
///         Ok(Database { url: (*c.get::<String>("db.url")?).clone() })
///     })?
///     .try_set_factory("users", |c| Ok(UserService { db: c.get::<Database>("db")? }))?
///     .alias("user_service", "users");
///
/// container.freeze();
///
/// let users = container.get::<UserService>("user_service")?;
/// assert_eq!(users.db.url, "postgres://localhost");
/// assert!(Arc::ptr_eq(&users, &container.get::<UserService>("users")?));
/// # Ok::<(), ferrous_locator::DiError>(())
/// ```
#[derive(Clone, Default)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

#[derive(Default)]
struct ContainerInner {
    state: RwLock<State>,
    frozen: AtomicBool,
    observers: RwLock<Observers>,
}

#[derive(Default)]
struct State {
    definitions: Map<String, Entry>,
    services: Map<String, AnyArc>,
    aliases: Map<String, String>,
    extensions: Map<String, ExtensionQueue>,
    generation: u64,
}

/// A definition tagged with the `set` call that stored it.
struct Entry {
    definition: Definition,
    generation: u64,
}

impl State {
    /// Single-hop alias lookup; targets are flattened when the alias is made.
    #[inline]
    fn real_id<'a>(&'a self, id: &'a str) -> &'a str {
        match self.aliases.get(id) {
            Some(target) => target.as_str(),
            None => id,
        }
    }
}

impl Container {
    /// Creates an empty, unfrozen container.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn owner(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    fn observers(&self) -> Observers {
        self.inner.observers.read().clone()
    }

    /// Returns true if `id`, resolved through aliases, has a definition.
    ///
    /// Never builds the service.
    pub fn has(&self, id: &str) -> bool {
        let state = self.inner.state.read();
        state.definitions.contains_key(state.real_id(id))
    }

    /// Stores `definition` under `id`, replacing any previous one.
    ///
    /// The cached instance for `id` is dropped, and if `id` was an alias it
    /// stops being one. Extensions already queued for `id` are kept.
    ///
    /// # Errors
    ///
    /// [`DiError::Frozen`] once the container is frozen.
    pub fn set(&self, id: impl Into<String>, definition: Definition) -> DiResult<&Self> {
        let id = id.into();
        {
            let mut state = self.inner.state.write();
            if self.is_frozen() {
                return Err(DiError::Frozen(FrozenAction::Define(id)));
            }

            state.generation += 1;
            let generation = state.generation;
            state.services.remove(&id);
            state.aliases.remove(&id);
            state.definitions.insert(id.clone(), Entry { definition, generation });
        }

        self.observers().defined(&id);
        Ok(self)
    }

    /// Defines a literal value.
    pub fn set_value<T: Send + Sync + 'static>(
        &self,
        id: impl Into<String>,
        value: T,
    ) -> DiResult<&Self> {
        self.set(id, Definition::value(value))
    }

    /// Defines an infallible factory.
    pub fn set_factory<T, F>(&self, id: impl Into<String>, factory: F) -> DiResult<&Self>
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> T + Send + Sync + 'static,
    {
        self.set(id, Definition::factory(factory))
    }

    /// Defines a fallible factory, typically one that resolves other
    /// services with `?`.
    pub fn try_set_factory<T, F>(&self, id: impl Into<String>, factory: F) -> DiResult<&Self>
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> DiResult<T> + Send + Sync + 'static,
    {
        self.set(id, Definition::try_factory(factory))
    }

    /// Makes `alias` refer to whatever `original` refers to right now.
    ///
    /// `original` is resolved through the current alias table before being
    /// stored, so chains are flattened here and later changes to the
    /// intermediate aliases do not move this one. The target does not need
    /// a definition yet. Aliasing is allowed on a frozen container.
    pub fn alias(&self, alias: impl Into<String>, original: &str) -> &Self {
        let mut state = self.inner.state.write();
        let target = state.real_id(original).to_string();
        state.aliases.insert(alias.into(), target);
        drop(state);
        self
    }

    /// Returns the memoized instance for `id`, building it on first access.
    ///
    /// # Errors
    ///
    /// [`DiError::NotFound`] for undefined ids, [`DiError::TypeMismatch`]
    /// when the instance is not a `T`, and any error raised by the factory
    /// or the extension queue.
    pub fn get<T: Send + Sync + 'static>(&self, id: &str) -> DiResult<Arc<T>> {
        downcast(id, self.get_any(id)?)
    }

    /// Type-erased form of [`get`](Container::get).
    pub fn get_any(&self, id: &str) -> DiResult<AnyArc> {
        let real = {
            let state = self.inner.state.read();
            let real = state.real_id(id);
            if let Some(service) = state.services.get(real) {
                return Ok(service.clone());
            }
            real.to_string()
        };

        let (service, generation) = self.build(&real)?;

        let mut state = self.inner.state.write();
        if let Some(existing) = state.services.get(&real) {
            // Another thread finished first; keep a single shared instance.
            return Ok(existing.clone());
        }
        let current = state.definitions.get(&real).map(|entry| entry.generation);
        if current == Some(generation) {
            state.services.insert(real, service.clone());
        }
        Ok(service)
    }

    /// Builds a fresh instance of `id`, bypassing the instance cache.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Container::get).
    pub fn get_new<T: Send + Sync + 'static>(&self, id: &str) -> DiResult<Arc<T>> {
        downcast(id, self.get_new_any(id)?)
    }

    /// Type-erased form of [`get_new`](Container::get_new).
    pub fn get_new_any(&self, id: &str) -> DiResult<AnyArc> {
        let real = self.inner.state.read().real_id(id).to_string();
        self.build(&real).map(|(service, _)| service)
    }

    /// Returns the stored definition for `id` without building it.
    ///
    /// # Errors
    ///
    /// [`DiError::NotFound`] for undefined ids.
    pub fn raw(&self, id: &str) -> DiResult<Definition> {
        let state = self.inner.state.read();
        let real = state.real_id(id);
        let definition = state
            .definitions
            .get(real)
            .map(|entry| entry.definition.clone())
            .ok_or_else(|| DiError::NotFound(real.to_string()));
        definition
    }

    /// Appends a decorator to the extension queue of `id`.
    ///
    /// The decorator runs on every fresh build of the service, after the
    /// factory and after any previously added decorators. Returning `None`
    /// keeps the current value; returning `Some` replaces it. Instances
    /// already cached by `get` are not rebuilt.
    ///
    /// # Errors
    ///
    /// [`DiError::Frozen`] once the container is frozen, otherwise
    /// [`DiError::InvalidArgument`] when `id` has no definition.
    pub fn extend<T, F>(&self, id: &str, decorator: F) -> DiResult<&Self>
    where
        T: Send + Sync + 'static,
        F: Fn(Arc<T>, &Container) -> Option<Arc<T>> + Send + Sync + 'static,
    {
        self.try_extend::<T, _>(id, move |current, c| Ok(decorator(current, c)))
    }

    /// Appends a fallible decorator to the extension queue of `id`.
    pub fn try_extend<T, F>(&self, id: &str, decorator: F) -> DiResult<&Self>
    where
        T: Send + Sync + 'static,
        F: Fn(Arc<T>, &Container) -> DiResult<Option<Arc<T>>> + Send + Sync + 'static,
    {
        let real = {
            let mut state = self.inner.state.write();
            if self.is_frozen() {
                return Err(DiError::Frozen(FrozenAction::Extend(id.to_string())));
            }

            let real = state.real_id(id).to_string();
            if !state.definitions.contains_key(&real) {
                return Err(DiError::InvalidArgument(real));
            }

            let decorator = extension::erase::<T, _>(&real, decorator);
            state.extensions.entry(real.clone()).or_default().push(decorator);
            real
        };

        self.observers().extended(&real);
        Ok(self)
    }

    /// Lets `provider` register its services.
    ///
    /// # Errors
    ///
    /// [`DiError::Frozen`] once the container is frozen, or whatever the
    /// provider returns.
    pub fn register<P: ServiceProvider + ?Sized>(&self, provider: &P) -> DiResult<&Self> {
        if self.is_frozen() {
            return Err(DiError::Frozen(FrozenAction::Register(provider.name().to_string())));
        }

        provider.register(self)?;
        Ok(self)
    }

    /// Locks the configuration. Idempotent and irreversible.
    ///
    /// After freezing, `set`, `extend` and `register` fail with
    /// [`DiError::Frozen`]. Resolution keeps working.
    pub fn freeze(&self) -> &Self {
        let was_frozen = {
            let _state = self.inner.state.write();
            self.inner.frozen.swap(true, Ordering::SeqCst)
        };
        if !was_frozen {
            self.observers().frozen();
        }
        self
    }

    pub fn is_frozen(&self) -> bool {
        self.inner.frozen.load(Ordering::SeqCst)
    }

    /// Registers an observer for resolution and configuration events.
    ///
    /// Observers may be added at any time, including after `freeze`.
    pub fn add_observer(&self, observer: Arc<dyn DiObserver>) -> &Self {
        self.inner.observers.write().add(observer);
        self
    }

    /// Ids that have a definition, sorted. Aliases are not included.
    pub fn ids(&self) -> Vec<String> {
        let state = self.inner.state.read();
        let mut ids: Vec<String> = state.definitions.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Snapshot of every defined service, sorted by id.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        let state = self.inner.state.read();

        let mut aliases: Map<&str, Vec<String>> = Map::default();
        for (alias, target) in &state.aliases {
            aliases.entry(target.as_str()).or_default().push(alias.clone());
        }

        let mut descriptors: Vec<ServiceDescriptor> = state
            .definitions
            .iter()
            .map(|(id, entry)| {
                let mut alias_ids = aliases.remove(id.as_str()).unwrap_or_default();
                alias_ids.sort();
                ServiceDescriptor {
                    id: id.clone(),
                    kind: entry.definition.kind(),
                    aliases: alias_ids,
                    extensions: state.extensions.get(id).map_or(0, ExtensionQueue::len),
                    instantiated: state.services.contains_key(id),
                }
            })
            .collect();
        descriptors.sort_by(|a, b| a.id.cmp(&b.id));
        descriptors
    }

    /// Builds `real` (an already alias-resolved id) without touching the
    /// cache. Returns the instance and the generation of the definition it
    /// was built from.
    fn build(&self, real: &str) -> DiResult<(AnyArc, u64)> {
        let (definition, generation, queue) = {
            let state = self.inner.state.read();
            let entry = state
                .definitions
                .get(real)
                .ok_or_else(|| DiError::NotFound(real.to_string()))?;
            (
                entry.definition.clone(),
                entry.generation,
                state.extensions.get(real).cloned(),
            )
        };

        let observers = self.observers();
        let _guard = match BuildGuard::enter(self.owner(), real) {
            Ok(guard) => guard,
            Err(err) => {
                observers.resolution_failed(real, &err);
                return Err(err);
            }
        };
        observers.resolving(real);
        let started = Instant::now();

        let result = definition.instantiate(self).and_then(|service| match &queue {
            Some(queue) => queue.get_service(service, self),
            None => Ok(service),
        });

        match &result {
            Ok(_) => observers.resolved(real, started.elapsed()),
            Err(err) => observers.resolution_failed(real, err),
        }
        result.map(|service| (service, generation))
    }
}

fn downcast<T: Send + Sync + 'static>(id: &str, service: AnyArc) -> DiResult<Arc<T>> {
    service.downcast::<T>().map_err(|_| DiError::TypeMismatch {
        id: id.to_string(),
        expected: type_name::<T>(),
    })
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("Container")
            .field("definitions", &state.definitions.len())
            .field("instances", &state.services.len())
            .field("aliases", &state.aliases.len())
            .field("extended", &state.extensions.len())
            .field("frozen", &self.is_frozen())
            .finish()
    }
}
