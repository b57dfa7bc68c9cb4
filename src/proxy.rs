use std::rc::Rc;

use crate::container::Container;
use crate::factory::AbstractFactory;
use crate::service::Service;

/// Short-lived handle returned by every registration call.
///
/// Its only purpose is attaching additional lookup names to the factory that
/// was just registered. Calls consume and return the proxy, so aliases chain
/// in one statement:
///
/// ```
/// use wirebox::{Container, CreationPolicy, Service};
///
/// #[derive(Default, Service)]
/// struct SqliteStore;
///
/// #[derive(Service)]
/// struct Store;
///
/// let container = Container::new();
/// container
///     .register_type::<SqliteStore>(CreationPolicy::Cached)
///     .as_type::<Store>()
///     .as_named("store");
///
/// assert!(container.resolve_named::<SqliteStore>("store").is_some());
/// ```
pub struct RegisterProxy<'c> {
    factory: Rc<dyn AbstractFactory>,
    container: &'c Container,
}

impl<'c> RegisterProxy<'c> {
    pub(crate) fn new(factory: Rc<dyn AbstractFactory>, container: &'c Container) -> Self {
        Self { factory, container }
    }

    /// Adds (or overwrites) a mapping from `name` to the registered factory.
    pub fn as_named(self, name: &str) -> Self {
        self.container.alias(name, &self.factory);
        self
    }

    /// Adds a mapping from `T`'s canonical name to the registered factory.
    pub fn as_type<T: Service>(self) -> Self {
        self.as_named(T::NAME)
    }
}
