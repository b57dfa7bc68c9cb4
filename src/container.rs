use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, trace, warn};

use crate::factory::{AbstractFactory, CreateFn, DefaultFactory, FunctorFactory, PrototypeFactory};
use crate::inject::{Autowire, DependencyList, Inject};
use crate::policy::CreationPolicy;
use crate::proxy::RegisterProxy;
use crate::service::Service;

/// The inversion-of-control registry.
///
/// A container owns a mapping from registration names to factories and an
/// optional weak reference to a parent container. Containers form scope
/// chains: a name that cannot be resolved locally is delegated to the
/// parent, recursively, until resolved or the chain is exhausted.
///
/// Containers always live behind an [`Rc`] (both constructors return one) so
/// that factories and children can hold weak back-references. The type is
/// neither `Clone` nor `Send`/`Sync`; resolution and caching are scoped to
/// one container identity, and all mutation is expected to happen from a
/// single logical thread of control.
///
/// ```
/// use std::rc::Rc;
/// use wirebox::{Container, CreationPolicy, Service};
///
/// #[derive(Default, Service)]
/// struct Clock;
///
/// let container = Container::new();
/// container.register_type::<Clock>(CreationPolicy::Cached);
///
/// let a = container.resolve::<Clock>().unwrap();
/// let b = container.resolve::<Clock>().unwrap();
/// assert!(Rc::ptr_eq(&a, &b));
/// ```
pub struct Container {
    factories: RefCell<HashMap<String, Rc<dyn AbstractFactory>>>,
    parent: Weak<Container>,
}

impl Container {
    /// Creates a root container without a parent scope.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            factories: RefCell::new(HashMap::new()),
            parent: Weak::new(),
        })
    }

    /// Creates a container chained to a parent scope.
    ///
    /// The parent is held weakly: the child never extends the parent's
    /// lifetime, and once the parent is dropped delegation simply stops.
    pub fn with_parent(parent: &Rc<Container>) -> Rc<Self> {
        Rc::new(Self {
            factories: RefCell::new(HashMap::new()),
            parent: Rc::downgrade(parent),
        })
    }

    /// Registers a default constructible type under its canonical name.
    pub fn register_type<T>(self: &Rc<Self>, policy: CreationPolicy) -> RegisterProxy<'_>
    where
        T: Service + Default,
    {
        debug!("registering `{}` ({:?}, default construction)", T::NAME, policy);
        self.store(T::NAME, Rc::new(DefaultFactory::<T>::new(policy)))
    }

    /// Registers a copyable prototype under its canonical name.
    ///
    /// Resolved instances are copies of `proto`; with
    /// [`CreationPolicy::Cached`] a single copy is captured right here and
    /// shared by every resolution.
    pub fn register_prototype<T>(self: &Rc<Self>, policy: CreationPolicy, proto: T) -> RegisterProxy<'_>
    where
        T: Service + Clone,
    {
        debug!("registering `{}` ({:?}, prototype)", T::NAME, policy);
        self.store(T::NAME, Rc::new(PrototypeFactory::new(policy, proto)))
    }

    /// Registers a creation function for its result type.
    ///
    /// The function receives the owning container and may use it to resolve
    /// dependencies of its own.
    pub fn register_fn<T, F>(self: &Rc<Self>, policy: CreationPolicy, func: F) -> RegisterProxy<'_>
    where
        T: Service,
        F: Fn(&Container) -> T + 'static,
    {
        debug!("registering `{}` ({:?}, functor)", T::NAME, policy);
        self.store_functor(policy, Box::new(move |c: &Container| Some(func(c))))
    }

    /// Registers a type constructed from the dependencies listed in the
    /// inject marker.
    ///
    /// Synthesizes a creation function that resolves every listed type from
    /// this container, in listed order, and builds `T` from the handles. A
    /// dependency that cannot be resolved makes the whole resolution come
    /// back absent.
    pub fn register_injected<T, L>(self: &Rc<Self>, policy: CreationPolicy, _marker: Inject<L>) -> RegisterProxy<'_>
    where
        T: Service + From<L::Handles>,
        L: DependencyList,
    {
        debug!("registering `{}` ({:?}, injected)", T::NAME, policy);
        self.store_functor(
            policy,
            Box::new(move |c: &Container| match L::resolve_all(c) {
                Some(handles) => Some(T::from(handles)),
                None => {
                    warn!("cannot construct `{}`: unresolved dependency", T::NAME);
                    None
                }
            }),
        )
    }

    /// Registers a type using its own declared dependency list.
    ///
    /// Shorthand for [`register_injected`](Self::register_injected) with the
    /// list from the type's [`Autowire`] implementation.
    pub fn autowire_type<T>(self: &Rc<Self>, policy: CreationPolicy) -> RegisterProxy<'_>
    where
        T: Service + Autowire + From<<<T as Autowire>::Dependencies as DependencyList>::Handles>,
    {
        self.register_injected::<T, T::Dependencies>(policy, Inject::new())
    }

    /// Resolves a type by its canonical name.
    pub fn resolve<T: Service>(&self) -> Option<Rc<T>> {
        self.resolve_named::<T>(T::NAME)
    }

    /// Resolves a type by an explicit registration name.
    ///
    /// A locally registered factory is invoked and its handle re-specialized
    /// with a checked downcast; asking for the wrong type yields `None`, not
    /// undefined behavior. When the name is unknown locally the request is
    /// delegated to the parent scope, retrying with `T`'s canonical name
    /// rather than `name`. An exhausted chain yields `None` as well; a
    /// missing registration is a representable outcome, never an error.
    pub fn resolve_named<T: Service>(&self, name: &str) -> Option<Rc<T>> {
        // The factory handle is cloned out so the map borrow is released
        // before `create`, which may re-enter this container.
        let local = self.factories.borrow().get(name).cloned();
        if let Some(factory) = local {
            trace!("resolving `{name}` locally");
            let opaque = factory.create()?;
            return match opaque.downcast::<T>() {
                Ok(instance) => Some(instance),
                Err(_) => {
                    warn!("`{name}` is registered, but not as `{}`", T::NAME);
                    None
                }
            };
        }

        match self.parent.upgrade() {
            Some(parent) => {
                trace!("delegating `{}` to parent scope", T::NAME);
                parent.resolve::<T>()
            }
            None => {
                trace!("`{name}` not registered anywhere up the chain");
                None
            }
        }
    }

    fn store_functor<T: Service>(self: &Rc<Self>, policy: CreationPolicy, func: CreateFn<T>) -> RegisterProxy<'_> {
        let factory = FunctorFactory::new(policy, func, Rc::downgrade(self));
        self.store(T::NAME, Rc::new(factory))
    }

    fn store(&self, name: &str, factory: Rc<dyn AbstractFactory>) -> RegisterProxy<'_> {
        // Re-registering a name silently replaces the previous factory.
        self.factories
            .borrow_mut()
            .insert(name.to_owned(), factory.clone());
        RegisterProxy::new(factory, self)
    }

    pub(crate) fn alias(&self, name: &str, factory: &Rc<dyn AbstractFactory>) {
        debug!("aliasing `{name}`");
        self.factories
            .borrow_mut()
            .insert(name.to_owned(), factory.clone());
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registered", &self.factories.borrow().len())
            .field("has_parent", &self.parent.upgrade().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Engine {
        rpm: std::cell::Cell<u32>,
    }

    impl Service for Engine {
        const NAME: &'static str = "tests::Engine";
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Settings {
        volume: u8,
    }

    impl Service for Settings {
        const NAME: &'static str = "tests::Settings";
    }

    #[test]
    fn fresh_resolutions_are_distinct() {
        let container = Container::new();
        container.register_type::<Engine>(CreationPolicy::Fresh);

        let a = container.resolve::<Engine>().unwrap();
        let b = container.resolve::<Engine>().unwrap();
        assert!(!Rc::ptr_eq(&a, &b));
        assert_eq!(a.rpm.get(), b.rpm.get());
    }

    #[test]
    fn cached_resolutions_share_identity_and_state() {
        let container = Container::new();
        container.register_type::<Engine>(CreationPolicy::Cached);

        let a = container.resolve::<Engine>().unwrap();
        a.rpm.set(7000);

        let b = container.resolve::<Engine>().unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(b.rpm.get(), 7000);
    }

    #[test]
    fn prototype_resolutions_are_value_equal_copies() {
        let container = Container::new();
        let proto = Settings { volume: 11 };
        container.register_prototype(CreationPolicy::Fresh, proto.clone());

        let a = container.resolve::<Settings>().unwrap();
        let b = container.resolve::<Settings>().unwrap();
        assert_eq!(*a, proto);
        assert_eq!(*b, proto);
        assert!(!Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn functor_registration_resolves_through_the_container() {
        let container = Container::new();
        container.register_prototype(CreationPolicy::Fresh, Settings { volume: 3 });
        container.register_fn(CreationPolicy::Fresh, |c: &Container| {
            let settings = c.resolve::<Settings>().unwrap();
            let engine = Engine::default();
            engine.rpm.set(u32::from(settings.volume) * 100);
            engine
        });

        let engine = container.resolve::<Engine>().unwrap();
        assert_eq!(engine.rpm.get(), 300);
    }

    #[test]
    fn missing_registration_resolves_to_none() {
        let container = Container::new();
        assert!(container.resolve::<Engine>().is_none());
    }

    #[test]
    fn wrong_type_for_a_name_resolves_to_none() {
        let container = Container::new();
        container.register_type::<Engine>(CreationPolicy::Fresh);

        assert!(container.resolve_named::<Settings>(Engine::NAME).is_none());
    }

    #[test]
    fn re_registration_overwrites_silently() {
        let container = Container::new();
        container.register_prototype(CreationPolicy::Fresh, Settings { volume: 1 });
        container.register_prototype(CreationPolicy::Fresh, Settings { volume: 2 });

        assert_eq!(container.resolve::<Settings>().unwrap().volume, 2);
    }

    #[test]
    fn child_scope_delegates_to_parent() {
        let parent = Container::new();
        parent.register_type::<Engine>(CreationPolicy::Cached);
        let child = Container::with_parent(&parent);

        let from_child = child.resolve::<Engine>().unwrap();
        let from_parent = parent.resolve::<Engine>().unwrap();
        assert!(Rc::ptr_eq(&from_child, &from_parent));
    }

    #[test]
    fn child_registration_shadows_parent() {
        let parent = Container::new();
        parent.register_prototype(CreationPolicy::Fresh, Settings { volume: 1 });
        let child = Container::with_parent(&parent);
        child.register_prototype(CreationPolicy::Fresh, Settings { volume: 9 });

        assert_eq!(child.resolve::<Settings>().unwrap().volume, 9);
        assert_eq!(parent.resolve::<Settings>().unwrap().volume, 1);
    }

    #[test]
    fn delegation_retries_with_the_canonical_name() {
        let parent = Container::new();
        parent.register_type::<Engine>(CreationPolicy::Cached);
        let child = Container::with_parent(&parent);

        // The custom name is unknown in both scopes, but the fall-through
        // to the parent looks up the canonical name instead.
        let resolved = child.resolve_named::<Engine>("some-alias");
        assert!(resolved.is_some());
    }

    #[test]
    fn dropping_the_parent_ends_delegation() {
        let parent = Container::new();
        parent.register_type::<Engine>(CreationPolicy::Fresh);
        let child = Container::with_parent(&parent);
        drop(parent);

        assert!(child.resolve::<Engine>().is_none());
    }
}
