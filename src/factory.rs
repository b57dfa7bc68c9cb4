use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use once_cell::unsync::OnceCell;

use crate::container::Container;
use crate::policy::CreationPolicy;

/// The common interface of all factories stored inside a [`Container`].
///
/// `create` returns a type-erased shared handle to an instance manufactured
/// according to the creation policy given at registration. The container
/// re-specializes the handle with a checked downcast, so an opaque handle
/// never has to be trusted blindly by callers.
///
/// `None` means the factory could not produce an instance (a synthesized
/// injector with an unresolved dependency, or an owning container that is
/// already gone). Factories never report errors beyond that; panics raised
/// by user construction code propagate to the resolving caller unchanged.
pub trait AbstractFactory {
    fn create(&self) -> Option<Rc<dyn Any>>;
}

/// Factory for default constructible types.
pub struct DefaultFactory<T> {
    kind: DefaultKind<T>,
}

enum DefaultKind<T> {
    Fresh,
    Cached(OnceCell<Rc<T>>),
}

impl<T: Default + 'static> DefaultFactory<T> {
    pub fn new(policy: CreationPolicy) -> Self {
        let kind = match policy {
            CreationPolicy::Fresh => DefaultKind::Fresh,
            CreationPolicy::Cached => DefaultKind::Cached(OnceCell::new()),
        };
        Self { kind }
    }
}

impl<T: Default + 'static> AbstractFactory for DefaultFactory<T> {
    fn create(&self) -> Option<Rc<dyn Any>> {
        let instance = match &self.kind {
            DefaultKind::Fresh => Rc::new(T::default()),
            // lazy creation
            DefaultKind::Cached(cell) => cell.get_or_init(|| Rc::new(T::default())).clone(),
        };
        Some(instance as Rc<dyn Any>)
    }
}

/// Factory seeded with a prototype instance of a copyable type.
///
/// With [`CreationPolicy::Fresh`] every `create` call clones the stored
/// prototype. With [`CreationPolicy::Cached`] the prototype is captured into
/// the shared instance already at registration time.
pub struct PrototypeFactory<T> {
    kind: ProtoKind<T>,
}

enum ProtoKind<T> {
    Fresh(T),
    Cached(Rc<T>),
}

impl<T: Clone + 'static> PrototypeFactory<T> {
    pub fn new(policy: CreationPolicy, proto: T) -> Self {
        let kind = match policy {
            CreationPolicy::Fresh => ProtoKind::Fresh(proto),
            CreationPolicy::Cached => ProtoKind::Cached(Rc::new(proto)),
        };
        Self { kind }
    }
}

impl<T: Clone + 'static> AbstractFactory for PrototypeFactory<T> {
    fn create(&self) -> Option<Rc<dyn Any>> {
        let instance = match &self.kind {
            ProtoKind::Fresh(proto) => Rc::new(proto.clone()),
            ProtoKind::Cached(shared) => shared.clone(),
        };
        Some(instance as Rc<dyn Any>)
    }
}

/// Creation function stored by a [`FunctorFactory`].
///
/// Returning `None` marks a failed construction; the resolution comes back
/// absent and nothing is memoized.
pub type CreateFn<T> = Box<dyn Fn(&Container) -> Option<T>>;

/// Factory for types with more complex construction.
///
/// Holds a creation function plus a weak back-reference to the owning
/// container, which the function receives for resolving its own
/// dependencies. The back-reference never keeps the container alive.
pub struct FunctorFactory<T> {
    func: CreateFn<T>,
    owner: Weak<Container>,
    cache: FunctorKind<T>,
}

enum FunctorKind<T> {
    Fresh,
    Cached(RefCell<Option<Rc<T>>>),
}

impl<T: 'static> FunctorFactory<T> {
    pub fn new(policy: CreationPolicy, func: CreateFn<T>, owner: Weak<Container>) -> Self {
        let cache = match policy {
            CreationPolicy::Fresh => FunctorKind::Fresh,
            CreationPolicy::Cached => FunctorKind::Cached(RefCell::new(None)),
        };
        Self { func, owner, cache }
    }
}

impl<T: 'static> AbstractFactory for FunctorFactory<T> {
    fn create(&self) -> Option<Rc<dyn Any>> {
        let owner = self.owner.upgrade()?;
        match &self.cache {
            FunctorKind::Fresh => (self.func)(&owner).map(|v| Rc::new(v) as Rc<dyn Any>),
            FunctorKind::Cached(slot) => {
                if let Some(existing) = slot.borrow().as_ref() {
                    return Some(existing.clone() as Rc<dyn Any>);
                }
                // The borrow is released before running the function, which
                // may re-enter the container for its own dependencies.
                let fresh = (self.func)(&owner).map(Rc::new)?;
                *slot.borrow_mut() = Some(fresh.clone());
                Some(fresh as Rc<dyn Any>)
            }
        }
    }
}
