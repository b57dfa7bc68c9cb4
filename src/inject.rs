use std::marker::PhantomData;
use std::rc::Rc;

use crate::container::Container;
use crate::service::Service;

/// Compile-time marker listing the dependencies a constructor needs.
///
/// The marker carries no runtime data; it is consumed once, at registration
/// time, to synthesize a creation function that resolves every listed type
/// from the container and constructs the target positionally from the
/// handles. The target type declares the constructor as a `From`
/// implementation over the handle tuple:
///
/// ```
/// use std::rc::Rc;
/// use wirebox::{inject, Container, CreationPolicy, Service};
///
/// #[derive(Default, Service)]
/// struct Engine;
///
/// #[derive(Default, Service)]
/// struct Gearbox;
///
/// #[derive(Service)]
/// struct Drivetrain {
///     engine: Rc<Engine>,
///     gearbox: Rc<Gearbox>,
/// }
///
/// impl From<(Rc<Engine>, Rc<Gearbox>)> for Drivetrain {
///     fn from((engine, gearbox): (Rc<Engine>, Rc<Gearbox>)) -> Self {
///         Self { engine, gearbox }
///     }
/// }
///
/// let container = Container::new();
/// container.register_type::<Engine>(CreationPolicy::Cached);
/// container.register_type::<Gearbox>(CreationPolicy::Cached);
/// container.register_injected::<Drivetrain, _>(
///     CreationPolicy::Fresh,
///     inject::<(Engine, Gearbox)>(),
/// );
///
/// assert!(container.resolve::<Drivetrain>().is_some());
/// ```
pub struct Inject<L: DependencyList>(PhantomData<fn() -> L>);

impl<L: DependencyList> Inject<L> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<L: DependencyList> Default for Inject<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: DependencyList> Clone for Inject<L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: DependencyList> Copy for Inject<L> {}

/// Builds an inject marker for the given dependency tuple.
pub fn inject<L: DependencyList>() -> Inject<L> {
    Inject::new()
}

/// An ordered list of abstract dependencies, resolvable as one unit.
///
/// Implemented for tuples of [`Service`] types up to eight elements.
pub trait DependencyList: 'static {
    /// The matching tuple of shared handles.
    type Handles;

    /// Resolves every listed type from `container`, in listed order.
    ///
    /// The first unresolved dependency aborts the whole list.
    fn resolve_all(container: &Container) -> Option<Self::Handles>;
}

/// Declares the dependency list of a type once, next to the type itself.
///
/// Used by [`Container::autowire_type`], which forwards the declared list to
/// the inject-marker registration form.
pub trait Autowire {
    type Dependencies: DependencyList;
}

impl DependencyList for () {
    type Handles = ();

    fn resolve_all(_container: &Container) -> Option<Self::Handles> {
        Some(())
    }
}

macro_rules! impl_dependency_list {
    ($($dep:ident),+) => {
        impl<$($dep: Service),+> DependencyList for ($($dep,)+) {
            type Handles = ($(Rc<$dep>,)+);

            fn resolve_all(container: &Container) -> Option<Self::Handles> {
                Some(($(
                    match container.resolve::<$dep>() {
                        Some(handle) => handle,
                        None => {
                            log::warn!("unresolved dependency `{}`", <$dep as Service>::NAME);
                            return None;
                        }
                    },
                )+))
            }
        }
    };
}

impl_dependency_list!(A);
impl_dependency_list!(A, B);
impl_dependency_list!(A, B, C);
impl_dependency_list!(A, B, C, D);
impl_dependency_list!(A, B, C, D, E);
impl_dependency_list!(A, B, C, D, E, F);
impl_dependency_list!(A, B, C, D, E, F, G);
impl_dependency_list!(A, B, C, D, E, F, G, H);
