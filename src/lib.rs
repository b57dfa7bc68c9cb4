//! wirebox is a lightweight inversion-of-control registry.
//!
//! Independent parts of a program register the concrete implementation that
//! satisfies an abstract dependency; other parts later resolve an instance
//! by name without knowing the concrete type or construction recipe.
//!
//! ```
//! use std::rc::Rc;
//! use wirebox::{Container, CreationPolicy, Service};
//!
//! #[derive(Default, Service)]
//! struct FrameCounter;
//!
//! let root = Container::new();
//! root.register_type::<FrameCounter>(CreationPolicy::Cached)
//!     .as_named("frame-counter");
//!
//! let scope = Container::with_parent(&root);
//! let counter = scope.resolve::<FrameCounter>();
//! assert!(counter.is_some());
//! ```
//!
//! Resolution failure is not an error: a name that is registered neither
//! locally nor anywhere up the parent chain resolves to `None`, and callers
//! handle the absent case themselves.

pub mod container;
pub mod factory;
pub mod inject;
pub mod policy;
pub mod proxy;
pub mod service;

pub use container::Container;
pub use factory::AbstractFactory;
pub use factory::CreateFn;
pub use factory::DefaultFactory;
pub use factory::FunctorFactory;
pub use factory::PrototypeFactory;
pub use inject::inject;
pub use inject::Autowire;
pub use inject::DependencyList;
pub use inject::Inject;
pub use policy::CreationPolicy;
pub use proxy::RegisterProxy;
pub use service::Service;

pub use wirebox_derive::Service;
