/// Declares how a registered factory manufactures instances during resolution.
///
/// The policy is picked when registering a type with a [`Container`] and is
/// immutable afterwards.
///
/// [`Container`]: crate::Container
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CreationPolicy {
    /// Every resolution manufactures a new instance.
    #[default]
    Fresh,
    /// The first resolution manufactures the instance, every later one
    /// returns a handle to that same instance.
    Cached,
}
