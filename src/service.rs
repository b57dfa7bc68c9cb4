/// A type registrable with a [`Container`], carrying its canonical name.
///
/// The canonical name is the default lookup key for the type. It is supplied
/// by the programmer instead of being derived from compiler type metadata, so
/// it stays stable across builds and platforms. Additional lookup names can
/// be attached as aliases after registration.
///
/// Usually implemented via `#[derive(Service)]`, which defaults the name to
/// `module_path!()::TypeName` and accepts `#[service(name = "...")]` as an
/// override.
///
/// [`Container`]: crate::Container
pub trait Service: 'static {
    /// Canonical registration name of this type.
    const NAME: &'static str;
}
