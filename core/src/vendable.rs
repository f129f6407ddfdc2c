use std::marker::PhantomData;
use std::sync::Arc;

use crate::links::BaseLink;

/// A real type whose instances receive mocks from the registry.
///
/// Implemented once per Real/Mock pair, normally on the real type itself.
/// `Mock` is usually a trait object (`dyn ObjBBehavior`) so that a mock for a
/// derived type can be handed out through every base registry as the same
/// allocation.
///
/// ```rust
/// use std::sync::Arc;
/// use mock_vendor::{RealId, Registry, Vendable};
///
/// pub trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// struct SilentGreeter;
///
/// impl Greeter for SilentGreeter {
///     fn greet(&self) -> String {
///         String::new()
///     }
/// }
///
/// struct Host {
///     id: RealId,
/// }
///
/// impl Vendable for Host {
///     type Mock = dyn Greeter;
///
///     fn nice_mock() -> Arc<dyn Greeter> {
///         Arc::new(SilentGreeter)
///     }
/// }
///
/// let id = RealId::next();
/// Registry::<Host>::vend(id);
/// assert_eq!(Registry::<Host>::mock(id).greet(), "");
/// Registry::<Host>::destroy(id);
/// ```
pub trait Vendable: Sized + 'static {
    /// The callable surface the real type forwards to
    type Mock: ?Sized + Send + Sync + 'static;

    /// A permissive mock with no expectations and default return values.
    ///
    /// Called while the registry lock is held, so it must not call back into
    /// the registry.
    fn nice_mock() -> Arc<Self::Mock>;

    /// Declare the base types that share this type's mocks.
    ///
    /// Runs once, when the type's registry is first touched.
    fn declare_bases(_bases: &mut Bases<Self>) {}

    /// Name used in logs and teardown reports
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Upcast from a derived type's mock handle to one of its base's handles.
///
/// The returned `Arc` must point at the same allocation; for trait objects
/// the body is just `mock`.
pub trait Inherits<B: Vendable>: Vendable {
    fn upcast(mock: Arc<Self::Mock>) -> Arc<B::Mock>;
}

/// Collector handed to [`Vendable::declare_bases`]
pub struct Bases<D: Vendable> {
    links: Vec<BaseLink>,
    _derived: PhantomData<fn() -> D>,
}

impl<D: Vendable> Bases<D> {
    pub(crate) fn new() -> Self {
        Self {
            links: Vec::new(),
            _derived: PhantomData,
        }
    }

    /// Link `D` to its direct base `B`
    pub fn link<B>(&mut self) -> &mut Self
    where
        B: Vendable,
        D: Inherits<B>,
    {
        self.links.push(BaseLink::new::<D, B>());
        self
    }

    pub(crate) fn into_links(self) -> Vec<BaseLink> {
        self.links
    }
}
