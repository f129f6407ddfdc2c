//! Real-type stand-ins for the sample hierarchy
//!
//! These are what production code would construct. Each constructor vends a
//! mock, each `Drop` destroys it, and every method forwards to the mock bound
//! in the registry of the type that declares the method. Inherited methods
//! come from the `*Methods` traits, so a call made on an `ObjC` through
//! `ObjAMethods::open` is answered by `ObjA`'s registry, where the `ObjC` mock
//! was installed when the object was built.

use std::sync::Arc;

use mock_vendor::{Bases, Inherits, RealId, Registry, Vendable};

use crate::behaviors::{
    ObjABehavior, ObjBBehavior, ObjCBehavior, ObjDBehavior, ObjEBehavior, ObjFBehavior,
    ObjGBehavior, ObjHBehavior,
};
use crate::fixtures;

/// A constructed real object and the identity its mocks are bound to
pub trait RealObject {
    fn real_id(&self) -> RealId;
}

pub trait ObjAMethods: RealObject {
    fn open(&self, filename: &str) {
        Registry::<ObjA>::mock(self.real_id()).open(filename)
    }

    fn close(&self) {
        Registry::<ObjA>::mock(self.real_id()).close()
    }
}

pub trait ObjBMethods: ObjAMethods {
    fn obj_b_func(&self) -> i32 {
        Registry::<ObjB>::mock(self.real_id()).obj_b_func()
    }

    fn obj_b_v_func(&self) -> i32 {
        Registry::<ObjB>::mock(self.real_id()).obj_b_v_func()
    }
}

pub trait ObjCMethods: ObjBMethods {
    fn obj_c_func(&self) {
        Registry::<ObjC>::mock(self.real_id()).obj_c_func()
    }
}

pub trait ObjDMethods: RealObject {
    fn obj_d_func(&self) {
        Registry::<ObjD>::mock(self.real_id()).obj_d_func()
    }
}

pub trait ObjFMethods: RealObject {
    fn obj_f_func(&self) {
        Registry::<ObjF>::mock(self.real_id()).obj_f_func()
    }
}

macro_rules! real_object {
    ($($name:ident),+ $(,)?) => {
        $(
            impl RealObject for $name {
                fn real_id(&self) -> RealId {
                    self.id
                }
            }

            impl Drop for $name {
                fn drop(&mut self) {
                    Registry::<$name>::destroy(self.id);
                }
            }
        )+
    };
}

/// Real types identified by a token drawn at construction
macro_rules! token_object {
    ($($name:ident),+ $(,)?) => {
        $(
            #[derive(Debug)]
            pub struct $name {
                id: RealId,
            }

            impl $name {
                pub fn new() -> Self {
                    let id = RealId::next();
                    Registry::<$name>::vend(id);
                    Self { id }
                }
            }

            impl Default for $name {
                fn default() -> Self {
                    Self::new()
                }
            }
        )+

        real_object!($($name),+);
    };
}

token_object!(ObjA, ObjB, ObjC, ObjD, ObjE, ObjG, ObjH);

/// Identified by its heap address, so moving it to a new box rebinds its mock
#[derive(Debug)]
pub struct ObjF {
    id: RealId,
}

real_object!(ObjF);

impl ObjF {
    pub fn new() -> Box<Self> {
        let mut obj = Box::new(Self {
            id: RealId::from(0),
        });
        obj.id = RealId::of(&*obj);
        Registry::<ObjF>::vend(obj.id);
        obj
    }

    /// Move into a fresh allocation, carrying the bound mock along
    pub fn relocate(self: Box<Self>) -> Box<Self> {
        let mut moved = Box::new(Self { id: self.id });
        moved.id = RealId::of(&*moved);
        Registry::<ObjF>::rebind(self.id, moved.id);
        // The old identity has nothing bound any more, so its drop is a no-op
        drop(self);
        moved
    }

    /// Static method, answered by the static mock
    pub fn revision() -> u32 {
        Registry::<ObjF>::static_mock().revision()
    }
}

impl ObjAMethods for ObjA {}

impl ObjAMethods for ObjB {}
impl ObjBMethods for ObjB {}

impl ObjAMethods for ObjC {}
impl ObjBMethods for ObjC {
    // Same signature as ObjB's, but answered by ObjC's registry
    fn obj_b_v_func(&self) -> i32 {
        Registry::<ObjC>::mock(self.id).obj_b_v_func()
    }
}
impl ObjCMethods for ObjC {}

impl ObjDMethods for ObjD {}

impl ObjAMethods for ObjE {}
impl ObjDMethods for ObjE {}
impl ObjE {
    pub fn obj_e_func(&self) {
        Registry::<ObjE>::mock(self.id).obj_e_func()
    }
}

impl ObjFMethods for ObjF {}

impl ObjAMethods for ObjG {}
impl ObjDMethods for ObjG {}
impl ObjFMethods for ObjG {}
impl ObjG {
    pub fn obj_g_func(&self) {
        Registry::<ObjG>::mock(self.id).obj_g_func()
    }
}

impl ObjAMethods for ObjH {}
impl ObjBMethods for ObjH {
    fn obj_b_v_func(&self) -> i32 {
        Registry::<ObjC>::mock(self.id).obj_b_v_func()
    }
}
impl ObjCMethods for ObjH {}
impl ObjDMethods for ObjH {}
impl ObjFMethods for ObjH {}
impl ObjH {
    pub fn obj_h_func(&self) {
        Registry::<ObjH>::mock(self.id).obj_h_func()
    }
}

impl Vendable for ObjA {
    type Mock = dyn ObjABehavior;

    fn nice_mock() -> Arc<dyn ObjABehavior> {
        Arc::new(fixtures::nice_obj_a())
    }

    fn type_name() -> &'static str {
        "ObjA"
    }
}

impl Vendable for ObjB {
    type Mock = dyn ObjBBehavior;

    fn nice_mock() -> Arc<dyn ObjBBehavior> {
        Arc::new(fixtures::nice_obj_b())
    }

    fn declare_bases(bases: &mut Bases<Self>) {
        bases.link::<ObjA>();
    }

    fn type_name() -> &'static str {
        "ObjB"
    }
}

impl Vendable for ObjC {
    type Mock = dyn ObjCBehavior;

    fn nice_mock() -> Arc<dyn ObjCBehavior> {
        Arc::new(fixtures::nice_obj_c())
    }

    fn declare_bases(bases: &mut Bases<Self>) {
        bases.link::<ObjB>();
    }

    fn type_name() -> &'static str {
        "ObjC"
    }
}

impl Vendable for ObjD {
    type Mock = dyn ObjDBehavior;

    fn nice_mock() -> Arc<dyn ObjDBehavior> {
        Arc::new(fixtures::nice_obj_d())
    }

    fn type_name() -> &'static str {
        "ObjD"
    }
}

impl Vendable for ObjE {
    type Mock = dyn ObjEBehavior;

    fn nice_mock() -> Arc<dyn ObjEBehavior> {
        Arc::new(fixtures::nice_obj_e())
    }

    fn declare_bases(bases: &mut Bases<Self>) {
        bases.link::<ObjA>().link::<ObjD>();
    }

    fn type_name() -> &'static str {
        "ObjE"
    }
}

impl Vendable for ObjF {
    type Mock = dyn ObjFBehavior;

    fn nice_mock() -> Arc<dyn ObjFBehavior> {
        Arc::new(fixtures::nice_obj_f())
    }

    fn type_name() -> &'static str {
        "ObjF"
    }
}

impl Vendable for ObjG {
    type Mock = dyn ObjGBehavior;

    fn nice_mock() -> Arc<dyn ObjGBehavior> {
        Arc::new(fixtures::nice_obj_g())
    }

    fn declare_bases(bases: &mut Bases<Self>) {
        bases.link::<ObjA>().link::<ObjD>().link::<ObjF>();
    }

    fn type_name() -> &'static str {
        "ObjG"
    }
}

impl Vendable for ObjH {
    type Mock = dyn ObjHBehavior;

    fn nice_mock() -> Arc<dyn ObjHBehavior> {
        Arc::new(fixtures::nice_obj_h())
    }

    fn declare_bases(bases: &mut Bases<Self>) {
        bases.link::<ObjD>().link::<ObjC>().link::<ObjF>();
    }

    fn type_name() -> &'static str {
        "ObjH"
    }
}

/// `impl Inherits<Base> for Derived` for trait-object mocks, where the
/// upcast is the supertrait coercion
macro_rules! inherits {
    ($($derived:ident => $base:ident),+ $(,)?) => {
        $(
            impl Inherits<$base> for $derived {
                fn upcast(mock: Arc<<$derived as Vendable>::Mock>) -> Arc<<$base as Vendable>::Mock> {
                    mock
                }
            }
        )+
    };
}

inherits!(
    ObjB => ObjA,
    ObjC => ObjB,
    ObjE => ObjA,
    ObjE => ObjD,
    ObjG => ObjA,
    ObjG => ObjD,
    ObjG => ObjF,
    ObjH => ObjD,
    ObjH => ObjC,
    ObjH => ObjF,
);
