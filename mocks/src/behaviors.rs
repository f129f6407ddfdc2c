//! Mockable surfaces of the sample hierarchy and their mockall mocks
//!
//! Each behavior trait lists the methods one real type declares, and its
//! supertraits mirror the real type's bases:
//!
//! ```text
//! A      D      F
//! |
//! B           E : A, D
//! |           G : A, D, F
//! C           H : D, C, F
//! ```
//!
//! A mock for a derived type therefore implements every base's trait and can
//! be handed out through each base registry as the same allocation.

use mockall::mock;

pub trait ObjABehavior: Send + Sync {
    fn open(&self, filename: &str);
    fn close(&self);
}

pub trait ObjBBehavior: ObjABehavior {
    fn obj_b_func(&self) -> i32;
    /// Overridden by `ObjC`
    fn obj_b_v_func(&self) -> i32;
}

pub trait ObjCBehavior: ObjBBehavior {
    fn obj_c_func(&self);
}

pub trait ObjDBehavior: Send + Sync {
    fn obj_d_func(&self);
}

pub trait ObjEBehavior: ObjABehavior + ObjDBehavior {
    fn obj_e_func(&self);
}

pub trait ObjFBehavior: Send + Sync {
    fn obj_f_func(&self);
    /// Backs the static `ObjF::revision`
    fn revision(&self) -> u32;
}

pub trait ObjGBehavior: ObjABehavior + ObjDBehavior + ObjFBehavior {
    fn obj_g_func(&self);
}

pub trait ObjHBehavior: ObjDBehavior + ObjCBehavior + ObjFBehavior {
    fn obj_h_func(&self);
}

mock! {
    pub ObjA {}

    impl ObjABehavior for ObjA {
        fn open(&self, filename: &str);
        fn close(&self);
    }
}

mock! {
    pub ObjB {}

    impl ObjABehavior for ObjB {
        fn open(&self, filename: &str);
        fn close(&self);
    }

    impl ObjBBehavior for ObjB {
        fn obj_b_func(&self) -> i32;
        fn obj_b_v_func(&self) -> i32;
    }
}

mock! {
    pub ObjC {}

    impl ObjABehavior for ObjC {
        fn open(&self, filename: &str);
        fn close(&self);
    }

    impl ObjBBehavior for ObjC {
        fn obj_b_func(&self) -> i32;
        fn obj_b_v_func(&self) -> i32;
    }

    impl ObjCBehavior for ObjC {
        fn obj_c_func(&self);
    }
}

mock! {
    pub ObjD {}

    impl ObjDBehavior for ObjD {
        fn obj_d_func(&self);
    }
}

mock! {
    pub ObjE {}

    impl ObjABehavior for ObjE {
        fn open(&self, filename: &str);
        fn close(&self);
    }

    impl ObjDBehavior for ObjE {
        fn obj_d_func(&self);
    }

    impl ObjEBehavior for ObjE {
        fn obj_e_func(&self);
    }
}

mock! {
    pub ObjF {}

    impl ObjFBehavior for ObjF {
        fn obj_f_func(&self);
        fn revision(&self) -> u32;
    }
}

mock! {
    pub ObjG {}

    impl ObjABehavior for ObjG {
        fn open(&self, filename: &str);
        fn close(&self);
    }

    impl ObjDBehavior for ObjG {
        fn obj_d_func(&self);
    }

    impl ObjFBehavior for ObjG {
        fn obj_f_func(&self);
        fn revision(&self) -> u32;
    }

    impl ObjGBehavior for ObjG {
        fn obj_g_func(&self);
    }
}

mock! {
    pub ObjH {}

    impl ObjABehavior for ObjH {
        fn open(&self, filename: &str);
        fn close(&self);
    }

    impl ObjBBehavior for ObjH {
        fn obj_b_func(&self) -> i32;
        fn obj_b_v_func(&self) -> i32;
    }

    impl ObjCBehavior for ObjH {
        fn obj_c_func(&self);
    }

    impl ObjDBehavior for ObjH {
        fn obj_d_func(&self);
    }

    impl ObjFBehavior for ObjH {
        fn obj_f_func(&self);
        fn revision(&self) -> u32;
    }

    impl ObjHBehavior for ObjH {
        fn obj_h_func(&self);
    }
}
