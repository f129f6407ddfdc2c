//! Permissive mocks for the sample hierarchy
//!
//! mockall panics on any call without a matching expectation. The registry's
//! default mocks must tolerate anything, so every method here gets an
//! expectation with no call-count bound that returns the type's default.

use crate::behaviors::{
    MockObjA, MockObjB, MockObjC, MockObjD, MockObjE, MockObjF, MockObjG, MockObjH,
};

/// Accept any number of calls to each listed method, answering `$value`
macro_rules! permit {
    ($mock:ident: $($expect:ident => $value:expr),+ $(,)?) => {
        $( $mock.$expect().return_const($value); )+
    };
}

pub fn nice_obj_a() -> MockObjA {
    let mut mock = MockObjA::new();
    permit!(mock: expect_open => (), expect_close => ());
    mock
}

pub fn nice_obj_b() -> MockObjB {
    let mut mock = MockObjB::new();
    permit!(mock:
        expect_open => (),
        expect_close => (),
        expect_obj_b_func => 0,
        expect_obj_b_v_func => 0,
    );
    mock
}

pub fn nice_obj_c() -> MockObjC {
    let mut mock = MockObjC::new();
    permit!(mock:
        expect_open => (),
        expect_close => (),
        expect_obj_b_func => 0,
        expect_obj_b_v_func => 0,
        expect_obj_c_func => (),
    );
    mock
}

pub fn nice_obj_d() -> MockObjD {
    let mut mock = MockObjD::new();
    permit!(mock: expect_obj_d_func => ());
    mock
}

pub fn nice_obj_e() -> MockObjE {
    let mut mock = MockObjE::new();
    permit!(mock:
        expect_open => (),
        expect_close => (),
        expect_obj_d_func => (),
        expect_obj_e_func => (),
    );
    mock
}

pub fn nice_obj_f() -> MockObjF {
    let mut mock = MockObjF::new();
    permit!(mock: expect_obj_f_func => (), expect_revision => 0u32);
    mock
}

pub fn nice_obj_g() -> MockObjG {
    let mut mock = MockObjG::new();
    permit!(mock:
        expect_open => (),
        expect_close => (),
        expect_obj_d_func => (),
        expect_obj_f_func => (),
        expect_revision => 0u32,
        expect_obj_g_func => (),
    );
    mock
}

pub fn nice_obj_h() -> MockObjH {
    let mut mock = MockObjH::new();
    permit!(mock:
        expect_open => (),
        expect_close => (),
        expect_obj_b_func => 0,
        expect_obj_b_v_func => 0,
        expect_obj_c_func => (),
        expect_obj_d_func => (),
        expect_obj_f_func => (),
        expect_revision => 0u32,
        expect_obj_h_func => (),
    );
    mock
}
