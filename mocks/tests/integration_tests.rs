//! Integration tests for the mock vendor
//!
//! Drives the sample hierarchy the way code under test would: tests queue
//! configured mocks, real objects are constructed and dropped, and the scoped
//! vendors check the accounting on the way out.

use std::collections::VecDeque;
use std::sync::Arc;

use mock_vendor::{
    base_links_of, configure, current_config, init_test_logging, Registry, ScopedVendor, Vendable,
    VendorConfig,
};
use mocks::*;
use proptest::prelude::*;
use serial_test::serial;

fn init_logging() {
    // Only the first call installs a subscriber
    let _ = init_test_logging(&current_config().logging);
}

#[test]
#[serial]
fn test_simple_class() {
    init_logging();
    let obj_a_mock = MockBuilder::configure(|mock: &mut MockObjA| {
        mock.expect_open().times(1).return_const(());
        mock.expect_close().times(1).return_const(());
    });

    let obj_a_vendor = ScopedVendor::<ObjA>::new();
    obj_a_vendor.queue_mock(obj_a_mock);

    // Code under test
    let obj_a = ObjA::new();
    obj_a.open("some_filename");
    obj_a.close();
    drop(obj_a);

    assert_clean_teardown(obj_a_vendor.finish());
}

#[test]
#[serial]
fn test_single_inheritance() {
    init_logging();
    let obj_b_mock = MockBuilder::configure(|mock: &mut MockObjB| {
        mock.expect_open().times(1).return_const(());
        mock.expect_close().times(1).return_const(());
        mock.expect_obj_b_func().return_const(5);
        mock.expect_obj_b_v_func().return_const(6);
    });

    let obj_b_vendor = ScopedVendor::<ObjB>::new();
    obj_b_vendor.queue_mock(obj_b_mock);

    let obj_b = ObjB::new();
    obj_b.open("some_filename");
    obj_b.close();
    let first = obj_b.obj_b_func();
    let second = obj_b.obj_b_v_func();
    drop(obj_b);

    assert_eq!(first, 5);
    assert_eq!(second, 6);
    assert_clean_teardown(obj_b_vendor.finish());
}

#[test]
#[serial]
fn test_multigenerational_object() {
    init_logging();
    let obj_c_mock = MockBuilder::configure(|mock: &mut MockObjC| {
        mock.expect_open().times(1).return_const(());
        mock.expect_close().times(1).return_const(());
        mock.expect_obj_b_func().return_const(5);
        mock.expect_obj_c_func().times(1).return_const(());
        mock.expect_obj_b_v_func().return_const(7);
    });

    let obj_c_vendor = ScopedVendor::<ObjC>::new();
    obj_c_vendor.queue_mock(obj_c_mock);

    let obj_c = ObjC::new();
    obj_c.open("some_filename");
    obj_c.close();
    let first = obj_c.obj_b_func();
    let second = obj_c.obj_b_v_func();
    obj_c.obj_c_func();
    drop(obj_c);

    assert_eq!(first, 5);
    assert_eq!(second, 7);
    assert_clean_teardown(obj_c_vendor.finish());
}

#[test]
#[serial]
fn test_mixed_objects() {
    init_logging();
    let obj_c_mock = MockBuilder::configure(|mock: &mut MockObjC| {
        mock.expect_open()
            .withf(|filename| filename == "C")
            .times(1)
            .return_const(());
    });
    let obj_b_mocks = MockBuilder::<MockObjB>::configure_each(2, |index, mock| {
        let expected = format!("B{}", index + 1);
        mock.expect_open()
            .withf(move |filename| filename == expected)
            .times(1)
            .return_const(());
    });

    let obj_c_vendor = ScopedVendor::<ObjC>::new();
    let obj_b_vendor = ScopedVendor::<ObjB>::new();

    // Objects of one type must be queued in their expected construction order
    obj_c_vendor.queue_mock(obj_c_mock);
    obj_b_vendor.queue_mocks(
        obj_b_mocks
            .into_iter()
            .map(|mock| mock as Arc<dyn ObjBBehavior>),
    );

    // Construction order only matters between objects of the same type
    let obj_b1 = ObjB::new();
    let obj_c = ObjC::new();
    {
        let obj_b2 = ObjB::new();
        obj_b2.open("B2");
    }
    obj_b1.open("B1");
    obj_c.open("C");

    drop(obj_c);
    drop(obj_b1);

    assert_clean_teardown(obj_c_vendor.finish());
    assert_clean_teardown(obj_b_vendor.finish());
}

#[test]
#[serial]
fn test_default_mocks_tolerate_any_calls() {
    let vendor = ScopedVendor::<ObjC>::new();

    let obj_c = ObjC::new();
    obj_c.open("anything");
    obj_c.open("again");
    assert_eq!(obj_c.obj_b_func(), 0);
    assert_eq!(obj_c.obj_b_v_func(), 0);
    drop(obj_c);

    assert_clean_teardown(vendor.finish());
}

#[test]
#[serial]
fn test_multiple_bases_answer_from_one_mock() {
    let obj_e_mock = MockBuilder::configure(|mock: &mut MockObjE| {
        mock.expect_open().times(1).return_const(());
        mock.expect_obj_d_func().times(1).return_const(());
        mock.expect_obj_e_func().times(1).return_const(());
    });
    let vendor = ScopedVendor::<ObjE>::new();
    assert_eq!(vendor.registry_count(), 3);
    vendor.queue_mock(Arc::clone(&obj_e_mock) as Arc<dyn ObjEBehavior>);

    let obj_e = ObjE::new();
    let id = obj_e.real_id();
    assert_same_mock(&Registry::<ObjA>::mock(id), &obj_e_mock);
    assert_same_mock(&Registry::<ObjD>::mock(id), &obj_e_mock);

    obj_e.open("e");
    obj_e.obj_d_func();
    obj_e.obj_e_func();
    drop(obj_e);

    assert_unbound::<ObjA>(id);
    assert_unbound::<ObjD>(id);
    assert_clean_teardown(vendor.finish());
}

#[test]
#[serial]
fn test_three_bases_in_declaration_order() {
    assert_eq!(
        base_links_of::<ObjG>(),
        vec![ObjA::type_name(), ObjD::type_name(), ObjF::type_name()]
    );

    let obj_g_mock = MockBuilder::configure(|mock: &mut MockObjG| {
        mock.expect_close().times(1).return_const(());
        mock.expect_obj_f_func().times(1).return_const(());
        mock.expect_obj_g_func().times(1).return_const(());
    });
    let vendor = ScopedVendor::<ObjG>::new();
    vendor.queue_mock(obj_g_mock);

    let obj_g = ObjG::new();
    obj_g.close();
    obj_g.obj_f_func();
    obj_g.obj_g_func();
    drop(obj_g);

    assert_clean_teardown(vendor.finish());
}

#[test]
#[serial]
fn test_deep_hierarchy_reaches_every_ancestor() {
    let obj_h_mock = MockBuilder::configure(|mock: &mut MockObjH| {
        mock.expect_open().times(1).return_const(());
        mock.expect_obj_b_func().return_const(11);
        mock.expect_obj_b_v_func().return_const(12);
        mock.expect_obj_c_func().times(1).return_const(());
        mock.expect_obj_d_func().times(1).return_const(());
        mock.expect_obj_f_func().times(1).return_const(());
        mock.expect_obj_h_func().times(1).return_const(());
    });

    // ObjH, ObjD, ObjC, ObjB, ObjA, ObjF
    let vendor = ScopedVendor::<ObjH>::new();
    assert_eq!(vendor.registry_count(), 6);
    vendor.queue_mock(Arc::clone(&obj_h_mock) as Arc<dyn ObjHBehavior>);

    let obj_h = ObjH::new();
    let id = obj_h.real_id();
    assert_bound::<ObjA>(id);
    assert_bound::<ObjB>(id);
    assert_bound::<ObjC>(id);
    assert_bound::<ObjD>(id);
    assert_bound::<ObjF>(id);

    obj_h.open("h");
    assert_eq!(obj_h.obj_b_func(), 11);
    assert_eq!(obj_h.obj_b_v_func(), 12);
    obj_h.obj_c_func();
    obj_h.obj_d_func();
    obj_h.obj_f_func();
    obj_h.obj_h_func();
    drop(obj_h);

    for bound in [
        Registry::<ObjA>::is_bound(id),
        Registry::<ObjC>::is_bound(id),
        Registry::<ObjF>::is_bound(id),
    ] {
        assert!(!bound);
    }
    assert_clean_teardown(vendor.finish());
}

#[test]
#[serial]
fn test_unconsumed_mock_is_reported() {
    let vendor = ScopedVendor::<ObjB>::new();
    vendor.queue_mocks([
        Arc::new(nice_obj_b()) as Arc<dyn ObjBBehavior>,
        Arc::new(nice_obj_b()),
    ]);

    drop(ObjB::new());

    let report = expect_teardown_failures(vendor.finish());
    assert_eq!(report.len(), 1);
    assert_unconsumed_reported::<ObjB>(&report, 1);
    assert!(report
        .to_string()
        .contains("Failure to consume all queued mocks for ObjB - 1 remaining"));
}

#[test]
#[serial]
fn test_leaked_object_is_reported_by_identity() {
    let vendor = ScopedVendor::<ObjD>::new();
    let obj_d = ObjD::new();
    let id = obj_d.real_id();
    std::mem::forget(obj_d);

    let report = expect_teardown_failures(vendor.finish());
    assert_eq!(report.len(), 1);
    assert_leak_reported::<ObjD>(&report, id);

    let rendered = report.to_string();
    assert!(rendered.contains("Not all ObjD mock instances were destroyed - 1 remaining"));
    assert!(rendered.contains(&format!("Real: {id}")));
    assert_unbound::<ObjD>(id);
}

#[test]
#[serial]
fn test_leaked_derived_object_is_reported_per_registry() {
    let vendor = ScopedVendor::<ObjB>::new();
    let obj_b = ObjB::new();
    let id = obj_b.real_id();
    std::mem::forget(obj_b);

    let report = expect_teardown_failures(vendor.finish());
    assert_leak_reported::<ObjB>(&report, id);
    assert_leak_reported::<ObjA>(&report, id);
}

#[test]
#[serial]
fn test_leak_listing_is_truncated() {
    let original = current_config();
    configure(VendorConfig {
        leak_report_limit: 2,
        ..original.clone()
    });

    let vendor = ScopedVendor::<ObjD>::new();
    for _ in 0..3 {
        std::mem::forget(ObjD::new());
    }
    let result = vendor.finish();
    configure(original);

    let rendered = expect_teardown_failures(result).to_string();
    assert_eq!(rendered.matches("Real: ").count(), 2);
    assert!(rendered.contains("3 remaining"));
    assert!(rendered.ends_with("More..."));
}

#[test]
#[serial]
#[should_panic(expected = "Not all ObjD mock instances were destroyed")]
fn test_dropping_a_vendor_with_leaks_fails_the_test() {
    let _vendor = ScopedVendor::<ObjD>::new();
    std::mem::forget(ObjD::new());
}

#[test]
#[serial]
fn test_relocated_object_keeps_its_mock() {
    let obj_f_mock = MockBuilder::configure(|mock: &mut MockObjF| {
        mock.expect_obj_f_func().times(2).return_const(());
    });
    let vendor = ScopedVendor::<ObjF>::new();
    vendor.queue_mock(Arc::clone(&obj_f_mock) as Arc<dyn ObjFBehavior>);

    let obj_f = ObjF::new();
    let before = obj_f.real_id();
    obj_f.obj_f_func();

    let obj_f = obj_f.relocate();
    let after = obj_f.real_id();
    assert_ne!(before, after);
    assert_unbound::<ObjF>(before);
    assert_same_mock(&Registry::<ObjF>::mock(after), &obj_f_mock);

    obj_f.obj_f_func();
    drop(obj_f);

    assert_clean_teardown(vendor.finish());
}

#[test]
#[serial]
fn test_static_methods_use_the_static_mock() {
    let vendor = ScopedVendor::<ObjF>::new();
    assert_eq!(ObjF::revision(), 0);

    let static_mock = MockBuilder::configure(|mock: &mut MockObjF| {
        mock.expect_revision().times(2).return_const(42u32);
    });
    vendor.set_static_mock(static_mock);
    assert_eq!(ObjF::revision(), 42);

    // Instances and statics are separate channels
    let obj_f = ObjF::new();
    obj_f.obj_f_func();
    assert_eq!(ObjF::revision(), 42);
    drop(obj_f);

    assert_clean_teardown(vendor.finish());
    assert!(!Registry::<ObjF>::has_static_mock());
}

#[test]
#[serial]
fn test_vendable_contracts() {
    let obj_a_mocks: Vec<Arc<dyn ObjABehavior>> =
        vec![Arc::new(nice_obj_a()), Arc::new(nice_obj_a())];
    check_vendable_contract::<ObjA>(obj_a_mocks);

    let obj_d_mock: Arc<dyn ObjDBehavior> = Arc::new(nice_obj_d());
    check_vendable_contract::<ObjD>(vec![obj_d_mock]);

    let obj_h_mocks: Vec<Arc<dyn ObjHBehavior>> = (0..3)
        .map(|_| Arc::new(nice_obj_h()) as Arc<dyn ObjHBehavior>)
        .collect();
    check_vendable_contract::<ObjH>(obj_h_mocks);
}

#[test]
#[serial]
fn test_base_link_contracts() {
    check_direct_base_contract::<ObjB, ObjA>();
    check_direct_base_contract::<ObjC, ObjB>();
    check_direct_base_contract::<ObjE, ObjA>();
    check_direct_base_contract::<ObjE, ObjD>();
    check_direct_base_contract::<ObjG, ObjF>();
    check_direct_base_contract::<ObjH, ObjC>();

    // Through intermediate bases
    check_reachable_base_contract::<ObjC, ObjA>();
    check_reachable_base_contract::<ObjH, ObjA>();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    #[serial]
    fn prop_teardown_matches_lifecycle_model(steps in lifecycle(30)) {
        let model = LifecycleModel::replay(&steps);
        let vendor = ScopedVendor::<ObjD>::new();

        let mut live = VecDeque::new();
        let mut leaked = Vec::new();
        for step in &steps {
            match step {
                LifecycleStep::Queue => {
                    vendor.queue_mock(Arc::new(nice_obj_d()));
                }
                LifecycleStep::Construct => live.push_back(ObjD::new()),
                LifecycleStep::DropOldest => drop(live.pop_front()),
                LifecycleStep::Leak => {
                    if let Some(obj_d) = live.pop_back() {
                        leaked.push(obj_d.real_id());
                        std::mem::forget(obj_d);
                    }
                }
            }
        }
        prop_assert_eq!(Registry::<ObjD>::queued_count(), model.queued);
        prop_assert_eq!(live.len(), model.live);
        drop(live);

        let report = vendor.finish().err().unwrap_or_default();
        prop_assert_eq!(report.len(), model.expected_failures());
        prop_assert_eq!(
            report.unconsumed_queues().map(|failure| failure.count()).sum::<usize>(),
            model.queued
        );
        prop_assert_eq!(
            report.leaks().map(|failure| failure.count()).sum::<usize>(),
            leaked.len()
        );
        for id in leaked {
            assert_leak_reported::<ObjD>(&report, id);
        }
    }
}
