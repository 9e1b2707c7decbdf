// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registration against a recording host.

mod common;

use common::*;
use uia_pattern::config::{E_FAIL, E_INVALIDARG};
use uia_pattern::{
    build_schema, HostError, PatternSchema, Registrar, RegistrationError, RegistrationOptions,
    WireType,
};

fn test_schema() -> PatternSchema<dyn AttrDrivenTestProvider> {
    build_schema::<dyn AttrDrivenTestProvider, dyn AttrDrivenTestPattern>().expect("schema")
}

#[test]
fn test_register_writes_back_ids_and_indices() {
    init_logging();
    let host = RecordingHost::new(100);
    let mut schema = test_schema();

    let ids = Registrar::new(&host)
        .register(&mut schema, false)
        .expect("register");

    assert!(schema.is_registered());
    assert_eq!(schema.pattern_id(), Some(100));
    assert_eq!(schema.availability_property_id(), Some(101));
    assert_eq!(schema.availability_property_name(), "IsAttrDrivenTestPatternAvailable");
    assert_eq!(ids.property_ids, vec![102, 103]);
    assert_eq!(ids.event_ids, vec![104]);

    let property_ids: Vec<_> = schema.properties().iter().map(|p| p.property_id()).collect();
    assert_eq!(property_ids, vec![Some(102), Some(103)]);
    assert_eq!(schema.event("ValueChanged").and_then(|e| e.event_id()), Some(104));

    let property_indices: Vec<_> = schema.properties().iter().map(|p| p.index()).collect();
    assert_eq!(property_indices, vec![Some(0), Some(1)]);
    let method_indices: Vec<_> = schema.methods().iter().map(|m| m.index()).collect();
    assert_eq!(method_indices, vec![Some(2), Some(3), Some(4), Some(5)]);
}

#[test]
fn test_submission_mirrors_schema() {
    let host = RecordingHost::new(100);
    let mut schema = test_schema();
    Registrar::new(&host)
        .register(&mut schema, false)
        .expect("register");

    let submission = host.last_submission().expect("submission");
    assert_eq!(submission.name, "AttrDrivenTestPattern");
    assert_eq!(submission.pattern_guid, TEST_PATTERN_GUID);
    assert_eq!(submission.provider_iid, TEST_PROVIDER_IID);
    assert_eq!(submission.client_iid, TEST_CLIENT_IID);

    let props: Vec<_> = submission
        .properties
        .iter()
        .map(|p| (p.name.as_str(), p.wire_type, p.guid))
        .collect();
    assert_eq!(
        props,
        vec![
            ("BoolProperty", WireType::BOOL, BOOL_PROPERTY_GUID),
            ("IntProperty", WireType::INT, INT_PROPERTY_GUID),
        ]
    );

    let in_out = &submission.methods[3];
    assert_eq!(in_out.name, "BoolMethodWithInAndOutParams");
    assert!(!in_out.do_set_focus);
    assert_eq!((in_out.in_count, in_out.out_count), (1, 2));
    let codes: Vec<_> = in_out.parameters.iter().map(|p| p.wire_type.code()).collect();
    assert_eq!(codes, vec![0x1, 0x2_0003, 0x2_0002]);

    assert!(submission.methods[1].do_set_focus);
    assert_eq!(submission.events[0].name, "ValueChanged");
    assert_eq!(submission.events[0].guid, CHANGED_EVENT_GUID);
}

#[test]
fn test_second_register_is_a_no_op() {
    let host = RecordingHost::new(7);
    let registrar = Registrar::new(&host);
    let mut schema = test_schema();

    let first = registrar.register(&mut schema, false).expect("first");
    let second = registrar.register(&mut schema, false).expect("second");

    assert_eq!(host.calls(), 1);
    assert_eq!(first, second);
}

#[test]
fn test_host_failure_leaves_schema_unregistered() {
    let host = RecordingHost::new(7);
    host.fail_next(HostError::new(E_INVALIDARG, "bad pattern"));
    let registrar = Registrar::new(&host);
    let mut schema = test_schema();

    let err = registrar.register(&mut schema, false).unwrap_err();
    assert_eq!(
        err,
        RegistrationError::Host(HostError::new(E_INVALIDARG, "bad pattern"))
    );
    assert!(!schema.is_registered());
    assert!(schema.properties().iter().all(|p| p.index().is_none()));
    assert!(schema.methods().iter().all(|m| m.index().is_none()));

    // The failure is not sticky.
    registrar.register(&mut schema, false).expect("retry");
    assert!(schema.is_registered());
    assert_eq!(host.calls(), 2);
}

#[test]
fn test_incomplete_id_arrays_are_rejected() {
    let host = RecordingHost::new(7);
    host.drop_property_id(true);
    let registrar = Registrar::new(&host);
    let mut schema = test_schema();

    let err = registrar.register(&mut schema, false).unwrap_err();
    assert_eq!(
        err,
        RegistrationError::IncompleteAssignment {
            what: "property",
            expected: 2,
            actual: 1,
        }
    );
    assert!(!schema.is_registered());
    assert!(schema.properties().iter().all(|p| p.property_id().is_none()));

    host.drop_property_id(false);
    registrar.register(&mut schema, false).expect("retry");
    assert!(schema.is_registered());
}

#[test]
fn test_augmentation_sees_registered_pattern() {
    let host = RecordingHost::new(300);
    let augmentation = RecordingAugmentation::default();
    let registrar = Registrar::new(&host).with_augmentation(&augmentation);
    let mut schema = test_schema();

    registrar
        .register_with_options(&mut schema, RegistrationOptions::new().augment(true))
        .expect("register");

    assert_eq!(
        *augmentation.seen.lock(),
        vec![("AttrDrivenTestPattern".to_string(), 300)]
    );
}

#[test]
fn test_augmentation_is_skipped_unless_requested() {
    let host = RecordingHost::new(300);
    let augmentation = RecordingAugmentation::default();
    let registrar = Registrar::new(&host).with_augmentation(&augmentation);
    let mut schema = test_schema();

    registrar.register(&mut schema, false).expect("register");
    assert!(augmentation.seen.lock().is_empty());
}

#[test]
fn test_augmentation_failure_keeps_primary_registration() {
    init_logging();
    let host = RecordingHost::new(300);
    let augmentation = RecordingAugmentation {
        fail: true,
        ..RecordingAugmentation::default()
    };
    let registrar = Registrar::new(&host).with_augmentation(&augmentation);
    let mut schema = test_schema();

    let err = registrar.register(&mut schema, true).unwrap_err();
    assert_eq!(
        err,
        RegistrationError::Augmentation(HostError::new(E_FAIL, "peer augmentation refused"))
    );
    assert!(schema.is_registered());
    assert_eq!(schema.pattern_id(), Some(300));
}

#[test]
fn test_augmentation_without_service() {
    let host = RecordingHost::new(300);
    let mut schema = test_schema();

    let err = Registrar::new(&host).register(&mut schema, true).unwrap_err();
    assert_eq!(err, RegistrationError::NoAugmentationService);
    assert!(schema.is_registered());
}
