//! Unit tests for augmentor handles and the default contract.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::tests::{
    EchoContext, FindContext, PassiveAugmentor, SaveContext, TaggingAugmentor, entries, entity,
    journal, method,
};

#[test]
fn handle_reports_name_priority_and_types() {
    let handle = AugmentorHandle::new(TaggingAugmentor::new("audit", journal()).with_priority(7));
    assert_eq!(handle.name(), "audit");
    assert_eq!(handle.priority(), Some(7));
    assert_eq!(handle.context_types(), ContextTypes::of::<TaggingAugmentor>());
}

#[test]
fn default_name_is_the_type_name() {
    let handle = AugmentorHandle::new(PassiveAugmentor);
    assert!(
        handle.name().ends_with("PassiveAugmentor"),
        "unexpected name: {}",
        handle.name()
    );
    assert!(handle.priority().is_none());
}

#[test]
fn clones_share_the_registration() {
    let handle = AugmentorHandle::new(PassiveAugmentor);
    let clone = handle.clone();
    let other = AugmentorHandle::new(PassiveAugmentor);
    assert!(handle.same_registration(&clone));
    assert!(!handle.same_registration(&other));
}

#[test]
fn shared_augmentor_keeps_its_outside_reference() {
    let shared = Arc::new(TaggingAugmentor::new("shared", journal()));
    let handle = AugmentorHandle::from(Arc::clone(&shared));
    assert_eq!(Arc::strong_count(&shared), 2);
    assert_eq!(handle.name(), "shared");
}

#[rstest]
#[case::read(QueryMode::Find, true)]
#[case::write(QueryMode::Save, false)]
fn supports_is_forwarded(#[case] mode: QueryMode, #[case] expected: bool) {
    let handle = AugmentorHandle::new(PassiveAugmentor);
    let supported = handle
        .supports(&method(), mode, &entity())
        .expect("supports");
    assert_eq!(supported, expected);
}

#[test]
fn default_transforms_pass_contexts_through() {
    let handle = AugmentorHandle::new(PassiveAugmentor);
    let query = FindContext {
        tags: vec![String::from("kept")],
    };
    let update = SaveContext {
        tags: vec![String::from("kept")],
    };

    let queried = handle.augment_query(query.clone(), &method()).expect("query");
    let updated = handle.augment_update(update.clone(), &method()).expect("update");
    assert_eq!(queried, query);
    assert_eq!(updated, Some(update));
}

#[test]
fn typed_transforms_reach_the_augmentor() {
    let log = journal();
    let handle = AugmentorHandle::new(TaggingAugmentor::new("t", log.clone()));

    let queried = handle
        .augment_query(FindContext::default(), &method())
        .expect("query");
    let updated = handle
        .augment_update(SaveContext::default(), &method())
        .expect("update");

    assert_eq!(queried.tags, vec![String::from("t")]);
    assert_eq!(updated.map(|context| context.tags), Some(vec![String::from("t")]));
    assert_eq!(entries(&log), vec!["t:query", "t:update"]);
}

#[test]
fn vetoing_augmentor_empties_the_update() {
    let handle = AugmentorHandle::new(TaggingAugmentor::new("veto", journal()).vetoing());
    let updated = handle
        .augment_update(SaveContext::default(), &method())
        .expect("update");
    assert!(updated.is_none());
}

#[test]
fn undeclared_context_type_is_reported() {
    let handle = AugmentorHandle::new(TaggingAugmentor::new("t", journal()));
    let error = handle
        .augment_query(EchoContext::default(), &method())
        .expect_err("echo contexts are not declared");
    match error {
        AugmentError::ContextMismatch {
            augmentor,
            received,
        } => {
            assert_eq!(augmentor, "t");
            assert_eq!(received, ContextType::of::<EchoContext>());
        }
        other => panic!("expected context mismatch, got {other}"),
    }
}
