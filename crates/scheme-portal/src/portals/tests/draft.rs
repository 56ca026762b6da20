use std::sync::Arc;

use super::common::*;
use crate::portals::{
    DraftForm, DraftStore, FieldValue, FormError, MemoryDraftStore, PersistenceError,
    PortalBlueprint, SubmissionError, ValidationError,
};

fn samridh_form(store: Arc<MemoryDraftStore>) -> DraftForm<MemoryDraftStore> {
    let (form, warning) = DraftForm::open(Arc::new(PortalBlueprint::samridh()), store);
    assert!(warning.is_none());
    form
}

#[test]
fn opens_at_first_step_with_empty_record() {
    let form = samridh_form(Arc::new(MemoryDraftStore::default()));

    assert_eq!(form.step(), 0);
    assert_eq!(form.step_count(), 7);
    assert_eq!(form.current_step().map(|step| step.key), Some("org"));
    assert!(form.record().is_empty());
}

#[test]
fn step_navigation_is_bounded() {
    let mut form = samridh_form(Arc::new(MemoryDraftStore::default()));

    assert_eq!(form.prev(), 0);
    for _ in 0..20 {
        form.next();
    }
    assert_eq!(form.step(), 6);
    assert!(form.is_last_step());
    assert_eq!(form.next(), 6);
    assert_eq!(form.current_step().map(|step| step.key), Some("review"));
    assert_eq!(form.prev(), 5);
}

#[test]
fn save_then_restore_yields_identical_record() {
    let store = Arc::new(MemoryDraftStore::default());
    let mut form = samridh_form(store.clone());
    form.set_field("orgName", FieldValue::text("Agnika Tech"))
        .expect("text accepted");
    form.set_field("teamSize", FieldValue::Number(12.0))
        .expect("number accepted");
    form.set_field("askAmount", FieldValue::Number(2_500_000.0))
        .expect("currency accepted");
    form.add_document("documents", "pitch-deck.pdf")
        .expect("file accepted");
    form.add_document("documents", "incorporation.pdf")
        .expect("file accepted");
    form.save_draft().expect("draft saved");
    form.save_draft().expect("saving twice is harmless");

    let restored = samridh_form(store);
    assert_eq!(restored.record(), form.record());
    assert_eq!(restored.step(), 0);
    assert_eq!(
        restored.record().files("documents"),
        ["pitch-deck.pdf".to_string(), "incorporation.pdf".to_string()]
    );
}

#[test]
fn restore_keeps_currency_amounts_bit_for_bit() {
    let amounts = [1_024_526_597.428_571_5, 0.1 + 0.2, 9_999_999_999.0 / 7.0];
    let store = Arc::new(MemoryDraftStore::default());

    for amount in amounts {
        let mut form = samridh_form(store.clone());
        form.set_field("askAmount", FieldValue::Number(amount))
            .expect("currency accepted");
        form.save_draft().expect("draft saved");

        let restored = samridh_form(store.clone());
        let value = restored.record().number("askAmount").expect("amount restored");
        assert_eq!(value.to_bits(), amount.to_bits(), "amount {amount} drifted to {value}");
    }
}

#[test]
fn blank_fields_are_permitted() {
    let mut form = samridh_form(Arc::new(MemoryDraftStore::default()));
    form.set_field("orgName", FieldValue::text(""))
        .expect("blank text accepted");
    assert_eq!(form.record().text("orgName"), Some(""));
}

#[test]
fn mistyped_and_out_of_range_input_is_rejected() {
    let mut form = samridh_form(Arc::new(MemoryDraftStore::default()));

    assert!(matches!(
        form.set_field("teamSize", FieldValue::text("twelve")),
        Err(FormError::Validation(ValidationError::WrongType { .. }))
    ));
    assert!(matches!(
        form.set_field("askAmount", FieldValue::Number(-5.0)),
        Err(FormError::Validation(ValidationError::OutOfRange { .. }))
    ));
    assert!(matches!(
        form.set_field("favouriteColour", FieldValue::text("teal")),
        Err(FormError::Validation(ValidationError::UnknownField { .. }))
    ));
    assert!(form.record().is_empty());
}

#[test]
fn submit_before_last_step_does_nothing() {
    let store = Arc::new(MemoryDraftStore::default());
    let sink = RecordingSink::default();
    let mut form = samridh_form(store);
    form.next();

    let receipt = form.submit(&sink).expect("no-op succeeds");
    assert!(receipt.is_none());
    assert!(!form.is_submitted());
    assert!(sink.submissions().is_empty());
}

#[test]
fn submit_at_last_step_hands_off_and_clears_the_store() {
    let store = Arc::new(MemoryDraftStore::default());
    let sink = RecordingSink::default();
    let mut form = samridh_form(store.clone());
    form.set_field("orgName", FieldValue::text("NexGrid"))
        .expect("text accepted");
    form.save_draft().expect("draft saved");
    while !form.is_last_step() {
        form.next();
    }

    let receipt = form
        .submit(&sink)
        .expect("submission accepted")
        .expect("submitted at last step");
    assert_eq!(receipt.application_id.0, "APP-2001");
    assert!(form.is_submitted());
    assert_eq!(sink.submissions().len(), 1);
    assert!(store.raw("samridh_draft").is_none());

    assert!(matches!(
        form.set_field("orgName", FieldValue::text("late edit")),
        Err(FormError::AlreadySubmitted)
    ));
    assert!(matches!(form.submit(&sink), Err(FormError::AlreadySubmitted)));
}

#[test]
fn rejected_submission_keeps_draft_and_step() {
    let store = Arc::new(MemoryDraftStore::default());
    let (mut form, _) = DraftForm::open(Arc::new(PortalBlueprint::genesis()), store.clone());
    form.set_field("orgName", FieldValue::text("Sarvam Civic Labs"))
        .expect("text accepted");
    form.save_draft().expect("draft saved");

    let result = form.submit(&RejectingSink);
    assert!(matches!(
        result,
        Err(FormError::Submission(SubmissionError::Rejected { .. }))
    ));
    assert!(!form.is_submitted());
    assert_eq!(form.step(), 0);
    assert!(store.raw("genesis_draft").is_some());
    assert_eq!(form.record().text("orgName"), Some("Sarvam Civic Labs"));
}

#[test]
fn genesis_single_step_form_submits_immediately() {
    let sink = RecordingSink::default();
    let (mut form, _) = DraftForm::open(
        Arc::new(PortalBlueprint::genesis()),
        Arc::new(MemoryDraftStore::default()),
    );
    assert!(form.is_last_step());
    assert_eq!(form.next(), 0);

    form.set_field("challengeTrack", FieldValue::text("Inclusive Tech"))
        .expect("known track accepted");
    assert!(matches!(
        form.set_field("challengeTrack", FieldValue::text("Space Tech")),
        Err(FormError::Validation(ValidationError::UnknownOption { .. }))
    ));

    let receipt = form.submit(&sink).expect("submission accepted");
    assert!(receipt.is_some());
}

#[test]
fn corrupt_stored_draft_falls_back_to_empty_record() {
    let store = Arc::new(MemoryDraftStore::default());
    store.insert_raw("samridh_draft", "{not json");

    let (form, warning) = DraftForm::open(Arc::new(PortalBlueprint::samridh()), store);
    assert!(matches!(warning, Some(PersistenceError::Corrupt { .. })));
    assert!(form.record().is_empty());
}

#[test]
fn store_failures_surface_as_recoverable_errors() {
    let (mut form, warning) = DraftForm::open(
        Arc::new(PortalBlueprint::samridh()),
        Arc::new(UnavailableStore),
    );
    assert!(matches!(warning, Some(PersistenceError::Unavailable(_))));

    form.set_field("orgName", FieldValue::text("Vyom IoT"))
        .expect("editing still works");
    assert!(matches!(
        form.save_draft(),
        Err(FormError::Persistence(PersistenceError::Unavailable(_)))
    ));
    assert_eq!(form.record().text("orgName"), Some("Vyom IoT"));
}

#[test]
fn unavailable_store_does_not_block_an_accepted_submission() {
    let sink = RecordingSink::default();
    let (mut form, _) = DraftForm::open(
        Arc::new(PortalBlueprint::genesis()),
        Arc::new(UnavailableStore),
    );

    let receipt = form.submit(&sink).expect("clear failure is only logged");
    assert!(receipt.is_some());
    assert!(UnavailableStore.load("genesis_draft").is_err());
}
