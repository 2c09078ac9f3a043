//! Integration tests for valuer-state

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use chrono::Utc;
use serde_json::json;
use valuer_state::wizard::{
    FieldPath, FormField, FormUpdate, NextOutcome, Purpose, ReportFormData, Section,
    ValuationMethod, WizardPatch, WizardState,
};
use valuer_state::{Merge, ReportWizard, Store, Update, WizardConfig};

#[derive(Clone, Debug, PartialEq)]
struct Pair {
    a: i32,
    b: i32,
}

#[derive(Default)]
struct PairPatch {
    a: Option<i32>,
    b: Option<i32>,
}

impl Merge for Pair {
    type Patch = PairPatch;

    fn merge(&self, patch: PairPatch) -> Self {
        Pair {
            a: patch.a.unwrap_or(self.a),
            b: patch.b.unwrap_or(self.b),
        }
    }
}

fn counting_listener() -> (Arc<AtomicUsize>, impl Fn(&Pair) + Send + Sync + 'static) {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();
    (calls, move |_: &Pair| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
    })
}

fn blank_wizard() -> ReportWizard {
    ReportWizard::with_state(
        WizardState::new(ReportFormData::default()),
        WizardConfig::default(),
    )
}

#[test]
fn no_op_set_does_not_notify() {
    let store = Store::new(Pair { a: 0, b: 2 });
    let (calls, listener) = counting_listener();
    let _sub = store.subscribe(listener);

    assert!(!store.set(Update::Replace(store.get())));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn merge_preserves_other_keys() {
    let store = Store::new(Pair { a: 0, b: 2 });
    store.merge(PairPatch {
        a: Some(1),
        ..Default::default()
    });
    assert_eq!(*store.get(), Pair { a: 1, b: 2 });
}

#[test]
fn unsubscribe_only_affects_that_listener() {
    let store = Store::new(Pair { a: 0, b: 0 });
    let (gone_calls, gone) = counting_listener();
    let (kept_calls, kept) = counting_listener();
    let gone_sub = store.subscribe(gone);
    let _kept_sub = store.subscribe(kept);

    gone_sub.unsubscribe();
    store.merge(PairPatch {
        a: Some(5),
        ..Default::default()
    });
    store.merge(PairPatch {
        b: Some(5),
        ..Default::default()
    });

    assert_eq!(gone_calls.load(Ordering::SeqCst), 0);
    assert_eq!(kept_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn reentrant_subscribe_skips_in_progress_notification() {
    let store = Store::new(Pair { a: 0, b: 0 });
    let (late_calls, late) = counting_listener();
    let late = Arc::new(late);
    let subscribed = Arc::new(Mutex::new(None));

    let _outer = store.subscribe({
        let store = store.clone();
        let subscribed = subscribed.clone();
        move |_| {
            let mut slot = subscribed.lock().unwrap();
            if slot.is_none() {
                let late = late.clone();
                *slot = Some(store.subscribe(move |s| (*late)(s)));
            }
        }
    });

    store.merge(PairPatch {
        a: Some(1),
        ..Default::default()
    });
    assert_eq!(late_calls.load(Ordering::SeqCst), 0);

    store.merge(PairPatch {
        a: Some(2),
        ..Default::default()
    });
    assert_eq!(late_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn step_zero_validation_gating() {
    let wizard = blank_wizard();
    assert!(!wizard.validate_step(0));

    let expected: Vec<FieldPath> = ["inspection_date", "purpose", "title", "valuation_date"]
        .into_iter()
        .map(FieldPath::field)
        .collect();
    let keys: Vec<FieldPath> = wizard.state().errors.keys().cloned().collect();
    assert_eq!(keys, expected);

    for field in [
        FormField::Title("Residential valuation".into()),
        FormField::Purpose(Some(Purpose::Sale)),
        FormField::InspectionDate("2024-06-01".into()),
        FormField::ValuationDate("2024-06-03".into()),
    ] {
        wizard.update_form_data(field.into()).unwrap();
    }
    assert!(wizard.validate_step(0));
    assert!(wizard.state().errors.is_empty());
}

#[test]
fn validating_step_one_drops_step_zero_errors() {
    let wizard = blank_wizard();
    assert!(!wizard.validate_step(0));
    assert!(!wizard.validate_step(1));

    let keys: Vec<String> = wizard
        .state()
        .errors
        .keys()
        .map(ToString::to_string)
        .collect();
    assert_eq!(keys, ["applicant.address", "applicant.name"]);
}

#[test]
fn reset_restores_defaults() {
    let wizard = ReportWizard::default();
    wizard.set_current_step(5);
    wizard
        .update_form_data(FormUpdate::merge(
            Section::Property,
            json!({ "address": "12 Lake Rd", "district": "Kandy" }),
        ))
        .unwrap();
    wizard.set_error("title", "Report title is required");
    wizard.set_report_id("rpt-42");
    wizard.set_saving(true);
    wizard.set_loading(true);

    wizard.reset_form();

    let state = wizard.state();
    assert_eq!(state.current_step, 0);
    assert!(state.errors.is_empty());
    assert!(state.report_id.is_none());
    assert!(!state.is_saving);
    assert!(!state.is_loading);

    let mut expected = ReportFormData::initial(Utc::now(), wizard.config());
    expected.reference_number = state.form_data.reference_number.clone();
    expected.report_date = state.form_data.report_date.clone();
    assert_eq!(state.form_data, expected);
    assert!(state.form_data.reference_number.starts_with("VPR-"));
}

#[test]
fn applicant_end_to_end() {
    let wizard = ReportWizard::default();
    let before = wizard.state().form_data.applicant.clone();

    wizard
        .update_form_data(FormUpdate::merge(Section::Applicant, json!({ "name": "Jane Doe" })))
        .unwrap();

    let applicant = wizard.state().form_data.applicant.clone();
    assert_eq!(applicant.name, "Jane Doe");
    assert_eq!(applicant.address, before.address);
    assert_eq!(applicant.contact_numbers, before.contact_numbers);
    assert_eq!(applicant.email, before.email);

    assert!(!wizard.validate_step(1));

    wizard
        .update_form_data(FormUpdate::merge(
            Section::Applicant,
            json!({ "address": "123 Main St" }),
        ))
        .unwrap();
    assert!(wizard.validate_step(1));
}

#[test]
fn full_walk_to_submission() {
    let wizard = ReportWizard::default();
    let renders = Arc::new(AtomicUsize::new(0));
    let mut hook = wizard.store().hook({
        let renders = renders.clone();
        move || {
            renders.fetch_add(1, Ordering::SeqCst);
        }
    });
    assert_eq!(hook.use_state().current_step, 0);

    wizard
        .update_form_data(FormField::Title("Lot 7, Plan 1234".into()).into())
        .unwrap();
    wizard
        .update_form_data(FormField::InspectionDate("2024-02-10".into()).into())
        .unwrap();
    wizard
        .update_form_data(FormField::ValuationDate("2024-02-12".into()).into())
        .unwrap();
    assert_eq!(wizard.next(), NextOutcome::Advanced(1));

    wizard
        .update_form_data(FormUpdate::merge(
            Section::Applicant,
            json!({ "name": "Jane Doe", "address": "123 Main St" }),
        ))
        .unwrap();
    assert_eq!(wizard.next(), NextOutcome::Advanced(2));

    assert_eq!(wizard.next(), NextOutcome::Blocked);
    wizard
        .update_form_data(FormUpdate::merge(
            Section::Property,
            json!({ "address": "7 Temple Rd", "district": "Galle" }),
        ))
        .unwrap();
    assert_eq!(wizard.next(), NextOutcome::Advanced(3));

    wizard
        .update_form_data(FormUpdate::merge(
            Section::Valuation,
            json!({ "total_market_value": 15_000_000.0, "primary_method": "comparative" }),
        ))
        .unwrap();
    assert_eq!(wizard.next(), NextOutcome::Advanced(4));
    assert_eq!(
        wizard.state().form_data.valuation.primary_method,
        Some(ValuationMethod::Comparative)
    );

    for expected in 5..8 {
        assert_eq!(wizard.next(), NextOutcome::Advanced(expected));
    }
    assert_eq!(wizard.next(), NextOutcome::ReadyToSubmit);

    let completeness = wizard.completeness();
    assert_eq!(completeness.completed(), 4);
    assert_eq!(completeness.percentage(), 57);
    assert!(!wizard.meets_recommendation());

    {
        let _saving = wizard.saving();
        assert!(hook.use_state().is_saving);
        let payload = wizard.submission_payload().unwrap();
        assert_eq!(payload["property"]["district"], "Galle");
        wizard.set_report_id("rpt-2024-0001");
    }
    assert!(wizard.state().is_editing());
    assert!(!wizard.state().is_saving);

    wizard.reset_form();
    assert_eq!(hook.use_state().current_step, 0);
    assert!(renders.load(Ordering::SeqCst) > 0);

    hook.unmount();
    assert_eq!(wizard.store().listener_count(), 0);
}

#[test]
fn wizard_store_accepts_raw_patches() {
    let wizard = blank_wizard();
    wizard.store().merge(WizardPatch {
        is_loading: Some(true),
        ..Default::default()
    });
    assert!(wizard.state().is_loading);
}
