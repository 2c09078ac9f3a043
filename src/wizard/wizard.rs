use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use super::completeness::Completeness;
use super::form::FormUpdate;
use super::path::{ErrorMap, FieldPath};
use super::state::{WizardPatch, WizardState};
use super::steps::{step_statuses, StepStatus, WizardStep, STEP_COUNT};
use super::validation::step_errors;
use crate::config::WizardConfig;
use crate::error::{Error, Result};
use crate::store::{Store, Subscription, Update};

/// What happened when the user asked to move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextOutcome {
    /// The current step validated and the wizard moved to this step.
    Advanced(usize),
    /// The last step validated; the caller should submit the report.
    ReadyToSubmit,
    /// The current step has errors; see [`WizardState::errors`].
    Blocked,
}

/// The report-authoring wizard.
///
/// A thin set of actions over a [`Store<WizardState>`]. Clones share the
/// same store, so a view and its child forms can each hold one.
///
/// ```
/// use serde_json::json;
/// use valuer_state::wizard::{FormUpdate, ReportWizard, Section};
///
/// let wizard = ReportWizard::default();
/// wizard
///     .update_form_data(FormUpdate::merge(Section::Applicant, json!({ "name": "Jane Doe" })))
///     .unwrap();
///
/// assert!(!wizard.validate_step(1));
/// wizard
///     .update_form_data(FormUpdate::merge(Section::Applicant, json!({ "address": "123 Main St" })))
///     .unwrap();
/// assert!(wizard.validate_step(1));
/// ```
#[derive(Clone)]
pub struct ReportWizard {
    store: Store<WizardState>,
    config: WizardConfig,
}

impl ReportWizard {
    pub fn new(config: WizardConfig) -> Self {
        let state = WizardState::initial(Utc::now(), &config);
        Self::with_state(state, config)
    }

    /// Resume from an existing state, e.g. a report opened for editing.
    pub fn with_state(state: WizardState, config: WizardConfig) -> Self {
        Self {
            store: Store::new(state),
            config,
        }
    }

    pub fn store(&self) -> &Store<WizardState> {
        &self.store
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn state(&self) -> Arc<WizardState> {
        self.store.get()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&WizardState) + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    fn patch(&self, patch: WizardPatch) {
        self.store.merge(patch);
    }

    /// Jump to `step` without any checks.
    ///
    /// Out-of-range steps are stored as given; see [`go_to_step`] for the
    /// checked variant.
    ///
    /// [`go_to_step`]: ReportWizard::go_to_step
    pub fn set_current_step(&self, step: usize) {
        if step >= STEP_COUNT {
            warn!(step, step_count = STEP_COUNT, "current step set out of range");
        }
        self.patch(WizardPatch {
            current_step: Some(step),
            ..Default::default()
        });
    }

    pub fn go_to_step(&self, step: usize) -> Result<()> {
        if step >= STEP_COUNT {
            return Err(Error::StepOutOfRange {
                step,
                count: STEP_COUNT,
            });
        }
        self.set_current_step(step);
        Ok(())
    }

    /// Apply one edit to the form data.
    ///
    /// A section patch that doesn't fit the section leaves the state as it
    /// was and returns [`Error::SectionData`].
    pub fn update_form_data(&self, update: FormUpdate) -> Result<()> {
        self.store.try_set(|state| {
            let form_data = state.form_data.apply(update)?;
            Ok::<_, Error>(Update::merge(WizardPatch {
                form_data: Some(form_data),
                ..Default::default()
            }))
        })?;
        Ok(())
    }

    pub fn set_loading(&self, loading: bool) {
        self.patch(WizardPatch {
            is_loading: Some(loading),
            ..Default::default()
        });
    }

    pub fn set_saving(&self, saving: bool) {
        self.patch(WizardPatch {
            is_saving: Some(saving),
            ..Default::default()
        });
    }

    /// Mark `is_saving` until the returned guard is dropped.
    pub fn saving(&self) -> SavingGuard {
        self.set_saving(true);
        SavingGuard {
            store: self.store.clone(),
        }
    }

    pub fn set_error(&self, field: impl Into<FieldPath>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        self.store.set(Update::compute(move |state: &WizardState| {
            let mut errors = state.errors.clone();
            errors.insert(field, message);
            Update::merge(WizardPatch {
                errors: Some(errors),
                ..Default::default()
            })
        }));
    }

    pub fn clear_error(&self, field: &FieldPath) {
        if !self.store.read(|state| state.errors.contains_key(field)) {
            return;
        }
        let field = field.clone();
        self.store.set(Update::compute(move |state: &WizardState| {
            let mut errors = state.errors.clone();
            errors.remove(&field);
            Update::merge(WizardPatch {
                errors: Some(errors),
                ..Default::default()
            })
        }));
    }

    pub fn clear_all_errors(&self) {
        self.patch(WizardPatch {
            errors: Some(ErrorMap::new()),
            ..Default::default()
        });
    }

    pub fn set_report_id(&self, id: impl Into<String>) {
        self.patch(WizardPatch {
            report_id: Some(Some(id.into())),
            ..Default::default()
        });
    }

    /// Discard the session and start a fresh draft.
    pub fn reset_form(&self) {
        debug!("resetting report wizard");
        self.store
            .replace(WizardState::initial(Utc::now(), &self.config));
    }

    /// Check `step`'s required fields against the current form.
    ///
    /// The error map is replaced by this step's errors, dropping whatever
    /// other steps had reported.
    pub fn validate_step(&self, step: usize) -> bool {
        let errors = self.store.read(|state| step_errors(step, &state.form_data));
        let valid = errors.is_empty();
        debug!(step, errors = errors.len(), "validated wizard step");
        self.patch(WizardPatch {
            errors: Some(errors),
            ..Default::default()
        });
        valid
    }

    pub fn is_step_valid(&self, step: usize) -> bool {
        self.validate_step(step)
    }

    /// Validate the current step and move past it.
    ///
    /// A current step outside the wizard is always `Blocked`; only the
    /// review step can report `ReadyToSubmit`.
    pub fn next(&self) -> NextOutcome {
        let current = self.state().current_step;
        let Some(step) = WizardStep::from_index(current) else {
            warn!(step = current, "next() from a step outside the wizard");
            return NextOutcome::Blocked;
        };
        if !self.validate_step(step.index()) {
            return NextOutcome::Blocked;
        }
        if step.is_last() {
            NextOutcome::ReadyToSubmit
        } else {
            let target = step.index() + 1;
            self.set_current_step(target);
            NextOutcome::Advanced(target)
        }
    }

    /// Step back once, stopping at the first step.
    pub fn previous(&self) -> usize {
        let current = self.state().current_step;
        let target = current.min(STEP_COUNT).saturating_sub(1);
        if target != current {
            self.set_current_step(target);
        }
        target
    }

    /// Navigate from the stepper.
    ///
    /// Going back is always allowed; going forward requires the current step
    /// to validate. Returns whether the wizard moved.
    pub fn jump_to(&self, step: usize) -> Result<bool> {
        if step >= STEP_COUNT {
            return Err(Error::StepOutOfRange {
                step,
                count: STEP_COUNT,
            });
        }
        let current = self.state().current_step;
        if step <= current || self.validate_step(current) {
            self.set_current_step(step);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn step_statuses(&self) -> Vec<(WizardStep, StepStatus)> {
        step_statuses(self.state().current_step)
    }

    pub fn completeness(&self) -> Completeness {
        self.store.read(|state| Completeness::of(&state.form_data))
    }

    /// Whether the review step should stop recommending more work.
    pub fn meets_recommendation(&self) -> bool {
        self.completeness()
            .meets(self.config.recommended_completeness)
    }

    /// The form data as JSON, ready for the report-creation request.
    pub fn submission_payload(&self) -> Result<Value> {
        Ok(self.store.read(|state| serde_json::to_value(&state.form_data))?)
    }
}

impl Default for ReportWizard {
    fn default() -> Self {
        Self::new(WizardConfig::default())
    }
}

/// Clears `is_saving` when dropped.
#[must_use = "the saving flag is cleared as soon as the guard is dropped"]
pub struct SavingGuard {
    store: Store<WizardState>,
}

impl Drop for SavingGuard {
    fn drop(&mut self) {
        self.store.merge(WizardPatch {
            is_saving: Some(false),
            ..Default::default()
        });
    }
}
