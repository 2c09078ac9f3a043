use chrono::{DateTime, Utc};
use serde::Serialize;

use super::form::ReportFormData;
use super::path::ErrorMap;
use super::steps::{WizardStep, STEP_COUNT};
use crate::config::WizardConfig;
use crate::store::Merge;

/// Everything the report wizard tracks for one authoring session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardState {
    pub current_step: usize,
    pub form_data: ReportFormData,
    pub errors: ErrorMap,
    pub is_loading: bool,
    pub is_saving: bool,
    /// Set once the backend has created the report; the wizard is then
    /// editing an existing report rather than a new draft.
    pub report_id: Option<String>,
}

impl WizardState {
    pub fn new(form_data: ReportFormData) -> Self {
        Self {
            current_step: 0,
            form_data,
            errors: ErrorMap::new(),
            is_loading: false,
            is_saving: false,
            report_id: None,
        }
    }

    /// A fresh draft created at `now`.
    pub fn initial(now: DateTime<Utc>, config: &WizardConfig) -> Self {
        Self::new(ReportFormData::initial(now, config))
    }

    /// The current step, or `None` if `current_step` was set out of range.
    pub fn step(&self) -> Option<WizardStep> {
        WizardStep::from_index(self.current_step)
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == STEP_COUNT - 1
    }

    pub fn is_editing(&self) -> bool {
        self.report_id.is_some()
    }
}

/// Partial [`WizardState`]; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardPatch {
    pub current_step: Option<usize>,
    pub form_data: Option<ReportFormData>,
    pub errors: Option<ErrorMap>,
    pub is_loading: Option<bool>,
    pub is_saving: Option<bool>,
    pub report_id: Option<Option<String>>,
}

impl Merge for WizardState {
    type Patch = WizardPatch;

    fn merge(&self, patch: WizardPatch) -> Self {
        Self {
            current_step: patch.current_step.unwrap_or(self.current_step),
            form_data: patch.form_data.unwrap_or_else(|| self.form_data.clone()),
            errors: patch.errors.unwrap_or_else(|| self.errors.clone()),
            is_loading: patch.is_loading.unwrap_or(self.is_loading),
            is_saving: patch.is_saving.unwrap_or(self.is_saving),
            report_id: patch.report_id.unwrap_or_else(|| self.report_id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::path::FieldPath;

    #[test]
    fn patch_touches_only_given_fields() {
        let mut state = WizardState::new(ReportFormData::default());
        state
            .errors
            .insert(FieldPath::field("title"), "Report title is required".into());

        let next = state.merge(WizardPatch {
            current_step: Some(3),
            report_id: Some(Some("rpt-1".into())),
            ..Default::default()
        });

        assert_eq!(next.current_step, 3);
        assert_eq!(next.report_id.as_deref(), Some("rpt-1"));
        assert_eq!(next.errors, state.errors);
        assert_eq!(next.form_data, state.form_data);
    }

    #[test]
    fn report_id_can_be_cleared() {
        let mut state = WizardState::new(ReportFormData::default());
        state.report_id = Some("rpt-1".into());
        let next = state.merge(WizardPatch {
            report_id: Some(None),
            ..Default::default()
        });
        assert!(!next.is_editing());
    }

    #[test]
    fn out_of_range_step_has_no_wizard_step() {
        let mut state = WizardState::new(ReportFormData::default());
        state.current_step = STEP_COUNT;
        assert_eq!(state.step(), None);
        assert!(!state.is_last_step());
    }
}
