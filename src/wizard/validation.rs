//! Required-field checks for the gated wizard steps.
//!
//! Only presence is checked. Formats and cross-field consistency are left to
//! the backend.

use super::form::{ReportFormData, Section};
use super::path::{ErrorMap, FieldPath};
use super::steps::WizardStep;

/// Errors for every required field of `step` that is currently missing.
///
/// Steps without rules, and indices past the last step, yield no errors.
pub fn step_errors(step: usize, form: &ReportFormData) -> ErrorMap {
    let mut errors = ErrorMap::new();
    let mut require = |present: bool, path: FieldPath, message: &str| {
        if !present {
            errors.insert(path, message.to_string());
        }
    };

    match WizardStep::from_index(step) {
        Some(WizardStep::Metadata) => {
            require(
                !form.title.trim().is_empty(),
                FieldPath::field("title"),
                "Report title is required",
            );
            require(
                form.purpose.is_some(),
                FieldPath::field("purpose"),
                "Purpose is required",
            );
            require(
                !form.inspection_date.is_empty(),
                FieldPath::field("inspection_date"),
                "Inspection date is required",
            );
            require(
                !form.valuation_date.is_empty(),
                FieldPath::field("valuation_date"),
                "Valuation date is required",
            );
        }
        Some(WizardStep::Applicant) => {
            require(
                !form.applicant.name.trim().is_empty(),
                FieldPath::nested(Section::Applicant, "name"),
                "Applicant name is required",
            );
            require(
                !form.applicant.address.trim().is_empty(),
                FieldPath::nested(Section::Applicant, "address"),
                "Address is required",
            );
        }
        Some(WizardStep::Property) => {
            require(
                !form.property.address.trim().is_empty(),
                FieldPath::nested(Section::Property, "address"),
                "Property address is required",
            );
            require(
                !form.property.district.trim().is_empty(),
                FieldPath::nested(Section::Property, "district"),
                "District is required",
            );
        }
        Some(WizardStep::Valuation) => {
            require(
                has_value(form.valuation.total_market_value),
                FieldPath::nested(Section::Valuation, "total_market_value"),
                "Total market value is required",
            );
            require(
                form.valuation.primary_method.is_some(),
                FieldPath::nested(Section::Valuation, "primary_method"),
                "Primary valuation method is required",
            );
        }
        _ => {}
    }

    errors
}

/// Zero counts as "not entered" for monetary figures.
fn has_value(amount: Option<f64>) -> bool {
    amount.is_some_and(|v| v != 0.0 && !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::form::{Purpose, ValuationMethod};

    fn keys(errors: &ErrorMap) -> Vec<String> {
        errors.keys().map(ToString::to_string).collect()
    }

    #[test]
    fn blank_metadata_reports_all_four_fields() {
        let errors = step_errors(0, &ReportFormData::default());
        assert_eq!(
            keys(&errors),
            ["inspection_date", "purpose", "title", "valuation_date"]
        );
        assert_eq!(errors[&FieldPath::field("title")], "Report title is required");
    }

    #[test]
    fn whitespace_title_is_missing() {
        let form = ReportFormData {
            title: "   ".to_string(),
            purpose: Some(Purpose::Sale),
            inspection_date: "2024-03-01".to_string(),
            valuation_date: "2024-03-02".to_string(),
            ..Default::default()
        };
        assert_eq!(keys(&step_errors(0, &form)), ["title"]);
    }

    #[test]
    fn applicant_and_property_keys_are_nested() {
        let form = ReportFormData::default();
        assert_eq!(
            keys(&step_errors(1, &form)),
            ["applicant.address", "applicant.name"]
        );
        assert_eq!(
            keys(&step_errors(2, &form)),
            ["property.address", "property.district"]
        );
    }

    #[test]
    fn zero_market_value_is_missing() {
        let mut form = ReportFormData::default();
        form.valuation.primary_method = Some(ValuationMethod::Cost);
        form.valuation.total_market_value = Some(0.0);
        assert_eq!(
            keys(&step_errors(3, &form)),
            ["valuation.total_market_value"]
        );

        form.valuation.total_market_value = Some(8_750_000.0);
        assert!(step_errors(3, &form).is_empty());
    }

    #[test]
    fn advisory_and_unknown_steps_have_no_rules() {
        let form = ReportFormData::default();
        for step in 4..12 {
            assert!(step_errors(step, &form).is_empty());
        }
    }
}
