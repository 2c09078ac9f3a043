//! Review-step progress over the form's sections.
//!
//! This is a display computation. Nothing here is stored or gates
//! navigation.
//!
//! The metadata, applicant, property and valuation sections count as complete
//! exactly when their step validates, so text fields are trimmed: a title of
//! `"   "` leaves the metadata section incomplete. This is stricter than a
//! plain non-empty check and keeps the review screen agreeing with the
//! navigation gate.

use serde::Serialize;

use super::form::ReportFormData;
use super::steps::WizardStep;
use super::validation::step_errors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSection {
    Metadata,
    Applicant,
    Property,
    Valuation,
    LegalAspects,
    Photos,
    Comparables,
}

impl ReviewSection {
    pub const ALL: [ReviewSection; 7] = [
        ReviewSection::Metadata,
        ReviewSection::Applicant,
        ReviewSection::Property,
        ReviewSection::Valuation,
        ReviewSection::LegalAspects,
        ReviewSection::Photos,
        ReviewSection::Comparables,
    ];

    /// The wizard step where this section is edited.
    pub fn step(self) -> WizardStep {
        match self {
            ReviewSection::Metadata => WizardStep::Metadata,
            ReviewSection::Applicant => WizardStep::Applicant,
            ReviewSection::Property => WizardStep::Property,
            ReviewSection::Valuation => WizardStep::Valuation,
            ReviewSection::LegalAspects => WizardStep::LegalAspects,
            ReviewSection::Photos => WizardStep::Photos,
            ReviewSection::Comparables => WizardStep::Comparables,
        }
    }

    pub fn is_complete(self, form: &ReportFormData) -> bool {
        match self {
            ReviewSection::LegalAspects => !form.legal_aspects.is_empty(),
            ReviewSection::Photos => !form.photos.is_empty(),
            ReviewSection::Comparables => !form.comparables.is_empty(),
            gated => step_errors(gated.step().index(), form).is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionStatus {
    pub section: ReviewSection,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completeness {
    pub sections: Vec<SectionStatus>,
}

impl Completeness {
    pub fn of(form: &ReportFormData) -> Self {
        Self {
            sections: ReviewSection::ALL
                .iter()
                .map(|&section| SectionStatus {
                    section,
                    complete: section.is_complete(form),
                })
                .collect(),
        }
    }

    pub fn completed(&self) -> usize {
        self.sections.iter().filter(|s| s.complete).count()
    }

    pub fn total(&self) -> usize {
        self.sections.len()
    }

    /// Share of complete sections, rounded half up to a whole percent.
    pub fn percentage(&self) -> u8 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        ((self.completed() * 200 + total) / (2 * total)) as u8
    }

    pub fn meets(&self, threshold: u8) -> bool {
        self.percentage() >= threshold
    }

    pub fn missing(&self) -> impl Iterator<Item = ReviewSection> + '_ {
        self.sections
            .iter()
            .filter(|s| !s.complete)
            .map(|s| s.section)
    }
}

pub fn completeness(form: &ReportFormData) -> Completeness {
    Completeness::of(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::form::{Photo, Purpose, ValuationMethod};

    #[test]
    fn blank_form_is_zero_percent() {
        let report = completeness(&ReportFormData::default());
        assert_eq!(report.completed(), 0);
        assert_eq!(report.total(), 7);
        assert_eq!(report.percentage(), 0);
        assert_eq!(report.missing().count(), 7);
    }

    #[test]
    fn lists_count_once_non_empty() {
        let form = ReportFormData {
            photos: vec![Photo::default()],
            ..Default::default()
        };
        let report = completeness(&form);
        assert_eq!(report.completed(), 1);
        assert_eq!(report.percentage(), 14);
    }

    #[test]
    fn rounds_half_up() {
        let mut form = ReportFormData {
            title: "Lot 7".to_string(),
            purpose: Some(Purpose::Mortgage),
            inspection_date: "2024-01-02".to_string(),
            valuation_date: "2024-01-03".to_string(),
            photos: vec![Photo::default()],
            ..Default::default()
        };
        form.valuation.primary_method = Some(ValuationMethod::Market);
        form.valuation.total_market_value = Some(1.0);

        let report = completeness(&form);
        assert_eq!(report.completed(), 3);
        assert_eq!(report.percentage(), 43);
        assert!(!report.meets(80));
        assert!(report.meets(40));
    }

    #[test]
    fn whitespace_title_leaves_metadata_incomplete() {
        let mut form = ReportFormData {
            title: "   ".to_string(),
            purpose: Some(Purpose::Mortgage),
            inspection_date: "2024-01-02".to_string(),
            valuation_date: "2024-01-03".to_string(),
            ..Default::default()
        };
        assert!(!ReviewSection::Metadata.is_complete(&form));

        form.title = "Lot 7".to_string();
        assert!(ReviewSection::Metadata.is_complete(&form));
    }
}
