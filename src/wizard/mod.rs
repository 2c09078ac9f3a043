//! The multi-step report-authoring wizard.
//!
//! [`ReportWizard`] wraps a [`Store`](crate::Store) of [`WizardState`]. The
//! first four steps gate forward navigation on their required fields; the
//! remaining steps are advisory and only feed the review step's
//! [`Completeness`].

mod completeness;
mod form;
mod path;
mod state;
mod steps;
mod validation;
mod wizard;

pub use completeness::{completeness, Completeness, ReviewSection, SectionStatus};
pub use form::{
    Applicant, Comparable, DocumentType, FormField, FormUpdate, LegalAspect, LocationSimilarity,
    Photo, PhotoType, PropertyDetails, Purpose, ReportFormData, Section, ValuationDetails,
    ValuationMethod,
};
pub use path::{ErrorMap, FieldPath};
pub use state::{WizardPatch, WizardState};
pub use steps::{step_statuses, StepStatus, WizardStep, STEP_COUNT};
pub use validation::step_errors;
pub use wizard::{NextOutcome, ReportWizard, SavingGuard};
