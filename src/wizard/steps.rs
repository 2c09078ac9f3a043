use serde::Serialize;

/// Number of steps in the report wizard.
pub const STEP_COUNT: usize = WizardStep::ALL.len();

/// One stage of the report wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Metadata,
    Applicant,
    Property,
    Valuation,
    LegalAspects,
    Photos,
    Comparables,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 8] = [
        WizardStep::Metadata,
        WizardStep::Applicant,
        WizardStep::Property,
        WizardStep::Valuation,
        WizardStep::LegalAspects,
        WizardStep::Photos,
        WizardStep::Comparables,
        WizardStep::Review,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Metadata => "Report Metadata",
            WizardStep::Applicant => "Applicant Information",
            WizardStep::Property => "Property Details",
            WizardStep::Valuation => "Valuation Details",
            WizardStep::LegalAspects => "Legal Aspects",
            WizardStep::Photos => "Photos",
            WizardStep::Comparables => "Comparables",
            WizardStep::Review => "Review & Confirm",
        }
    }

    pub fn is_last(self) -> bool {
        self.index() == STEP_COUNT - 1
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Complete,
    Current,
    Upcoming,
}

/// Stepper labels for a wizard sitting at `current`.
pub fn step_statuses(current: usize) -> Vec<(WizardStep, StepStatus)> {
    WizardStep::ALL
        .iter()
        .map(|&step| {
            let status = match step.index() {
                i if i < current => StepStatus::Complete,
                i if i == current => StepStatus::Current,
                _ => StepStatus::Upcoming,
            };
            (step, status)
        })
        .collect()
}
