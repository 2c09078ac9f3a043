//! The report being authored, section by section.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::WizardConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    Mortgage,
    Sale,
    Insurance,
    Taxation,
    Legal,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationMethod {
    Market,
    Cost,
    Income,
    Comparative,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[default]
    Deed,
    SurveyPlan,
    Approval,
    Permit,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoType {
    #[default]
    Exterior,
    Interior,
    Document,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSimilarity {
    #[default]
    Similar,
    SlightlyDifferent,
    Different,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Applicant {
    pub name: String,
    pub address: String,
    pub contact_numbers: Vec<String>,
    pub email: String,
    pub nic_number: String,
    pub business_name: String,
    pub business_registration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDetails {
    // legal identification
    pub lot_number: String,
    pub plan_number: String,
    pub plan_date: String,
    pub surveyor_name: String,
    pub deed_numbers: Vec<String>,

    // location
    pub address: String,
    pub village: String,
    pub gn_division: String,
    pub district: String,
    pub province: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    // access
    pub road_access: bool,
    pub directions_text: String,
    pub access_description: String,

    // land
    pub property_type: String,
    pub total_extent: String,
    pub total_extent_sqft: Option<f64>,
    pub land_shape: String,
    pub elevation: String,
    pub soil_type: String,
    pub water_table: String,
    pub flood_risk: bool,

    // building
    pub building_area: Option<f64>,
    pub building_structure: String,
    pub year_built: Option<i32>,
    pub building_condition: String,
    pub depreciation_rate: Option<f64>,

    // utilities
    pub electricity: bool,
    pub water_supply: bool,
    pub sewerage: bool,
    pub telephone: bool,
    pub internet: bool,

    // market
    pub market_activity: String,
    pub development_potential: String,
    pub restrictions: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValuationDetails {
    pub primary_method: Option<ValuationMethod>,
    pub secondary_methods: Vec<String>,
    pub methodology_explanation: String,

    pub land_rate_per_perch: Option<f64>,
    pub land_extent_perches: Option<f64>,

    pub building_rate_per_sqft: Option<f64>,
    pub building_area: Option<f64>,
    pub building_value_before_depreciation: Option<f64>,
    pub building_value_after_depreciation: Option<f64>,
    pub depreciation_percentage: Option<f64>,

    pub other_improvements_value: Option<f64>,
    pub other_improvements_description: String,

    pub total_market_value: Option<f64>,
    pub forced_sale_value: Option<f64>,
    pub insurance_value: Option<f64>,
    pub rental_value_monthly: Option<f64>,
    pub value_per_perch: Option<f64>,
    pub value_per_sqft: Option<f64>,

    pub market_trend_analysis: String,
    pub assumptions: Vec<String>,
    pub limitations: Vec<String>,
    pub risk_factors: Vec<String>,

    pub valuation_fee: Option<f64>,
    pub travel_cost: Option<f64>,
    pub other_charges: Option<f64>,
    pub total_fee: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalAspect {
    pub document_type: DocumentType,
    pub document_number: String,
    pub document_date: String,
    pub issuing_authority: String,
    pub current_owner: String,
    pub previous_owners: Vec<String>,
    pub ownership_type: String,
    pub ownership_percentage: Option<f64>,
    pub title_clear: bool,
    pub encumbrances: Vec<String>,
    pub mortgages: Vec<String>,
    pub liens: Vec<String>,
    pub easements: Vec<String>,
    pub approvals_permits: Vec<String>,
    pub zoning_classification: String,
    pub development_restrictions: Vec<String>,
    pub registration_details: String,
    pub legal_issues: Vec<String>,
    pub court_cases: Vec<String>,
    pub disputes: Vec<String>,
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub file_url: String,
    pub filename: String,
    pub caption: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: PhotoType,
    pub sequence_order: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comparable {
    pub address: String,
    pub lot_number: String,
    pub plan_number: String,
    pub distance_from_subject: Option<f64>,
    pub location_similarity: LocationSimilarity,
    pub sale_date: String,
    pub sale_price: f64,
    pub transaction_type: String,

    pub land_extent_perches: Option<f64>,
    pub land_extent_sqft: Option<f64>,
    pub building_area: Option<f64>,
    pub property_type: String,

    pub location_adjustment: Option<f64>,
    pub size_adjustment: Option<f64>,
    pub condition_adjustment: Option<f64>,
    pub time_adjustment: Option<f64>,
    pub other_adjustments: Option<f64>,
    pub adjusted_price: Option<f64>,
    pub price_per_perch: Option<f64>,
    pub price_per_sqft: Option<f64>,

    pub source: String,
    pub verification_status: String,
    pub reliability_rating: Option<f64>,
    pub market_conditions: String,
    pub special_circumstances: String,
    pub remarks: String,
}

/// Everything the wizard collects for one valuation report.
///
/// `Default` is a completely blank form with nothing selected; the wizard
/// starts from [`ReportFormData::initial`] instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFormData {
    pub title: String,
    pub reference_number: String,
    pub purpose: Option<Purpose>,
    pub bank_name: String,
    pub bank_branch: String,
    pub inspection_date: String,
    pub valuation_date: String,
    pub report_date: String,

    pub applicant: Applicant,
    pub property: PropertyDetails,
    pub valuation: ValuationDetails,

    pub legal_aspects: Vec<LegalAspect>,
    pub photos: Vec<Photo>,
    pub comparables: Vec<Comparable>,
}

impl ReportFormData {
    /// The form a new draft starts from.
    ///
    /// Repeatable text lists get one empty slot so the UI has an input to
    /// show, and the reference number is derived from `now`.
    pub fn initial(now: DateTime<Utc>, config: &WizardConfig) -> Self {
        Self {
            reference_number: format!("{}{}", config.reference_prefix, now.timestamp_millis()),
            purpose: Some(Purpose::Mortgage),
            report_date: now.format("%Y-%m-%d").to_string(),
            applicant: Applicant {
                contact_numbers: vec![String::new()],
                ..Default::default()
            },
            property: PropertyDetails {
                deed_numbers: vec![String::new()],
                road_access: true,
                property_type: "land".to_string(),
                ..Default::default()
            },
            valuation: ValuationDetails {
                primary_method: Some(ValuationMethod::Market),
                assumptions: vec![String::new()],
                limitations: vec![String::new()],
                risk_factors: vec![String::new()],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Apply a form update, producing the next form.
    ///
    /// On error `self` is untouched and nothing is produced.
    pub fn apply(&self, update: FormUpdate) -> Result<Self> {
        let mut next = self.clone();
        match update {
            FormUpdate::Merge { section, data } => match section {
                Section::Applicant => {
                    next.applicant = merge_section(section, &self.applicant, data)?;
                }
                Section::Property => {
                    next.property = merge_section(section, &self.property, data)?;
                }
                Section::Valuation => {
                    next.valuation = merge_section(section, &self.valuation, data)?;
                }
            },
            FormUpdate::Replace(field) => next.replace_field(field),
        }
        Ok(next)
    }

    fn replace_field(&mut self, field: FormField) {
        match field {
            FormField::Title(v) => self.title = v,
            FormField::ReferenceNumber(v) => self.reference_number = v,
            FormField::Purpose(v) => self.purpose = v,
            FormField::BankName(v) => self.bank_name = v,
            FormField::BankBranch(v) => self.bank_branch = v,
            FormField::InspectionDate(v) => self.inspection_date = v,
            FormField::ValuationDate(v) => self.valuation_date = v,
            FormField::ReportDate(v) => self.report_date = v,
            FormField::LegalAspects(v) => self.legal_aspects = v,
            FormField::Photos(v) => self.photos = v,
            FormField::Comparables(v) => self.comparables = v,
        }
    }
}

/// A record-shaped section of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Applicant,
    Property,
    Valuation,
}

impl Section {
    pub fn name(self) -> &'static str {
        match self {
            Section::Applicant => "applicant",
            Section::Property => "property",
            Section::Valuation => "valuation",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A top-level field that is replaced wholesale.
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Title(String),
    ReferenceNumber(String),
    Purpose(Option<Purpose>),
    BankName(String),
    BankBranch(String),
    InspectionDate(String),
    ValuationDate(String),
    ReportDate(String),
    LegalAspects(Vec<LegalAspect>),
    Photos(Vec<Photo>),
    Comparables(Vec<Comparable>),
}

/// One edit to the form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormUpdate {
    /// Patch a section. An object is shallow-merged over the section's
    /// current fields; any other value must describe the whole section and
    /// replaces it.
    Merge { section: Section, data: Value },
    /// Overwrite one top-level field.
    Replace(FormField),
}

impl FormUpdate {
    /// Shallow-merge `data` into `section`.
    ///
    /// ```
    /// use serde_json::json;
    /// use valuer_state::wizard::{FormUpdate, ReportFormData, Section};
    ///
    /// let form = ReportFormData::default()
    ///     .apply(FormUpdate::merge(Section::Applicant, json!({ "name": "Jane Doe" })))
    ///     .unwrap();
    /// assert_eq!(form.applicant.name, "Jane Doe");
    /// ```
    pub fn merge(section: Section, data: Value) -> Self {
        FormUpdate::Merge { section, data }
    }
}

impl From<FormField> for FormUpdate {
    fn from(field: FormField) -> Self {
        FormUpdate::Replace(field)
    }
}

fn merge_section<T>(section: Section, current: &T, data: Value) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let invalid = |source| Error::SectionData {
        section: section.name(),
        source,
    };
    let value = match data {
        Value::Object(patch) => {
            let mut base = serde_json::to_value(current).map_err(invalid)?;
            if let Value::Object(fields) = &mut base {
                fields.extend(patch);
            }
            base
        }
        whole => whole,
    };
    serde_json::from_value(value).map_err(invalid)
}
