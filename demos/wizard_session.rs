//! Walk a valuation report through the wizard the way the create-report page
//! does, logging every store change.
//!
//! Run with `RUST_LOG=valuer_state=debug cargo run --example wizard_session`.

use serde_json::json;
use tracing_subscriber::EnvFilter;
use valuer_state::ui::NotificationKind;
use valuer_state::wizard::{FormField, FormUpdate, NextOutcome, Purpose, Section, StepStatus};
use valuer_state::{Config, ReportWizard, UiStore};

const CONFIG: &str = r#"
[wizard]
reference_prefix = "VPR-"
recommended_completeness = 80

[ui]
notification_duration_ms = 5000
"#;

fn main() -> valuer_state::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_toml_str(CONFIG)?;
    let wizard = ReportWizard::new(config.wizard);
    let ui = UiStore::new(config.ui);

    let _progress = wizard.subscribe(|state| {
        println!(
            "step {} | {} error(s) | saving: {}",
            state.current_step + 1,
            state.errors.len(),
            state.is_saving
        );
    });

    let edits = [
        FormUpdate::from(FormField::Title("Valuation of Lot 12, Plan 4471".into())),
        FormField::Purpose(Some(Purpose::Mortgage)).into(),
        FormField::InspectionDate("2024-03-01".into()).into(),
        FormField::ValuationDate("2024-03-04".into()).into(),
        FormUpdate::merge(
            Section::Applicant,
            json!({ "name": "Jane Doe", "address": "123 Main St, Colombo 05" }),
        ),
        FormUpdate::merge(
            Section::Property,
            json!({ "address": "12 Lake Rd, Kandy", "district": "Kandy" }),
        ),
        FormUpdate::merge(
            Section::Valuation,
            json!({ "total_market_value": 18_500_000.0 }),
        ),
    ];

    // Try to advance before any data is in.
    if wizard.next() == NextOutcome::Blocked {
        ui.notify(
            NotificationKind::Error,
            "Please complete all required fields before proceeding.",
        );
        for (field, message) in &wizard.state().errors {
            println!("  {field}: {message}");
        }
    }

    for edit in edits {
        wizard.update_form_data(edit)?;
    }

    loop {
        match wizard.next() {
            NextOutcome::Advanced(_) => continue,
            NextOutcome::Blocked => {
                println!("blocked: {:?}", wizard.state().errors);
                break;
            }
            NextOutcome::ReadyToSubmit => {
                let completeness = wizard.completeness();
                println!(
                    "ready to submit, {}% complete ({} of {} sections)",
                    completeness.percentage(),
                    completeness.completed(),
                    completeness.total()
                );
                if !wizard.meets_recommendation() {
                    ui.notify(NotificationKind::Warning, "Consider completing more sections.");
                }

                let _saving = wizard.saving();
                let payload = wizard.submission_payload()?;
                println!("{}", serde_json::to_string_pretty(&payload)?);
                wizard.set_report_id(format!("report_{}", chrono::Utc::now().timestamp_millis()));
                ui.notify(NotificationKind::Success, "Report created successfully!");
                break;
            }
        }
    }

    for (step, status) in wizard.step_statuses() {
        let mark = match status {
            StepStatus::Complete => "x",
            StepStatus::Current => ">",
            StepStatus::Upcoming => " ",
        };
        println!("[{mark}] {step}");
    }

    println!("{} notification(s) pending", ui.state().notifications.len());
    wizard.reset_form();
    Ok(())
}
