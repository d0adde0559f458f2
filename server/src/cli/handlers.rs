// server/src/cli/handlers.rs

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use log::info;
use std::path::{Path, PathBuf};

use models::risk::Severity;
use sepsisguard::fixtures::demo_patients;
use sepsisguard::{
    assess, load_steps, replay, AlertEvent, AlertNotice, AlertTrigger, GuardConfig, PatientId,
    PatientVitals, ReplayStep, RiskAssessment, RiskFilter, Roster,
};

fn paint(text: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::Success => text.green(),
        Severity::Warning => text.yellow(),
        Severity::Destructive => text.red().bold(),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to encode JSON output")?);
    Ok(())
}

/// The CLI flag wins over `[storage] state_file`.
pub fn resolve_state_file(flag: Option<PathBuf>, config: &GuardConfig) -> Option<PathBuf> {
    flag.or_else(|| config.storage.state_file.clone())
}

pub fn handle_classify(scores: &[f64], json: bool) -> Result<()> {
    let assessments = scores
        .iter()
        .map(|score| assess(*score).with_context(|| format!("Cannot classify score {}", score)))
        .collect::<Result<Vec<_>>>()?;

    if json {
        return print_json(&assessments);
    }
    for assessment in &assessments {
        println!(
            "{:>7}  {}  ({})",
            assessment.score,
            paint(assessment.label, assessment.severity),
            assessment.severity
        );
    }
    Ok(())
}

fn print_patient_row(patient: &PatientVitals) -> Result<()> {
    let assessment = assess(patient.risk_score)?;
    let demographics = match (patient.age, patient.gender.as_deref()) {
        (Some(age), Some(gender)) => format!("{} / {}", age, gender),
        (Some(age), None) => age.to_string(),
        _ => "-".to_string(),
    };
    println!(
        "{:<6} {:<3} {:<16} {:<12} {:>4}%  {}",
        patient.id,
        patient.initials(),
        patient.name,
        demographics,
        patient.risk_score,
        paint(assessment.label, assessment.severity)
    );
    let readings = patient.vitals.readings();
    if !readings.is_empty() {
        println!("       {}", readings.join(", "));
    }
    Ok(())
}

pub fn handle_roster(search: Option<&str>, high_risk: bool, json: bool) -> Result<()> {
    let roster = Roster::new(demo_patients());
    let filter = if high_risk { RiskFilter::HighOnly } else { RiskFilter::All };
    let patients = roster.search(search.unwrap_or(""), filter)?;

    if json {
        return print_json(&patients);
    }
    if patients.is_empty() {
        println!("No patients match.");
        return Ok(());
    }
    for patient in patients {
        print_patient_row(patient)?;
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct PatientDetail<'a> {
    patient: &'a PatientVitals,
    assessment: RiskAssessment,
}

/// Fails with `GuardError::NotFound` for an id outside the demo cohort.
pub fn handle_patient(id: &str, json: bool) -> Result<()> {
    let id: PatientId = id.parse().with_context(|| format!("Invalid patient id {:?}", id))?;
    let roster = Roster::new(demo_patients());
    let patient = roster.get(id)?;
    let assessment = assess(patient.risk_score)?;

    if json {
        return print_json(&PatientDetail { patient, assessment });
    }
    println!("{} ({})", patient.name.bold(), patient.id);
    if let (Some(age), Some(gender)) = (patient.age, patient.gender.as_deref()) {
        println!("  {} years, {}", age, gender);
    }
    if let Some(admission) = &patient.admission {
        println!("  Admitted: {}  Room: {}", admission.admitted_on, admission.room);
        println!("  Diagnosis: {}", admission.diagnosis);
    }
    println!(
        "  Risk score: {}%  {}",
        assessment.score,
        paint(assessment.label, assessment.severity)
    );
    let readings = patient.vitals.readings();
    if !readings.is_empty() {
        println!("  Current vitals:");
        for reading in readings {
            println!("    {}", reading);
        }
    }
    if !patient.vital_history.is_empty() {
        println!("  Vitals trend:");
        for reading in &patient.vital_history {
            println!("    {}", reading);
        }
    }
    Ok(())
}

pub fn handle_summary(json: bool) -> Result<()> {
    let summary = Roster::new(demo_patients()).summary()?;
    if json {
        return print_json(&summary);
    }
    println!("Total patients: {}", summary.total);
    println!("  {:<12} {}", paint("Low Risk", Severity::Success), summary.low);
    println!("  {:<12} {}", paint("Medium Risk", Severity::Warning), summary.medium);
    println!("  {:<12} {}", paint("High Risk", Severity::Destructive), summary.high);
    match summary.average_score {
        Some(average) => println!("Average risk: {:.0}%", average),
        None => println!("Average risk: n/a"),
    }
    Ok(())
}

fn notice_for(event: &AlertEvent, roster: &Roster, config: &GuardConfig) -> AlertNotice {
    let name = roster.find(event.patient_id).map(|p| p.name.clone());
    AlertNotice::new(config.alerts.message.clone(), event, name)
}

fn print_notice(notice: &AlertNotice) {
    println!("  {} {}", "!".red().bold(), notice.message.red().bold());
    println!("    {}", notice.detail_line());
}

fn load_trigger(state_file: Option<&Path>) -> Result<AlertTrigger> {
    match state_file {
        Some(path) => AlertTrigger::load_or_new(path)
            .with_context(|| format!("Failed to load trigger state from {}", path.display())),
        None => Ok(AlertTrigger::new()),
    }
}

pub fn handle_replay(file: &Path, state_file: Option<&Path>, config: &GuardConfig, json: bool) -> Result<()> {
    let steps = load_steps(file).with_context(|| format!("Failed to read replay file {}", file.display()))?;
    let trigger = load_trigger(state_file)?;
    let report = replay(&trigger, steps)?;
    let roster = Roster::new(demo_patients());

    if let Some(path) = state_file {
        trigger
            .save_to_file(path)
            .with_context(|| format!("Failed to save trigger state to {}", path.display()))?;
        info!("Trigger state written to {}", path.display());
    }

    if json {
        return print_json(&report);
    }
    for outcome in &report.outcomes {
        let patient_id = outcome.step.patient_id();
        let state = outcome
            .state
            .map(|s| format!("{:?}", s))
            .unwrap_or_else(|| "Unwatched".to_string());
        match (&outcome.step, outcome.tier) {
            (ReplayStep::Observe { score, timestamp, .. }, Some(tier)) => println!(
                "{}  {:<6} {:>5}%  {:<12} -> {}",
                timestamp.format("%Y-%m-%d %H:%M"),
                patient_id,
                score,
                paint(tier.label(), tier.severity()),
                state
            ),
            (ReplayStep::Observe { .. }, None) => {}
            (ReplayStep::Acknowledge { .. }, _) => {
                println!("{:<16}  {:<6} acknowledged -> {}", "", patient_id, state)
            }
            (ReplayStep::Forget { .. }, _) => {
                println!("{:<16}  {:<6} forgotten -> {}", "", patient_id, state)
            }
        }
        if let Some(ref event) = outcome.alert {
            print_notice(&notice_for(event, &roster, config));
        }
    }
    println!("{} alert(s) raised", report.alerts().len());
    for bucket in report.distribution_by_hour() {
        println!(
            "  {}  low {}  medium {}  high {}",
            bucket.hour.format("%Y-%m-%d %H:00"),
            bucket.low,
            bucket.medium,
            bucket.high
        );
    }
    Ok(())
}

pub fn handle_alerts(state_file: Option<&Path>, config: &GuardConfig, json: bool) -> Result<()> {
    let path = state_file.context("No state file given; pass --state-file or set [storage] state_file")?;
    let trigger = AlertTrigger::load_from_file(path)
        .with_context(|| format!("Failed to load trigger state from {}", path.display()))?;
    let alerts = trigger.active_alerts();

    if json {
        return print_json(&alerts);
    }
    if alerts.is_empty() {
        println!("No High-Risk Alerts. All patients are currently stable.");
        return Ok(());
    }
    let roster = Roster::new(demo_patients());
    for event in &alerts {
        print_notice(&notice_for(event, &roster, config));
        let trend = trigger
            .trend(event.patient_id)
            .map(|t| t.to_string())
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "    first observed {}  trend {}",
            event.first_observed_at.format("%Y-%m-%d %H:%M UTC"),
            trend
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sepsisguard::config::StorageConfig;
    use sepsisguard::GuardError;
    use std::fs;

    const SCENARIO: &str = r#"[
        {"action": "observe", "patient_id": "P001", "score": 85, "timestamp": "2025-10-01T08:00:00Z"},
        {"action": "observe", "patient_id": "P002", "score": 55, "timestamp": "2025-10-01T08:00:00Z"}
    ]"#;

    #[test]
    fn should_prefer_cli_state_file_over_config() {
        let config = GuardConfig {
            storage: StorageConfig { state_file: Some(PathBuf::from("from_config.msgpack")) },
            ..Default::default()
        };
        assert_eq!(
            resolve_state_file(Some(PathBuf::from("from_flag.msgpack")), &config),
            Some(PathBuf::from("from_flag.msgpack"))
        );
        assert_eq!(resolve_state_file(None, &config), Some(PathBuf::from("from_config.msgpack")));
        assert_eq!(resolve_state_file(None, &GuardConfig::default()), None);
    }

    #[test]
    fn should_fail_classify_on_nan() {
        assert!(handle_classify(&[f64::NAN], true).is_err());
        assert!(handle_classify(&[12.0, 95.0], true).is_ok());
    }

    #[test]
    fn should_persist_replay_state_for_alerts() {
        let dir = tempfile::tempdir().unwrap();
        let scenario = dir.path().join("scenario.json");
        let state = dir.path().join("state.msgpack");
        fs::write(&scenario, SCENARIO).unwrap();
        let config = GuardConfig::default();

        handle_replay(&scenario, Some(state.as_path()), &config, true).unwrap();
        let trigger = AlertTrigger::load_from_file(&state).unwrap();
        assert_eq!(trigger.active_alerts().len(), 1);

        handle_alerts(Some(state.as_path()), &config, true).unwrap();
    }

    #[test]
    fn should_replay_bundled_scenario() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join("sepsis_scenario.json");
        let report = replay(&AlertTrigger::new(), load_steps(&path).unwrap()).unwrap();
        let fired: Vec<String> = report.alerts().iter().map(|a| a.patient_id.to_string()).collect();
        assert_eq!(fired, vec!["P004", "P001", "P004"]);
    }

    #[test]
    fn should_show_known_patient() {
        assert!(handle_patient("P001", false).is_ok());
        assert!(handle_patient("P004", true).is_ok());
        assert!(handle_patient("P003", false).is_ok());
    }

    #[test]
    fn should_report_unknown_patient_as_not_found() {
        let err = handle_patient("P999", false).unwrap_err();
        let missing = PatientId::new("P999").unwrap();
        assert!(matches!(err.downcast_ref::<GuardError>(), Some(GuardError::NotFound(id)) if *id == missing));

        assert!(handle_patient("", true).is_err());
    }

    #[test]
    fn should_list_roster_with_filters() {
        assert!(handle_roster(None, false, false).is_ok());
        assert!(handle_roster(Some("john"), true, false).is_ok());
        assert!(handle_roster(Some("nobody"), false, false).is_ok());
        assert!(handle_roster(Some("MARY"), false, true).is_ok());
    }

    #[test]
    fn should_print_summary() {
        assert!(handle_summary(false).is_ok());
        assert!(handle_summary(true).is_ok());
    }

    #[test]
    fn should_require_state_file_for_alerts() {
        assert!(handle_alerts(None, &GuardConfig::default(), false).is_err());
    }
}
