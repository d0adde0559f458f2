// lib/src/lib.rs

//! Risk classification and alert policy for SepsisGuard.
//!
//! `classify` maps a risk score to a tier; `AlertTrigger` watches a stream of
//! scores and raises one alert per patient per High episode. The roster,
//! replay and config modules are the thin layers the CLI builds on.

pub mod alert_trigger;
pub mod classifier;
pub mod config;
pub mod fixtures;
pub mod replay;
pub mod roster;

pub use models::{
    Admission, AlertEvent, AlertNotice, AlertState, GuardError, GuardResult, PatientId, PatientVitals,
    RiskAssessment, RiskTier, Severity, Trend, VitalReading, VitalSigns,
};

pub use crate::alert_trigger::{AlertTrigger, PatientAlertRecord, TriggerSnapshot};
pub use crate::classifier::{assess, classify};
pub use crate::config::{load_guard_config, GuardConfig};
pub use crate::replay::{load_steps, replay, HourlyDistribution, ReplayReport, ReplayStep, StepOutcome};
pub use crate::roster::{RiskFilter, RiskSummary, Roster};
