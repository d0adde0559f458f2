// models/src/alerts.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::PatientId;
use crate::risk::RiskTier;

/// Emitted once when a patient newly enters the High tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub patient_id: PatientId,
    pub risk_score: f64,
    pub tier: RiskTier,
    pub first_observed_at: DateTime<Utc>,
}

/// Per-patient alert state. A patient the trigger holds no entry for is
/// unwatched.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertState {
    /// Watched, no active alert. The next High score fires.
    Normal,
    /// An alert fired and has not been acknowledged.
    Alerting,
    /// The alert was seen; re-arms on the next below-High score.
    Acknowledged,
}

impl AlertState {
    pub fn is_active(&self) -> bool {
        matches!(self, AlertState::Alerting)
    }
}

/// Banner payload for an alert, joined with the patient's display name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlertNotice {
    pub message: String,
    pub patient_id: PatientId,
    pub patient_name: Option<String>,
    pub risk_score: f64,
}

impl AlertNotice {
    pub fn new(message: impl Into<String>, event: &AlertEvent, patient_name: Option<String>) -> Self {
        AlertNotice {
            message: message.into(),
            patient_id: event.patient_id,
            patient_name,
            risk_score: event.risk_score,
        }
    }

    /// The banner's second line, e.g. `"John Doe - Risk Score: 85%"`.
    pub fn detail_line(&self) -> String {
        let who = self.patient_name.as_deref().unwrap_or(self.patient_id.as_str());
        format!("{} - Risk Score: {}%", who, self.risk_score)
    }
}
