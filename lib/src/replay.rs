// lib/src/replay.rs

//! Drives an `AlertTrigger` from a recorded list of steps, the way a polling
//! loop would, and keeps what each step produced.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Timelike, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use models::alerts::{AlertEvent, AlertState};
use models::errors::GuardResult;
use models::identifiers::PatientId;
use models::risk::RiskTier;

use crate::alert_trigger::AlertTrigger;
use crate::classifier::classify;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReplayStep {
    Observe {
        patient_id: PatientId,
        score: f64,
        timestamp: DateTime<Utc>,
    },
    Acknowledge {
        patient_id: PatientId,
    },
    Forget {
        patient_id: PatientId,
    },
}

impl ReplayStep {
    pub fn patient_id(&self) -> PatientId {
        match self {
            ReplayStep::Observe { patient_id, .. }
            | ReplayStep::Acknowledge { patient_id }
            | ReplayStep::Forget { patient_id } => *patient_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub step: ReplayStep,
    /// Tier of the observed score; `None` for acknowledge and forget.
    pub tier: Option<RiskTier>,
    pub alert: Option<AlertEvent>,
    /// State after the step; `None` once the patient is unwatched.
    pub state: Option<AlertState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplayReport {
    pub outcomes: Vec<StepOutcome>,
}

impl ReplayReport {
    pub fn alerts(&self) -> Vec<&AlertEvent> {
        self.outcomes.iter().filter_map(|o| o.alert.as_ref()).collect()
    }

    /// Tiers of every observation for one patient, in order.
    pub fn tiers_for(&self, patient_id: PatientId) -> Vec<RiskTier> {
        self.outcomes
            .iter()
            .filter(|o| o.step.patient_id() == patient_id)
            .filter_map(|o| o.tier)
            .collect()
    }

    /// Observed tiers bucketed by the hour of their timestamp, earliest first.
    /// Hours with no observation are left out.
    pub fn distribution_by_hour(&self) -> Vec<HourlyDistribution> {
        let mut buckets: BTreeMap<DateTime<Utc>, HourlyDistribution> = BTreeMap::new();
        for outcome in &self.outcomes {
            let (ReplayStep::Observe { timestamp, .. }, Some(tier)) = (&outcome.step, outcome.tier) else {
                continue;
            };
            let hour = start_of_hour(*timestamp);
            buckets.entry(hour).or_insert_with(|| HourlyDistribution::new(hour)).add(tier);
        }
        buckets.into_values().collect()
    }
}

/// Tier counts for the observations falling in one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyDistribution {
    pub hour: DateTime<Utc>,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl HourlyDistribution {
    fn new(hour: DateTime<Utc>) -> Self {
        HourlyDistribution { hour, low: 0, medium: 0, high: 0 }
    }

    fn add(&mut self, tier: RiskTier) {
        match tier {
            RiskTier::Low => self.low += 1,
            RiskTier::Medium => self.medium += 1,
            RiskTier::High => self.high += 1,
        }
    }
}

fn start_of_hour(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(timestamp)
}

pub fn load_steps<P: AsRef<Path>>(path: P) -> GuardResult<Vec<ReplayStep>> {
    let content = fs::read_to_string(path.as_ref())?;
    let steps: Vec<ReplayStep> = serde_json::from_str(&content)?;
    debug!("Loaded {} replay steps from {}", steps.len(), path.as_ref().display());
    Ok(steps)
}

/// Applies the steps in order. Stops at the first invalid score.
pub fn replay<I>(trigger: &AlertTrigger, steps: I) -> GuardResult<ReplayReport>
where
    I: IntoIterator<Item = ReplayStep>,
{
    let mut report = ReplayReport::default();
    for step in steps {
        let (tier, alert) = match &step {
            ReplayStep::Observe { patient_id, score, timestamp } => {
                let tier = classify(*score)?;
                let alert = trigger.observe(*patient_id, *score, *timestamp)?;
                (Some(tier), alert)
            }
            ReplayStep::Acknowledge { patient_id } => {
                trigger.acknowledge(*patient_id);
                (None, None)
            }
            ReplayStep::Forget { patient_id } => {
                trigger.forget(*patient_id);
                (None, None)
            }
        };
        let state = trigger.state(step.patient_id());
        report.outcomes.push(StepOutcome { step, tier, alert, state });
    }
    Ok(report)
}
