// lib/src/roster.rs

//! Read-only views over a set of caller-owned patient rows: lookup, search,
//! the high-risk list and the tier distribution.

use std::collections::BTreeMap;

use serde::Serialize;

use models::errors::{GuardError, GuardResult};
use models::identifiers::PatientId;
use models::medical::PatientVitals;
use models::risk::RiskTier;

use crate::classifier::classify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskFilter {
    #[default]
    All,
    HighOnly,
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    patients: Vec<PatientVitals>,
}

impl Roster {
    pub fn new(patients: Vec<PatientVitals>) -> Self {
        Roster { patients }
    }

    pub fn patients(&self) -> &[PatientVitals] {
        &self.patients
    }

    pub fn find(&self, id: PatientId) -> Option<&PatientVitals> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn get(&self, id: PatientId) -> GuardResult<&PatientVitals> {
        self.find(id).ok_or(GuardError::NotFound(id))
    }

    /// Case-insensitive substring match on name or id, narrowed by `filter`.
    /// An empty term matches everyone.
    pub fn search(&self, term: &str, filter: RiskFilter) -> GuardResult<Vec<&PatientVitals>> {
        let needle = term.trim().to_lowercase();
        let mut out = Vec::new();
        for patient in &self.patients {
            let matches_term = needle.is_empty()
                || patient.name.to_lowercase().contains(&needle)
                || patient.id.to_lowercase().contains(&needle);
            if !matches_term {
                continue;
            }
            if filter == RiskFilter::HighOnly && !classify(patient.risk_score)?.is_high() {
                continue;
            }
            out.push(patient);
        }
        Ok(out)
    }

    /// High-tier patients, highest score first.
    pub fn high_risk(&self) -> GuardResult<Vec<&PatientVitals>> {
        let mut high = self.search("", RiskFilter::HighOnly)?;
        high.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score).then_with(|| a.id.cmp(&b.id)));
        Ok(high)
    }

    pub fn summary(&self) -> GuardResult<RiskSummary> {
        let mut counts: BTreeMap<RiskTier, usize> = RiskTier::ALL.iter().map(|t| (*t, 0)).collect();
        let mut total_score = 0.0;
        for patient in &self.patients {
            *counts.entry(classify(patient.risk_score)?).or_default() += 1;
            total_score += patient.risk_score;
        }

        let total = self.patients.len();
        Ok(RiskSummary {
            total,
            low: counts[&RiskTier::Low],
            medium: counts[&RiskTier::Medium],
            high: counts[&RiskTier::High],
            average_score: (total > 0).then(|| total_score / total as f64),
        })
    }
}

/// Tier distribution of a roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSummary {
    pub total: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    /// `None` for an empty roster.
    pub average_score: Option<f64>,
}

impl RiskSummary {
    pub fn count(&self, tier: RiskTier) -> usize {
        match tier {
            RiskTier::Low => self.low,
            RiskTier::Medium => self.medium,
            RiskTier::High => self.high,
        }
    }
}
