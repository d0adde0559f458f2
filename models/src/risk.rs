// models/src/risk.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scores strictly below this value are `Low`.
pub const MEDIUM_RISK_THRESHOLD: f64 = 40.0;
/// Scores at or above this value are `High`.
pub const HIGH_RISK_THRESHOLD: f64 = 80.0;

/// Discrete risk tier derived from a risk score.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    /// Human readable label shown next to a score.
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::High => "High Risk",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            RiskTier::Low => Severity::Success,
            RiskTier::Medium => Severity::Warning,
            RiskTier::High => Severity::Destructive,
        }
    }

    pub fn is_high(&self) -> bool {
        matches!(self, RiskTier::High)
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Presentation token paired with a tier. Rendering is left to the caller.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Destructive,
}

impl Severity {
    pub fn token(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Destructive => "destructive",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A classified score with everything a view needs to render it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub tier: RiskTier,
    pub label: &'static str,
    pub severity: Severity,
}

impl RiskAssessment {
    pub fn new(score: f64, tier: RiskTier) -> Self {
        RiskAssessment {
            score,
            tier,
            label: tier.label(),
            severity: tier.severity(),
        }
    }
}

/// Direction of the latest score change for a patient.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn between(previous: f64, current: f64) -> Self {
        if current > previous {
            Trend::Up
        } else if current < previous {
            Trend::Down
        } else {
            Trend::Stable
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => f.write_str("up"),
            Trend::Down => f.write_str("down"),
            Trend::Stable => f.write_str("stable"),
        }
    }
}
