use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::identifiers::PatientId;
use crate::medical::{VitalReading, VitalSigns};

/// A patient row as supplied by the data source. The risk score is computed
/// upstream; this crate only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientVitals {
    pub id: PatientId,
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<String>, // e.g., "Male", "Female", "Other"
    pub risk_score: f64, // percentage, nominally 0-100
    #[serde(default)]
    pub vitals: VitalSigns,
    #[serde(default)]
    pub admission: Option<Admission>,
    /// Oldest first.
    #[serde(default)]
    pub vital_history: Vec<VitalReading>,
}

/// Where and why a patient is admitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admission {
    pub admitted_on: NaiveDate,
    pub room: String,
    pub diagnosis: String,
}

impl PatientVitals {
    pub fn new(id: PatientId, name: impl Into<String>, risk_score: f64) -> Self {
        PatientVitals {
            id,
            name: name.into(),
            age: None,
            gender: None,
            risk_score,
            vitals: VitalSigns::default(),
            admission: None,
            vital_history: Vec::new(),
        }
    }

    pub fn with_demographics(mut self, age: u32, gender: impl Into<String>) -> Self {
        self.age = Some(age);
        self.gender = Some(gender.into());
        self
    }

    pub fn with_vitals(mut self, vitals: VitalSigns) -> Self {
        self.vitals = vitals;
        self
    }

    pub fn with_admission(mut self, admission: Admission) -> Self {
        self.admission = Some(admission);
        self
    }

    pub fn with_vital_history(mut self, history: Vec<VitalReading>) -> Self {
        self.vital_history = history;
        self
    }

    /// Upper-cased first letter of each part of the name, e.g. `"JD"`.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}
