// models/src/lib.rs

pub mod alerts;
pub mod errors;
pub mod identifiers;
pub mod medical;
pub mod risk;

pub use self::alerts::{AlertEvent, AlertNotice, AlertState};
pub use self::errors::{GuardError, GuardResult, ValidationError, ValidationResult};
pub use self::identifiers::PatientId;
pub use self::medical::{Admission, BloodPressure, PatientVitals, VitalReading, VitalSigns};
pub use self::risk::{RiskAssessment, RiskTier, Severity, Trend, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
