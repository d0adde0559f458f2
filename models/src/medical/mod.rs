pub mod patient;
pub mod vitals;

pub use patient::{Admission, PatientVitals};
pub use vitals::{BloodPressure, VitalReading, VitalSigns};
