// models/src/medical/vitals.rs
use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};

/// Raw vital signs carried alongside a risk score. None of these feed the
/// classifier; they are passed through for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    pub heart_rate: Option<u32>, // bpm
    pub blood_pressure: Option<BloodPressure>,
    pub temperature: Option<f32>, // °C
    pub lactate: Option<f32>, // mmol/L
    pub wbc: Option<f32>, // K/µL
    pub respiratory_rate: Option<u32>,
    pub oxygen_saturation: Option<u32>, // %
}

impl VitalSigns {
    /// Display strings for every vital present, e.g. `"Lactate: 2.8 mmol/L"`.
    pub fn readings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(hr) = self.heart_rate {
            out.push(format!("HR: {} bpm", hr));
        }
        if let Some(bp) = self.blood_pressure {
            out.push(format!("BP: {}", bp));
        }
        if let Some(temp) = self.temperature {
            out.push(format!("Temperature: {:.1}°C", temp));
        }
        if let Some(lactate) = self.lactate {
            out.push(format!("Lactate: {:.1} mmol/L", lactate));
        }
        if let Some(wbc) = self.wbc {
            out.push(format!("WBC: {:.1} K/µL", wbc));
        }
        if let Some(rr) = self.respiratory_rate {
            out.push(format!("RR: {} /min", rr));
        }
        if let Some(spo2) = self.oxygen_saturation {
            out.push(format!("SpO2: {}%", spo2));
        }
        out
    }
}

/// One point of a patient's vitals trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalReading {
    pub time: NaiveTime,
    pub heart_rate: u32,
    pub temperature: f32,
    pub lactate: f32,
}

impl VitalReading {
    pub fn new(time: NaiveTime, heart_rate: u32, temperature: f32, lactate: f32) -> Self {
        VitalReading { time, heart_rate, temperature, lactate }
    }
}

impl fmt::Display for VitalReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  HR {} bpm  Temp {:.1}°C  Lactate {:.1} mmol/L",
            self.time.format("%H:%M"),
            self.heart_rate,
            self.temperature,
            self.lactate
        )
    }
}

/// Blood pressure as `systolic/diastolic` mmHg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

impl BloodPressure {
    pub fn new(systolic: u16, diastolic: u16) -> Self {
        BloodPressure { systolic, diastolic }
    }
}

impl FromStr for BloodPressure {
    type Err = ValidationError;

    fn from_str(s: &str) -> ValidationResult<Self> {
        let invalid = || ValidationError::InvalidBloodPressure(s.to_string());
        let (systolic, diastolic) = s.trim().split_once('/').ok_or_else(invalid)?;
        let systolic = systolic.trim().parse().map_err(|_| invalid())?;
        let diastolic = diastolic.trim().parse().map_err(|_| invalid())?;
        Ok(BloodPressure { systolic, diastolic })
    }
}

impl TryFrom<String> for BloodPressure {
    type Error = ValidationError;

    fn try_from(value: String) -> ValidationResult<Self> {
        value.parse()
    }
}

impl From<BloodPressure> for String {
    fn from(value: BloodPressure) -> Self {
        value.to_string()
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}
