// lib/src/fixtures.rs

//! The demo cohort shown by the dashboard. Scores are fixed; nothing here is
//! computed.

use chrono::{NaiveDate, NaiveTime};

use models::identifiers::PatientId;
use models::medical::{Admission, BloodPressure, PatientVitals, VitalReading, VitalSigns};

struct DemoRow {
    id: &'static str,
    name: &'static str,
    age: u32,
    gender: &'static str,
    heart_rate: u32,
    blood_pressure: (u16, u16),
    temperature: f32,
    lactate: f32,
    wbc: f32,
    respiratory_rate: Option<u32>,
    oxygen_saturation: Option<u32>,
    risk_score: f64,
    admission: Option<DemoAdmission>,
}

struct DemoAdmission {
    admitted_on: (i32, u32, u32),
    room: &'static str,
    diagnosis: &'static str,
    /// (hour, heart rate, temperature, lactate)
    history: &'static [(u32, u32, f32, f32)],
}

const DEMO_ROWS: [DemoRow; 5] = [
    DemoRow {
        id: "P001",
        name: "John Doe",
        age: 65,
        gender: "Male",
        heart_rate: 105,
        blood_pressure: (140, 90),
        temperature: 38.5,
        lactate: 2.8,
        wbc: 14.5,
        respiratory_rate: Some(24),
        oxygen_saturation: Some(92),
        risk_score: 85.0,
        admission: Some(DemoAdmission {
            admitted_on: (2025, 10, 1),
            room: "ICU-204",
            diagnosis: "Pneumonia with suspected sepsis",
            history: &[(0, 98, 37.8, 2.0), (4, 102, 38.0, 2.3), (8, 105, 38.5, 2.8)],
        }),
    },
    DemoRow {
        id: "P002",
        name: "Jane Smith",
        age: 52,
        gender: "Female",
        heart_rate: 88,
        blood_pressure: (130, 85),
        temperature: 37.8,
        lactate: 1.5,
        wbc: 10.2,
        respiratory_rate: None,
        oxygen_saturation: None,
        risk_score: 55.0,
        admission: None,
    },
    DemoRow {
        id: "P003",
        name: "Robert Johnson",
        age: 71,
        gender: "Male",
        heart_rate: 78,
        blood_pressure: (125, 80),
        temperature: 37.2,
        lactate: 1.0,
        wbc: 8.5,
        respiratory_rate: None,
        oxygen_saturation: None,
        risk_score: 25.0,
        admission: None,
    },
    DemoRow {
        id: "P004",
        name: "Mary Williams",
        age: 58,
        gender: "Female",
        heart_rate: 112,
        blood_pressure: (145, 95),
        temperature: 39.1,
        lactate: 3.2,
        wbc: 16.8,
        respiratory_rate: Some(26),
        oxygen_saturation: Some(90),
        risk_score: 92.0,
        admission: Some(DemoAdmission {
            admitted_on: (2025, 9, 30),
            room: "ICU-201",
            diagnosis: "Post-surgical infection",
            history: &[(0, 102, 38.2, 2.5), (4, 108, 38.8, 2.9), (8, 112, 39.1, 3.2)],
        }),
    },
    DemoRow {
        id: "P005",
        name: "James Brown",
        age: 63,
        gender: "Male",
        heart_rate: 92,
        blood_pressure: (135, 88),
        temperature: 38.0,
        lactate: 2.0,
        wbc: 11.5,
        respiratory_rate: None,
        oxygen_saturation: None,
        risk_score: 65.0,
        admission: None,
    },
];

impl DemoAdmission {
    fn build(&self) -> Option<(Admission, Vec<VitalReading>)> {
        let (year, month, day) = self.admitted_on;
        let admission = Admission {
            admitted_on: NaiveDate::from_ymd_opt(year, month, day)?,
            room: self.room.to_string(),
            diagnosis: self.diagnosis.to_string(),
        };
        let history = self
            .history
            .iter()
            .map(|&(hour, hr, temp, lactate)| {
                NaiveTime::from_hms_opt(hour, 0, 0).map(|time| VitalReading::new(time, hr, temp, lactate))
            })
            .collect::<Option<Vec<_>>>()?;
        Some((admission, history))
    }
}

impl DemoRow {
    fn build(&self) -> Option<PatientVitals> {
        let id = PatientId::new(self.id).ok()?;
        let vitals = VitalSigns {
            heart_rate: Some(self.heart_rate),
            blood_pressure: Some(BloodPressure::new(self.blood_pressure.0, self.blood_pressure.1)),
            temperature: Some(self.temperature),
            lactate: Some(self.lactate),
            wbc: Some(self.wbc),
            respiratory_rate: self.respiratory_rate,
            oxygen_saturation: self.oxygen_saturation,
        };
        let mut patient = PatientVitals::new(id, self.name, self.risk_score)
            .with_demographics(self.age, self.gender)
            .with_vitals(vitals);
        if let Some(demo) = &self.admission {
            let (admission, history) = demo.build()?;
            patient = patient.with_admission(admission).with_vital_history(history);
        }
        Some(patient)
    }
}

pub fn demo_patients() -> Vec<PatientVitals> {
    // Ids, dates and hours above are valid literals, so no row is dropped.
    DEMO_ROWS.iter().filter_map(DemoRow::build).collect()
}
