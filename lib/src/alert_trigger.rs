// lib/src/alert_trigger.rs

//! Per-patient alert state machine.
//!
//! A patient starts unwatched. The first High reading moves it to `Alerting`
//! and produces one `AlertEvent`; further readings produce nothing until the
//! alert is acknowledged and the score has dropped below High again. All
//! state sits behind one mutex, so two `observe` calls for the same patient
//! can never both fire.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use models::alerts::{AlertEvent, AlertState};
use models::errors::{GuardError, GuardResult};
use models::identifiers::PatientId;
use models::risk::{RiskTier, Trend};

use crate::classifier::classify;

/// What the trigger remembers about one watched patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientAlertRecord {
    pub state: AlertState,
    pub last_score: f64,
    pub last_tier: RiskTier,
    pub previous_score: Option<f64>,
    pub last_observed_at: DateTime<Utc>,
    /// The alert that moved the patient out of `Normal`, kept until re-arm.
    pub alert: Option<AlertEvent>,
}

/// Serializable copy of the trigger's table, keyed by patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerSnapshot {
    pub patients: BTreeMap<PatientId, PatientAlertRecord>,
}

/// Next state for an observed tier, and whether the move fires an alert.
fn next_state(state: AlertState, tier: RiskTier) -> (AlertState, bool) {
    match (state, tier) {
        (AlertState::Normal, RiskTier::High) => (AlertState::Alerting, true),
        (AlertState::Normal, _) => (AlertState::Normal, false),
        // Only an explicit acknowledgement clears an alert.
        (AlertState::Alerting, _) => (AlertState::Alerting, false),
        (AlertState::Acknowledged, RiskTier::High) => (AlertState::Acknowledged, false),
        (AlertState::Acknowledged, _) => (AlertState::Normal, false),
    }
}

#[derive(Debug, Default)]
pub struct AlertTrigger {
    patients: Mutex<HashMap<PatientId, PatientAlertRecord>>,
}

impl AlertTrigger {
    pub fn new() -> Self {
        AlertTrigger::default()
    }

    pub fn from_snapshot(snapshot: TriggerSnapshot) -> Self {
        AlertTrigger {
            patients: Mutex::new(snapshot.patients.into_iter().collect()),
        }
    }

    // The table holds plain data, so a panic elsewhere cannot leave it half
    // updated; recover the guard instead of failing every later call.
    fn patients(&self) -> MutexGuard<'_, HashMap<PatientId, PatientAlertRecord>> {
        self.patients.lock().unwrap_or_else(|poisoned| {
            warn!("Alert trigger lock was poisoned; recovering state");
            poisoned.into_inner()
        })
    }

    /// Records a score for a patient and returns an event only when the
    /// patient newly enters the High tier.
    ///
    /// # Errors
    /// `GuardError::InvalidScore` for `NaN` or infinite scores. The patient's
    /// state is left untouched in that case.
    pub fn observe(
        &self,
        patient_id: PatientId,
        score: f64,
        observed_at: DateTime<Utc>,
    ) -> GuardResult<Option<AlertEvent>> {
        let tier = classify(score)?;
        let mut patients = self.patients();

        let (state, previous_score) = match patients.get(&patient_id) {
            Some(record) => (record.state, Some(record.last_score)),
            None => {
                debug!("Watching patient {}", patient_id);
                (AlertState::Normal, None)
            }
        };
        let (next, fires) = next_state(state, tier);
        if next != state {
            debug!("Patient {} moved from {:?} to {:?} at score {}", patient_id, state, next, score);
        }

        let event = fires.then(|| AlertEvent {
            patient_id,
            risk_score: score,
            tier,
            first_observed_at: observed_at,
        });
        if let Some(ref event) = event {
            info!("High-risk alert raised for patient {} (score {})", patient_id, event.risk_score);
        }

        let alert = match next {
            AlertState::Normal => None,
            _ => event
                .clone()
                .or_else(|| patients.get(&patient_id).and_then(|record| record.alert.clone())),
        };
        patients.insert(
            patient_id,
            PatientAlertRecord {
                state: next,
                last_score: score,
                last_tier: tier,
                previous_score,
                last_observed_at: observed_at,
                alert,
            },
        );

        Ok(event)
    }

    /// Marks the patient's active alert as seen. A no-op when the patient is
    /// unknown or has no active alert.
    ///
    /// If the latest reading is already below High the patient is re-armed
    /// straight away, since the drop has been observed.
    pub fn acknowledge(&self, patient_id: PatientId) {
        let mut patients = self.patients();
        let Some(record) = patients.get_mut(&patient_id) else {
            debug!("Ignoring acknowledgement for unwatched patient {}", patient_id);
            return;
        };
        if record.state != AlertState::Alerting {
            return;
        }

        if record.last_tier.is_high() {
            record.state = AlertState::Acknowledged;
        } else {
            record.state = AlertState::Normal;
            record.alert = None;
        }
        info!("Alert for patient {} acknowledged; now {:?}", patient_id, record.state);
    }

    /// Drops all state for a patient, e.g. on discharge.
    ///
    /// The id itself stays in the process-wide intern pool behind
    /// `PatientId`, which is never freed; only the trigger's record goes.
    pub fn forget(&self, patient_id: PatientId) {
        if self.patients().remove(&patient_id).is_some() {
            debug!("Stopped watching patient {}", patient_id);
        }
    }

    /// `None` means the patient is unwatched.
    pub fn state(&self, patient_id: PatientId) -> Option<AlertState> {
        self.patients().get(&patient_id).map(|record| record.state)
    }

    pub fn record(&self, patient_id: PatientId) -> Option<PatientAlertRecord> {
        self.patients().get(&patient_id).cloned()
    }

    /// Direction of the last score change; `None` until two readings exist.
    pub fn trend(&self, patient_id: PatientId) -> Option<Trend> {
        let patients = self.patients();
        let record = patients.get(&patient_id)?;
        record
            .previous_score
            .map(|previous| Trend::between(previous, record.last_score))
    }

    /// Unacknowledged alerts, highest score first.
    pub fn active_alerts(&self) -> Vec<AlertEvent> {
        let mut alerts: Vec<AlertEvent> = self
            .patients()
            .values()
            .filter(|record| record.state.is_active())
            .filter_map(|record| record.alert.clone())
            .collect();
        alerts.sort_by(|a, b| {
            b.risk_score
                .total_cmp(&a.risk_score)
                .then_with(|| a.patient_id.cmp(&b.patient_id))
        });
        alerts
    }

    pub fn watched_count(&self) -> usize {
        self.patients().len()
    }

    pub fn snapshot(&self) -> TriggerSnapshot {
        TriggerSnapshot {
            patients: self
                .patients()
                .iter()
                .map(|(id, record)| (*id, record.clone()))
                .collect(),
        }
    }

    /// Replaces the whole table with the snapshot's contents.
    pub fn restore(&self, snapshot: TriggerSnapshot) {
        let mut patients = self.patients();
        *patients = snapshot.patients.into_iter().collect();
        debug!("Restored alert state for {} patients", patients.len());
    }

    /// Writes the snapshot as MessagePack. The file is replaced atomically.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> GuardResult<()> {
        let path = path.as_ref();
        let snapshot = self.snapshot();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let temp = NamedTempFile::new_in(dir)?;
        {
            let mut buf = BufWriter::new(temp.as_file());
            rmp_serde::encode::write_named(&mut buf, &snapshot)?;
            buf.flush()?;
        }
        temp.persist(path).map_err(|e| GuardError::Io(e.error))?;
        debug!("Saved alert state for {} patients to {}", snapshot.patients.len(), path.display());
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GuardResult<Self> {
        let file = File::open(path.as_ref())?;
        let snapshot: TriggerSnapshot = rmp_serde::from_read(BufReader::new(file))?;
        Ok(AlertTrigger::from_snapshot(snapshot))
    }

    /// Loads the file when it exists, otherwise starts empty.
    pub fn load_or_new<P: AsRef<Path>>(path: P) -> GuardResult<Self> {
        if path.as_ref().exists() {
            AlertTrigger::load_from_file(path)
        } else {
            Ok(AlertTrigger::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    fn pid(raw: &str) -> PatientId {
        PatientId::new(raw).unwrap()
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    #[test]
    fn should_fire_once_until_acknowledged() {
        let trigger = AlertTrigger::new();
        let p = pid("P001");

        let first = trigger.observe(p, 85.0, at(0)).unwrap();
        assert_eq!(
            first,
            Some(AlertEvent {
                patient_id: p,
                risk_score: 85.0,
                tier: RiskTier::High,
                first_observed_at: at(0),
            })
        );
        assert_eq!(trigger.observe(p, 90.0, at(1)).unwrap(), None);
        assert_eq!(trigger.state(p), Some(AlertState::Alerting));
    }

    #[test]
    fn should_rearm_after_acknowledge_and_drop() {
        let trigger = AlertTrigger::new();
        let p = pid("P001");

        assert!(trigger.observe(p, 85.0, at(0)).unwrap().is_some());
        trigger.acknowledge(p);
        assert_eq!(trigger.state(p), Some(AlertState::Acknowledged));

        assert!(trigger.observe(p, 30.0, at(1)).unwrap().is_none());
        assert_eq!(trigger.state(p), Some(AlertState::Normal));

        let again = trigger.observe(p, 90.0, at(2)).unwrap().unwrap();
        assert_eq!(again.first_observed_at, at(2));
        assert_eq!(again.risk_score, 90.0);
    }

    #[test]
    fn should_stay_acknowledged_while_still_high() {
        let trigger = AlertTrigger::new();
        let p = pid("P004");

        trigger.observe(p, 92.0, at(0)).unwrap();
        trigger.acknowledge(p);
        assert!(trigger.observe(p, 95.0, at(1)).unwrap().is_none());
        assert_eq!(trigger.state(p), Some(AlertState::Acknowledged));
        assert!(trigger.active_alerts().is_empty());
    }

    #[test]
    fn should_not_clear_alert_when_score_drops() {
        let trigger = AlertTrigger::new();
        let p = pid("P007");

        trigger.observe(p, 88.0, at(0)).unwrap();
        trigger.observe(p, 50.0, at(1)).unwrap();
        assert_eq!(trigger.state(p), Some(AlertState::Alerting));
        assert!(trigger.observe(p, 88.0, at(2)).unwrap().is_none());
        assert_eq!(trigger.active_alerts().len(), 1);
    }

    #[test]
    fn should_rearm_immediately_when_acknowledged_after_drop() {
        let trigger = AlertTrigger::new();
        let p = pid("P007");

        trigger.observe(p, 88.0, at(0)).unwrap();
        trigger.observe(p, 50.0, at(1)).unwrap();
        trigger.acknowledge(p);
        assert_eq!(trigger.state(p), Some(AlertState::Normal));
        assert!(trigger.observe(p, 81.0, at(2)).unwrap().is_some());
    }

    #[test]
    fn should_keep_patients_independent() {
        let trigger = AlertTrigger::new();
        let a = pid("A");
        let b = pid("B");

        assert!(trigger.observe(a, 85.0, at(0)).unwrap().is_some());
        assert!(trigger.observe(b, 85.0, at(0)).unwrap().is_some());
        trigger.acknowledge(a);
        assert_eq!(trigger.state(a), Some(AlertState::Acknowledged));
        assert_eq!(trigger.state(b), Some(AlertState::Alerting));

        trigger.forget(a);
        assert_eq!(trigger.state(a), None);
        assert_eq!(trigger.state(b), Some(AlertState::Alerting));
    }

    #[test]
    fn should_treat_acknowledge_and_forget_as_idempotent() {
        let trigger = AlertTrigger::new();
        let p = pid("P001");

        trigger.acknowledge(p);
        trigger.forget(p);
        assert_eq!(trigger.watched_count(), 0);

        trigger.observe(p, 85.0, at(0)).unwrap();
        trigger.acknowledge(p);
        let once = trigger.snapshot();
        trigger.acknowledge(p);
        assert_eq!(trigger.snapshot(), once);

        trigger.forget(p);
        trigger.forget(p);
        assert_eq!(trigger.watched_count(), 0);
    }

    #[test]
    fn should_reject_invalid_score_without_state_change() {
        let trigger = AlertTrigger::new();
        let p = pid("P001");

        assert!(matches!(
            trigger.observe(p, f64::NAN, at(0)),
            Err(GuardError::InvalidScore(_))
        ));
        assert_eq!(trigger.state(p), None);

        trigger.observe(p, 20.0, at(1)).unwrap();
        assert!(trigger.observe(p, f64::INFINITY, at(2)).is_err());
        assert_eq!(trigger.record(p).unwrap().last_score, 20.0);
    }

    #[test]
    fn should_report_trend() {
        let trigger = AlertTrigger::new();
        let p = pid("P001");

        trigger.observe(p, 55.0, at(0)).unwrap();
        assert_eq!(trigger.trend(p), None);
        trigger.observe(p, 85.0, at(1)).unwrap();
        assert_eq!(trigger.trend(p), Some(Trend::Up));
        trigger.observe(p, 85.0, at(2)).unwrap();
        assert_eq!(trigger.trend(p), Some(Trend::Stable));
    }

    #[test]
    fn should_order_active_alerts_by_score() {
        let trigger = AlertTrigger::new();
        trigger.observe(pid("P001"), 85.0, at(0)).unwrap();
        trigger.observe(pid("P004"), 92.0, at(0)).unwrap();
        trigger.observe(pid("P007"), 88.0, at(0)).unwrap();
        trigger.observe(pid("P002"), 55.0, at(0)).unwrap();

        let ids: Vec<String> = trigger
            .active_alerts()
            .into_iter()
            .map(|event| event.patient_id.to_string())
            .collect();
        assert_eq!(ids, vec!["P004", "P007", "P001"]);
    }

    #[test]
    fn should_fire_once_under_concurrent_observers() {
        let trigger = Arc::new(AlertTrigger::new());
        let p = pid("P001");

        let fired: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let trigger = Arc::clone(&trigger);
                    scope.spawn(move || trigger.observe(p, 85.0 + i as f64, at(i)).unwrap().is_some())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap() as usize).sum()
        });
        assert_eq!(fired, 1);
    }

    #[test]
    fn should_restore_from_snapshot() {
        let trigger = AlertTrigger::new();
        let p = pid("P001");
        trigger.observe(p, 85.0, at(0)).unwrap();

        let restored = AlertTrigger::from_snapshot(trigger.snapshot());
        assert_eq!(restored.state(p), Some(AlertState::Alerting));
        assert!(restored.observe(p, 90.0, at(1)).unwrap().is_none());

        restored.restore(TriggerSnapshot::default());
        assert_eq!(restored.watched_count(), 0);
    }

    #[test]
    fn should_persist_snapshot_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trigger_state.msgpack");

        let trigger = AlertTrigger::new();
        trigger.observe(pid("P001"), 85.0, at(0)).unwrap();
        trigger.observe(pid("P002"), 55.0, at(0)).unwrap();
        trigger.acknowledge(pid("P001"));
        trigger.save_to_file(&path).unwrap();

        let reloaded = AlertTrigger::load_from_file(&path).unwrap();
        assert_eq!(reloaded.snapshot(), trigger.snapshot());
        assert_eq!(reloaded.state(pid("P001")), Some(AlertState::Acknowledged));
    }

    #[test]
    fn should_start_empty_when_state_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let trigger = AlertTrigger::load_or_new(dir.path().join("missing.msgpack")).unwrap();
        assert_eq!(trigger.watched_count(), 0);
    }
}
