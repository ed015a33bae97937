//! Components C (aggregator) and I (writer): persisted per-vet load
//! counters, folded across recorded periods and rewritten atomically after
//! each solve. Grounded in the teacher's `storage::JsonStorage` (temp file +
//! fsync + rename) rather than a plain overwrite.

use crate::model::{DayClass, DaySchedule, HistoryCounters, VetId};
use anyhow::Context;
use chrono::NaiveDate;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Component I's input: folds one solved horizon's schedule into per-vet
/// counters, the same shape persisted periods carry. Shared with the
/// diagnostic (§4.H), which reports this period's stats alongside the
/// cumulative ones.
pub fn fold_schedule(schedule: &[DaySchedule]) -> HashMap<VetId, HistoryCounters> {
    let mut out: HashMap<VetId, HistoryCounters> = HashMap::new();
    for day in schedule {
        match day.weekday {
            DayClass::Weekday => {
                if let Some(p) = &day.primary {
                    out.entry(p.clone()).or_default().primary_weekday_ct += 1;
                }
                if let Some(b) = &day.backup {
                    out.entry(b.clone()).or_default().backup_weekday_ct += 1;
                }
            }
            DayClass::Weekend => {
                if let Some(p) = &day.primary {
                    out.entry(p.clone()).or_default().primary_weekend_day_ct += 1;
                }
                if let Some(s) = &day.secondary {
                    out.entry(s.clone()).or_default().secondary_weekend_day_ct += 1;
                }
            }
        }
    }
    out
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeriodStats {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub stats: HashMap<VetId, HistoryCounters>,
}

/// A persisted mapping from period name to the stats recorded for it.
/// There is no global mutable singleton here (§9): callers thread a
/// `HistoryStore` handle explicitly through the engine constructor.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct History {
    pub periods: HashMap<String, PeriodStats>,
}

impl History {
    /// Component C: per-vet sum of the four counters across every recorded
    /// period; zero when the vet is absent from all of them.
    pub fn cumulative(&self) -> HashMap<VetId, HistoryCounters> {
        let mut out: HashMap<VetId, HistoryCounters> = HashMap::new();
        for period in self.periods.values() {
            for (vet, counters) in &period.stats {
                let entry = out.entry(vet.clone()).or_default();
                entry.primary_weekday_ct += counters.primary_weekday_ct;
                entry.primary_weekend_day_ct += counters.primary_weekend_day_ct;
                entry.backup_weekday_ct += counters.backup_weekday_ct;
                entry.secondary_weekend_day_ct += counters.secondary_weekend_day_ct;
            }
        }
        out
    }

    pub fn record_period(
        &mut self,
        name: String,
        start: NaiveDate,
        end: NaiveDate,
        stats: HashMap<VetId, HistoryCounters>,
    ) {
        self.periods.insert(name, PeriodStats { start, end, stats });
    }

    pub fn clear(&mut self) {
        self.periods.clear();
    }
}

pub trait HistoryStore {
    fn load(&self) -> anyhow::Result<History>;
    fn save(&self, history: &History) -> anyhow::Result<()>;
    fn clear(&self) -> anyhow::Result<()>;
}

pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> anyhow::Result<History> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(History::default());
            }
            Err(e) => {
                return Err(anyhow::Error::from(e))
                    .with_context(|| format!("reading {}", self.path.display()))
            }
        };
        match serde_json::from_slice(&data) {
            Ok(history) => Ok(history),
            Err(e) => {
                #[cfg(feature = "logging")]
                tracing::warn!(path = %self.path.display(), error = %e, "malformed history file, treating as empty");
                #[cfg(not(feature = "logging"))]
                let _ = e;
                Ok(History::default())
            }
        }
    }

    fn save(&self, history: &History) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(history)?;
        let mut tmp = NamedTempFile::new_in(self.path.parent().unwrap_or_else(|| Path::new(".")))
            .with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        self.save(&History::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fold_schedule_tallies_weekday_and_weekend_roles_separately() {
        use crate::model::{DayClass, DaySchedule};

        let schedule = vec![
            DaySchedule {
                date: date(2026, 1, 5),
                weekday: DayClass::Weekday,
                primary: Some(VetId::new("alice")),
                backup: Some(VetId::new("bob")),
                secondary: None,
            },
            DaySchedule {
                date: date(2026, 1, 10),
                weekday: DayClass::Weekend,
                primary: Some(VetId::new("alice")),
                backup: None,
                secondary: Some(VetId::new("bob")),
            },
        ];

        let stats = fold_schedule(&schedule);
        let alice = stats[&VetId::new("alice")];
        assert_eq!(alice.primary_weekday_ct, 1);
        assert_eq!(alice.primary_weekend_day_ct, 1);
        let bob = stats[&VetId::new("bob")];
        assert_eq!(bob.backup_weekday_ct, 1);
        assert_eq!(bob.secondary_weekend_day_ct, 1);
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let store = JsonHistoryStore::open(dir.path().join("history.json"));
        let history = store.load().unwrap();
        assert!(history.periods.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = JsonHistoryStore::open(dir.path().join("history.json"));
        let mut history = History::default();
        let mut stats = HashMap::new();
        stats.insert(VetId::new("alice"), HistoryCounters { primary_weekday_ct: 3, ..Default::default() });
        history.record_period("2026-01".into(), date(2026, 1, 1), date(2026, 1, 31), stats);
        store.save(&history).unwrap();

        let reloaded = store.load().unwrap();
        let cumulative = reloaded.cumulative();
        assert_eq!(cumulative[&VetId::new("alice")].primary_weekday_ct, 3);
    }

    #[test]
    fn malformed_file_degrades_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, b"not json").unwrap();
        let store = JsonHistoryStore::open(&path);
        let history = store.load().unwrap();
        assert!(history.periods.is_empty());
    }

    #[test]
    fn clear_wipes_persisted_periods() {
        let dir = tempdir().unwrap();
        let store = JsonHistoryStore::open(dir.path().join("history.json"));
        let mut history = History::default();
        history.record_period("p".into(), date(2026, 1, 1), date(2026, 1, 7), HashMap::new());
        store.save(&history).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().periods.is_empty());
    }

    #[test]
    fn cumulative_sums_across_periods() {
        let mut history = History::default();
        let mut p1 = HashMap::new();
        p1.insert(VetId::new("bob"), HistoryCounters { backup_weekday_ct: 2, ..Default::default() });
        history.record_period("p1".into(), date(2026, 1, 1), date(2026, 1, 7), p1);
        let mut p2 = HashMap::new();
        p2.insert(VetId::new("bob"), HistoryCounters { backup_weekday_ct: 3, ..Default::default() });
        history.record_period("p2".into(), date(2026, 1, 8), date(2026, 1, 14), p2);

        let cumulative = history.cumulative();
        assert_eq!(cumulative[&VetId::new("bob")].backup_weekday_ct, 5);
    }
}
