//! Component B: normalises raw vet descriptors into the `is_off` predicate
//! the constraint compiler reads.

use crate::model::{EngineError, EngineResult, VetId};
use chrono::NaiveDate;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const MAX_REST_DAYS: usize = 5;
const MIN_VETS: usize = 3;

#[derive(Debug, Clone)]
pub struct VetRecord {
    pub id: VetId,
    rest_days: HashSet<u8>,
    vacations: HashSet<NaiveDate>,
}

impl VetRecord {
    pub fn rest_days(&self) -> &HashSet<u8> {
        &self.rest_days
    }

    pub fn vacations(&self) -> &HashSet<NaiveDate> {
        &self.vacations
    }
}

/// One raw roster entry as it would arrive from config/CSV, before
/// validation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawVet {
    pub id: VetId,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "one_or_many"))]
    pub rest_days: Vec<u8>,
    pub vacations: Vec<NaiveDate>,
}

/// Accepts either a bare weekday index or a list of them, matching the
/// original source's `rest_days` field (a scalar for a single-day vet, a
/// list for everyone else).
#[cfg(feature = "serde")]
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(u8),
        Many(Vec<u8>),
    }
    match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(v) => Ok(vec![v]),
        OneOrMany::Many(v) => Ok(v),
    }
}

pub struct Roster {
    vets: Vec<VetRecord>,
}

impl Roster {
    pub fn build(entries: Vec<RawVet>) -> EngineResult<Self> {
        if entries.is_empty() {
            return Err(EngineError::InvalidRoster("roster is empty".into()));
        }
        if entries.len() < MIN_VETS {
            return Err(EngineError::InvalidRoster(format!(
                "at least {MIN_VETS} vets are required, got {}",
                entries.len()
            )));
        }

        let mut vets = Vec::with_capacity(entries.len());
        for raw in entries {
            if raw.rest_days.len() > MAX_REST_DAYS {
                return Err(EngineError::InvalidRoster(format!(
                    "{}: too many rest days ({})",
                    raw.id,
                    raw.rest_days.len()
                )));
            }
            for &rd in &raw.rest_days {
                if rd > 6 {
                    return Err(EngineError::InvalidRoster(format!(
                        "{}: out-of-range weekday index {rd}",
                        raw.id
                    )));
                }
            }
            vets.push(VetRecord {
                id: raw.id,
                rest_days: raw.rest_days.into_iter().collect(),
                vacations: raw.vacations.into_iter().collect(),
            });
        }

        tracing_roster_built(vets.len());

        Ok(Self { vets })
    }

    pub fn vets(&self) -> &[VetRecord] {
        &self.vets
    }

    pub fn len(&self) -> usize {
        self.vets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vets.is_empty()
    }

    /// `is_off(v,d)` of §4.B: true when `weekday_idx` is among `v`'s rest
    /// days (weekdays only) or `date` is a vacation day.
    pub fn is_off(&self, vet_idx: usize, date: NaiveDate, weekday_idx: u8, is_weekday: bool) -> bool {
        let v = &self.vets[vet_idx];
        (is_weekday && v.rest_days.contains(&weekday_idx)) || v.vacations.contains(&date)
    }
}

#[cfg(feature = "logging")]
fn tracing_roster_built(n_vets: usize) {
    tracing::debug!(n_vets, "roster resolved");
}

#[cfg(not(feature = "logging"))]
fn tracing_roster_built(_n_vets: usize) {}

#[cfg(test)]
mod tests {
    use super::*;

    fn vet(id: &str, rest_days: Vec<u8>) -> RawVet {
        RawVet { id: VetId::new(id), rest_days, vacations: vec![] }
    }

    #[test]
    #[cfg(feature = "serde")]
    fn rest_days_accepts_a_bare_scalar_or_a_list() {
        let scalar: RawVet = serde_json::from_str(r#"{"id":"a","rest_days":2,"vacations":[]}"#).unwrap();
        assert_eq!(scalar.rest_days, vec![2]);
        let list: RawVet = serde_json::from_str(r#"{"id":"b","rest_days":[1,3],"vacations":[]}"#).unwrap();
        assert_eq!(list.rest_days, vec![1, 3]);
    }

    #[test]
    fn rejects_empty_roster() {
        assert!(matches!(Roster::build(vec![]), Err(EngineError::InvalidRoster(_))));
    }

    #[test]
    fn rejects_too_few_vets() {
        let entries = vec![vet("a", vec![]), vet("b", vec![])];
        assert!(matches!(Roster::build(entries), Err(EngineError::InvalidRoster(_))));
    }

    #[test]
    fn rejects_out_of_range_weekday() {
        let entries = vec![vet("a", vec![7]), vet("b", vec![]), vet("c", vec![])];
        assert!(matches!(Roster::build(entries), Err(EngineError::InvalidRoster(_))));
    }

    #[test]
    fn resolves_is_off_from_rest_day_and_vacation() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let vac = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();
        let entries = vec![
            RawVet { id: VetId::new("a"), rest_days: vec![0], vacations: vec![vac] },
            vet("b", vec![]),
            vet("c", vec![]),
        ];
        let roster = Roster::build(entries).unwrap();
        assert!(roster.is_off(0, date, 0, true));
        assert!(roster.is_off(0, vac, 1, true));
        assert!(!roster.is_off(0, date.succ_opt().unwrap(), 1, true));
    }
}
