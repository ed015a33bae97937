//! Ambient configuration surface: `EngineConfig` as loaded from the JSON
//! config file (mirrors `VetSchedulerConfig` of the tool this engine is
//! modelled on).

use crate::model::{Group, Tag, VetId};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Tunable thresholds behind the rule table's numeric constants.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Constraints {
    pub max_primary_per_week: u32,
    pub max_backup_per_week: u32,
    pub balance_gap_primary: u32,
    pub balance_gap_backup: u32,
    pub balance_gap_secondary: u32,
    pub weekend_spacing_days: i64,
    pub max_consecutive_backup_pairs: u32,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            max_primary_per_week: 1,
            max_backup_per_week: 2,
            balance_gap_primary: 2,
            balance_gap_backup: 2,
            balance_gap_secondary: 2,
            weekend_spacing_days: 14,
            max_consecutive_backup_pairs: 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub groupe_a: HashSet<VetId>,
    pub groupe_b: HashSet<VetId>,
    pub vet_tags: HashMap<VetId, HashSet<Tag>>,
    pub constraints: Constraints,
}

impl EngineConfig {
    pub fn has_tag(&self, vet: &VetId, tag: Tag) -> bool {
        self.vet_tags.get(vet).is_some_and(|tags| tags.contains(&tag))
    }

    /// Static compatibility partition used only by the pairing rule (E.14).
    pub fn group_of(&self, vet: &VetId) -> Group {
        if self.groupe_a.contains(vet) {
            Group::A
        } else if self.groupe_b.contains(vet) {
            Group::B
        } else {
            Group::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_constants() {
        let c = Constraints::default();
        assert_eq!(c.max_primary_per_week, 1);
        assert_eq!(c.max_backup_per_week, 2);
        assert_eq!(c.weekend_spacing_days, 14);
    }

    #[test]
    fn group_of_falls_back_to_none() {
        let mut cfg = EngineConfig::default();
        cfg.groupe_a.insert(VetId::new("alice"));
        assert_eq!(cfg.group_of(&VetId::new("alice")), Group::A);
        assert_eq!(cfg.group_of(&VetId::new("zoe")), Group::None);
    }
}
