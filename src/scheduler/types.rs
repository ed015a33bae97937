use crate::calendar::Calendar;
use crate::config::EngineConfig;
use crate::model::{DaySchedule, Group, HistoryCounters, Role, Tag, VetId};
use crate::roster::Roster;
use std::collections::HashMap;

/// Per-vet context resolved once at model-build time: group, tags and
/// historical counters looked up by vet index rather than by id, so the
/// hot constraint-checking path never touches a hash map.
pub struct VetCtx {
    pub id: VetId,
    pub group: Group,
    pub tags: std::collections::HashSet<Tag>,
    pub hist: HistoryCounters,
}

impl VetCtx {
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Everything the constraint compiler, solver and diagnostic share: the
/// calendar, the roster, resolved per-vet context and the active
/// constraint thresholds.
pub struct EngineContext {
    pub calendar: Calendar,
    pub roster: Roster,
    pub config: EngineConfig,
    pub vets: Vec<VetCtx>,
}

impl EngineContext {
    pub fn n_vets(&self) -> usize {
        self.vets.len()
    }

    pub fn n_days(&self) -> usize {
        self.calendar.len()
    }

    pub fn is_off(&self, v: usize, d: usize) -> bool {
        use crate::model::DayClass;
        let is_weekday = self.calendar.class_of(d) == DayClass::Weekday;
        self.roster.is_off(v, self.calendar.date_of(d), self.calendar.weekday_index(d), is_weekday)
    }

    pub fn vet_index(&self, id: &VetId) -> Option<usize> {
        self.vets.iter().position(|v| &v.id == id)
    }
}

/// Three contiguous index-addressed Boolean arrays (§9 design note): the
/// decision variables of component D, avoiding a hash-indexed lookup in
/// the hot constraint-checking path.
pub struct VarGrid {
    n_days: usize,
    primary: Vec<bool>,
    backup: Vec<bool>,
    secondary: Vec<bool>,
}

impl VarGrid {
    pub fn new(n_vets: usize, n_days: usize) -> Self {
        let size = n_vets * n_days;
        Self {
            n_days,
            primary: vec![false; size],
            backup: vec![false; size],
            secondary: vec![false; size],
        }
    }

    #[inline]
    fn idx(&self, v: usize, d: usize) -> usize {
        v * self.n_days + d
    }

    pub fn get(&self, role: Role, v: usize, d: usize) -> bool {
        let i = self.idx(v, d);
        match role {
            Role::Primary => self.primary[i],
            Role::Backup => self.backup[i],
            Role::Secondary => self.secondary[i],
        }
    }

    pub fn set(&mut self, role: Role, v: usize, d: usize, value: bool) {
        let i = self.idx(v, d);
        match role {
            Role::Primary => self.primary[i] = value,
            Role::Backup => self.backup[i] = value,
            Role::Secondary => self.secondary[i] = value,
        }
    }

    pub fn who_holds(&self, role: Role, n_vets: usize, d: usize) -> Option<usize> {
        (0..n_vets).find(|&v| self.get(role, v, d))
    }

    pub fn clear_day(&mut self, n_vets: usize, d: usize) {
        for v in 0..n_vets {
            self.set(Role::Primary, v, d, false);
            self.set(Role::Backup, v, d, false);
            self.set(Role::Secondary, v, d, false);
        }
    }
}

/// Rule numbers of §4.E, in the ascending order the declarative table is
/// applied in — load-bearing for E.5′/E.15, which rely on E.2 having run
/// first within the same pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    E1,
    E2,
    E3,
    E4,
    E5,
    E5p,
    E6,
    E7,
    E7p,
    E8,
    E9,
    E10,
    E11,
    E12,
    E13,
    E14,
    E15,
    /// Not numbered in §4.E: the diagnostic's extra same-vet/two-roles
    /// check (§4.H), independent of whether the day is a weekday or a
    /// weekend pair.
    SameDayDualRole,
}

impl RuleId {
    pub fn label(&self) -> &'static str {
        match self {
            RuleId::E1 => "E.1 daily weekday coverage",
            RuleId::E2 => "E.2 weekend coverage and duo locking",
            RuleId::E3 => "E.3 one primary per work-week",
            RuleId::E4 => "E.4 backup cap per work-week",
            RuleId::E5 => "E.5 mandatory rest after weekday primary",
            RuleId::E5p => "E.5' Monday rest after weekend primary",
            RuleId::E6 => "E.6 at most one consecutive-backup pair per work-week",
            RuleId::E7 => "E.7 rest-day and vacation shutdown",
            RuleId::E7p => "E.7' no primary the eve of an off-day",
            RuleId::E8 => "E.8 role exclusions per vet tag",
            RuleId::E9 => "E.9 no Friday-before-weekend carry-over",
            RuleId::E10 => "E.10 14-day weekend spacing",
            RuleId::E11 => "E.11 primary_total balance",
            RuleId::E12 => "E.12 backup_weekday balance",
            RuleId::E13 => "E.13 secondary_weekend_day balance",
            RuleId::E14 => "E.14 pairing compatibility",
            RuleId::E15 => "E.15 Monday rest after weekend secondary",
            RuleId::SameDayDualRole => "same vet holds two roles on the same day",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Violation {
    pub rule: RuleId,
    pub detail: String,
}

/// Balance gap report for one envelope, surfaced as a warning rather than
/// a violation (§9: balance envelopes are hard during search, but the
/// diagnostic classifies a gap past `K_c` as a warning, not a bug).
#[derive(Debug, Clone)]
pub struct BalanceWarning {
    pub rule: RuleId,
    pub category: &'static str,
    pub gap: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    Timeout,
    Unknown,
}

pub struct SolveOutcome {
    pub status: SolveStatus,
    schedule: Option<Vec<DaySchedule>>,
}

impl SolveOutcome {
    pub fn new(status: SolveStatus, schedule: Option<Vec<DaySchedule>>) -> Self {
        Self { status, schedule }
    }

    pub fn schedule(&self) -> Option<&[DaySchedule]> {
        self.schedule.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    pub status: SolveStatus,
    pub violations: Vec<Violation>,
    pub warnings: Vec<BalanceWarning>,
    pub stats: HashMap<VetId, HistoryCounters>,
    pub cumulative_stats: Option<HashMap<VetId, HistoryCounters>>,
}

impl DiagnosticReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}
