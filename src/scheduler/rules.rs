//! Component E and the first half of component H at once: the declarative
//! rule table of §4.E. Every entry is a closure over `(ctx, grid,
//! up_to_day)` — the solver calls it with `up_to_day` set to the number of
//! calendar days fully decided so far (incremental pruning, §5), the
//! diagnostic calls it with `up_to_day = ctx.n_days()` (the whole horizon).
//! Both sides read this same table on purpose (§9): the diagnostic is a
//! redundant oracle, not an optimisation, and a rule fixed here is fixed for
//! both callers at once.
//!
//! The table is applied in ascending rule-number order. E.5'/E.15 rely on
//! that ordering: they key their antecedent on the weekend pair's Saturday
//! slot, which is only equivalent to "weekend primary/secondary" once E.2's
//! Sat=Sun equality has been checked earlier in the same pass.

use super::types::{BalanceWarning, EngineContext, RuleId, VarGrid, Violation};
use super::util::{full_weekends_before, is_non_excluded_pairing_partner, lone_weekend_days_before};
use crate::config::Constraints;
use crate::model::{HistoryCounters, Role, Tag};

pub(super) type RuleCheck = fn(&EngineContext, &VarGrid, usize) -> Vec<Violation>;

/// Feasibility rules only (E.1–E.10, E.14, E.15); the balance envelopes
/// (E.11–13) are evaluated separately since they report gaps, not
/// violations of a single (vet, day) assertion, and the diagnostic treats
/// them as warnings rather than violations (§9).
pub(super) const FEASIBILITY_RULES: &[(RuleId, RuleCheck)] = &[
    (RuleId::E1, check_e1),
    (RuleId::E2, check_e2),
    (RuleId::E3, check_e3),
    (RuleId::E4, check_e4),
    (RuleId::E5, check_e5),
    (RuleId::E5p, check_e5p),
    (RuleId::E6, check_e6),
    (RuleId::E7, check_e7),
    (RuleId::E7p, check_e7p),
    (RuleId::E8, check_e8),
    (RuleId::E9, check_e9),
    (RuleId::E10, check_e10),
    (RuleId::E14, check_e14),
    (RuleId::E15, check_e15),
];

fn v(detail: impl Into<String>, rule: RuleId) -> Violation {
    Violation { rule, detail: detail.into() }
}

/// E.1 — daily weekday coverage: exactly one primary, exactly one backup,
/// no vet in both roles, no secondary.
fn check_e1(ctx: &EngineContext, grid: &VarGrid, up_to_day: usize) -> Vec<Violation> {
    use crate::model::DayClass;
    let mut out = Vec::new();
    for d in 0..up_to_day.min(ctx.n_days()) {
        if ctx.calendar.class_of(d) != DayClass::Weekday {
            continue;
        }
        let primaries = (0..ctx.n_vets()).filter(|&w| grid.get(Role::Primary, w, d)).count();
        let backups = (0..ctx.n_vets()).filter(|&w| grid.get(Role::Backup, w, d)).count();
        if primaries != 1 {
            out.push(v(format!("day {d}: {primaries} primaries assigned, expected 1"), RuleId::E1));
        }
        if backups != 1 {
            out.push(v(format!("day {d}: {backups} backups assigned, expected 1"), RuleId::E1));
        }
        for w in 0..ctx.n_vets() {
            if grid.get(Role::Primary, w, d) && grid.get(Role::Backup, w, d) {
                out.push(v(format!("day {d}: vet {} holds primary and backup", ctx.vets[w].id), RuleId::E1));
            }
            if grid.get(Role::Secondary, w, d) {
                out.push(v(format!("day {d}: vet {} holds secondary on a weekday", ctx.vets[w].id), RuleId::E1));
            }
        }
    }
    out
}

/// E.2 — weekend coverage, duo locking, and explicit partial-weekend
/// zeroing.
fn check_e2(ctx: &EngineContext, grid: &VarGrid, up_to_day: usize) -> Vec<Violation> {
    let mut out = Vec::new();
    for (sat, sun) in full_weekends_before(ctx, up_to_day) {
        let primaries = (0..ctx.n_vets()).filter(|&w| grid.get(Role::Primary, w, sat)).count();
        let secondaries = (0..ctx.n_vets()).filter(|&w| grid.get(Role::Secondary, w, sat)).count();
        if primaries != 1 {
            out.push(v(format!("weekend {sat}/{sun}: {primaries} primaries, expected 1"), RuleId::E2));
        }
        if secondaries != 1 {
            out.push(v(format!("weekend {sat}/{sun}: {secondaries} secondaries, expected 1"), RuleId::E2));
        }
        for w in 0..ctx.n_vets() {
            if grid.get(Role::Backup, w, sat) || grid.get(Role::Backup, w, sun) {
                out.push(v(format!("weekend {sat}/{sun}: vet {} holds backup", ctx.vets[w].id), RuleId::E2));
            }
            if grid.get(Role::Primary, w, sat) != grid.get(Role::Primary, w, sun) {
                out.push(v(format!("weekend {sat}/{sun}: vet {} primary differs Sat/Sun", ctx.vets[w].id), RuleId::E2));
            }
            if grid.get(Role::Secondary, w, sat) != grid.get(Role::Secondary, w, sun) {
                out.push(v(format!("weekend {sat}/{sun}: vet {} secondary differs Sat/Sun", ctx.vets[w].id), RuleId::E2));
            }
            if grid.get(Role::Primary, w, sat) && grid.get(Role::Secondary, w, sat) {
                out.push(v(format!("weekend {sat}/{sun}: vet {} holds both primary and secondary", ctx.vets[w].id), RuleId::E2));
            }
        }
    }
    for d in lone_weekend_days_before(ctx, up_to_day) {
        for w in 0..ctx.n_vets() {
            if grid.get(Role::Primary, w, d) || grid.get(Role::Secondary, w, d) || grid.get(Role::Backup, w, d) {
                out.push(v(format!("day {d}: partial weekend day must carry zero assignments"), RuleId::E2));
            }
        }
    }
    out
}

/// E.3 — at most one primary per vet per work-week.
fn check_e3(ctx: &EngineContext, grid: &VarGrid, up_to_day: usize) -> Vec<Violation> {
    let mut out = Vec::new();
    let cap = ctx.config.constraints.max_primary_per_week as usize;
    for ww in ctx.calendar.work_weeks() {
        if !ww.days.iter().all(|&d| d < up_to_day) {
            continue;
        }
        for w in 0..ctx.n_vets() {
            let count = ww.days.iter().filter(|&&d| grid.get(Role::Primary, w, d)).count();
            if count > cap {
                out.push(v(format!("vet {}: {count} primaries in one work-week, cap {cap}", ctx.vets[w].id), RuleId::E3));
            }
        }
    }
    out
}

/// E.4 — backup cap per work-week, tag-adjusted for `restricted_backup`
/// (two-week window) and `once_weekly_backup` (cap 1).
fn check_e4(ctx: &EngineContext, grid: &VarGrid, up_to_day: usize) -> Vec<Violation> {
    let mut out = Vec::new();
    let weeks = ctx.calendar.work_weeks();
    let default_cap = ctx.config.constraints.max_backup_per_week as usize;

    for w in 0..ctx.n_vets() {
        if ctx.vets[w].has_tag(Tag::RestrictedBackup) {
            for pair in weeks.windows(2) {
                let days: Vec<usize> = pair.iter().flat_map(|ww| ww.days.iter().copied()).collect();
                if !days.iter().all(|&d| d < up_to_day) {
                    continue;
                }
                let count = days.iter().filter(|&&d| grid.get(Role::Backup, w, d)).count();
                if count > 1 {
                    out.push(v(format!("vet {} (restricted_backup): {count} backups over two work-weeks", ctx.vets[w].id), RuleId::E4));
                }
            }
            continue;
        }

        let cap = if ctx.vets[w].has_tag(Tag::OnceWeeklyBackup) { 1 } else { default_cap };
        for ww in weeks {
            if !ww.days.iter().all(|&d| d < up_to_day) {
                continue;
            }
            let count = ww.days.iter().filter(|&&d| grid.get(Role::Backup, w, d)).count();
            if count > cap {
                out.push(v(format!("vet {}: {count} backups in one work-week, cap {cap}", ctx.vets[w].id), RuleId::E4));
            }
        }
    }
    out
}

/// E.5 — mandatory rest the day after a weekday primary.
fn check_e5(ctx: &EngineContext, grid: &VarGrid, up_to_day: usize) -> Vec<Violation> {
    use crate::model::DayClass;
    let mut out = Vec::new();
    let n = ctx.n_days();
    for d in 0..up_to_day.min(n) {
        if ctx.calendar.class_of(d) != DayClass::Weekday || d + 1 >= n || d + 1 >= up_to_day {
            continue;
        }
        for w in 0..ctx.n_vets() {
            if grid.get(Role::Primary, w, d) && (grid.get(Role::Primary, w, d + 1) || grid.get(Role::Backup, w, d + 1)) {
                out.push(v(format!("vet {}: held a role on day {} right after weekday primary on day {d}", ctx.vets[w].id, d + 1), RuleId::E5));
            }
        }
    }
    out
}

/// E.5' — Monday rest after weekend primary (antecedent keyed on the
/// Saturday slot, equivalent to weekend primary given E.2's equality).
fn check_e5p(ctx: &EngineContext, grid: &VarGrid, up_to_day: usize) -> Vec<Violation> {
    let mut out = Vec::new();
    let n = ctx.n_days();
    for (sat, sun) in full_weekends_before(ctx, up_to_day) {
        let mon = sun + 1;
        if mon >= n || mon >= up_to_day {
            continue;
        }
        if !ctx.calendar.is_monday(mon) {
            continue;
        }
        for w in 0..ctx.n_vets() {
            if !grid.get(Role::Primary, w, sat) {
                continue;
            }
            if exempt_from_monday_rest(ctx, w, mon) {
                continue;
            }
            if grid.get(Role::Primary, w, mon) || grid.get(Role::Backup, w, mon) {
                out.push(v(format!("vet {}: held a role on Monday {mon} after weekend primary", ctx.vets[w].id), RuleId::E5p));
            }
        }
    }
    out
}

fn exempt_from_monday_rest(ctx: &EngineContext, w: usize, monday: usize) -> bool {
    ctx.vets[w].has_tag(Tag::WeekendDespiteMondayRest)
        && ctx.roster.is_off(w, ctx.calendar.date_of(monday), ctx.calendar.weekday_index(monday), true)
        && !ctx.roster.vets()[w].vacations().contains(&ctx.calendar.date_of(monday))
}

/// E.6 — at most one consecutive backup/backup pair per work-week.
fn check_e6(ctx: &EngineContext, grid: &VarGrid, up_to_day: usize) -> Vec<Violation> {
    let mut out = Vec::new();
    for ww in ctx.calendar.work_weeks() {
        if !ww.days.iter().all(|&d| d < up_to_day) {
            continue;
        }
        for w in 0..ctx.n_vets() {
            let count = ww
                .days
                .windows(2)
                .filter(|pair| grid.get(Role::Backup, w, pair[0]) && grid.get(Role::Backup, w, pair[1]))
                .count();
            let cap = ctx.config.constraints.max_consecutive_backup_pairs as usize;
            if count > cap {
                out.push(v(format!("vet {}: {count} consecutive backup pairs in one work-week, cap {cap}", ctx.vets[w].id), RuleId::E6));
            }
        }
    }
    out
}

/// E.7 — rest-day and vacation shutdown.
fn check_e7(ctx: &EngineContext, grid: &VarGrid, up_to_day: usize) -> Vec<Violation> {
    let mut out = Vec::new();
    for d in 0..up_to_day.min(ctx.n_days()) {
        for w in 0..ctx.n_vets() {
            if !ctx.is_off(w, d) {
                continue;
            }
            if grid.get(Role::Primary, w, d) || grid.get(Role::Backup, w, d) || grid.get(Role::Secondary, w, d) {
                out.push(v(format!("vet {}: assigned on day {d} despite rest/vacation", ctx.vets[w].id), RuleId::E7));
            }
        }
    }
    out
}

/// E.7' — no primary/backup the eve of an off-day, with the
/// `eve_of_rest_allowed` exception (blocked only when the next day is a
/// vacation, not a mere rest day).
fn check_e7p(ctx: &EngineContext, grid: &VarGrid, up_to_day: usize) -> Vec<Violation> {
    let mut out = Vec::new();
    let n = ctx.n_days();
    for d in 0..up_to_day.min(n) {
        for w in 0..ctx.n_vets() {
            if d + 1 >= n || d + 1 >= up_to_day {
                continue;
            }
            if !ctx.is_off(w, d + 1) {
                continue;
            }
            if ctx.vets[w].has_tag(Tag::EveOfRestAllowed) {
                let is_vacation = ctx.roster.vets()[w].vacations().contains(&ctx.calendar.date_of(d + 1));
                if !is_vacation {
                    continue;
                }
            }
            if grid.get(Role::Primary, w, d) || grid.get(Role::Backup, w, d) {
                out.push(v(format!("vet {}: held primary/backup on day {d}, eve of an off-day", ctx.vets[w].id), RuleId::E7p));
            }
        }
    }
    out
}

/// E.8 — per-tag role exclusions.
fn check_e8(ctx: &EngineContext, grid: &VarGrid, up_to_day: usize) -> Vec<Violation> {
    let mut out = Vec::new();
    for d in 0..up_to_day.min(ctx.n_days()) {
        let is_monday = ctx.calendar.is_monday(d);
        for w in 0..ctx.n_vets() {
            let tags = &ctx.vets[w].tags;
            if tags.contains(&Tag::NeverPrimary) && grid.get(Role::Primary, w, d) {
                out.push(v(format!("vet {} (never_primary): holds primary on day {d}", ctx.vets[w].id), RuleId::E8));
            }
            if tags.contains(&Tag::NeverSecondary) && grid.get(Role::Secondary, w, d) {
                out.push(v(format!("vet {} (never_secondary): holds secondary on day {d}", ctx.vets[w].id), RuleId::E8));
            }
            if tags.contains(&Tag::NeverWeekend) && crate::model::DayClass::Weekend == ctx.calendar.class_of(d) && grid.get(Role::Backup, w, d) {
                out.push(v(format!("vet {} (never_weekend): holds backup on weekend day {d}", ctx.vets[w].id), RuleId::E8));
            }
            if tags.contains(&Tag::NeverOnMonday) && is_monday {
                if grid.get(Role::Primary, w, d) || grid.get(Role::Backup, w, d) || grid.get(Role::Secondary, w, d) {
                    out.push(v(format!("vet {} (never_on_monday): assigned on Monday {d}", ctx.vets[w].id), RuleId::E8));
                }
            }
        }
    }
    out
}

/// E.9 — no carry-over between a Friday role and the following weekend.
fn check_e9(ctx: &EngineContext, grid: &VarGrid, up_to_day: usize) -> Vec<Violation> {
    let mut out = Vec::new();
    for (sat, sun) in full_weekends_before(ctx, up_to_day) {
        let Some(fri) = sat.checked_sub(1) else { continue };
        if ctx.calendar.class_of(fri) != crate::model::DayClass::Weekday {
            continue;
        }
        for w in 0..ctx.n_vets() {
            let fri_primary = grid.get(Role::Primary, w, fri);
            let fri_backup = grid.get(Role::Backup, w, fri);
            let sat_primary = grid.get(Role::Primary, w, sat);
            let sat_secondary = grid.get(Role::Secondary, w, sat);
            if (fri_primary && sat_primary)
                || (fri_primary && sat_secondary)
                || (fri_backup && sat_primary)
                || (fri_backup && sat_secondary)
            {
                out.push(v(format!("vet {}: Friday {fri} role carries over into weekend {sat}/{sun}", ctx.vets[w].id), RuleId::E9));
            }
        }
    }
    out
}

/// E.10 — 14-day (configurable) weekend spacing.
fn check_e10(ctx: &EngineContext, grid: &VarGrid, up_to_day: usize) -> Vec<Violation> {
    let mut out = Vec::new();
    let weekends: Vec<(usize, usize)> = full_weekends_before(ctx, up_to_day).collect();
    let spacing = ctx.config.constraints.weekend_spacing_days;
    for i in 0..weekends.len() {
        for j in (i + 1)..weekends.len() {
            let (sat_i, _) = weekends[i];
            let (sat_j, _) = weekends[j];
            let gap = (ctx.calendar.date_of(sat_j) - ctx.calendar.date_of(sat_i)).num_days();
            if gap >= spacing {
                continue;
            }
            for w in 0..ctx.n_vets() {
                let held_i = grid.get(Role::Primary, w, sat_i) || grid.get(Role::Secondary, w, sat_i);
                let held_j = grid.get(Role::Primary, w, sat_j) || grid.get(Role::Secondary, w, sat_j);
                if held_i && held_j {
                    out.push(v(format!("vet {}: holds both weekends at day {sat_i} and {sat_j}, {gap} days apart (< {spacing})", ctx.vets[w].id), RuleId::E10));
                }
            }
        }
    }
    out
}

/// E.14 — pairing compatibility. Asymmetric by design: an A-primary must
/// be paired with a B partner, but a B-primary is unconstrained. This is
/// preserved verbatim from the source behaviour, not a bug to "fix" here.
fn check_e14(ctx: &EngineContext, grid: &VarGrid, up_to_day: usize) -> Vec<Violation> {
    use crate::model::{DayClass, Group};
    let mut out = Vec::new();
    for d in 0..up_to_day.min(ctx.n_days()) {
        let is_weekend = ctx.calendar.class_of(d) == DayClass::Weekend;
        let partner_role = if is_weekend { Role::Secondary } else { Role::Backup };
        for va in 0..ctx.n_vets() {
            if ctx.config.group_of(&ctx.vets[va].id) != Group::A || !is_non_excluded_pairing_partner(ctx, va) {
                continue;
            }
            if !grid.get(Role::Primary, va, d) {
                continue;
            }
            for vx in 0..ctx.n_vets() {
                if vx == va || !is_non_excluded_pairing_partner(ctx, vx) {
                    continue;
                }
                if ctx.config.group_of(&ctx.vets[vx].id) == Group::B {
                    continue;
                }
                if grid.get(partner_role, vx, d) {
                    out.push(v(format!("vet {} (group A primary) paired with non-B vet {} on day {d}", ctx.vets[va].id, ctx.vets[vx].id), RuleId::E14));
                }
            }
        }
    }
    out
}

/// E.15 — Monday rest after weekend secondary; same structure and
/// exception as E.5'.
fn check_e15(ctx: &EngineContext, grid: &VarGrid, up_to_day: usize) -> Vec<Violation> {
    let mut out = Vec::new();
    let n = ctx.n_days();
    for (sat, sun) in full_weekends_before(ctx, up_to_day) {
        let mon = sun + 1;
        if mon >= n || mon >= up_to_day || !ctx.calendar.is_monday(mon) {
            continue;
        }
        for w in 0..ctx.n_vets() {
            if !grid.get(Role::Secondary, w, sat) {
                continue;
            }
            if exempt_from_monday_rest(ctx, w, mon) {
                continue;
            }
            if grid.get(Role::Primary, w, mon) || grid.get(Role::Backup, w, mon) {
                out.push(v(format!("vet {}: held a role on Monday {mon} after weekend secondary", ctx.vets[w].id), RuleId::E15));
            }
        }
    }
    out
}

pub(super) fn check_all_feasibility(ctx: &EngineContext, grid: &VarGrid, up_to_day: usize) -> Vec<Violation> {
    let mut out = Vec::new();
    for (_, check) in FEASIBILITY_RULES {
        out.extend(check(ctx, grid, up_to_day));
    }
    out
}

/// E.11/12/13 — the three workload-balancing envelopes. Counts only ever
/// grow as more days are decided, so a partial-horizon gap that already
/// exceeds `K_c` can never shrink back under it (monotonicity) — evaluating
/// this with a partial `up_to_day` during search is a sound pruning
/// condition, not a heuristic one.
#[derive(Clone, Copy)]
enum BalanceCategory {
    PrimaryTotal,
    BackupWeekday,
    SecondaryWeekendDay,
}

impl BalanceCategory {
    const ALL: [BalanceCategory; 3] =
        [BalanceCategory::PrimaryTotal, BalanceCategory::BackupWeekday, BalanceCategory::SecondaryWeekendDay];

    fn rule(self) -> RuleId {
        match self {
            BalanceCategory::PrimaryTotal => RuleId::E11,
            BalanceCategory::BackupWeekday => RuleId::E12,
            BalanceCategory::SecondaryWeekendDay => RuleId::E13,
        }
    }

    fn label(self) -> &'static str {
        match self {
            BalanceCategory::PrimaryTotal => "primary_total",
            BalanceCategory::BackupWeekday => "backup_weekday",
            BalanceCategory::SecondaryWeekendDay => "secondary_weekend_day",
        }
    }

    fn limit(self, c: &Constraints) -> u32 {
        match self {
            BalanceCategory::PrimaryTotal => c.balance_gap_primary,
            BalanceCategory::BackupWeekday => c.balance_gap_backup,
            BalanceCategory::SecondaryWeekendDay => c.balance_gap_secondary,
        }
    }

    fn role(self) -> Role {
        match self {
            BalanceCategory::PrimaryTotal => Role::Primary,
            BalanceCategory::BackupWeekday => Role::Backup,
            BalanceCategory::SecondaryWeekendDay => Role::Secondary,
        }
    }

    fn hist(self, h: &HistoryCounters) -> u32 {
        match self {
            BalanceCategory::PrimaryTotal => h.primary_total(),
            BalanceCategory::BackupWeekday => h.backup_weekday_ct,
            BalanceCategory::SecondaryWeekendDay => h.secondary_weekend_day_ct,
        }
    }
}

/// Vets excluded from every balance envelope, not just the category their
/// tag most obviously concerns: the original excludes `never_primary` and
/// `once_weekly_backup` vets from categories 11, 12 *and* 13 alike (the
/// same name check appears identically in all three of its constraint
/// blocks), and §4.E.11 says as much — "at least `never_primary` and
/// `once_weekly_backup` vets" are omitted, with no per-category carve-out.
fn is_excluded_from_every_envelope(ctx: &EngineContext, w: usize) -> bool {
    ctx.vets[w].has_tag(Tag::ExcludedFromBalance)
        || ctx.vets[w].has_tag(Tag::NeverPrimary)
        || ctx.vets[w].has_tag(Tag::OnceWeeklyBackup)
}

pub(super) fn check_balance(ctx: &EngineContext, grid: &VarGrid, up_to_day: usize) -> Vec<BalanceWarning> {
    let mut out = Vec::new();
    for cat in BalanceCategory::ALL {
        let eligible: Vec<usize> =
            (0..ctx.n_vets()).filter(|&w| !is_excluded_from_every_envelope(ctx, w)).collect();
        if eligible.len() < 2 {
            continue;
        }
        let totals: Vec<u32> = eligible
            .iter()
            .map(|&w| {
                let cur = (0..up_to_day.min(ctx.n_days())).filter(|&d| grid.get(cat.role(), w, d)).count() as u32;
                cur + cat.hist(&ctx.vets[w].hist)
            })
            .collect();
        let max = *totals.iter().max().unwrap();
        let min = *totals.iter().min().unwrap();
        let gap = max - min;
        let limit = cat.limit(&ctx.config.constraints);
        if gap > limit {
            out.push(BalanceWarning { rule: cat.rule(), category: cat.label(), gap, limit });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Calendar;
    use crate::config::EngineConfig;
    use crate::model::HistoryCounters;
    use crate::roster::{RawVet, Roster};
    use crate::scheduler::types::VetCtx;
    use chrono::NaiveDate;

    fn ctx_3_vets(start: NaiveDate, end: NaiveDate) -> EngineContext {
        let calendar = Calendar::build(start, end).unwrap();
        let entries = vec![
            RawVet { id: crate::model::VetId::new("alice"), rest_days: vec![], vacations: vec![] },
            RawVet { id: crate::model::VetId::new("bob"), rest_days: vec![], vacations: vec![] },
            RawVet { id: crate::model::VetId::new("carol"), rest_days: vec![], vacations: vec![] },
        ];
        let roster = Roster::build(entries).unwrap();
        let vets = roster
            .vets()
            .iter()
            .map(|rec| VetCtx {
                id: rec.id.clone(),
                group: crate::model::Group::None,
                tags: Default::default(),
                hist: HistoryCounters::default(),
            })
            .collect();
        EngineContext { calendar, roster, config: EngineConfig::default(), vets }
    }

    #[test]
    fn e1_flags_missing_weekday_coverage() {
        let ctx = ctx_3_vets(
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        );
        let grid = VarGrid::new(ctx.n_vets(), ctx.n_days());
        let violations = check_e1(&ctx, &grid, 1);
        assert!(!violations.is_empty());
    }

    #[test]
    fn e1_passes_when_exactly_one_primary_and_backup() {
        let ctx = ctx_3_vets(
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        );
        let mut grid = VarGrid::new(ctx.n_vets(), ctx.n_days());
        grid.set(Role::Primary, 0, 0, true);
        grid.set(Role::Backup, 1, 0, true);
        assert!(check_e1(&ctx, &grid, 1).is_empty());
    }

    #[test]
    fn e7_flags_assignment_on_rest_day() {
        let mut ctx = ctx_3_vets(
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        );
        let entries = vec![
            RawVet { id: crate::model::VetId::new("alice"), rest_days: vec![0], vacations: vec![] },
            RawVet { id: crate::model::VetId::new("bob"), rest_days: vec![], vacations: vec![] },
            RawVet { id: crate::model::VetId::new("carol"), rest_days: vec![], vacations: vec![] },
        ];
        ctx.roster = Roster::build(entries).unwrap();
        let mut grid = VarGrid::new(ctx.n_vets(), ctx.n_days());
        grid.set(Role::Primary, 0, 0, true);
        assert!(!check_e7(&ctx, &grid, 1).is_empty());
    }
}
