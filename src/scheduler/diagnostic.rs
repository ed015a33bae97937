//! Component H: the independent oracle. Rebuilds a variable grid from the
//! already-extracted output contract (so it also catches an extraction bug,
//! not just a compiler bug) and re-asserts every rule in §4.E by reading the
//! same declarative table the compiler reads (§9) — constraint duplication
//! between the two sides is intentional, not an oversight to clean up.

use super::rules::{check_all_feasibility, check_balance};
use super::types::{DiagnosticReport, EngineContext, RuleId, SolveOutcome, VarGrid, Violation};
use crate::history::fold_schedule;
use crate::model::{DaySchedule, Role};
use std::collections::HashMap;

fn regrid(ctx: &EngineContext, schedule: &[DaySchedule]) -> VarGrid {
    let mut grid = VarGrid::new(ctx.n_vets(), ctx.n_days());
    for (d, day) in schedule.iter().enumerate() {
        for (role, holder) in
            [(Role::Primary, &day.primary), (Role::Backup, &day.backup), (Role::Secondary, &day.secondary)]
        {
            if let Some(id) = holder {
                if let Some(v) = ctx.vet_index(id) {
                    grid.set(role, v, d, true);
                }
            }
        }
    }
    grid
}

/// Catches a same-vet/two-roles breach regardless of weekday/weekend class
/// — a generic check not keyed to a single rule number, since E.1 and E.2
/// each only police their own half of the calendar.
fn same_day_dual_role(ctx: &EngineContext, grid: &VarGrid) -> Vec<Violation> {
    let mut out = Vec::new();
    for d in 0..ctx.n_days() {
        for w in 0..ctx.n_vets() {
            let held = [Role::Primary, Role::Backup, Role::Secondary]
                .iter()
                .filter(|&&r| grid.get(r, w, d))
                .count();
            if held >= 2 {
                out.push(Violation {
                    rule: RuleId::SameDayDualRole,
                    detail: format!("vet {} holds {held} roles on day {d}", ctx.vets[w].id),
                });
            }
        }
    }
    out
}

pub fn diagnose(ctx: &EngineContext, outcome: &SolveOutcome, history_is_empty: bool) -> DiagnosticReport {
    let (violations, warnings, stats) = match outcome.schedule() {
        Some(schedule) => {
            let grid = regrid(ctx, schedule);
            let mut violations = check_all_feasibility(ctx, &grid, ctx.n_days());
            violations.extend(same_day_dual_role(ctx, &grid));
            let warnings = check_balance(ctx, &grid, ctx.n_days());
            let stats = fold_schedule(schedule);
            (violations, warnings, stats)
        }
        None => (Vec::new(), Vec::new(), HashMap::new()),
    };

    let cumulative_stats = if history_is_empty {
        None
    } else {
        Some(
            ctx.vets
                .iter()
                .map(|v| {
                    let cur = stats.get(&v.id).copied().unwrap_or_default();
                    let mut total = v.hist;
                    total.primary_weekday_ct += cur.primary_weekday_ct;
                    total.primary_weekend_day_ct += cur.primary_weekend_day_ct;
                    total.backup_weekday_ct += cur.backup_weekday_ct;
                    total.secondary_weekend_day_ct += cur.secondary_weekend_day_ct;
                    (v.id.clone(), total)
                })
                .collect(),
        )
    };

    #[cfg(feature = "logging")]
    tracing::info!(
        status = ?outcome.status,
        n_violations = violations.len(),
        n_warnings = warnings.len(),
        "diagnostic complete"
    );

    DiagnosticReport { status: outcome.status, violations, warnings, stats, cumulative_stats }
}
