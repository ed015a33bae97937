//! Component F: the solver driver. Constructs a schedule day by day (weekend
//! pairs as a single unit) against the declarative rule table of §4.E,
//! backtracking on dead ends. The first attempt uses a deterministic,
//! unrandomized candidate order; if the wall-clock budget runs out before it
//! either completes or proves infeasibility, randomized-restart worker
//! threads race it against a shared deadline (§5, §9).
//!
//! `Optimal` is reserved for a canonical attempt that never needed to try a
//! candidate beyond the first at any unit — every other success (canonical
//! with retries, or any worker) is reported as `Feasible`. A canonical
//! attempt that exhausts its entire search tree without the deadline firing
//! is a genuine proof of infeasibility: the candidate enumeration is
//! complete, not a heuristic, so there is nothing a randomized worker could
//! find that the canonical attempt didn't already rule out.

use super::extract::extract;
use super::rules::{check_all_feasibility, check_balance};
use super::types::{EngineContext, SolveOutcome, SolveStatus, VarGrid};
use crate::calendar::Weekend;
use crate::model::{DayClass, Role};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cell::Cell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct SolverOptions {
    pub time_budget: Duration,
    pub workers: usize,
    pub seed: u64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self { time_budget: Duration::from_secs(300), workers: 8, seed: 0 }
    }
}

/// A calendar slot needing one role assignment: a single weekday (primary +
/// backup) or a full weekend pair (primary + secondary, locked across both
/// days by E.2). Lone weekend days at the horizon edge carry no unit — their
/// zero-assignment is already the grid's initial state.
#[derive(Debug, Clone, Copy)]
enum Unit {
    Weekday(usize),
    Weekend(usize, usize),
}

impl Unit {
    fn decided_through(self) -> usize {
        match self {
            Unit::Weekday(d) => d + 1,
            Unit::Weekend(_, sun) => sun + 1,
        }
    }
}

fn build_units(ctx: &EngineContext) -> Vec<Unit> {
    let mut weekend_suns = HashMap::new();
    for w in ctx.calendar.weekends() {
        if let Weekend::Full { sat, sun } = *w {
            weekend_suns.insert(sat, sun);
        }
    }
    let n = ctx.n_days();
    let mut units = Vec::new();
    let mut d = 0;
    while d < n {
        match ctx.calendar.class_of(d) {
            DayClass::Weekday => {
                units.push(Unit::Weekday(d));
                d += 1;
            }
            DayClass::Weekend => {
                if let Some(&sun) = weekend_suns.get(&d) {
                    units.push(Unit::Weekend(d, sun));
                    d = sun + 1;
                } else {
                    d += 1;
                }
            }
        }
    }
    units
}

fn eligible_vets(ctx: &EngineContext, unit: Unit) -> Vec<usize> {
    match unit {
        Unit::Weekday(d) => (0..ctx.n_vets()).filter(|&v| !ctx.is_off(v, d)).collect(),
        Unit::Weekend(sat, sun) => {
            (0..ctx.n_vets()).filter(|&v| !ctx.is_off(v, sat) && !ctx.is_off(v, sun)).collect()
        }
    }
}

/// Ordered (role-A, role-B) vet index pairs for one unit, following `order`
/// (ascending vet index for the canonical attempt, shuffled for a worker).
fn candidates(ctx: &EngineContext, unit: Unit, order: &[usize]) -> Vec<(usize, usize)> {
    let eligible: std::collections::HashSet<usize> = eligible_vets(ctx, unit).into_iter().collect();
    let ordered: Vec<usize> = order.iter().copied().filter(|v| eligible.contains(v)).collect();
    let mut out = Vec::new();
    for &a in &ordered {
        for &b in &ordered {
            if a != b {
                out.push((a, b));
            }
        }
    }
    out
}

fn set_unit(grid: &mut VarGrid, unit: Unit, pair: (usize, usize)) {
    match unit {
        Unit::Weekday(d) => {
            grid.set(Role::Primary, pair.0, d, true);
            grid.set(Role::Backup, pair.1, d, true);
        }
        Unit::Weekend(sat, sun) => {
            grid.set(Role::Primary, pair.0, sat, true);
            grid.set(Role::Primary, pair.0, sun, true);
            grid.set(Role::Secondary, pair.1, sat, true);
            grid.set(Role::Secondary, pair.1, sun, true);
        }
    }
}

fn clear_unit(grid: &mut VarGrid, unit: Unit, pair: (usize, usize)) {
    match unit {
        Unit::Weekday(d) => {
            grid.set(Role::Primary, pair.0, d, false);
            grid.set(Role::Backup, pair.1, d, false);
        }
        Unit::Weekend(sat, sun) => {
            grid.set(Role::Primary, pair.0, sat, false);
            grid.set(Role::Primary, pair.0, sun, false);
            grid.set(Role::Secondary, pair.1, sat, false);
            grid.set(Role::Secondary, pair.1, sun, false);
        }
    }
}

struct SearchControl<'a> {
    deadline: Instant,
    stop: &'a AtomicBool,
    nodes: Cell<u64>,
}

impl<'a> SearchControl<'a> {
    fn new(deadline: Instant, stop: &'a AtomicBool) -> Self {
        Self { deadline, stop, nodes: Cell::new(0) }
    }

    /// Checked on every candidate: cheap atomic load every call, wall-clock
    /// read only every 256th, so the deadline can't starve the search but
    /// also doesn't dominate its cost.
    fn should_stop(&self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }
        let n = self.nodes.get() + 1;
        self.nodes.set(n);
        if n % 256 == 0 && Instant::now() >= self.deadline {
            self.stop.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }
}

enum Outcome {
    Solved,
    /// The entire subtree rooted here was tried and rejected; not
    /// necessarily a proof of infeasibility unless this is the root call.
    Exhausted,
    Stopped,
}

#[allow(clippy::too_many_arguments)]
fn backtrack(
    ctx: &EngineContext,
    grid: &mut VarGrid,
    units: &[Unit],
    idx: usize,
    order: &[usize],
    control: &SearchControl,
    needed_retry: &Cell<bool>,
) -> Outcome {
    if control.should_stop() {
        return Outcome::Stopped;
    }
    if idx == units.len() {
        return if check_balance(ctx, grid, ctx.n_days()).is_empty() {
            Outcome::Solved
        } else {
            Outcome::Exhausted
        };
    }

    let unit = units[idx];
    let cands = candidates(ctx, unit, order);
    for (attempt, &(a, b)) in cands.iter().enumerate() {
        if attempt > 0 {
            needed_retry.set(true);
        }
        set_unit(grid, unit, (a, b));
        if check_all_feasibility(ctx, grid, unit.decided_through()).is_empty() {
            match backtrack(ctx, grid, units, idx + 1, order, control, needed_retry) {
                Outcome::Solved => return Outcome::Solved,
                Outcome::Stopped => {
                    clear_unit(grid, unit, (a, b));
                    return Outcome::Stopped;
                }
                Outcome::Exhausted => needed_retry.set(true),
            }
        }
        clear_unit(grid, unit, (a, b));
        if control.should_stop() {
            return Outcome::Stopped;
        }
    }
    Outcome::Exhausted
}

pub fn solve(ctx: &EngineContext, opts: SolverOptions) -> SolveOutcome {
    let units = build_units(ctx);
    let deadline = Instant::now() + opts.time_budget;

    let canonical_order: Vec<usize> = (0..ctx.n_vets()).collect();
    let canonical_stop = AtomicBool::new(false);
    let mut grid = VarGrid::new(ctx.n_vets(), ctx.n_days());
    let needed_retry = Cell::new(false);
    let control = SearchControl::new(deadline, &canonical_stop);

    match backtrack(ctx, &mut grid, &units, 0, &canonical_order, &control, &needed_retry) {
        Outcome::Solved => {
            let status = if needed_retry.get() { SolveStatus::Feasible } else { SolveStatus::Optimal };
            #[cfg(feature = "logging")]
            tracing::info!(?status, "canonical construction order succeeded");
            return SolveOutcome::new(status, Some(extract(ctx, &grid)));
        }
        Outcome::Exhausted => {
            #[cfg(feature = "logging")]
            tracing::warn!("canonical search tree exhausted: no feasible schedule exists");
            return SolveOutcome::new(SolveStatus::Infeasible, None);
        }
        Outcome::Stopped => {
            #[cfg(feature = "logging")]
            tracing::debug!("canonical attempt hit the deadline, handing off to randomized workers");
        }
    }

    run_randomized_workers(ctx, &units, opts, deadline)
}

fn run_randomized_workers(
    ctx: &EngineContext,
    units: &[Unit],
    opts: SolverOptions,
    deadline: Instant,
) -> SolveOutcome {
    let n_workers = opts.workers.max(1);
    let stop = AtomicBool::new(false);
    let found: Mutex<Option<Vec<crate::model::DaySchedule>>> = Mutex::new(None);

    std::thread::scope(|scope| {
        for worker in 0..n_workers {
            let stop = &stop;
            let found = &found;
            let seed = opts.seed.wrapping_add(worker as u64).wrapping_add(0x9E3779B97F4A7C15);
            scope.spawn(move || {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                loop {
                    if stop.load(Ordering::Relaxed) || Instant::now() >= deadline {
                        return;
                    }
                    let mut order: Vec<usize> = (0..ctx.n_vets()).collect();
                    order.shuffle(&mut rng);
                    let mut grid = VarGrid::new(ctx.n_vets(), ctx.n_days());
                    let retry_flag = Cell::new(false);
                    let control = SearchControl::new(deadline, stop);
                    match backtrack(ctx, &mut grid, units, 0, &order, &control, &retry_flag) {
                        Outcome::Solved => {
                            let schedule = extract(ctx, &grid);
                            let mut slot = found.lock().unwrap();
                            if slot.is_none() {
                                *slot = Some(schedule);
                            }
                            stop.store(true, Ordering::Relaxed);
                            return;
                        }
                        Outcome::Exhausted => continue,
                        Outcome::Stopped => return,
                    }
                }
            });
        }
    });

    match found.into_inner().unwrap() {
        Some(schedule) => SolveOutcome::new(SolveStatus::Feasible, Some(schedule)),
        None => SolveOutcome::new(SolveStatus::Timeout, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Calendar;
    use crate::config::EngineConfig;
    use crate::model::{HistoryCounters, VetId};
    use crate::roster::{RawVet, Roster};
    use crate::scheduler::types::VetCtx;
    use chrono::NaiveDate;

    fn ctx_n_vets(start: NaiveDate, end: NaiveDate, n: usize) -> EngineContext {
        let calendar = Calendar::build(start, end).unwrap();
        let entries: Vec<RawVet> = (0..n)
            .map(|i| RawVet { id: VetId::new(format!("vet{i}")), rest_days: vec![], vacations: vec![] })
            .collect();
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
    fn single_weekday_three_vets_is_optimal() {
        let ctx = ctx_n_vets(
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            3,
        );
        let outcome = solve(&ctx, SolverOptions { time_budget: Duration::from_secs(5), workers: 2, seed: 1 });
        assert_eq!(outcome.status, SolveStatus::Optimal);
        let schedule = outcome.schedule().unwrap();
        assert_eq!(schedule.len(), 1);
        assert!(schedule[0].primary.is_some());
        assert!(schedule[0].backup.is_some());
        assert_ne!(schedule[0].primary, schedule[0].backup);
    }

    #[test]
    fn one_week_three_vets_is_feasible() {
        let ctx = ctx_n_vets(
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 9).unwrap(),
            3,
        );
        let outcome = solve(&ctx, SolverOptions { time_budget: Duration::from_secs(5), workers: 2, seed: 7 });
        assert_ne!(outcome.status, SolveStatus::Infeasible);
        assert!(outcome.schedule().is_some());
    }

    #[test]
    fn one_eligible_vet_on_a_weekday_is_infeasible() {
        // A weekday unit needs two distinct role-holders; with only one of
        // three vets left standing (the other two on vacation that day) no
        // candidate pair exists at all, so the canonical attempt's search
        // tree is empty and the engine must report Infeasible, not hang or
        // panic.
        let mut ctx = ctx_n_vets(
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            3,
        );
        let vac = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let entries = vec![
            RawVet { id: VetId::new("vet0"), rest_days: vec![], vacations: vec![] },
            RawVet { id: VetId::new("vet1"), rest_days: vec![], vacations: vec![vac] },
            RawVet { id: VetId::new("vet2"), rest_days: vec![], vacations: vec![vac] },
        ];
        ctx.roster = Roster::build(entries).unwrap();

        let outcome = solve(&ctx, SolverOptions { time_budget: Duration::from_secs(5), workers: 2, seed: 3 });
        assert_eq!(outcome.status, SolveStatus::Infeasible);
        assert!(outcome.schedule().is_none());
    }
}
