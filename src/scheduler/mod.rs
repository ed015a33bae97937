//! The on-call scheduling engine: components D through I of §4, wired
//! behind one stateless `Engine`. Calendar (A), roster (B) and history (C)
//! are resolved once at `Engine::build` time into an `EngineContext`; no
//! global mutable state is kept anywhere in this module (§9) — a
//! `HistoryStore` handle is the caller's to own and thread through.

mod diagnostic;
mod extract;
mod rules;
mod solver;
mod types;
mod util;

pub use solver::SolverOptions;
pub use types::{
    BalanceWarning, DiagnosticReport, RuleId, SolveOutcome, SolveStatus, Violation,
};

use crate::calendar::Calendar;
use crate::config::EngineConfig;
use crate::history::History;
use crate::model::EngineResult;
use crate::roster::{RawVet, Roster};
use chrono::NaiveDate;
use types::{EngineContext, VetCtx};

/// Component D plus the A→C resolution pass: the per-(vet, day, role)
/// decision slots are the three `Vec<bool>` arrays inside `VarGrid`
/// (allocated fresh for every solve attempt, §9's design note), while this
/// struct holds everything the constraint compiler, solver and diagnostic
/// share once and for all.
pub struct Engine {
    ctx: EngineContext,
    history_is_empty: bool,
}

impl Engine {
    /// Resolves the calendar (A), validates and normalises the roster (B),
    /// and looks up each vet's cumulative history (C) — all in one pass, so
    /// that by the time `solve` runs there is nothing left to validate.
    pub fn build(
        start: NaiveDate,
        end: NaiveDate,
        raw_vets: Vec<RawVet>,
        config: EngineConfig,
        history: &History,
    ) -> EngineResult<Self> {
        let calendar = Calendar::build(start, end)?;
        let vet_ids: Vec<_> = raw_vets.iter().map(|v| v.id.clone()).collect();
        let roster = Roster::build(raw_vets)?;
        let cumulative = history.cumulative();

        let vets = vet_ids
            .into_iter()
            .map(|id| {
                let tags = config.vet_tags.get(&id).cloned().unwrap_or_default();
                let group = config.group_of(&id);
                let hist = cumulative.get(&id).copied().unwrap_or_default();
                VetCtx { id, group, tags, hist }
            })
            .collect();

        #[cfg(feature = "logging")]
        tracing::info!(
            n_vets = roster_len(&vets),
            n_days = calendar.len(),
            n_work_weeks = calendar.work_weeks().len(),
            n_weekends = calendar.weekends().len(),
            "engine context resolved"
        );

        Ok(Self {
            ctx: EngineContext { calendar, roster, config, vets },
            history_is_empty: history.periods.is_empty(),
        })
    }

    /// Component F: runs the solver driver against the resolved context.
    pub fn solve(&self, opts: SolverOptions) -> SolveOutcome {
        solver::solve(&self.ctx, opts)
    }

    /// Component H: the independent re-check. Always safe to call, even on
    /// an `Infeasible`/`Timeout` outcome — it simply reports an empty
    /// violation/warning set with no stats in that case.
    pub fn diagnose(&self, outcome: &SolveOutcome) -> DiagnosticReport {
        diagnostic::diagnose(&self.ctx, outcome, self.history_is_empty)
    }

    pub fn n_days(&self) -> usize {
        self.ctx.n_days()
    }

    pub fn n_vets(&self) -> usize {
        self.ctx.n_vets()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.ctx.calendar.start()
    }
}

#[cfg(feature = "logging")]
fn roster_len(vets: &[VetCtx]) -> usize {
    vets.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::History;

    fn three_vets() -> Vec<RawVet> {
        vec![
            RawVet { id: "alice".into(), rest_days: vec![], vacations: vec![] },
            RawVet { id: "bob".into(), rest_days: vec![], vacations: vec![] },
            RawVet { id: "carol".into(), rest_days: vec![], vacations: vec![] },
        ]
    }

    #[test]
    fn build_then_solve_a_single_weekday() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let history = History::default();
        let engine =
            Engine::build(start, start, three_vets(), EngineConfig::default(), &history).unwrap();
        assert_eq!(engine.n_days(), 1);
        assert_eq!(engine.n_vets(), 3);

        let outcome = engine.solve(SolverOptions { time_budget: std::time::Duration::from_secs(5), ..Default::default() });
        assert!(outcome.schedule().is_some());

        let report = engine.diagnose(&outcome);
        assert!(report.is_clean());
    }

    #[test]
    fn rejects_reversed_horizon() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let history = History::default();
        let err = Engine::build(start, end, three_vets(), EngineConfig::default(), &history).unwrap_err();
        assert!(matches!(err, crate::model::EngineError::InvalidHorizon(_)));
    }
}
