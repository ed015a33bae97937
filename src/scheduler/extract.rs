//! Component G: reads the decided variable grid back into the output
//! contract of §4.G, one record per calendar day.

use super::types::{EngineContext, VarGrid};
use crate::model::{DaySchedule, Role};

pub(super) fn extract(ctx: &EngineContext, grid: &VarGrid) -> Vec<DaySchedule> {
    (0..ctx.n_days())
        .map(|d| {
            let who = |role: Role| grid.who_holds(role, ctx.n_vets(), d).map(|v| ctx.vets[v].id.clone());
            DaySchedule {
                date: ctx.calendar.date_of(d),
                weekday: ctx.calendar.class_of(d),
                primary: who(Role::Primary),
                backup: who(Role::Backup),
                secondary: who(Role::Secondary),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Calendar;
    use crate::config::EngineConfig;
    use crate::model::{DayClass, HistoryCounters, VetId};
    use crate::roster::{RawVet, Roster};
    use crate::scheduler::types::VetCtx;
    use chrono::NaiveDate;

    fn ctx_3_vets() -> EngineContext {
        let start = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let calendar = Calendar::build(start, end).unwrap();
        let entries = vec![
            RawVet { id: VetId::new("alice"), rest_days: vec![], vacations: vec![] },
            RawVet { id: VetId::new("bob"), rest_days: vec![], vacations: vec![] },
            RawVet { id: VetId::new("carol"), rest_days: vec![], vacations: vec![] },
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
    fn extracts_assigned_roles_for_the_day() {
        let ctx = ctx_3_vets();
        let mut grid = VarGrid::new(ctx.n_vets(), ctx.n_days());
        grid.set(Role::Primary, 0, 0, true);
        grid.set(Role::Backup, 1, 0, true);

        let schedule = extract(&ctx, &grid);
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].weekday, DayClass::Weekday);
        assert_eq!(schedule[0].primary, Some(VetId::new("alice")));
        assert_eq!(schedule[0].backup, Some(VetId::new("bob")));
        assert_eq!(schedule[0].secondary, None);
    }
}
