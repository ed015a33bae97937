//! Component A: expands an ISO date range into the day/work-week/weekend
//! structure the rest of the engine iterates over.

use crate::model::{DayClass, EngineError, EngineResult};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

const MAX_HORIZON_DAYS: i64 = 365;

/// A maximal Mon–Fri run, bounded by a Friday or by the horizon edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkWeek {
    pub days: Vec<usize>,
}

/// A weekend slot: a matched Saturday/Sunday pair, or a lone day at the
/// horizon edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weekend {
    Full { sat: usize, sun: usize },
    LoneSat(usize),
    LoneSun(usize),
}

impl Weekend {
    /// Day indices forced to zero coverage when this is a lone day (E.2).
    pub fn lone_day(&self) -> Option<usize> {
        match *self {
            Weekend::LoneSat(d) | Weekend::LoneSun(d) => Some(d),
            Weekend::Full { .. } => None,
        }
    }
}

pub struct Calendar {
    start: NaiveDate,
    days: Vec<NaiveDate>,
    classes: Vec<DayClass>,
    work_weeks: Vec<WorkWeek>,
    weekends: Vec<Weekend>,
}

impl Calendar {
    pub fn build(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        if end < start {
            return Err(EngineError::InvalidHorizon("end precedes start"));
        }
        let span = (end - start).num_days();
        if span > MAX_HORIZON_DAYS {
            return Err(EngineError::InvalidHorizon("span exceeds 365 days"));
        }
        let n = span as usize + 1;
        let mut days = Vec::with_capacity(n);
        let mut classes = Vec::with_capacity(n);
        for i in 0..n {
            let date = start + Duration::days(i as i64);
            let class = match date.weekday() {
                Weekday::Sat | Weekday::Sun => DayClass::Weekend,
                _ => DayClass::Weekday,
            };
            days.push(date);
            classes.push(class);
        }

        let work_weeks = build_work_weeks(&days, &classes);
        let weekends = build_weekends(&days);

        #[cfg(feature = "logging")]
        tracing::debug!(n_days = n, n_work_weeks = work_weeks.len(), n_weekends = weekends.len(), "calendar partitioned");

        Ok(Self { start, days, classes, work_weeks, weekends })
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn date_of(&self, d: usize) -> NaiveDate {
        self.days[d]
    }

    pub fn class_of(&self, d: usize) -> DayClass {
        self.classes[d]
    }

    pub fn weekday_of(&self, d: usize) -> Weekday {
        self.days[d].weekday()
    }

    /// Monday-first weekday index (0=Monday … 6=Sunday), as used by rest-day
    /// descriptors in the roster.
    pub fn weekday_index(&self, d: usize) -> u8 {
        self.weekday_of(d).num_days_from_monday() as u8
    }

    pub fn is_monday(&self, d: usize) -> bool {
        self.weekday_of(d) == Weekday::Mon
    }

    pub fn work_weeks(&self) -> &[WorkWeek] {
        &self.work_weeks
    }

    pub fn weekends(&self) -> &[Weekend] {
        &self.weekends
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }
}

fn build_work_weeks(days: &[NaiveDate], classes: &[DayClass]) -> Vec<WorkWeek> {
    let mut work_weeks = Vec::new();
    let mut current = Vec::new();
    for (d, class) in classes.iter().enumerate() {
        if *class == DayClass::Weekday {
            current.push(d);
            if days[d].weekday() == Weekday::Fri {
                work_weeks.push(WorkWeek { days: std::mem::take(&mut current) });
            }
        } else if !current.is_empty() {
            work_weeks.push(WorkWeek { days: std::mem::take(&mut current) });
        }
    }
    if !current.is_empty() {
        work_weeks.push(WorkWeek { days: current });
    }
    work_weeks
}

fn build_weekends(days: &[NaiveDate]) -> Vec<Weekend> {
    let n = days.len();
    let mut weekends = Vec::new();
    let mut d = 0;
    while d < n {
        match days[d].weekday() {
            Weekday::Sat => {
                if d + 1 < n && days[d + 1].weekday() == Weekday::Sun {
                    weekends.push(Weekend::Full { sat: d, sun: d + 1 });
                    d += 2;
                    continue;
                }
                weekends.push(Weekend::LoneSat(d));
            }
            Weekday::Sun => weekends.push(Weekend::LoneSun(d)),
            _ => {}
        }
        d += 1;
    }
    weekends
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_reversed_range() {
        let err = Calendar::build(date(2026, 1, 10), date(2026, 1, 1)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidHorizon(_)));
    }

    #[test]
    fn rejects_oversized_span() {
        let err = Calendar::build(date(2026, 1, 1), date(2027, 1, 3)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidHorizon(_)));
    }

    #[test]
    fn single_weekday_horizon() {
        // 2026-01-05 is a Monday.
        let cal = Calendar::build(date(2026, 1, 5), date(2026, 1, 5)).unwrap();
        assert_eq!(cal.len(), 1);
        assert_eq!(cal.class_of(0), DayClass::Weekday);
        assert_eq!(cal.work_weeks().len(), 1);
        assert_eq!(cal.work_weeks()[0].days, vec![0]);
        assert!(cal.weekends().is_empty());
    }

    #[test]
    fn full_week_plus_weekend() {
        // 2026-01-05 (Mon) .. 2026-01-11 (Sun)
        let cal = Calendar::build(date(2026, 1, 5), date(2026, 1, 11)).unwrap();
        assert_eq!(cal.len(), 7);
        assert_eq!(cal.work_weeks().len(), 1);
        assert_eq!(cal.work_weeks()[0].days, vec![0, 1, 2, 3, 4]);
        assert_eq!(cal.weekends().len(), 1);
        assert!(matches!(cal.weekends()[0], Weekend::Full { sat: 5, sun: 6 }));
    }

    #[test]
    fn horizon_starting_on_sunday_yields_lone_day() {
        // 2026-01-04 is a Sunday.
        let cal = Calendar::build(date(2026, 1, 4), date(2026, 1, 6)).unwrap();
        assert_eq!(cal.weekends().len(), 1);
        assert!(matches!(cal.weekends()[0], Weekend::LoneSun(0)));
    }

    #[test]
    fn horizon_ending_on_saturday_yields_lone_day() {
        // 2026-01-10 is a Saturday.
        let cal = Calendar::build(date(2026, 1, 8), date(2026, 1, 10)).unwrap();
        let last = *cal.weekends().last().unwrap();
        assert!(matches!(last, Weekend::LoneSat(2)));
    }

    #[test]
    fn mid_week_bounds_split_work_weeks() {
        // 2026-01-07 (Wed) .. 2026-01-15 (Thu): partial week, full week, partial week.
        let cal = Calendar::build(date(2026, 1, 7), date(2026, 1, 15)).unwrap();
        assert_eq!(cal.work_weeks().len(), 3);
        assert_eq!(cal.work_weeks()[0].days.len(), 3); // Wed, Thu, Fri
        assert_eq!(cal.work_weeks()[1].days.len(), 5); // full Mon-Fri
        assert_eq!(cal.work_weeks()[2].days.len(), 1); // Thu
    }
}
