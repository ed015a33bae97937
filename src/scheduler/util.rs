use super::types::EngineContext;
use crate::calendar::Weekend;
use crate::model::Tag;

/// Weekends whose Saturday/Sunday pair lies entirely before `up_to_day` —
/// the "fully decided" scope a structural rule may safely evaluate.
pub(super) fn full_weekends_before<'a>(
    ctx: &'a EngineContext,
    up_to_day: usize,
) -> impl Iterator<Item = (usize, usize)> + 'a {
    ctx.calendar.weekends().iter().filter_map(move |w| match *w {
        Weekend::Full { sat, sun } if sun < up_to_day => Some((sat, sun)),
        _ => None,
    })
}

pub(super) fn lone_weekend_days_before<'a>(
    ctx: &'a EngineContext,
    up_to_day: usize,
) -> impl Iterator<Item = usize> + 'a {
    ctx.calendar.weekends().iter().filter_map(move |w| match w.lone_day() {
        Some(d) if d < up_to_day => Some(d),
        _ => None,
    })
}

pub(super) fn is_non_excluded_pairing_partner(ctx: &EngineContext, v: usize) -> bool {
    !ctx.vets[v].has_tag(Tag::ExcludedFromPairing)
}
