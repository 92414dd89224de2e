use itertools::Itertools;

use crate::types::{format_time, Minutes};

/// How many departures a stop shows at once
pub const NEXT_DEPARTURE_COUNT: usize = 3;

/// Picks the next departures a rider would encounter from `now` on, treating the schedule as cyclic
/// over one day: everything at or after `now` first, then the earliest times of the next day.
/// Duplicate times are collapsed, so the result holds `min(3, distinct times)` entries.
pub fn next_departures<I>(times: I, now: Minutes) -> Vec<Minutes>
where
    I: IntoIterator<Item = Minutes>,
{
    let all_times: Vec<Minutes> = times.into_iter().sorted().dedup().collect();

    // Both halves keep the ascending order of all_times
    let (upcoming, past): (Vec<Minutes>, Vec<Minutes>) = all_times.into_iter().partition(|&time| time >= now);

    upcoming.into_iter()
        .chain(past)
        .take(NEXT_DEPARTURE_COUNT)
        .collect()
}

/// Same as `next_departures`, formatted as "HH:MM"
pub fn select_next<I>(times: I, now: Minutes) -> Vec<String>
where
    I: IntoIterator<Item = Minutes>,
{
    next_departures(times, now).into_iter().map(format_time).collect()
}
