// This file defines the data model of the departure board.
// A schedule maps every stop (by its human-readable name) to the set of times a bus leaves that stop.
// Times of day are kept as minutes since midnight and are only converted to "HH:MM" for input and output.
// Stops are never identified by anything but their name, times are plain values.

use std::{collections::{BTreeMap, BTreeSet}, fmt, str::FromStr};

use chrono::{NaiveTime, Timelike};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::error::ScheduleError;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

lazy_static! {
    static ref RE_TIME: Regex = Regex::new(r"^(?P<hours>[0-9]{1,2}):(?P<minutes>[0-9]{2})$").unwrap();
}

/// A wall-clock time of day, 0..=1439
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Minutes(u16);

impl Minutes {
    /// Folds any minute count onto a single day, so 1440 becomes 00:00 again
    pub fn wrapping(total: u32) -> Minutes {
        Minutes((total % MINUTES_PER_DAY as u32) as u16)
    }

    pub fn hours(self) -> u16 {
        self.0 / 60
    }

    pub fn minutes(self) -> u16 {
        self.0 % 60
    }
}

impl From<NaiveTime> for Minutes {
    fn from(time: NaiveTime) -> Self {
        // Seconds are dropped, a bus leaving at the current minute is still upcoming
        Minutes::wrapping(time.hour() * 60 + time.minute())
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minutes())
    }
}

impl FromStr for Minutes {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time(s)
    }
}

/// Parses "HH:MM" (24 hour clock) into minutes since midnight
pub fn parse_time(input: &str) -> Result<Minutes, ScheduleError> {
    let error = |reason: &'static str| ScheduleError::FormatError { input: input.to_string(), reason };

    let caps = RE_TIME.captures(input.trim()).ok_or_else(|| error("expected HH:MM"))?;
    let hours: u16 = caps["hours"].parse().map_err(|_| error("hours are not a number"))?;
    let minutes: u16 = caps["minutes"].parse().map_err(|_| error("minutes are not a number"))?;

    if hours > 23 {
        return Err(error("hours must be between 00 and 23"));
    }
    if minutes > 59 {
        return Err(error("minutes must be between 00 and 59"));
    }

    Ok(Minutes(hours * 60 + minutes))
}

pub fn format_time(time: Minutes) -> String {
    time.to_string()
}

/// Accent-free, lowercase ASCII alphanumeric form of a stop name, so "tornimae" finds "Tornimäe"
pub fn stop_key(name: &str) -> String {
    name.nfd()
        .filter(|&c| !is_combining_mark(c))
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Schedule as it is persisted: stop name to a list of "HH:MM" strings
pub type RawSchedule = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawSchedule", into = "RawSchedule")]
pub struct Schedule {
    stops: BTreeMap<String, BTreeSet<Minutes>>,
}

impl Schedule {
    pub fn with_stops<I, S>(names: I) -> Schedule
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Schedule {
            stops: names.into_iter().map(|name| (name.into(), BTreeSet::new())).collect(),
        }
    }

    /// Builds a schedule from stored data, skipping (and logging) entries that are not valid times
    pub fn from_raw(raw: RawSchedule) -> Schedule {
        let stops = raw.into_iter().map(|(stop, times)| {
            let times = times.iter().filter_map(|time| match parse_time(time) {
                Ok(time) => Some(time),
                Err(err) => {
                    warn!("Skipping stored departure for {}: {}", stop, err);
                    None
                }
            }).collect();

            (stop, times)
        }).collect();

        Schedule { stops }
    }

    pub fn to_raw(&self) -> RawSchedule {
        self.stops.iter()
            .map(|(stop, times)| (stop.clone(), times.iter().map(|&time| format_time(time)).collect()))
            .collect()
    }

    pub fn stops(&self) -> impl Iterator<Item = &str> {
        self.stops.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<Minutes>)> {
        self.stops.iter().map(|(stop, times)| (stop.as_str(), times))
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Adds an empty stop when it does not exist yet, returns whether it was added
    pub fn ensure_stop(&mut self, name: &str) -> bool {
        if self.stops.contains_key(name) {
            return false;
        }

        self.stops.insert(name.to_string(), BTreeSet::new());
        true
    }

    /// Finds the stored name of a stop, first exactly and then through `stop_key`
    pub fn resolve_stop(&self, name: &str) -> Result<&str, ScheduleError> {
        if let Some((stop, _)) = self.stops.get_key_value(name) {
            return Ok(stop);
        }

        let key = stop_key(name);
        self.stops.keys()
            .find(|stop| !key.is_empty() && stop_key(stop) == key)
            .map(String::as_str)
            .ok_or_else(|| ScheduleError::UnknownStopError(name.to_string()))
    }

    pub fn departures(&self, stop: &str) -> Result<&BTreeSet<Minutes>, ScheduleError> {
        let stop = self.resolve_stop(stop)?;
        Ok(&self.stops[stop])
    }

    fn departures_mut(&mut self, stop: &str) -> Result<&mut BTreeSet<Minutes>, ScheduleError> {
        let stop = self.resolve_stop(stop)?.to_string();
        match self.stops.get_mut(&stop) {
            Some(times) => Ok(times),
            None => Err(ScheduleError::UnknownStopError(stop)),
        }
    }

    /// Returns false when the stop already had this departure
    pub fn add_departure(&mut self, stop: &str, time: Minutes) -> Result<bool, ScheduleError> {
        Ok(self.departures_mut(stop)?.insert(time))
    }

    /// Returns false when there was nothing to remove
    pub fn remove_departure(&mut self, stop: &str, time: Minutes) -> Result<bool, ScheduleError> {
        Ok(self.departures_mut(stop)?.remove(&time))
    }
}

impl From<RawSchedule> for Schedule {
    fn from(raw: RawSchedule) -> Self {
        Schedule::from_raw(raw)
    }
}

impl From<Schedule> for RawSchedule {
    fn from(schedule: Schedule) -> Self {
        schedule.to_raw()
    }
}
