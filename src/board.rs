use std::{collections::BTreeSet, fmt};

use itertools::Itertools;

use crate::{algorithms::select_next, types::{Minutes, Schedule}};

/// What a single stop shows: the next departures and optionally its full list
#[derive(Debug, PartialEq)]
pub struct StopBoard<'a> {
    pub stop: &'a str,
    pub next: Vec<String>,
    pub all: Option<&'a BTreeSet<Minutes>>,
}

/// Departure board for every stop at a given time of day
#[derive(Debug, PartialEq)]
pub struct Board<'a> {
    pub now: Minutes,
    pub stops: Vec<StopBoard<'a>>,
}

impl<'a> Board<'a> {
    pub fn new(schedule: &'a Schedule, now: Minutes, show_all: bool) -> Self {
        let stops = schedule.iter().map(|(stop, times)| StopBoard {
            stop,
            next: select_next(times.iter().copied(), now),
            all: if show_all { Some(times) } else { None },
        }).collect();

        Board { now, stops }
    }
}

impl fmt::Display for StopBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.stop)?;

        if self.next.is_empty() {
            writeln!(f, "  no departures")?;
        } else {
            writeln!(f, "  next: {}", self.next.iter().join(", "))?;
        }

        if let Some(all) = self.all.filter(|all| !all.is_empty()) {
            writeln!(f, "  all:  {}", all.iter().join(" "))?;
        }

        Ok(())
    }
}

impl fmt::Display for Board<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Departures after {}", self.now)?;
        for stop in &self.stops {
            write!(f, "{}", stop)?;
        }

        Ok(())
    }
}
