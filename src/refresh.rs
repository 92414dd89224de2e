use std::{io::{self, Write}, time::Duration};

use crate::{board::Board, clock::Clock, database::{ScheduleStore, Storage}, error::ScheduleError};

/// Reloads the schedule and writes a fresh board
pub fn refresh_once<S, C, W>(store: &ScheduleStore<S>, clock: &C, show_all: bool, out: &mut W) -> Result<(), ScheduleError>
where
    S: Storage,
    C: Clock,
    W: Write,
{
    let schedule = store.load()?;
    let board = Board::new(&schedule, clock.now(), show_all);

    writeln!(out, "{}", board)?;
    out.flush()?;

    Ok(())
}

/// Redraws the board every `period` until Ctrl-C.
/// A failed refresh is logged and retried on the next tick.
pub async fn watch<S, C>(store: &ScheduleStore<S>, clock: &C, period: Duration, show_all: bool) -> Result<(), ScheduleError>
where
    S: Storage,
    C: Clock,
{
    info!("Refreshing departures every {} seconds, press Ctrl-C to stop", period.as_secs());

    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let stdout = io::stdout();
                match refresh_once(store, clock, show_all, &mut stdout.lock()) {
                    Ok(()) => debug!("Departure board refreshed"),
                    Err(err) => error!("Could not refresh departures: {}", err),
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    error!("Could not listen for Ctrl-C: {}", err);
                }
                info!("Stopping departure refresh");
                break;
            }
        }
    }

    Ok(())
}
