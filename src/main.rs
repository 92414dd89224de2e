#[macro_use]
extern crate log;

mod algorithms;
mod board;
mod clock;
mod config;
mod database;
mod error;
mod refresh;
mod types;

use std::{error::Error, path::PathBuf, process};

use clap::{App, Arg, ArgMatches, SubCommand};

use board::Board;
use clock::{Clock, FixedClock, LocalClock};
use config::Config;
use database::{JsonFileStorage, ScheduleStore};
use error::ScheduleError;
use types::Minutes;

type Store = ScheduleStore<JsonFileStorage>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + 'static>> {

    // Load .env variables, the file itself is optional
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let app = App::new("Bus departures")
        .about("Keeps departure times for a few bus stops and shows the next three for each")
        .arg(Arg::with_name("file")
            .long("file")
            .short("f")
            .takes_value(true)
            .help("Schedule file to use instead of BUS_SCHEDULE_FILE"))
        .subcommand(SubCommand::with_name("board")
            .about("Shows the next departures of every stop (default)")
            .arg(Arg::with_name("at").long("at").takes_value(true).help("Time of day (HH:MM) to show the board for, defaults to now"))
            .arg(Arg::with_name("all").long("all").help("Also list every departure of each stop")))
        .subcommand(SubCommand::with_name("add")
            .about("Adds a departure time to a stop")
            .arg(Arg::with_name("stop").help("Name of the stop").required(true))
            .arg(Arg::with_name("time").help("Departure time (HH:MM)").required(true)))
        .subcommand(SubCommand::with_name("remove")
            .about("Removes a departure time from a stop")
            .arg(Arg::with_name("stop").help("Name of the stop").required(true))
            .arg(Arg::with_name("time").help("Departure time (HH:MM)").required(true)))
        .subcommand(SubCommand::with_name("list")
            .about("Lists every departure of a stop")
            .arg(Arg::with_name("stop").help("Name of the stop").required(true)))
        .subcommand(SubCommand::with_name("watch")
            .about("Redraws the board periodically until Ctrl-C")
            .arg(Arg::with_name("interval").long("interval").takes_value(true).help("Seconds between refreshes, overrides BUS_REFRESH_SECS"))
            .arg(Arg::with_name("all").long("all").help("Also list every departure of each stop")))
        .get_matches();

    // Bad input is reported back to the user, everything else is a real failure
    if let Err(err) = run(&app).await {
        if err.is_rejection() {
            eprintln!("Rejected: {}", err);
            process::exit(2);
        }

        return Err(err.into());
    }

    Ok(())
}

async fn run(app: &ArgMatches<'_>) -> Result<(), ScheduleError> {
    let mut config = Config::from_env();
    if let Some(file) = app.value_of("file") {
        config.schedule_file = PathBuf::from(file);
    }

    let mut store = database::establish_storage(&config);

    match app.subcommand() {
        ("add", Some(sub_matches)) => add(&mut store, sub_matches),
        ("remove", Some(sub_matches)) => remove(&mut store, sub_matches),
        ("list", Some(sub_matches)) => list(&store, sub_matches),
        ("watch", Some(sub_matches)) => watch(&store, sub_matches, &config).await,
        ("board", sub_matches) => board(&store, sub_matches),
        _ => board(&store, None),
    }
}

fn board(store: &Store, matches: Option<&ArgMatches>) -> Result<(), ScheduleError> {
    let now = match matches.and_then(|m| m.value_of("at")) {
        Some(at) => FixedClock(at.parse()?).now(),
        None => LocalClock.now(),
    };
    let show_all = matches.map_or(false, |m| m.is_present("all"));

    let schedule = store.load()?;
    print!("{}", Board::new(&schedule, now, show_all));

    Ok(())
}

fn add(store: &mut Store, matches: &ArgMatches) -> Result<(), ScheduleError> {
    let stop = matches.value_of("stop").unwrap_or_default();
    let time: Minutes = matches.value_of("time").unwrap_or_default().parse()?;

    let mut schedule = store.load()?;
    if schedule.add_departure(stop, time)? {
        store.save(&schedule)?;
        info!("Added departure {} to {}", time, schedule.resolve_stop(stop)?);
    } else {
        println!("{} already has a departure at {}", schedule.resolve_stop(stop)?, time);
    }

    print!("{}", Board::new(&schedule, LocalClock.now(), false));
    Ok(())
}

fn remove(store: &mut Store, matches: &ArgMatches) -> Result<(), ScheduleError> {
    let stop = matches.value_of("stop").unwrap_or_default();
    let time: Minutes = matches.value_of("time").unwrap_or_default().parse()?;

    let mut schedule = store.load()?;
    if schedule.remove_departure(stop, time)? {
        store.save(&schedule)?;
        info!("Removed departure {} from {}", time, schedule.resolve_stop(stop)?);
    } else {
        println!("{} has no departure at {}", schedule.resolve_stop(stop)?, time);
    }

    print!("{}", Board::new(&schedule, LocalClock.now(), false));
    Ok(())
}

fn list(store: &Store, matches: &ArgMatches) -> Result<(), ScheduleError> {
    let schedule = store.load()?;
    let stop = schedule.resolve_stop(matches.value_of("stop").unwrap_or_default())?;
    let times = schedule.departures(stop)?;

    println!("{}", stop);
    if times.is_empty() {
        println!("  no departures");
    }
    for time in times {
        println!("  {}", time);
    }

    Ok(())
}

async fn watch(store: &Store, matches: &ArgMatches<'_>, config: &Config) -> Result<(), ScheduleError> {
    let period = match matches.value_of("interval") {
        Some(secs) => config::parse_refresh_secs(secs)?,
        None => config.refresh_interval()?,
    };

    refresh::watch(store, &LocalClock, period, matches.is_present("all")).await
}
