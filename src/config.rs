use std::{env, path::PathBuf, time::Duration};

use crate::error::ScheduleError;

pub const DEFAULT_SCHEDULE_FILE: &str = "bus_schedule.json";
pub const DEFAULT_REFRESH_SECS: u64 = 60;
pub const DEFAULT_STOPS: &[&str] = &["Lehmja", "Tornimäe"];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub schedule_file: PathBuf,
    /// Raw BUS_REFRESH_SECS, only validated by commands that refresh
    pub refresh_secs: Option<String>,
    pub default_stops: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            schedule_file: PathBuf::from(DEFAULT_SCHEDULE_FILE),
            refresh_secs: None,
            default_stops: DEFAULT_STOPS.iter().map(|stop| stop.to_string()).collect(),
        }
    }
}

impl Config {
    /// Reads BUS_SCHEDULE_FILE, BUS_REFRESH_SECS and BUS_STOPS, falling back to defaults
    pub fn from_env() -> Config {
        Config::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Config {
        let mut config = Config::default();

        if let Some(file) = var("BUS_SCHEDULE_FILE") {
            config.schedule_file = PathBuf::from(file);
        }

        config.refresh_secs = var("BUS_REFRESH_SECS");

        if let Some(stops) = var("BUS_STOPS") {
            config.default_stops = stops.split(',')
                .map(str::trim)
                .filter(|stop| !stop.is_empty())
                .map(str::to_string)
                .collect();
        }

        config
    }

    pub fn refresh_interval(&self) -> Result<Duration, ScheduleError> {
        match &self.refresh_secs {
            Some(secs) => parse_refresh_secs(secs),
            None => Ok(Duration::from_secs(DEFAULT_REFRESH_SECS)),
        }
    }
}

pub fn parse_refresh_secs(secs: &str) -> Result<Duration, ScheduleError> {
    match secs.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ScheduleError::ConfigError(format!("refresh interval must be a positive number of seconds, got '{}'", secs))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]);

        assert_eq!(config, Config::default());
        assert_eq!(config.schedule_file, PathBuf::from("bus_schedule.json"));
        assert_eq!(config.refresh_interval().unwrap(), Duration::from_secs(60));
        assert_eq!(config.default_stops, vec!["Lehmja", "Tornimäe"]);
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("BUS_SCHEDULE_FILE", "/tmp/buses.json"),
            ("BUS_REFRESH_SECS", "15"),
            ("BUS_STOPS", "Harku, Tabasalu,,"),
        ]);

        assert_eq!(config.schedule_file, PathBuf::from("/tmp/buses.json"));
        assert_eq!(config.refresh_interval().unwrap(), Duration::from_secs(15));
        assert_eq!(config.default_stops, vec!["Harku", "Tabasalu"]);
    }

    #[test]
    fn bad_refresh_interval_only_fails_when_used() {
        for secs in &["0", "soon", "-5"] {
            let config = config_from(&[("BUS_SCHEDULE_FILE", "/tmp/buses.json"), ("BUS_REFRESH_SECS", secs)]);

            assert_eq!(config.schedule_file, PathBuf::from("/tmp/buses.json"));
            assert!(matches!(config.refresh_interval(), Err(ScheduleError::ConfigError(_))));
        }
    }
}
