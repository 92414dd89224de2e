pub mod file;

#[cfg(test)]
use std::collections::HashMap;

use itertools::Itertools;

use crate::{config::Config, error::ScheduleError, types::Schedule};

pub use file::JsonFileStorage;

/// Key the whole schedule record is stored under
pub const STORAGE_KEY: &str = "busSchedule";

/// Minimal key-value store with string values, the way browser local storage behaves
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, ScheduleError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), ScheduleError>;
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ScheduleError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), ScheduleError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Loads and saves the schedule through any `Storage`
#[derive(Debug)]
pub struct ScheduleStore<S: Storage> {
    storage: S,
    default_stops: Vec<String>,
}

impl<S: Storage> ScheduleStore<S> {
    pub fn new(storage: S, default_stops: Vec<String>) -> Self {
        ScheduleStore { storage, default_stops }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reads the stored schedule, or an empty one holding only the default stops.
    /// Default stops missing from stored data are added with no departures.
    pub fn load(&self) -> Result<Schedule, ScheduleError> {
        let mut schedule = match self.storage.get(STORAGE_KEY)? {
            Some(record) => serde_json::from_str::<Schedule>(&record)?,
            None => {
                info!("No stored schedule found, starting with {} empty stops", self.default_stops.len());
                Schedule::with_stops(self.default_stops.clone())
            }
        };

        for stop in &self.default_stops {
            if schedule.ensure_stop(stop) {
                debug!("Added default stop {}", stop);
            }
        }

        debug!("Loaded schedule for {}", schedule.stops().join(", "));
        Ok(schedule)
    }

    pub fn save(&mut self, schedule: &Schedule) -> Result<(), ScheduleError> {
        let record = serde_json::to_string(schedule)?;
        self.storage.set(STORAGE_KEY, record)?;

        debug!("Saved schedule with {} stops under {}", schedule.len(), STORAGE_KEY);
        Ok(())
    }
}

pub fn establish_storage(config: &Config) -> ScheduleStore<JsonFileStorage> {
    let store = ScheduleStore::new(JsonFileStorage::new(&config.schedule_file), config.default_stops.clone());
    debug!("Using schedule file {}", store.storage().path().display());
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_time;

    fn store() -> ScheduleStore<MemoryStorage> {
        ScheduleStore::new(MemoryStorage::default(), vec!["Lehmja".to_string(), "Tornimäe".to_string()])
    }

    #[test]
    fn load_defaults_when_empty() {
        let schedule = store().load().unwrap();

        assert_eq!(schedule.stops().collect::<Vec<_>>(), vec!["Lehmja", "Tornimäe"]);
        assert!(schedule.departures("Lehmja").unwrap().is_empty());
        assert!(schedule.departures("Tornimäe").unwrap().is_empty());
    }

    #[test]
    fn save_then_load() {
        let mut store = store();
        let mut schedule = store.load().unwrap();
        schedule.add_departure("Lehmja", parse_time("08:15").unwrap()).unwrap();
        schedule.add_departure("Tornimäe", parse_time("17:40").unwrap()).unwrap();

        store.save(&schedule).unwrap();

        assert_eq!(store.load().unwrap(), schedule);
    }

    #[test]
    fn record_format() {
        let mut store = store();
        let mut schedule = store.load().unwrap();
        schedule.add_departure("Lehmja", parse_time("18:00").unwrap()).unwrap();
        schedule.add_departure("Lehmja", parse_time("08:00").unwrap()).unwrap();
        store.save(&schedule).unwrap();

        let record = store.storage().get(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(record, r#"{"Lehmja":["08:00","18:00"],"Tornimäe":[]}"#);
    }

    #[test]
    fn load_merges_default_stops() {
        let mut storage = MemoryStorage::default();
        storage.set(STORAGE_KEY, r#"{"Lehmja":["07:30","7:30","bogus"],"Harku":["12:00"]}"#.to_string()).unwrap();
        let store = ScheduleStore::new(storage, vec!["Lehmja".to_string(), "Tornimäe".to_string()]);

        let schedule = store.load().unwrap();

        assert_eq!(schedule.stops().collect::<Vec<_>>(), vec!["Harku", "Lehmja", "Tornimäe"]);
        assert_eq!(schedule.to_raw()["Lehmja"], vec!["07:30".to_string()]);
    }

    #[test]
    fn load_rejects_broken_record() {
        let mut storage = MemoryStorage::default();
        storage.set(STORAGE_KEY, "{not json".to_string()).unwrap();
        let store = ScheduleStore::new(storage, vec![]);

        assert!(matches!(store.load(), Err(ScheduleError::SerializationError(_))));
    }
}
