use std::{collections::BTreeMap, fs, io, path::{Path, PathBuf}};

use crate::error::ScheduleError;

use super::Storage;

/// Keeps every key in a single JSON object on disk
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path the next version is written to before it replaces the file
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, ScheduleError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ScheduleError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), ScheduleError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write next to the target and rename over it
        let tmp = self.temp_path();
        fs::write(&tmp, serde_json::to_string_pretty(&values)?)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("bus-departures-{}-{}", std::process::id(), name)).join("schedule.json");
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn missing_file_is_empty() {
        let storage = JsonFileStorage::new(temp_path("missing"));
        assert_eq!(storage.get("busSchedule").unwrap(), None);
    }

    #[test]
    fn set_keeps_other_keys() {
        let path = temp_path("keys");
        let mut storage = JsonFileStorage::new(&path);

        storage.set("theme", "dark".to_string()).unwrap();
        storage.set("busSchedule", "{}".to_string()).unwrap();
        storage.set("busSchedule", r#"{"Lehmja":[]}"#.to_string()).unwrap();

        let reopened = JsonFileStorage::new(&path);
        assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(reopened.get("busSchedule").unwrap().as_deref(), Some(r#"{"Lehmja":[]}"#));
        assert!(!path.with_file_name("schedule.json.tmp").exists());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn tmp_named_file_is_not_its_own_temp_file() {
        let path = temp_path("tmp-name").with_file_name("schedule.tmp");
        let _ = fs::remove_file(&path);
        let mut storage = JsonFileStorage::new(&path);

        assert_eq!(storage.temp_path(), path.with_file_name("schedule.tmp.tmp"));

        storage.set("busSchedule", "{}".to_string()).unwrap();
        storage.set("theme", "light".to_string()).unwrap();

        let reopened = JsonFileStorage::new(&path);
        assert_eq!(reopened.get("busSchedule").unwrap().as_deref(), Some("{}"));
        assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("light"));
        assert!(!storage.temp_path().exists());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[1, 2").unwrap();

        let storage = JsonFileStorage::new(&path);
        assert!(matches!(storage.get("busSchedule"), Err(ScheduleError::SerializationError(_))));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
