//! This module provides a way to persist task lists in a local file

use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::Task;
use crate::traits::TaskCollection;

/// Something that is able to load and store a task list
pub trait Storage {
    /// Append the stored tasks to `tasks`
    fn load(&self, tasks: &mut dyn TaskCollection) -> Result<(), Box<dyn Error>>;
    /// Replace the stored tasks with the content of `tasks`
    fn save(&self, tasks: &dyn TaskCollection) -> Result<(), Box<dyn Error>>;
}


/// A [`Storage`] that keeps tasks as a JSON array in a file
#[derive(Clone, Debug, PartialEq)]
pub struct JsonFileStorage {
    backing_file: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: &Path) -> Self {
        Self {
            backing_file: PathBuf::from(path),
        }
    }

    /// Get the path to the backing file
    pub fn backing_file(&self) -> &Path {
        &self.backing_file
    }
}

impl Storage for JsonFileStorage {
    /// A missing file is not an error: there is just nothing to load yet.
    /// Invalid tasks in the file abort the loading, `tasks` is left untouched in that case.
    fn load(&self, tasks: &mut dyn TaskCollection) -> Result<(), Box<dyn Error>> {
        let path = &self.backing_file;
        if path.exists() == false {
            log::info!("No task file at {:?} yet, nothing to load", path);
            return Ok(());
        }

        let file = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(f) => f,
        };
        let loaded: Vec<Task> = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|err| format!("Invalid task file {:?}: {}", path, err))?;

        log::info!("Loaded {} task(s) from {:?}", loaded.len(), path);
        for task in loaded {
            tasks.add(task);
        }
        Ok(())
    }

    fn save(&self, tasks: &dyn TaskCollection) -> Result<(), Box<dyn Error>> {
        let path = &self.backing_file;
        let file = match std::fs::File::create(path) {
            Err(err) => {
                return Err(format!("Unable to save file {:?}: {}", path, err).into());
            },
            Ok(f) => f,
        };

        let to_store: Vec<&Task> = tasks.iter().collect();
        let mut writer = std::io::BufWriter::new(file);
        serde_json::to_writer(&mut writer, &to_store)?;
        writer.flush()?;
        log::info!("Saved {} task(s) to {:?}", to_store.len(), path);
        Ok(())
    }
}
