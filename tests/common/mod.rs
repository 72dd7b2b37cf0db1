//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{Duration, Local, NaiveDateTime, Timelike};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary base directory populated with run folders
pub struct RunFixture {
    pub temp_dir: TempDir,
    pub now: NaiveDateTime,
}

impl RunFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
            // Whole seconds, so IDs round-trip exactly
            now: Local::now().naive_local().with_nanosecond(0).unwrap(),
        }
    }

    pub fn base(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Run ID for a run created `age` before the fixture's clock
    pub fn id_aged(&self, age: Duration) -> String {
        (self.now - age).format("%Y%m%d_%H%M%S").to_string()
    }

    /// Create a run directory holding `bytes` of data
    pub fn create_run(&self, id: &str, bytes: usize) -> PathBuf {
        let dir = self.base().join(format!("run_{}", id));
        fs::create_dir_all(dir.join("index")).unwrap();
        fs::write(dir.join("chroma.sqlite3"), vec![0u8; bytes]).unwrap();
        dir
    }

    pub fn create_run_aged(&self, age: Duration, bytes: usize) -> String {
        let id = self.id_aged(age);
        self.create_run(&id, bytes);
        id
    }

    pub fn run_exists(&self, id: &str) -> bool {
        self.base().join(format!("run_{}", id)).is_dir()
    }
}
