//! Marker files which make sure that the report is posted once a day.

use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
};

use chrono::NaiveDate;

use crate::prelude::*;

pub struct Stamp {
    dir: PathBuf,
}

impl Stamp {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn exists(&self, date: NaiveDate) -> Result<bool> {
        let path = self.path(date);
        path.try_exists().with_context(|| format!("failed to check `{}`", path.display()))
    }

    /// Create the stamp, failing if it already exists.
    #[instrument(skip_all, fields(date = %date))]
    pub fn stamp(&self, date: NaiveDate) -> Result {
        let path = self.path(date);
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("failed to create `{}`", path.display()))?;
        info!(path = %path.display(), "stamped");
        Ok(())
    }

    /// Remove everything in the directory but the stamp of `keep`.
    ///
    /// Entries which cannot be removed are skipped.
    #[instrument(skip_all, fields(keep = %keep))]
    pub fn prune(&self, keep: NaiveDate) -> Result {
        let keep = file_name(keep);
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("failed to read `{}`", self.dir.display()))?;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!("failed to read the directory entry: {error:#}");
                    continue;
                }
            };
            if entry.file_name().to_str() == Some(keep.as_str()) {
                continue;
            }
            let path = entry.path();
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "removed"),
                Err(error) => warn!(path = %path.display(), "failed to remove the old stamp: {error:#}"),
            }
        }
        Ok(())
    }

    fn path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(file_name(date))
    }
}

fn file_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
