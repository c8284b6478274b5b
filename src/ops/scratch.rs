use crate::ops::error::Error;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Private file namespace of one worker.
///
/// Every path is derived from the worker id, so concurrent workers never touch each other's
/// intermediate files. The directory holds the structure handed to the detector, the
/// detector's outputs, and the worker's partial record file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchSpace {
    worker: usize,
    dir: PathBuf,
}

impl ScratchSpace {
    /// Directory name used for `worker` under a scratch root.
    pub fn dir_name(worker: usize) -> String {
        format!("worker_{worker}")
    }

    /// Creates (or reuses) the worker directory below `root`.
    pub fn create(root: &Path, worker: usize) -> Result<Self, Error> {
        let dir = root.join(Self::dir_name(worker));
        fs::create_dir_all(&dir).map_err(|e| Error::scratch(&dir, e))?;
        Ok(Self { worker, dir })
    }

    /// Refers to a worker directory created earlier, without touching the filesystem.
    pub fn existing(root: &Path, worker: usize) -> Self {
        Self {
            worker,
            dir: root.join(Self::dir_name(worker)),
        }
    }

    pub fn worker(&self) -> usize {
        self.worker
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Structure file handed to the detector.
    pub fn structure_path(&self) -> PathBuf {
        self.dir.join(format!("unit_{}.pdb", self.worker))
    }

    /// Partial output of this worker, merged by the driver after the join.
    pub fn records_path(&self) -> PathBuf {
        self.dir.join(format!("records_{}.txt", self.worker))
    }

    /// Replaces the scratch structure file with `payload`.
    pub fn write_structure(&self, payload: &str) -> Result<PathBuf, Error> {
        let path = self.structure_path();
        let mut file = File::create(&path).map_err(|e| Error::scratch(&path, e))?;
        file.write_all(payload.as_bytes())
            .map_err(|e| Error::scratch(&path, e))?;
        Ok(path)
    }

    /// Deletes the worker directory and everything in it.
    pub fn remove(self) -> Result<(), Error> {
        fs::remove_dir_all(&self.dir).map_err(|e| Error::scratch(&self.dir, e))
    }
}
