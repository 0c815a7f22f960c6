//! Persistence of optimisation results.
use crate::OptimizeResult;
use anyhow::{Context, Result};
use domus_core::error::DomusError;
use log::debug;
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Writes a result to `path` with `bincode`.
///
/// The data is written to a sibling temporary file first and renamed into
/// place, so `path` always holds a complete result.
pub fn dump(res: &OptimizeResult, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    {
        let mut wtr = BufWriter::new(File::create(&tmp)?);
        bincode::serialize_into(&mut wtr, res)?;
        wtr.flush()?;
    }
    fs::rename(&tmp, path).with_context(|| format!("failed to write {:?}", path))?;
    debug!("Dumped {} evaluations to {:?}", res.len(), path);
    Ok(())
}

/// Reads a result written by [`dump`].
///
/// A missing file is a [`DomusError::MissingArtifact`].
pub fn load(path: impl AsRef<Path>) -> Result<OptimizeResult> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DomusError::MissingArtifact(path.display().to_string()).into());
    }
    let rdr = BufReader::new(File::open(path)?);
    let res = bincode::deserialize_from(rdr)
        .with_context(|| format!("failed to read checkpoint {:?}", path))?;
    Ok(res)
}

/// Dumps the running result after every evaluation.
pub struct CheckpointSaver {
    path: PathBuf,
}

impl CheckpointSaver {
    /// Constructs the saver.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The checkpoint file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the checkpoint with `res`.
    pub fn save(&self, res: &OptimizeResult) -> Result<()> {
        dump(res, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_dump_and_load() -> Result<()> {
        let dir = TempDir::new("domus_checkpoint")?;
        let saver = CheckpointSaver::new(dir.path().join("checkpoint.bin"));
        let mut res = OptimizeResult::default();
        res.push(vec![0, 1, 0, 1], 0.25);
        saver.save(&res)?;
        res.push(vec![1, 1, 0, 1], 0.125);
        saver.save(&res)?;

        assert_eq!(load(saver.path())?, res);
        assert!(!dir.path().join("checkpoint.bin.tmp").exists());
        Ok(())
    }

    #[test]
    fn test_missing_checkpoint() {
        let err = load("/nonexistent/checkpoint.bin").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomusError>(),
            Some(DomusError::MissingArtifact(_))
        ));
    }
}
