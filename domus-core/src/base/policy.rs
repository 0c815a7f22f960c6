//! Controllers and their configuration.
use super::Env;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::{fs::File, io::BufReader, path::Path};

/// A controller of an environment.
///
/// Given the latest observation of the cabin it chooses the next action. A
/// policy in training mode may explore, so the mapping is not required to be
/// deterministic.
pub trait Policy<E: Env> {
    /// Chooses the action for `obs`.
    fn sample(&mut self, obs: &E::Obs) -> E::Act;
}

/// Objects built from a serialisable configuration.
pub trait Configurable: Sized {
    /// Configuration of the object.
    type Config: Clone + DeserializeOwned;

    /// Builds the object from `config`.
    fn build(config: Self::Config) -> Self;

    /// Reads the configuration from the YAML file at `path` and builds the object.
    fn build_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("failed to open {:?}", path))?;
        let config = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(Self::build(config))
    }
}
