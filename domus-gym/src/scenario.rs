//! Drive-cycle scenarios.
use anyhow::{Context, Result};
use domus_core::error::DomusError;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, io::Read, path::Path};

/// Number of scenarios in the evaluation catalogue, with ids `1..=N_UCS`.
pub const N_UCS: usize = 28;

const BUNDLED: &str = include_str!("../data/scenarios.csv");

/// One drive-cycle record.
///
/// Temperatures are in Kelvin, relative humidities in `[0, 1]`, solar loads in
/// W/m² and the car speed in km/h. `time` is the duration in minutes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario id.
    pub id: usize,
    /// Duration in minutes.
    pub time: f32,
    /// Ambient temperature.
    pub ambient_t: f32,
    /// Ambient relative humidity.
    pub ambient_rh: f32,
    /// Initial cabin temperature.
    pub cabin_t: f32,
    /// Initial cabin air velocity.
    pub cabin_v: f32,
    /// Initial cabin relative humidity.
    pub cabin_rh: f32,
    /// Solar load through the windshield.
    pub solar1: f32,
    /// Solar load through the side windows.
    pub solar2: f32,
    /// Vehicle speed.
    pub car_speed: f32,
}

impl Scenario {
    /// Number of one-second steps covering the scenario.
    pub fn episode_length(&self) -> usize {
        (self.time * 60.0).round().max(0.0) as usize
    }
}

/// Read-only table of scenarios indexed by id.
#[derive(Clone, Debug)]
pub struct ScenarioTable {
    rows: BTreeMap<usize, Scenario>,
}

impl ScenarioTable {
    /// The table shipped with the crate (ids `1..=30`).
    pub fn bundled() -> Result<Self> {
        Self::from_reader(BUNDLED.as_bytes())
    }

    /// Loads a table from a CSV file with a header row.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open scenario table {:?}", path))?;
        Self::from_reader(file)
    }

    /// Loads a table from CSV data with a header row.
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(rdr);
        let mut rows = BTreeMap::new();
        for row in rdr.deserialize() {
            let sc: Scenario = row?;
            rows.insert(sc.id, sc);
        }
        Ok(Self { rows })
    }

    /// Returns the scenario with the given id.
    pub fn get(&self, id: usize) -> Result<&Scenario> {
        self.rows
            .get(&id)
            .ok_or_else(|| DomusError::UnknownScenario(id).into())
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.keys().copied()
    }

    /// Iterates over scenarios in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.rows.values()
    }

    /// Number of scenarios.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of the durations of all scenarios in the table, in minutes.
    pub fn total_time(&self) -> f32 {
        self.rows.values().map(|sc| sc.time).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_table() {
        let table = ScenarioTable::bundled().unwrap();
        assert_eq!(table.len(), 30);
        assert!((1..=N_UCS).all(|id| table.get(id).is_ok()));
        let sc = table.get(30).unwrap();
        assert_eq!(sc.episode_length(), 1200);
        assert!(table.get(31).is_err());
    }

    #[test]
    fn test_from_reader() {
        let data = "id,time,ambient_t,ambient_rh,cabin_t,cabin_v,cabin_rh,solar1,solar2,car_speed\n\
                    7,1.5,273.15,0.5,280.0,0.0,0.4,0,0,50\n";
        let table = ScenarioTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.ids().collect::<Vec<_>>(), vec![7]);
        assert_eq!(table.get(7).unwrap().episode_length(), 90);
        assert_eq!(table.total_time(), 1.5);
    }
}
