//! Optional cabin features.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An optional cabin feature.
///
/// The declaration order is significant: the configuration optimiser maps the
/// bits of a candidate onto the features in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Config {
    /// Radiant heating panels.
    Radiant,
    /// Heated seat.
    Seat,
    /// Heated windshield.
    WindowHeating,
    /// Fresh-air / recirculation mode selector.
    NewAirMode,
    /// Smart vents.
    SmartVent,
}

impl Config {
    /// All features in declaration order.
    pub const ALL: [Config; 5] = [
        Config::Radiant,
        Config::Seat,
        Config::WindowHeating,
        Config::NewAirMode,
        Config::SmartVent,
    ];
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Config::Radiant => "radiant",
            Config::Seat => "seat",
            Config::WindowHeating => "windowheating",
            Config::NewAirMode => "newairmode",
            Config::SmartVent => "smartvent",
        };
        f.write_str(s)
    }
}

/// The set of features fitted to a cabin.
///
/// Fixed when an environment is built. Action dimensions of a missing feature
/// are forced to their neutral value whatever the policy emits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSet(BTreeSet<Config>);

impl ConfigSet {
    /// No optional feature.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Every optional feature.
    pub fn all() -> Self {
        Self(Config::ALL.iter().copied().collect())
    }

    /// Builds a set from a bit vector over [`Config::ALL`].
    ///
    /// Bit `i` equal to one enables the `i`-th feature. Features past the end of
    /// `bits` are left out.
    pub fn from_bits(bits: &[i64]) -> Self {
        Self(
            Config::ALL
                .iter()
                .zip(bits.iter())
                .filter(|(_, b)| **b == 1)
                .map(|(c, _)| *c)
                .collect(),
        )
    }

    /// Returns `true` if the feature is fitted.
    pub fn contains(&self, c: Config) -> bool {
        self.0.contains(&c)
    }

    /// Adds a feature.
    pub fn with(mut self, c: Config) -> Self {
        self.0.insert(c);
        self
    }

    /// Removes a feature.
    pub fn without(mut self, c: Config) -> Self {
        self.0.remove(&c);
        self
    }

    /// Iterates over fitted features in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Config> {
        self.0.iter()
    }
}

impl Default for ConfigSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Config> for ConfigSet {
    fn from_iter<I: IntoIterator<Item = Config>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bits() {
        let set = ConfigSet::from_bits(&[1, 0, 1, 0]);
        assert!(set.contains(Config::Radiant));
        assert!(!set.contains(Config::Seat));
        assert!(set.contains(Config::WindowHeating));
        assert!(!set.contains(Config::NewAirMode));
        assert!(!set.contains(Config::SmartVent));
    }

    #[test]
    fn test_serde_yaml() {
        let set = ConfigSet::all().without(Config::Seat);
        let yaml = serde_yaml::to_string(&set).unwrap();
        let set2: ConfigSet = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(set, set2);
        assert!(yaml.contains("radiant"));
    }
}
