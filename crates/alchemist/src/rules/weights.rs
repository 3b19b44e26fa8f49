//! Prioritization weights and presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AlchemistError, Result};

/// Lowest accepted weight.
pub const MIN_WEIGHT: u8 = 1;
/// Highest accepted weight.
pub const MAX_WEIGHT: u8 = 10;

/// Relative importance of the four scheduling criteria, each 1-10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weights {
    pub priority_level: u8,
    #[serde(rename = "requestedTaskIDs")]
    pub requested_task_ids: u8,
    pub fairness: u8,
    pub workload: u8,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            priority_level: MIN_WEIGHT,
            requested_task_ids: MIN_WEIGHT,
            fairness: MIN_WEIGHT,
            workload: MIN_WEIGHT,
        }
    }
}

impl Weights {
    /// Weight names as they appear in JSON.
    pub const NAMES: [&'static str; 4] = ["priorityLevel", "requestedTaskIDs", "fairness", "workload"];

    /// Build weights, rejecting any value outside 1-10.
    pub fn new(priority_level: u8, requested_task_ids: u8, fairness: u8, workload: u8) -> Result<Self> {
        let weights = Self {
            priority_level,
            requested_task_ids,
            fairness,
            workload,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Check every weight is within range.
    pub fn validate(&self) -> Result<()> {
        for name in Self::NAMES {
            if let Some(value) = self.get(name) {
                check_range(name, i64::from(value))?;
            }
        }
        Ok(())
    }

    /// Look up a weight by JSON name.
    pub fn get(&self, name: &str) -> Option<u8> {
        match name {
            "priorityLevel" => Some(self.priority_level),
            "requestedTaskIDs" => Some(self.requested_task_ids),
            "fairness" => Some(self.fairness),
            "workload" => Some(self.workload),
            _ => None,
        }
    }

    /// Set one weight by JSON name.
    pub fn set(&mut self, name: &str, value: i64) -> Result<()> {
        let value = check_range(name, value)?;
        let slot = match name {
            "priorityLevel" => &mut self.priority_level,
            "requestedTaskIDs" => &mut self.requested_task_ids,
            "fairness" => &mut self.fairness,
            "workload" => &mut self.workload,
            other => {
                return Err(AlchemistError::InvalidWeight(format!(
                    "unknown weight '{}'",
                    other
                )));
            }
        };
        *slot = value;
        Ok(())
    }
}

fn check_range(name: &str, value: i64) -> Result<u8> {
    if (i64::from(MIN_WEIGHT)..=i64::from(MAX_WEIGHT)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(AlchemistError::InvalidWeight(format!(
            "{} must be between {} and {}, got {}",
            name, MIN_WEIGHT, MAX_WEIGHT, value
        )))
    }
}

/// Named weight profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightPreset {
    MaximizeFulfillment,
    FairDistribution,
    MinimizeWorkload,
}

impl WeightPreset {
    pub const ALL: [WeightPreset; 3] = [
        WeightPreset::MaximizeFulfillment,
        WeightPreset::FairDistribution,
        WeightPreset::MinimizeWorkload,
    ];

    /// The weights this preset sets.
    pub fn weights(&self) -> Weights {
        let (priority_level, requested_task_ids, fairness, workload) = match self {
            WeightPreset::MaximizeFulfillment => (10, 3, 5, 2),
            WeightPreset::FairDistribution => (3, 10, 4, 2),
            WeightPreset::MinimizeWorkload => (2, 2, 4, 10),
        };
        Weights {
            priority_level,
            requested_task_ids,
            fairness,
            workload,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightPreset::MaximizeFulfillment => "MaximizeFulfillment",
            WeightPreset::FairDistribution => "FairDistribution",
            WeightPreset::MinimizeWorkload => "MinimizeWorkload",
        }
    }
}

impl fmt::Display for WeightPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightPreset {
    type Err = AlchemistError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| AlchemistError::InvalidWeight(format!("unknown preset '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_one() {
        let w = Weights::default();
        assert_eq!((w.priority_level, w.requested_task_ids, w.fairness, w.workload), (1, 1, 1, 1));
    }

    #[test]
    fn test_json_names() {
        let json = serde_json::to_value(WeightPreset::FairDistribution.weights()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"priorityLevel": 3, "requestedTaskIDs": 10, "fairness": 4, "workload": 2})
        );
    }

    #[test]
    fn test_set_range_checked() {
        let mut w = Weights::default();
        w.set("fairness", 7).unwrap();
        assert_eq!(w.fairness, 7);
        assert!(w.set("fairness", 0).is_err());
        assert!(w.set("fairness", 11).is_err());
        assert!(w.set("speed", 5).is_err());
        assert_eq!(w.fairness, 7);
    }

    #[test]
    fn test_presets() {
        assert_eq!(WeightPreset::MaximizeFulfillment.weights(), Weights::new(10, 3, 5, 2).unwrap());
        assert_eq!(WeightPreset::MinimizeWorkload.weights(), Weights::new(2, 2, 4, 10).unwrap());
        assert_eq!("minimize-workload".parse::<WeightPreset>().unwrap(), WeightPreset::MinimizeWorkload);
        assert_eq!("FairDistribution".parse::<WeightPreset>().unwrap(), WeightPreset::FairDistribution);
        assert!("fastest".parse::<WeightPreset>().is_err());
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(Weights::new(0, 1, 1, 1).is_err());
        assert!(Weights::new(1, 1, 1, 11).is_err());
    }
}
