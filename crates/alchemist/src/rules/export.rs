//! The `rules.json` export document.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::rule::Rule;
use super::weights::Weights;
use crate::error::{AlchemistError, Result};

/// Default export file name.
pub const RULES_FILE_NAME: &str = "rules.json";

/// Rules plus weights, as written to `rules.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesExport {
    pub rules: Vec<Rule>,
    pub weights: Weights,
}

impl RulesExport {
    pub fn new(rules: impl IntoIterator<Item = Rule>, weights: Weights) -> Self {
        Self {
            rules: rules.into_iter().collect(),
            weights,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let io_err = |source| AlchemistError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_json_pretty()?).map_err(io_err)?;

        tracing::debug!(path = %path.display(), rules = self.rules.len(), "exported rules");
        Ok(())
    }

    /// Read a previously saved document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| AlchemistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let export: RulesExport = serde_json::from_str(&text)?;
        export.weights.validate()?;
        Ok(export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{KnownRule, WeightPreset};
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_document_shape() {
        let export = RulesExport::new(
            [Rule::Known(KnownRule::CoRun {
                tasks: vec!["T1".into(), "T2".into()],
            })],
            WeightPreset::MaximizeFulfillment.weights(),
        );
        let value: serde_json::Value = serde_json::from_str(&export.to_json_pretty().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "rules": [{"type": "coRun", "tasks": ["T1", "T2"]}],
                "weights": {"priorityLevel": 10, "requestedTaskIDs": 3, "fairness": 5, "workload": 2}
            })
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join(RULES_FILE_NAME);
        let export = RulesExport::new(
            [Rule::Opaque(json!({"type": "precedence", "first": "T1"}))],
            Weights::default(),
        );
        export.save(&path).unwrap();
        assert_eq!(RulesExport::load(&path).unwrap(), export);
    }
}
