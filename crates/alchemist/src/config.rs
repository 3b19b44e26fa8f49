//! Library configuration.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AlchemistError, Result};
use crate::input::{Parser, ParserConfig};
use crate::llm::{AiGateway, AnthropicProvider, GeminiProvider, LlmConfig, MockProvider};
use crate::schema::EntityKind;
use crate::session::AppState;

/// Which AI gateway to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderChoice {
    /// No gateway; AI features report themselves unavailable.
    #[default]
    None,
    /// Offline heuristics.
    Mock,
    /// Google Gemini (requires GEMINI_API_KEY).
    Gemini,
    /// Anthropic Claude (requires ANTHROPIC_API_KEY).
    Anthropic,
}

impl FromStr for ProviderChoice {
    type Err = AlchemistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "off" => Ok(ProviderChoice::None),
            "mock" | "test" => Ok(ProviderChoice::Mock),
            "gemini" | "google" => Ok(ProviderChoice::Gemini),
            "anthropic" | "claude" => Ok(ProviderChoice::Anthropic),
            _ => Err(AlchemistError::Config(format!(
                "Unknown provider: {}. Use: none, mock, gemini, or anthropic.",
                s
            ))),
        }
    }
}

impl fmt::Display for ProviderChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderChoice::None => write!(f, "none"),
            ProviderChoice::Mock => write!(f, "mock"),
            ProviderChoice::Gemini => write!(f, "gemini"),
            ProviderChoice::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// Configuration for an Alchemist session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlchemistConfig {
    /// CSV parser configuration.
    pub parser: ParserConfig,
    /// AI gateway settings.
    pub llm: LlmConfig,
    /// AI gateway selection.
    pub provider: ProviderChoice,
    /// Where exports are written (None = current directory).
    pub export_dir: Option<PathBuf>,
    /// Directory with `clients.csv`, `workers.csv`, `tasks.csv` to start
    /// from instead of the bundled samples.
    pub samples_dir: Option<PathBuf>,
}

impl AlchemistConfig {
    /// Defaults overridden by `ALCHEMIST_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(provider) = lookup("ALCHEMIST_PROVIDER") {
            self.provider = provider.parse()?;
        }
        if let Some(model) = lookup("ALCHEMIST_MODEL") {
            self.llm.model = Some(model);
        }
        if let Some(dir) = lookup("ALCHEMIST_EXPORT_DIR") {
            self.export_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = lookup("ALCHEMIST_SAMPLES_DIR") {
            self.samples_dir = Some(PathBuf::from(dir));
        }
        Ok(self)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| AlchemistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text)
            .map_err(|e| AlchemistError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, serde_json::to_string_pretty(self)?).map_err(|source| {
            AlchemistError::Io {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Parser built from this configuration.
    pub fn parser(&self) -> Parser {
        Parser::with_config(self.parser.clone())
    }

    /// Directory exports go to.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Build the configured gateway, `None` when AI is switched off.
    pub fn build_gateway(&self) -> Result<Option<Arc<dyn AiGateway>>> {
        let gateway: Arc<dyn AiGateway> = match self.provider {
            ProviderChoice::None => return Ok(None),
            ProviderChoice::Mock => Arc::new(MockProvider::with_config(self.llm.clone())),
            ProviderChoice::Gemini => Arc::new(GeminiProvider::from_env(self.llm.clone())?),
            ProviderChoice::Anthropic => Arc::new(AnthropicProvider::from_env(self.llm.clone())?),
        };
        tracing::info!(gateway = gateway.name(), "AI gateway ready");
        Ok(Some(gateway))
    }

    /// Initial session state: the samples directory if configured, otherwise
    /// the bundled samples. Missing files in the directory leave that table
    /// empty.
    pub fn initial_state(&self) -> Result<AppState> {
        let Some(dir) = &self.samples_dir else {
            return AppState::with_samples();
        };

        let parser = self.parser();
        let mut state = AppState::default();
        for entity in EntityKind::ALL {
            let path = dir.join(entity.sample_file_name());
            if path.exists() {
                state.import_path(&parser, entity, &path)?;
            } else {
                tracing::warn!(path = %path.display(), "sample file not found");
            }
        }
        Ok(state)
    }
}
