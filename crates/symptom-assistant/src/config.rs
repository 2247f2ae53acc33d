use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::AppError;

const DEFAULT_CATALOG_PATH: &str = "Health_dataset.csv";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Which matching steps run before the fallback responder is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Substring match only.
    #[default]
    Exact,
    /// Substring match, then embedding similarity.
    Semantic,
}

impl FromStr for MatchMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "semantic" => Ok(Self::Semantic),
            other => Err(AppError::Config(format!(
                "SYMPTOM_MATCH_MODE must be 'exact' or 'semantic', got '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => f.write_str("exact"),
            Self::Semantic => f.write_str("semantic"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_path: String,
    pub match_mode: MatchMode,
    pub model: String,
}

impl Config {
    /// Optional:
    /// - `SYMPTOM_CATALOG_PATH` (default: "Health_dataset.csv"; the file must exist)
    /// - `SYMPTOM_MATCH_MODE` (default: "exact")
    /// - `OPENAI_MODEL` (default: "gpt-3.5-turbo")
    ///
    /// LLM endpoint settings are read separately by `OpenAiClientConfig::from_env`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with variables resolved through `var`.
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let catalog_path =
            var("SYMPTOM_CATALOG_PATH").unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string());

        let match_mode = match var("SYMPTOM_MATCH_MODE") {
            Some(raw) => raw.parse()?,
            None => MatchMode::default(),
        };

        let model = var("OPENAI_MODEL")
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        if !Path::new(&catalog_path).is_file() {
            return Err(AppError::Config(format!(
                "catalog file not found: {catalog_path} (set SYMPTOM_CATALOG_PATH)"
            )));
        }

        Ok(Self {
            catalog_path,
            match_mode,
            model,
        })
    }

    pub fn catalog_file_path(&self) -> PathBuf {
        Path::new(&self.catalog_path).to_path_buf()
    }
}
