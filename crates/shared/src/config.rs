use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use url::Url;

use crate::hn::DEFAULT_API_BASE;
use crate::io::{default_summary_path, PreviewCommand};
use crate::summarizer::{DEFAULT_MODEL, DEFAULT_PROGRAM};

const APP_DIR: &str = "hn-summarize";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: Url,
    pub model: String,
    pub llm_command: String,
    pub preview: PreviewCommand,
    pub summary_path: PathBuf,
}

impl Config {
    /// Build the config from the environment; every setting is optional
    pub fn from_env() -> Result<Self> {
        Self::try_load_dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base = var("HN_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base = Url::parse(&api_base)
            .with_context(|| format!("HN_API_BASE is not a valid URL: {}", api_base))?;

        let preview = var("HN_PREVIEW_COMMAND")
            .and_then(|cmd| PreviewCommand::parse(&cmd))
            .unwrap_or_else(PreviewCommand::platform_default);

        Ok(Self {
            api_base,
            model: var("HN_SUMMARY_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_command: var("HN_LLM_COMMAND").unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
            preview,
            summary_path: var("HN_SUMMARY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_summary_path),
        })
    }

    /// `.env` files checked in order; the first one that loads wins
    pub fn dotenv_candidates() -> Vec<PathBuf> {
        let mut candidates = vec![PathBuf::from(".env")];
        candidates.extend(dirs::config_dir().map(|dir| dir.join(APP_DIR).join(".env")));
        candidates.extend(dirs::home_dir().map(|dir| dir.join(".env")));
        candidates
    }

    fn try_load_dotenv() {
        // Nothing found is fine: the variables may be set in the shell
        let loaded = Self::dotenv_candidates()
            .into_iter()
            .find(|path| path.is_file() && dotenvy::from_path(path).is_ok());
        if let Some(path) = loaded {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
    }
}
