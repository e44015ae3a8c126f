use crate::Cli;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_API_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// Final resolved configuration for prpolish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` means drafting runs on heuristics only.
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub timeout: Duration,
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags (`--model`, `--api-key`, ...; `OPENAI_API_KEY` arrives through `--api-key`)
    ///   2. Env var `PRPOLISH_MODEL`
    ///   3. TOML `~/.config/prpolish.toml`
    ///   4. Hardcoded defaults
    pub fn from_sources(cli: &Cli) -> Self {
        let file_cfg = load_file_config().unwrap_or_default();
        let model_env = env::var("PRPOLISH_MODEL").ok();
        Self::resolve(cli, model_env, file_cfg)
    }

    fn resolve(cli: &Cli, model_env: Option<String>, file_cfg: FileConfig) -> Self {
        let model = cli
            .model
            .clone()
            .or(model_env)
            .or(file_cfg.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let disabled = cli.no_model || model.eq_ignore_ascii_case("none");
        let api_key = if disabled {
            None
        } else {
            cli.api_key
                .clone()
                .or(file_cfg.openai_api_key)
                .filter(|k| !k.trim().is_empty())
        };

        let api_base_url = cli
            .api_base_url
            .clone()
            .or(file_cfg.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let timeout_secs = cli
            .timeout
            .or(file_cfg.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Config {
            api_key,
            model,
            api_base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    /// Default model to use when not provided via CLI or env.
    pub model: Option<String>,
    pub openai_api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Return `~/.config/prpolish.toml`
fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("prpolish.toml"))
}

fn load_file_config() -> Option<FileConfig> {
    let path = config_path()?;
    if !path.exists() {
        return None;
    }

    let data = fs::read_to_string(&path).ok()?;
    match toml::from_str::<FileConfig>(&data) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            log::warn!("Ignoring unparsable config {}: {e}", path.display());
            None
        }
    }
}
