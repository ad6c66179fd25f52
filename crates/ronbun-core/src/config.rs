//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::DEFAULT_TIME_LIMIT_MINUTES;

/// Top-level ronbun configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RonbunConfig {
    /// Catalog file or directory used by `predict` and `search`.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Max essays scored concurrently in a batch.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Output directory for batch reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Time limit for predicted prompts when the department has no past
    /// prompts.
    #[serde(default = "default_time_limit_minutes")]
    pub default_time_limit_minutes: u32,
}

fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./ronbun-results")
}
fn default_time_limit_minutes() -> u32 {
    DEFAULT_TIME_LIMIT_MINUTES
}

impl Default for RonbunConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            parallelism: default_parallelism(),
            output_dir: default_output_dir(),
            default_time_limit_minutes: default_time_limit_minutes(),
        }
    }
}

/// Expand `${VAR_NAME}` references from the environment.
///
/// Unset variables expand to the empty string; an unterminated `${` is left
/// as-is.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `ronbun.toml` in the current directory
/// 2. `~/.config/ronbun/config.toml`
///
/// Environment variable overrides: `RONBUN_CATALOG`, `RONBUN_PARALLELISM`.
pub fn load_config() -> Result<RonbunConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<RonbunConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("ronbun.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => RonbunConfig::default(),
    };

    apply_env_overrides(&mut config)?;

    config.catalog = config
        .catalog
        .map(|p| PathBuf::from(resolve_env_vars(&p.to_string_lossy())));

    Ok(config)
}

/// Parse a TOML config document.
pub fn parse_config_str(content: &str) -> Result<RonbunConfig> {
    let config: RonbunConfig = toml::from_str(content)?;
    anyhow::ensure!(config.parallelism > 0, "parallelism must be at least 1");
    Ok(config)
}

fn apply_env_overrides(config: &mut RonbunConfig) -> Result<()> {
    if let Ok(catalog) = std::env::var("RONBUN_CATALOG") {
        config.catalog = Some(PathBuf::from(catalog));
    }

    if let Ok(value) = std::env::var("RONBUN_PARALLELISM") {
        let parallelism: usize = value
            .trim()
            .parse()
            .with_context(|| format!("RONBUN_PARALLELISM is not an integer: {value}"))?;
        anyhow::ensure!(parallelism > 0, "RONBUN_PARALLELISM must be at least 1");
        config.parallelism = parallelism;
    }

    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("ronbun"))
}
