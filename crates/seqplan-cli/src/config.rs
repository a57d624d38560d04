//! Configuration file management for seqplan.
//!
//! Provides a TOML-based config file at `~/.config/seqplan/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Env var naming the function registry file.
pub const REGISTRY_ENV: &str = "SEQPLAN_REGISTRY";

/// Env var enabling placeholder steps for unknown functions.
pub const ALLOW_MISSING_ENV: &str = "SEQPLAN_ALLOW_MISSING";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub registry: RegistrySection,
    #[serde(default)]
    pub compiler: CompilerSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegistrySection {
    /// Path to the `functions.toml` registry file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CompilerSection {
    /// Turn unknown functions into placeholder steps instead of failing.
    #[serde(default)]
    pub allow_missing: bool,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the seqplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/seqplan` or `~/.config/seqplan`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("seqplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("seqplan")
}

/// Return the default path to the seqplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file at `path`.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

/// Parse a boolean env var value.
fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("{name} must be a boolean (true/false), got {other:?}"),
    }
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct SeqplanConfig {
    pub registry_path: Option<PathBuf>,
    pub allow_missing: bool,
}

impl SeqplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Registry: `cli_registry` > `SEQPLAN_REGISTRY` env > `registry.path` > none
    /// - Allow missing: `--allow-missing` > `SEQPLAN_ALLOW_MISSING` env > `compiler.allow_missing` > false
    ///
    /// A missing config file is not an error; an unreadable or malformed one is.
    pub fn resolve(
        config_path: &Path,
        cli_registry: Option<&Path>,
        cli_allow_missing: bool,
    ) -> Result<Self> {
        let file_config = if config_path.exists() {
            Some(load_config(config_path)?)
        } else {
            None
        };

        let registry_path = if let Some(path) = cli_registry {
            Some(path.to_path_buf())
        } else if let Ok(path) = std::env::var(REGISTRY_ENV) {
            Some(PathBuf::from(path))
        } else {
            file_config
                .as_ref()
                .and_then(|cfg| cfg.registry.path.clone())
        };

        let allow_missing = if cli_allow_missing {
            true
        } else if let Ok(value) = std::env::var(ALLOW_MISSING_ENV) {
            parse_bool(ALLOW_MISSING_ENV, &value)?
        } else {
            file_config
                .as_ref()
                .is_some_and(|cfg| cfg.compiler.allow_missing)
        };

        Ok(Self {
            registry_path,
            allow_missing,
        })
    }

    /// The registry path, or an error explaining how to set one.
    pub fn require_registry(&self) -> Result<&Path> {
        match self.registry_path.as_deref() {
            Some(path) => Ok(path),
            None => bail!(
                "no function registry configured; pass --registry, set {REGISTRY_ENV}, \
                 or run `seqplan init --registry <file>`"
            ),
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
