use super::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest locations tried in order when no explicit path is given:
/// the working directory, then the user config directory, then a home
/// dotfile.
fn search_paths() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from("./devup.toml")];

    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("devup/devup.toml"));
    }
    if let Some(home_dir) = dirs::home_dir() {
        candidates.push(home_dir.join(".devup.toml"));
    }

    candidates
}

/// Find the manifest: an explicit --config path must exist; otherwise the
/// first hit among the default search paths wins.
pub fn find_config_file(explicit_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        anyhow::bail!("Config file not found: {}", path.display());
    }

    let candidates = search_paths();

    if let Some(found) = candidates.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let searched: Vec<String> = candidates
        .iter()
        .map(|p| format!(" - {}", p.display()))
        .collect();

    anyhow::bail!("No config file found. Searched:\n{}", searched.join("\n"));
}

/// Load and parse the manifest
pub fn load_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?;

    Ok(config)
}

/// Load config with automatic discovery
pub fn load_config_auto(explicit_path: Option<&Path>) -> Result<(PathBuf, Config)> {
    let path = find_config_file(explicit_path)?;
    let config = load_config(&path)?;
    Ok((path, config))
}
