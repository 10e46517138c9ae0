use crate::backends::{classify_install_failure, PackageBackend};
use crate::error::InstallError;
use crate::utils;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::process::Command;

/// Create a brew command with HOMEBREW_NO_AUTO_UPDATE=1
fn brew_command() -> Command {
    let mut cmd = Command::new("brew");
    cmd.env("HOMEBREW_NO_AUTO_UPDATE", "1");
    cmd
}

/// Run a brew listing subcommand and collect one identifier per line.
fn brew_list(args: &[&str]) -> Result<HashSet<String>> {
    let output = brew_command()
        .args(args)
        .output()
        .context(format!("Failed to run brew {}", args.join(" ")))?;

    if !output.status.success() {
        anyhow::bail!("brew {} failed", args.join(" "));
    }

    let installed = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    Ok(installed)
}

fn run_brew_install(
    backend: &str,
    package: &str,
    args: &[&str],
    not_found_markers: &[&str],
) -> Result<(), InstallError> {
    log::info!("→ Installing {} ({})...", package, backend);

    let output = brew_command()
        .args(args)
        .output()
        .map_err(|source| InstallError::Spawn {
            backend: backend.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(classify_install_failure(
            backend,
            package,
            &output,
            not_found_markers,
        ));
    }

    log::info!("✓ {} installed", package);
    Ok(())
}

/// Homebrew formulae
pub struct BrewBackend;

impl PackageBackend for BrewBackend {
    fn name(&self) -> &str {
        "brew"
    }

    fn is_available(&self) -> bool {
        utils::command_exists("brew")
    }

    fn bootstrap(&self) -> Result<()> {
        // Brew availability is a fatal precondition checked before the batch
        anyhow::bail!("Homebrew not installed. Re-run devup so it can be bootstrapped");
    }

    fn list_installed(&self) -> Result<HashSet<String>> {
        brew_list(&["list", "--formula"])
    }

    fn install(&self, package: &str) -> Result<(), InstallError> {
        run_brew_install(
            self.name(),
            package,
            &["install", package],
            &["no available formula", "no formulae found"],
        )
    }
}

/// Homebrew casks
pub struct CaskBackend;

impl PackageBackend for CaskBackend {
    fn name(&self) -> &str {
        "cask"
    }

    fn is_available(&self) -> bool {
        utils::command_exists("brew")
    }

    fn bootstrap(&self) -> Result<()> {
        anyhow::bail!("Homebrew not installed. Re-run devup so it can be bootstrapped");
    }

    fn list_installed(&self) -> Result<HashSet<String>> {
        brew_list(&["list", "--cask"])
    }

    fn install(&self, package: &str) -> Result<(), InstallError> {
        run_brew_install(
            self.name(),
            package,
            &["install", "--cask", package],
            &["no available cask", "no cask with this name", "no casks found"],
        )
    }
}

/// Homebrew taps, ensured before any formula installs
pub struct TapBackend;

impl PackageBackend for TapBackend {
    fn name(&self) -> &str {
        "tap"
    }

    fn is_available(&self) -> bool {
        utils::command_exists("brew")
    }

    fn bootstrap(&self) -> Result<()> {
        anyhow::bail!("Homebrew not installed. Re-run devup so it can be bootstrapped");
    }

    fn list_installed(&self) -> Result<HashSet<String>> {
        brew_list(&["tap"])
    }

    fn install(&self, package: &str) -> Result<(), InstallError> {
        run_brew_install(
            self.name(),
            package,
            &["tap", package],
            &["not found", "invalid tap name"],
        )
    }
}
