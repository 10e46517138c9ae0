use crate::backends::{classify_install_failure, install_runtime_via_brew, PackageBackend};
use crate::error::InstallError;
use crate::utils;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::process::Command;

/// npm (global installs)
pub struct NpmBackend;

impl PackageBackend for NpmBackend {
    fn name(&self) -> &str {
        "npm"
    }

    fn is_available(&self) -> bool {
        utils::command_exists("npm")
    }

    fn bootstrap(&self) -> Result<()> {
        install_runtime_via_brew("node")
    }

    fn list_installed(&self) -> Result<HashSet<String>> {
        let output = Command::new("npm")
            .args(["list", "-g", "--depth=0", "--parseable"])
            .output()
            .context("Failed to list npm global packages")?;

        let packages = String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter_map(|line| {
                // Paths end in node_modules/<name> or node_modules/@scope/<name>
                let mut parts = line.rsplit('/');
                let name = parts.next()?;
                match parts.next() {
                    Some(scope) if scope.starts_with('@') => Some(format!("{}/{}", scope, name)),
                    _ => Some(name.to_string()),
                }
            })
            .filter(|s| !s.is_empty())
            .collect();

        Ok(packages)
    }

    fn install(&self, package: &str) -> Result<(), InstallError> {
        log::info!("→ Installing {} (npm -g)...", package);

        let output = Command::new("npm")
            .args(["install", "-g", package])
            .output()
            .map_err(|source| InstallError::Spawn {
                backend: self.name().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(classify_install_failure(
                self.name(),
                package,
                &output,
                &["e404", "404 not found", "is not in this registry"],
            ));
        }

        log::info!("✓ {} installed", package);
        Ok(())
    }
}
