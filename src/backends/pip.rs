use crate::backends::{classify_install_failure, install_runtime_via_brew, PackageBackend};
use crate::error::InstallError;
use crate::utils;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::process::Command;

/// pip (user-level installs)
pub struct PipBackend;

impl PipBackend {
    /// pip treats names case-insensitively and `-`/`_` as equivalent
    fn normalize(name: &str) -> String {
        name.to_lowercase().replace('_', "-")
    }
}

impl PackageBackend for PipBackend {
    fn name(&self) -> &str {
        "pip"
    }

    fn is_available(&self) -> bool {
        utils::command_exists("pip3")
    }

    fn bootstrap(&self) -> Result<()> {
        install_runtime_via_brew("python")
    }

    fn list_installed(&self) -> Result<HashSet<String>> {
        let output = Command::new("pip3")
            .args(["list", "--format=freeze"])
            .output()
            .context("Failed to list pip packages")?;

        if !output.status.success() {
            anyhow::bail!("pip3 list failed");
        }

        let packages = String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter_map(|line| {
                // Format: "name==version"
                line.split("==").next().map(Self::normalize)
            })
            .filter(|s| !s.is_empty())
            .collect();

        Ok(packages)
    }

    fn query_state(&self, package: &str) -> Result<bool> {
        Ok(self.list_installed()?.contains(&Self::normalize(package)))
    }

    fn install(&self, package: &str) -> Result<(), InstallError> {
        log::info!("→ Installing {} (pip)...", package);

        let output = Command::new("pip3")
            .args(["install", "--user", package])
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
                &[
                    "no matching distribution found",
                    "could not find a version that satisfies",
                ],
            ));
        }

        log::info!("✓ {} installed", package);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_pip_names() {
        assert_eq!(PipBackend::normalize("Django_REST"), "django-rest");
        assert_eq!(PipBackend::normalize("httpie"), "httpie");
    }
}
