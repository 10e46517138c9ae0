pub mod brew;
pub mod npm;
pub mod pip;

use crate::error::InstallError;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::process::Command;

/// A backing package manager. Each implementation knows how to query the
/// current installation state of an identifier and how to install it.
pub trait PackageBackend: Send + Sync {
    /// Backend name, matching `InstallRequest::backend`
    fn name(&self) -> &str;

    /// Check if the backend's own runtime is on PATH
    fn is_available(&self) -> bool;

    /// Install the backend's runtime (e.g. python for pip).
    /// Homebrew itself is a run precondition and is bootstrapped elsewhere.
    fn bootstrap(&self) -> Result<()>;

    /// Get the set of currently installed identifiers
    fn list_installed(&self) -> Result<HashSet<String>>;

    /// Check if a specific identifier is installed
    fn query_state(&self, package: &str) -> Result<bool> {
        Ok(self.list_installed()?.contains(package))
    }

    /// Install a single identifier. Output is captured so failures carry a
    /// diagnostic; an identifier the manager does not recognize maps to
    /// `InstallError::NotFound`.
    fn install(&self, package: &str) -> Result<(), InstallError>;
}

/// All backends in manifest precedence order.
pub fn default_backends() -> Vec<Box<dyn PackageBackend>> {
    vec![
        Box::new(brew::TapBackend),
        Box::new(brew::BrewBackend),
        Box::new(brew::CaskBackend),
        Box::new(pip::PipBackend),
        Box::new(npm::NpmBackend),
    ]
}

/// Install a runtime (python, node, ...) via brew
pub(crate) fn install_runtime_via_brew(formula: &str) -> Result<()> {
    if !crate::utils::command_exists("brew") {
        anyhow::bail!("{} requires brew, but brew is not installed", formula);
    }

    log::info!("→ Installing {} via brew...", formula);

    let output = Command::new("brew")
        .env("HOMEBREW_NO_AUTO_UPDATE", "1")
        .args(["install", formula])
        .output()
        .context(format!("Failed to execute brew install {}", formula))?;

    if !output.status.success() {
        anyhow::bail!(
            "brew install {} failed: {}",
            formula,
            crate::utils::failure_excerpt(&output)
        );
    }

    Ok(())
}

/// Classify a failed install by scanning its output for the manager's
/// "unknown package" phrasing.
pub(crate) fn classify_install_failure(
    backend: &str,
    package: &str,
    output: &std::process::Output,
    not_found_markers: &[&str],
) -> InstallError {
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
    .to_lowercase();

    if not_found_markers.iter().any(|m| text.contains(m)) {
        return InstallError::NotFound {
            backend: backend.to_string(),
            package: package.to_string(),
        };
    }

    InstallError::CommandFailed {
        backend: backend.to_string(),
        package: package.to_string(),
        detail: crate::utils::failure_excerpt(output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn failed_output(stderr: &str) -> std::process::Output {
        use std::os::unix::process::ExitStatusExt;
        std::process::Output {
            status: std::process::ExitStatus::from_raw(1 << 8),
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    #[cfg(unix)]
    fn unknown_package_maps_to_not_found() {
        let output = failed_output("Error: No available formula with the name \"nope\"\n");
        let err = classify_install_failure("brew", "nope", &output, &["no available formula"]);

        assert!(matches!(err, InstallError::NotFound { .. }));
    }

    #[test]
    #[cfg(unix)]
    fn other_failures_keep_the_diagnostic() {
        let output = failed_output("Error: ld: symbol not found\n");
        let err = classify_install_failure("brew", "zlib", &output, &["no available formula"]);

        match err {
            InstallError::CommandFailed { detail, .. } => {
                assert!(detail.contains("symbol not found"));
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }
}
