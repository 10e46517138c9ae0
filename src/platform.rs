use crate::error::PreconditionError;
use crate::utils;
use std::path::Path;
use std::process::Command;

const BREW_INSTALL_SCRIPT: &str =
    r#"/bin/bash -c "$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)""#;

/// The whole run is impossible on anything but macOS.
pub fn check_platform() -> Result<(), PreconditionError> {
    check_os(std::env::consts::OS)
}

fn check_os(os: &str) -> Result<(), PreconditionError> {
    if os == "macos" {
        Ok(())
    } else {
        Err(PreconditionError::UnsupportedPlatform { os: os.to_string() })
    }
}

/// Ensure Homebrew is present, bootstrapping it when missing. Failure here
/// is fatal: every backend ultimately needs brew to exist.
pub fn ensure_brew(dry_run: bool) -> Result<(), PreconditionError> {
    if utils::command_exists("brew") {
        log::debug!("✓ brew is installed");
        return Ok(());
    }

    if dry_run {
        println!("  → Would bootstrap Homebrew");
        return Ok(());
    }

    log::info!("→ Installing Homebrew...");

    let status = Command::new("sh")
        .arg("-c")
        .arg(BREW_INSTALL_SCRIPT)
        .status()
        .map_err(|e| PreconditionError::BootstrapFailed {
            manager: "brew".to_string(),
            detail: e.to_string(),
        })?;

    if !status.success() {
        return Err(PreconditionError::BootstrapFailed {
            manager: "brew".to_string(),
            detail: format!("install script exited with {}", status),
        });
    }

    // Apple Silicon installs land outside the default PATH
    if Path::new("/opt/homebrew/bin/brew").exists() {
        let current_path = std::env::var("PATH").unwrap_or_default();
        std::env::set_var("PATH", format!("/opt/homebrew/bin:{}", current_path));
    }

    log::info!("✓ brew installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macos_passes_the_gate() {
        assert!(check_os("macos").is_ok());
    }

    #[test]
    fn other_platforms_are_fatal() {
        let err = check_os("linux").unwrap_err();
        assert!(matches!(
            &err,
            PreconditionError::UnsupportedPlatform { os } if os == "linux"
        ));
        assert!(err.to_string().contains("unsupported platform"));
    }
}
