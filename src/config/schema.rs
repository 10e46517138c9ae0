use crate::runner::{InstallRequest, PackageKind};
use serde::Deserialize;
use std::path::PathBuf;

/// The manifest: enumerations of desired packages per backing manager,
/// plus run settings. Package lists are data, not code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default)]
    pub brew: Option<BrewConfig>,

    #[serde(default)]
    pub cask: Option<CaskConfig>,

    #[serde(default)]
    pub pip: Option<PipConfig>,

    #[serde(default)]
    pub npm: Option<NpmConfig>,

    #[serde(default)]
    pub profile: Option<ProfileConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,

    /// Override for the append-only run log location
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_max_parallel() -> usize {
    4
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_parallel: default_max_parallel(),
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrewConfig {
    #[serde(default)]
    pub taps: Vec<String>,

    #[serde(default)]
    pub formulae: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaskConfig {
    #[serde(default)]
    pub apps: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipConfig {
    #[serde(default)]
    pub packages: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NpmConfig {
    #[serde(default)]
    pub global: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    /// Startup file receiving deduplicated appends, defaults to ~/.zprofile
    #[serde(default)]
    pub file: Option<String>,

    #[serde(default)]
    pub lines: Vec<String>,
}

impl Config {
    /// Build the ordered request batch. Section order doubles as the
    /// precedence order when the same identifier appears under several
    /// managers: taps and formulae first, then casks, then language
    /// packages (pip before npm).
    pub fn to_requests(&self, only: Option<PackageKind>) -> Vec<InstallRequest> {
        let mut requests = Vec::new();

        let mut push = |names: &[String], kind: PackageKind, backend: &str| {
            if only.is_some() && only != Some(kind) {
                return;
            }
            for name in names {
                requests.push(InstallRequest::new(name.clone(), kind, backend));
            }
        };

        if let Some(brew) = &self.brew {
            push(&brew.taps, PackageKind::System, "tap");
            push(&brew.formulae, PackageKind::System, "brew");
        }

        if let Some(cask) = &self.cask {
            push(&cask.apps, PackageKind::Cask, "cask");
        }

        if let Some(pip) = &self.pip {
            push(&pip.packages, PackageKind::Language, "pip");
        }

        if let Some(npm) = &self.npm {
            push(&npm.global, PackageKind::Language, "npm");
        }

        requests
    }

    pub fn profile_lines(&self) -> &[String] {
        self.profile.as_ref().map(|p| p.lines.as_slice()).unwrap_or(&[])
    }

    /// True when the manifest declares nothing to do at all
    pub fn is_empty(&self) -> bool {
        self.to_requests(None).is_empty() && self.profile_lines().is_empty()
    }
}
