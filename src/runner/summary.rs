use clap::ValueEnum;
use std::collections::BTreeMap;
use std::fmt;

/// Category of package a request belongs to, used for the `--only` filter
/// and for grouping the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum PackageKind {
    /// Formula-like packages installed system-wide (brew formulae, taps)
    System,
    /// Application bundles (brew casks)
    Cask,
    /// Entries of a language-specific package manager (pip, npm)
    Language,
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageKind::System => write!(f, "system packages"),
            PackageKind::Cask => write!(f, "casks"),
            PackageKind::Language => write!(f, "language packages"),
        }
    }
}

/// A single desired package. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub package: String,
    pub kind: PackageKind,
    /// Name of the backing package manager ("tap", "brew", "cask", "pip", "npm")
    pub backend: String,
}

impl InstallRequest {
    pub fn new(package: impl Into<String>, kind: PackageKind, backend: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            kind,
            backend: backend.into(),
        }
    }
}

/// Terminal state of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    AlreadyPresent,
    Installed,
    Failed,
    NotFound,
}

impl InstallOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallOutcome::AlreadyPresent => "already-present",
            InstallOutcome::Installed => "installed",
            InstallOutcome::Failed => "failed",
            InstallOutcome::NotFound => "not-found",
        }
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one request, created once and never mutated.
#[derive(Debug, Clone)]
pub struct InstallResult {
    pub request: InstallRequest,
    pub outcome: InstallOutcome,
    pub detail: Option<String>,
}

impl InstallResult {
    pub fn new(request: InstallRequest, outcome: InstallOutcome, detail: Option<String>) -> Self {
        Self {
            request,
            outcome,
            detail,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self.outcome,
            InstallOutcome::Failed | InstallOutcome::NotFound
        )
    }
}

/// All results of one run, in submission order. Lifetime is one invocation.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub results: Vec<InstallResult>,
}

impl RunSummary {
    pub fn count(&self, outcome: InstallOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| r.is_failure())
    }

    /// Already-present requests grouped by kind, for the final report.
    pub fn skipped_by_kind(&self) -> BTreeMap<PackageKind, Vec<&InstallResult>> {
        self.group_by_kind(|r| r.outcome == InstallOutcome::AlreadyPresent)
    }

    /// Failed and not-found requests grouped by kind.
    pub fn failures_by_kind(&self) -> BTreeMap<PackageKind, Vec<&InstallResult>> {
        self.group_by_kind(InstallResult::is_failure)
    }

    fn group_by_kind<F>(&self, pred: F) -> BTreeMap<PackageKind, Vec<&InstallResult>>
    where
        F: Fn(&InstallResult) -> bool,
    {
        let mut groups: BTreeMap<PackageKind, Vec<&InstallResult>> = BTreeMap::new();

        for result in self.results.iter().filter(|r| pred(r)) {
            groups.entry(result.request.kind).or_default().push(result);
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(pkg: &str, kind: PackageKind, outcome: InstallOutcome) -> InstallResult {
        InstallResult::new(InstallRequest::new(pkg, kind, "brew"), outcome, None)
    }

    #[test]
    fn partitions_results_by_kind() {
        let summary = RunSummary {
            results: vec![
                result("git", PackageKind::System, InstallOutcome::AlreadyPresent),
                result("iterm2", PackageKind::Cask, InstallOutcome::AlreadyPresent),
                result("ripgrep", PackageKind::System, InstallOutcome::Installed),
                result("httpie", PackageKind::Language, InstallOutcome::Failed),
                result("nope", PackageKind::Language, InstallOutcome::NotFound),
            ],
        };

        let skipped = summary.skipped_by_kind();
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[&PackageKind::System].len(), 1);
        assert_eq!(skipped[&PackageKind::Cask].len(), 1);

        let failures = summary.failures_by_kind();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[&PackageKind::Language].len(), 2);
    }

    #[test]
    fn counts_and_failure_flag() {
        let summary = RunSummary {
            results: vec![
                result("git", PackageKind::System, InstallOutcome::Installed),
                result("jq", PackageKind::System, InstallOutcome::AlreadyPresent),
            ],
        };

        assert_eq!(summary.count(InstallOutcome::Installed), 1);
        assert_eq!(summary.count(InstallOutcome::AlreadyPresent), 1);
        assert!(!summary.has_failures());
    }
}
