pub mod report;
pub mod summary;

pub use summary::{InstallOutcome, InstallRequest, InstallResult, PackageKind, RunSummary};

use crate::backends::PackageBackend;
use crate::error::InstallError;
use crate::runlog::RunLog;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// Planned actions for a batch, used by dry runs.
#[derive(Debug, Default)]
pub struct BatchPlan {
    pub present: Vec<InstallRequest>,
    pub pending: Vec<InstallRequest>,
    pub duplicates: Vec<InstallRequest>,
}

/// Executes install requests against the backing package managers.
/// Individual failures are folded into the summary; nothing here aborts
/// the batch.
pub struct Runner<'a> {
    backends: Vec<Box<dyn PackageBackend>>,
    max_parallel: usize,
    runlog: &'a RunLog,
}

impl<'a> Runner<'a> {
    pub fn new(
        backends: Vec<Box<dyn PackageBackend>>,
        max_parallel: usize,
        runlog: &'a RunLog,
    ) -> Self {
        Self {
            backends,
            max_parallel: max_parallel.max(1),
            runlog,
        }
    }

    fn backend(&self, name: &str) -> Option<&dyn PackageBackend> {
        self.backends
            .iter()
            .find(|b| b.name() == name)
            .map(|b| b.as_ref())
    }

    /// Check the current state of one request and install if needed.
    /// Always returns a result; errors become Failed/NotFound outcomes.
    pub fn ensure_installed(&self, request: &InstallRequest) -> InstallResult {
        let Some(backend) = self.backend(&request.backend) else {
            return InstallResult::new(
                request.clone(),
                InstallOutcome::Failed,
                Some(format!("unknown backend: {}", request.backend)),
            );
        };

        match backend.query_state(&request.package) {
            Ok(true) => {
                log::debug!("✓ {} already installed", request.package);
                InstallResult::new(request.clone(), InstallOutcome::AlreadyPresent, None)
            }
            Ok(false) => match backend.install(&request.package) {
                Ok(()) => InstallResult::new(request.clone(), InstallOutcome::Installed, None),
                Err(e @ InstallError::NotFound { .. }) => InstallResult::new(
                    request.clone(),
                    InstallOutcome::NotFound,
                    Some(e.to_string()),
                ),
                Err(e) => InstallResult::new(
                    request.clone(),
                    InstallOutcome::Failed,
                    Some(e.to_string()),
                ),
            },
            Err(e) => InstallResult::new(
                request.clone(),
                InstallOutcome::Failed,
                Some(format!("state query failed: {:#}", e)),
            ),
        }
    }

    /// Process all requests, in order, accumulating one result per request.
    ///
    /// Requests sharing an identifier are serialized: only the first
    /// occurrence goes to the thread pool. Once an identifier is satisfied,
    /// its later occurrences mirror that state as already present; after a
    /// failed attempt the next backend in order gets its turn, so the first
    /// successful backend wins. The unique requests are independent and run
    /// on a bounded thread pool.
    pub fn run_batch(&self, requests: &[InstallRequest]) -> RunSummary {
        let unique = dedup_first_occurrence(requests);
        let mut readiness = self.backend_readiness(requests, &unique);

        let progress = if unique.len() > 1 {
            ProgressBar::new(unique.len() as u64)
        } else {
            ProgressBar::hidden()
        };

        let worker = |i: &usize| -> (usize, InstallResult) {
            let request = &requests[*i];

            let result = match readiness.get(&request.backend) {
                Some(Some(reason)) => InstallResult::new(
                    request.clone(),
                    InstallOutcome::Failed,
                    Some(reason.clone()),
                ),
                _ => self.ensure_installed(request),
            };

            self.record(&result);
            progress.inc(1);
            (*i, result)
        };

        let computed: Vec<(usize, InstallResult)> = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_parallel)
            .build()
        {
            Ok(pool) => pool.install(|| unique.par_iter().map(worker).collect()),
            Err(e) => {
                log::warn!("Thread pool unavailable ({}), installing sequentially", e);
                unique.iter().map(worker).collect()
            }
        };

        progress.finish_and_clear();

        let mut slots: Vec<Option<InstallResult>> = vec![None; requests.len()];
        for (i, result) in computed {
            slots[i] = Some(result);
        }

        // Which backend first left an identifier in a satisfied state
        let mut satisfied_via: HashMap<&str, &str> = HashMap::new();
        let mut summary = RunSummary::default();

        for (i, request) in requests.iter().enumerate() {
            let result = match slots[i].take() {
                Some(result) => result,
                None => {
                    let result = match satisfied_via.get(request.package.as_str()) {
                        Some(backend) => InstallResult::new(
                            request.clone(),
                            InstallOutcome::AlreadyPresent,
                            Some(format!(
                                "already handled via {} earlier in the run",
                                backend
                            )),
                        ),
                        // The earlier attempt did not satisfy the package, so
                        // this backend gets its turn
                        None => {
                            let state = readiness
                                .entry(request.backend.clone())
                                .or_insert_with(|| self.backend_state(&request.backend));

                            match state {
                                Some(reason) => InstallResult::new(
                                    request.clone(),
                                    InstallOutcome::Failed,
                                    Some(reason.clone()),
                                ),
                                None => self.ensure_installed(request),
                            }
                        }
                    };
                    self.record(&result);
                    result
                }
            };

            if matches!(
                result.outcome,
                InstallOutcome::AlreadyPresent | InstallOutcome::Installed
            ) {
                satisfied_via
                    .entry(request.package.as_str())
                    .or_insert(request.backend.as_str());
            }

            summary.results.push(result);
        }

        summary
    }

    /// Classify requests without executing anything, for `--dry-run`.
    pub fn plan_batch(&self, requests: &[InstallRequest]) -> BatchPlan {
        let unique = dedup_first_occurrence(requests);
        let dispatched: HashSet<usize> = unique.iter().copied().collect();

        let mut plan = BatchPlan::default();

        for (i, request) in requests.iter().enumerate() {
            if !dispatched.contains(&i) {
                plan.duplicates.push(request.clone());
                continue;
            }

            let installed = self
                .backend(&request.backend)
                .filter(|b| b.is_available())
                .map(|b| b.query_state(&request.package).unwrap_or(false))
                .unwrap_or(false);

            if installed {
                plan.present.push(request.clone());
            } else {
                plan.pending.push(request.clone());
            }
        }

        plan
    }

    /// Check each backend referenced by the batch, bootstrapping missing
    /// runtimes once. The value is None when the backend is usable, or the
    /// reason every one of its requests must be recorded as failed.
    fn backend_readiness(
        &self,
        requests: &[InstallRequest],
        unique: &[usize],
    ) -> HashMap<String, Option<String>> {
        let mut readiness: HashMap<String, Option<String>> = HashMap::new();

        for &i in unique {
            let name = &requests[i].backend;
            if !readiness.contains_key(name) {
                readiness.insert(name.clone(), self.backend_state(name));
            }
        }

        readiness
    }

    /// None when the backend is usable, otherwise the reason its requests
    /// must be recorded as failed.
    fn backend_state(&self, name: &str) -> Option<String> {
        match self.backend(name) {
            None => Some(format!("unknown backend: {}", name)),
            Some(backend) if backend.is_available() => None,
            Some(backend) => {
                log::info!("→ {} runtime missing, bootstrapping...", name);
                match backend.bootstrap() {
                    Ok(()) => {
                        self.runlog.record(&format!("bootstrapped {} runtime", name));
                        None
                    }
                    Err(e) => {
                        let reason = format!("{} runtime unavailable: {:#}", name, e);
                        self.runlog.record(&reason);
                        Some(reason)
                    }
                }
            }
        }
    }

    fn record(&self, result: &InstallResult) {
        let line = match &result.detail {
            Some(detail) => format!(
                "{} {} via {}: {}",
                result.outcome.as_str(),
                result.request.package,
                result.request.backend,
                detail
            ),
            None => format!(
                "{} {} via {}",
                result.outcome.as_str(),
                result.request.package,
                result.request.backend
            ),
        };

        self.runlog.record(&line);
    }
}

/// Indices of first occurrences per identifier, in input order.
fn dedup_first_occurrence(requests: &[InstallRequest]) -> Vec<usize> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut unique = Vec::new();

    for (i, request) in requests.iter().enumerate() {
        if seen.insert(request.package.as_str()) {
            unique.push(i);
        }
    }

    unique
}
