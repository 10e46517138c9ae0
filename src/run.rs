use crate::backends::default_backends;
use crate::cli::Cli;
use crate::config::{load_config_auto, validate_config};
use crate::runlog::{default_log_path, RunLog};
use crate::runner::{report, InstallOutcome, Runner};
use crate::{platform, profile};
use anyhow::Result;
use colored::Colorize;

/// The single verb-less entry point: load the manifest, check fatal
/// preconditions, run the batch, apply profile appends, report.
///
/// Returns Err only for fatal conditions; per-package failures end with
/// exit code 0 and show up in the report.
pub fn run(cli: &Cli) -> Result<()> {
    let (path, config) = load_config_auto(cli.config.as_deref())?;
    log::info!("Loaded manifest from: {}", path.display());

    validate_config(&config)?;

    if config.is_empty() {
        anyhow::bail!("Manifest declares nothing to install: {}", path.display());
    }

    let log_path = config
        .settings
        .log_file
        .clone()
        .unwrap_or_else(default_log_path);
    let runlog = RunLog::open_or_disabled(&log_path);

    // Fatal preconditions come before any batch work
    if let Err(e) = platform::check_platform() {
        runlog.record(&format!("fatal: {}", e));
        return Err(e.into());
    }
    if let Err(e) = platform::ensure_brew(cli.dry_run) {
        runlog.record(&format!("fatal: {}", e));
        return Err(e.into());
    }

    let requests = config.to_requests(cli.only);

    println!("{}", "=".repeat(50).bright_blue());
    println!("{}", "Starting devup run".bright_blue().bold());
    println!("{}", "=".repeat(50).bright_blue());
    println!();

    let runner = Runner::new(default_backends(), config.settings.max_parallel, &runlog);

    if cli.dry_run {
        report::print_plan(&runner.plan_batch(&requests));
        print_profile_plan(&config);
        return Ok(());
    }

    runlog.record(&format!(
        "run started ({} requests, manifest {})",
        requests.len(),
        path.display()
    ));

    let summary = runner.run_batch(&requests);

    // Profile appends happen once, after all installs, single writer
    apply_profile(&config, &runlog);

    report::print_report(&summary, runlog.path());

    runlog.record(&format!(
        "run finished: {} installed, {} already present, {} failed, {} not found",
        summary.count(InstallOutcome::Installed),
        summary.count(InstallOutcome::AlreadyPresent),
        summary.count(InstallOutcome::Failed),
        summary.count(InstallOutcome::NotFound)
    ));

    Ok(())
}

fn profile_target(config: &crate::config::Config) -> Option<std::path::PathBuf> {
    let profile_cfg = config.profile.as_ref()?;
    if profile_cfg.lines.is_empty() {
        return None;
    }

    let file = profile_cfg.file.as_deref().unwrap_or("~/.zprofile");
    Some(profile::expand_home(file))
}

fn apply_profile(config: &crate::config::Config, runlog: &RunLog) {
    let Some(target) = profile_target(config) else {
        return;
    };

    match profile::append_missing_lines(&target, config.profile_lines()) {
        Ok(0) => log::debug!("Profile already up to date: {}", target.display()),
        Ok(n) => {
            println!("  ✓ {} line(s) appended to {}", n, target.display());
            runlog.record(&format!("appended {} line(s) to {}", n, target.display()));
        }
        // Best effort: a read-only profile must not fail the run
        Err(e) => {
            log::warn!("Could not update {}: {:#}", target.display(), e);
            runlog.record(&format!("profile update failed: {:#}", e));
        }
    }
}

fn print_profile_plan(config: &crate::config::Config) {
    let Some(target) = profile_target(config) else {
        return;
    };

    let existing = profile::read_profile_lines(&target);
    let missing: Vec<&String> = config
        .profile_lines()
        .iter()
        .filter(|line| !existing.iter().any(|e| e.trim() == line.trim()))
        .collect();

    if missing.is_empty() {
        return;
    }

    println!();
    println!(
        "  Profile lines ({} to append to {}):",
        missing.len(),
        target.display()
    );
    for line in missing {
        println!("    → {}", line);
    }
}
