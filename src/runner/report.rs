use crate::runner::{BatchPlan, InstallOutcome, RunSummary};
use colored::Colorize;
use std::path::Path;

/// Print the end-of-run report: counts, skipped and failed identifiers
/// grouped by kind, and where the run log lives.
pub fn print_report(summary: &RunSummary, log_path: Option<&Path>) {
    let installed = summary.count(InstallOutcome::Installed);
    let skipped = summary.count(InstallOutcome::AlreadyPresent);
    let failed = summary.count(InstallOutcome::Failed);
    let not_found = summary.count(InstallOutcome::NotFound);

    println!();
    if !summary.has_failures() {
        println!("{}", "=".repeat(50).bright_green());
        println!("{}", "✓ devup run completed".bright_green().bold());
        println!("{}", "=".repeat(50).bright_green());
    } else {
        println!("{}", "=".repeat(50).yellow());
        println!("{}", "⚠️  devup run completed with issues".yellow().bold());
        println!("{}", "=".repeat(50).yellow());
    }
    println!();

    println!(
        "  {} installed, {} already present, {} failed, {} not found",
        installed.to_string().green(),
        skipped,
        failed.to_string().red(),
        not_found.to_string().red()
    );
    println!();

    let skipped_groups = summary.skipped_by_kind();
    if !skipped_groups.is_empty() {
        println!("{}", "Already present:".bold());
        for (kind, results) in &skipped_groups {
            let names: Vec<&str> = results
                .iter()
                .map(|r| r.request.package.as_str())
                .collect();
            println!("  ⊘ {}: {}", kind, names.join(", "));
        }
        println!();
    }

    let failure_groups = summary.failures_by_kind();
    if !failure_groups.is_empty() {
        println!("{}", "Failed:".red().bold());
        for (kind, results) in &failure_groups {
            println!("  {}:", kind);
            for result in results {
                println!(
                    "    ✗ {} (via {})",
                    result.request.package.red(),
                    result.request.backend
                );
                if let Some(detail) = &result.detail {
                    println!("      {}", detail);
                }
            }
        }
        println!();
        println!(
            "💡 {}",
            "Re-run devup after fixing the issues.".bright_yellow()
        );
        println!("   Already installed packages will be skipped automatically.");
        println!();
    }

    if let Some(path) = log_path {
        println!("  Run log: {}", path.display());
    }
}

/// Print planned actions for `--dry-run`.
pub fn print_plan(plan: &BatchPlan) {
    println!("{}", "[DRY RUN MODE]".yellow().bold());
    println!();

    if !plan.present.is_empty() {
        println!("  ✓ {} already installed", plan.present.len());
    }

    if !plan.duplicates.is_empty() {
        println!(
            "  ⊘ {} duplicate request(s) collapsed into earlier ones",
            plan.duplicates.len()
        );
    }

    if plan.pending.is_empty() {
        println!("  Nothing to install");
        return;
    }

    println!("  Packages ({} to install):", plan.pending.len());
    for request in &plan.pending {
        println!("    → {} (via {})", request.package, request.backend);
    }
}
