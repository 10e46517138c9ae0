use crate::runner::PackageKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "devup")]
#[command(author, version, about, long_about = None)]
#[command(about = "An idempotent installer runner for developer machine bootstrap")]
pub struct Cli {
    /// Path to the manifest file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only show what would be done, don't make changes
    #[arg(long)]
    pub dry_run: bool,

    /// Restrict the run to one package kind
    #[arg(long, value_enum)]
    pub only: Option<PackageKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from(["devup", "--dry-run", "--only", "cask", "-c", "m.toml"]);
        assert!(cli.dry_run);
        assert_eq!(cli.only, Some(PackageKind::Cask));
        assert_eq!(cli.config.unwrap(), PathBuf::from("m.toml"));
    }

    #[test]
    fn verbless_invocation_needs_no_arguments() {
        let cli = Cli::parse_from(["devup"]);
        assert!(!cli.dry_run);
        assert!(cli.only.is_none());
    }
}
