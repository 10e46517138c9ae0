use super::Config;
use anyhow::Result;
use std::collections::HashSet;

/// Validate the manifest before any work starts
pub fn validate_config(config: &Config) -> Result<()> {
    if config.settings.max_parallel == 0 {
        anyhow::bail!("settings.max_parallel must be at least 1");
    }

    if let Some(brew) = &config.brew {
        check_identifiers("brew.taps", &brew.taps)?;
        check_identifiers("brew.formulae", &brew.formulae)?;
    }
    if let Some(cask) = &config.cask {
        check_identifiers("cask.apps", &cask.apps)?;
    }
    if let Some(pip) = &config.pip {
        check_identifiers("pip.packages", &pip.packages)?;
    }
    if let Some(npm) = &config.npm {
        check_identifiers("npm.global", &npm.global)?;
    }

    if let Some(profile) = &config.profile {
        if profile.lines.iter().any(|l| l.trim().is_empty()) {
            anyhow::bail!("profile.lines must not contain blank lines");
        }
    }

    Ok(())
}

/// Identifiers must be non-empty tokens of package-manager-safe characters,
/// and unique within their section.
fn check_identifiers(section: &str, names: &[String]) -> Result<()> {
    let mut seen = HashSet::new();

    for name in names {
        if name.is_empty() {
            anyhow::bail!("{}: empty package identifier", section);
        }

        if !name.chars().all(is_identifier_char) {
            anyhow::bail!("{}: invalid package identifier '{}'", section, name);
        }

        if !seen.insert(name.as_str()) {
            anyhow::bail!("{}: duplicate package identifier '{}'", section, name);
        }
    }

    Ok(())
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | '-' | '+' | '/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml: &str) -> Config {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn accepts_realistic_identifiers() {
        let config = config(
            r#"
            [brew]
            taps = ["homebrew/cask-fonts"]
            formulae = ["gcc@13", "libc++"]

            [npm]
            global = ["@angular/cli"]
            "#,
        );

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_empty_identifiers() {
        let config = config("[brew]\nformulae = [\"\"]\n");
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("empty package identifier"));
    }

    #[test]
    fn rejects_shell_metacharacters() {
        let config = config("[pip]\npackages = [\"httpie; rm -rf\"]\n");
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("invalid package identifier"));
    }

    #[test]
    fn rejects_duplicates_within_a_section() {
        let config = config("[brew]\nformulae = [\"git\", \"git\"]\n");
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_zero_parallelism() {
        let config = config("[settings]\nmax_parallel = 0\n");
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_blank_profile_lines() {
        let config = config("[profile]\nlines = [\"export A=1\", \"  \"]\n");
        assert!(validate_config(&config).is_err());
    }
}
