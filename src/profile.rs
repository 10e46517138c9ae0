use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Expand a leading `~/` against the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Existing lines of a startup file, empty if the file doesn't exist yet.
pub fn read_profile_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|content| content.lines().map(|l| l.to_string()).collect())
        .unwrap_or_default()
}

/// Append the given lines to a startup/profile file, skipping any line that
/// is already present. Repeating the call never duplicates a line. Returns
/// how many lines were actually appended.
pub fn append_missing_lines(path: &Path, lines: &[String]) -> Result<usize> {
    let existing = read_profile_lines(path);
    let mut seen: std::collections::HashSet<String> =
        existing.iter().map(|l| l.trim().to_string()).collect();

    let missing: Vec<&String> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && seen.insert(trimmed.to_string())
        })
        .collect();

    if missing.is_empty() {
        return Ok(0);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open profile file: {}", path.display()))?;

    // Keep appended content on its own lines even if the file has no
    // trailing newline
    let needs_leading_newline = !existing.is_empty()
        && std::fs::read(path).map(|b| !b.ends_with(b"\n")).unwrap_or(false);
    if needs_leading_newline {
        writeln!(file)?;
    }

    for line in &missing {
        writeln!(file, "{}", line).with_context(|| {
            format!("Failed to append to profile file: {}", path.display())
        })?;
    }

    Ok(missing.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn appending_twice_leaves_one_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".zprofile");
        let export = lines(&["export PATH=\"$HOME/.cargo/bin:$PATH\""]);

        assert_eq!(append_missing_lines(&path, &export).unwrap(), 1);
        assert_eq!(append_missing_lines(&path, &export).unwrap(), 0);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.matches("cargo/bin").count(),
            1,
            "line must not be duplicated: {content}"
        );
    }

    #[test]
    fn duplicate_lines_within_one_call_are_collapsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile");

        let appended =
            append_missing_lines(&path, &lines(&["alias ll='ls -l'", "alias ll='ls -l'"]))
                .unwrap();

        assert_eq!(appended, 1);
    }

    #[test]
    fn existing_content_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile");
        std::fs::write(&path, "# my profile\nexport EDITOR=vim\n").unwrap();

        append_missing_lines(&path, &lines(&["export EDITOR=vim", "export LANG=C"])).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# my profile\n"));
        assert_eq!(content.matches("EDITOR=vim").count(), 1);
        assert!(content.contains("export LANG=C"));
    }

    #[test]
    fn creates_the_file_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh");

        append_missing_lines(&path, &lines(&["export FOO=1"])).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "export FOO=1\n");
    }

    #[test]
    fn blank_lines_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile");

        assert_eq!(append_missing_lines(&path, &lines(&["", "  "])).unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn expand_home_handles_plain_paths() {
        assert_eq!(expand_home("/etc/profile"), PathBuf::from("/etc/profile"));
    }
}
