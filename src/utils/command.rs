use std::process::Output;

/// Check if a command exists in PATH
pub fn command_exists(command: &str) -> bool {
    which::which(command).is_ok()
}

/// Extract a short diagnostic from a failed command's output.
/// Prefers the last few stderr lines, falls back to stdout, then to the
/// raw exit status.
pub fn failure_excerpt(output: &Output) -> String {
    let excerpt = last_lines(&output.stderr, 5);
    if !excerpt.is_empty() {
        return excerpt;
    }

    let excerpt = last_lines(&output.stdout, 5);
    if !excerpt.is_empty() {
        return excerpt;
    }

    format!("exited with {}", output.status)
}

fn last_lines(bytes: &[u8], n: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    lines
        .iter()
        .rev()
        .take(n)
        .rev()
        .copied()
        .collect::<Vec<_>>()
        .join("; ")
}
