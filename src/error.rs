use thiserror::Error;

/// Environment problems that make the whole run impossible.
/// These are the only errors that abort a run with a non-zero exit.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("unsupported platform: {os} (devup requires macOS)")]
    UnsupportedPlatform { os: String },

    #[error("{manager} is not installed and could not be bootstrapped: {detail}")]
    BootstrapFailed { manager: String, detail: String },
}

/// Per-package install failures. Recorded in the run summary, never fatal.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("{backend} does not know a package named '{package}'")]
    NotFound { backend: String, package: String },

    #[error("{backend} install of '{package}' failed: {detail}")]
    CommandFailed {
        backend: String,
        package: String,
        detail: String,
    },

    #[error("failed to invoke {backend}: {source}")]
    Spawn {
        backend: String,
        #[source]
        source: std::io::Error,
    },
}
