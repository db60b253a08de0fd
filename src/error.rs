//! Boundary errors. Generation itself is total; only setters and loaders fail.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("unknown generation strategy `{0}` (expected `Uniform` or `NormalCurve`)")]
    UnknownStrategy(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no function registered under `{0}`")]
    UnknownFunction(String),
    #[error("function `{signature}` has no parameter named `{parameter}`")]
    UnknownParameter { signature: String, parameter: String },
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error(transparent)]
    Glob(#[from] glob::GlobError),
    #[error("glob pattern matched no files: {0}")]
    NoMatches(String),
}
