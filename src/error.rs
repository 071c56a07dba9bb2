use std::io;
use std::path::PathBuf;

/// Fatal problems detected before any file is written.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("module root {} is not readable", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("module root {} is not a directory", path.display())]
    RootNotDirectory { path: PathBuf },
    #[error("target file {} is not readable", path.display())]
    TargetUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid target pattern {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("no target files matched: {}", patterns.join(", "))]
    NoTargets { patterns: Vec<String> },
    #[error("config file {} is not readable", path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}", path.display())]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("similarity threshold must be within 0..=1, got {0}")]
    ThresholdOutOfRange(f32),
}
