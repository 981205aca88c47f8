use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::dot::DotError;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidPattern,
    GraphReadFailed,
    DotSyntax,
    InvalidGraphPath,
    CompanionParseError,
    ScratchCollision,
    TargetNotFound,
    FrameworkNotFound,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidPattern => "E1002",
            Self::GraphReadFailed => "E2001",
            Self::DotSyntax => "E2002",
            Self::InvalidGraphPath => "E2003",
            Self::CompanionParseError => "E2004",
            Self::ScratchCollision => "E3001",
            Self::TargetNotFound => "E4001",
            Self::FrameworkNotFound => "E4002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidPattern => "Invalid blacklist pattern",
            Self::GraphReadFailed => "Graph file could not be read",
            Self::DotSyntax => "Malformed DOT graph",
            Self::InvalidGraphPath => "Graph path does not encode tier and framework",
            Self::CompanionParseError => "Companion dependency file parse error",
            Self::ScratchCollision => "Scratch file already exists",
            Self::TargetNotFound => "Target not owned by any framework",
            Self::FrameworkNotFound => "Framework not found",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in the depdb config.toml and retry."),
            Self::InvalidPattern => Some("Blacklist entries use fnmatch syntax: * ? [abc]."),
            Self::GraphReadFailed => Some("Check the path and read permissions."),
            Self::DotSyntax => None,
            Self::InvalidGraphPath => {
                Some("Graph files must live at <tier>/<framework>/<framework>.dot.")
            }
            Self::CompanionParseError => {
                Some("The companion file must be a YAML mapping with a framework-dependencies list.")
            }
            Self::ScratchCollision => {
                Some("Two graph files share a base name; give each framework a unique file name.")
            }
            Self::TargetNotFound => Some("Run `depdb externals` to list unowned targets."),
            Self::FrameworkNotFound => Some("Run `depdb frameworks` to list known frameworks."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while building or querying a framework database.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A graph file is not valid DOT.
    #[error("{}: {source}", .path.display())]
    Dot {
        path: PathBuf,
        #[source]
        source: DotError,
    },

    /// The normalized graph would overwrite an existing scratch file.
    #[error("{} already exists", .0.display())]
    ScratchCollision(PathBuf),

    /// The graph path has no `<tier>/<framework>/` components.
    #[error("cannot derive tier and framework from {}", .0.display())]
    InvalidGraphPath(PathBuf),

    /// A companion dependency file exists but is malformed.
    #[error("failed to parse {}: {source}", .path.display())]
    Companion {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A blacklist entry is not a valid glob.
    #[error("invalid blacklist pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// The configuration file is malformed.
    #[error("failed to parse {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// No framework owns the target.
    #[error("no framework owns target {0:?}")]
    UnknownTarget(String),

    /// No framework carries the name.
    #[error("unknown framework {0:?}")]
    UnknownFramework(String),
}

impl Error {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::GraphReadFailed,
            Self::Dot { .. } => ErrorCode::DotSyntax,
            Self::ScratchCollision(_) => ErrorCode::ScratchCollision,
            Self::InvalidGraphPath(_) => ErrorCode::InvalidGraphPath,
            Self::Companion { .. } => ErrorCode::CompanionParseError,
            Self::InvalidPattern { .. } => ErrorCode::InvalidPattern,
            Self::Config { .. } => ErrorCode::ConfigParseError,
            Self::UnknownTarget(_) => ErrorCode::TargetNotFound,
            Self::UnknownFramework(_) => ErrorCode::FrameworkNotFound,
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
