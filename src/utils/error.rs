use thiserror::Error;

/// Main error type for skillkit
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("{0}")]
    Usage(#[from] UsageError),

    #[error("{0}")]
    Resource(#[from] ResourceError),

    #[error("{0}")]
    Remote(#[from] RemoteError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkillError {
    /// Whether this error must stop the whole run before any remote call
    pub fn is_fatal_precondition(&self) -> bool {
        matches!(
            self,
            SkillError::Usage(_) | SkillError::Resource(_) | SkillError::Configuration(_)
        )
    }
}

/// Missing or malformed command-line input
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("{flags} is required")]
    MissingArgument { flags: String },
}

/// Local resources read before a request is sent
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("File size exceeds {limit_mb}MB limit")]
    FileTooLarge { size_bytes: u64, limit_mb: u64 },

    #[error("Failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },
}

/// Failures reported by, or on the way to, a remote capability
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RemoteError {
    /// The service answered with an error status
    #[error("{message}")]
    Api { message: String, status_code: u16 },

    /// Network, timeout or serialization failure
    #[error("{0}")]
    Transport(String),

    /// The service answered but reported that the work failed
    #[error("{}", .0.join(", "))]
    Rejected(Vec<String>),
}

impl RemoteError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RemoteError::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Result type alias for skillkit operations
pub type SkillResult<T> = Result<T, SkillError>;

/// Result type alias for remote capability calls
pub type RemoteResult<T> = Result<T, RemoteError>;
