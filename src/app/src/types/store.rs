use std::fmt;

/// Failures reported by the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    ReadFailure { path: String, message: String },
    WriteFailure { path: String, message: String },
}

impl StoreError {
    pub fn read(path: &str, message: impl Into<String>) -> Self {
        Self::ReadFailure {
            path: path.to_string(),
            message: message.into(),
        }
    }

    pub fn write(path: &str, message: impl Into<String>) -> Self {
        Self::WriteFailure {
            path: path.to_string(),
            message: message.into(),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::ReadFailure { path, .. } | Self::WriteFailure { path, .. } => path,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailure { path, message } => write!(f, "failed to read {path}: {message}"),
            Self::WriteFailure { path, message } => write!(f, "failed to write {path}: {message}"),
        }
    }
}
