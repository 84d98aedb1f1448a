/// Stacked CLI error types
#[derive(Debug, thiserror::Error)]
pub enum StackedError {
    /// Git-related errors
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Branch management errors
    #[error("Branch error: {0}")]
    Branch(String),

    /// Stack state integrity errors (missing or corrupt stack file)
    #[error("State error: {0}")]
    State(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// External tool exited non-zero; its exit code is propagated
    #[error("{tool} exited with code {code}")]
    External { tool: String, code: i32 },
}

impl StackedError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        StackedError::Config(msg.into())
    }

    pub fn branch<S: Into<String>>(msg: S) -> Self {
        StackedError::Branch(msg.into())
    }

    pub fn state<S: Into<String>>(msg: S) -> Self {
        StackedError::State(msg.into())
    }

    pub fn external<S: Into<String>>(tool: S, code: i32) -> Self {
        StackedError::External {
            tool: tool.into(),
            code,
        }
    }

    /// Process exit code for this error. External tool failures propagate
    /// the tool's own exit code; everything else is a plain failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            StackedError::External { code, .. } => *code,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, StackedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_exit_code_propagates() {
        let err = StackedError::external("arc", 3);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_state_error_exit_code() {
        let err = StackedError::state("stack file does not exist");
        assert_eq!(err.exit_code(), 1);
    }
}
