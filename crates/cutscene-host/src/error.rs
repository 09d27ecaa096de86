//! Cutscene host error types.

use cutscene_core::error::CutsceneError;
use thiserror::Error;

/// Startup and console errors for the host.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid, or the
    /// content file describes something impossible.
    #[error("configuration error: {0}")]
    Config(String),

    /// The content file is not valid YAML for the expected shape.
    #[error("content error: {0}")]
    Content(#[from] serde_yaml::Error),

    /// Reading the content file or the console failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The save store or director refused an operation.
    #[error(transparent)]
    Cutscene(#[from] CutsceneError),

    /// A console line could not be understood.
    #[error("unrecognised command: {0}")]
    Command(String),
}

impl AppError {
    /// Machine-readable error code for logs.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::Content(_) => "content_error",
            Self::Io(_) => "io_error",
            Self::Cutscene(err) => err.code(),
            Self::Command(_) => "command_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutscene_error_keeps_its_code() {
        let err = AppError::from(CutsceneError::Persistence("disk full".into()));

        assert_eq!(err.code(), "persistence_error");
        assert_eq!(err.to_string(), "persistence error: disk full");
    }

    #[test]
    fn test_yaml_error_maps_to_content_error() {
        let yaml_err = serde_yaml::from_str::<u32>("[not, a, number]").unwrap_err();

        let err = AppError::from(yaml_err);

        assert_eq!(err.code(), "content_error");
    }

    #[test]
    fn test_command_error_message() {
        let err = AppError::Command("usage: play <key>".into());

        assert_eq!(err.code(), "command_error");
        assert_eq!(err.to_string(), "unrecognised command: usage: play <key>");
    }
}
