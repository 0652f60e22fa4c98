use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Exit status used for every warning path. Unix shells observe it as 255.
pub const WARNING_EXIT_CODE: i32 = -1;

#[derive(ThisError, Debug)]
pub enum AppError {
    #[error("Could not extract API version from X264_BUILD in x264.h in {}", .root.display())]
    MissingVersionMarker { root: PathBuf },

    #[error("Could not read {}: {source}", .path.display())]
    ReadHeader {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not {what} via git in {}", .root.display())]
    VcsQueryFailed { what: String, root: PathBuf },

    #[error("git command '{program}' could not be started: {source}")]
    VcsToolUnavailable {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Could not extract versions via git rev-list or x264_config.h")]
    NoVersionSource {
        api_version: String,
        vcs_tool_missing: bool,
    },

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("IO Error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML Error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML Error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AppError {
    /// Every failure is terminal and maps to the same warning status.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::MissingVersionMarker { .. }
            | AppError::ReadHeader { .. }
            | AppError::VcsQueryFailed { .. }
            | AppError::VcsToolUnavailable { .. }
            | AppError::NoVersionSource { .. }
            | AppError::ConfigError(_)
            | AppError::Io(_)
            | AppError::Serialization(_)
            | AppError::Toml(_)
            | AppError::Yaml(_) => WARNING_EXIT_CODE,
        }
    }

    /// The degraded version printed to stdout before failing, if any.
    pub fn fallback_version(&self) -> Option<String> {
        match self {
            AppError::NoVersionSource { api_version, .. } => Some(format!("0.{}.999", api_version)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = AppError::MissingVersionMarker {
            root: PathBuf::from("/src/x264"),
        };
        assert_eq!(
            e.to_string(),
            "Could not extract API version from X264_BUILD in x264.h in /src/x264"
        );

        let e = AppError::VcsQueryFailed {
            what: "extract localver".to_string(),
            root: PathBuf::from("/src/x264"),
        };
        assert_eq!(e.to_string(), "Could not extract localver via git in /src/x264");

        assert_eq!(
            AppError::ConfigError("test".to_string()).to_string(),
            "Configuration Error: test"
        );
    }

    #[test]
    fn test_fallback_version() {
        let e = AppError::NoVersionSource {
            api_version: "164".to_string(),
            vcs_tool_missing: false,
        };
        assert_eq!(e.fallback_version().as_deref(), Some("0.164.999"));
        assert_eq!(e.exit_code(), WARNING_EXIT_CODE);

        let e = AppError::MissingVersionMarker {
            root: PathBuf::from("."),
        };
        assert!(e.fallback_version().is_none());
    }

    #[test]
    fn test_error_conversions() {
        let io_err = io::Error::new(io::ErrorKind::Other, "test");
        let e: AppError = io_err.into();
        assert!(matches!(e, AppError::Io(_)));
        assert_eq!(e.exit_code(), WARNING_EXIT_CODE);

        let res: Result<(), serde_json::Error> = serde_json::from_str("{");
        let e: AppError = res.unwrap_err().into();
        assert!(matches!(e, AppError::Serialization(_)));

        let res: Result<(), toml::de::Error> = toml::from_str("a = ");
        let e: AppError = res.unwrap_err().into();
        assert!(matches!(e, AppError::Toml(_)));

        let res: Result<(), serde_yaml::Error> = serde_yaml::from_str(":");
        let e: AppError = res.unwrap_err().into();
        assert!(matches!(e, AppError::Yaml(_)));
    }
}
