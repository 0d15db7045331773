use std::fmt;

use crate::api::ApiError;

/// Error types for arbflow operations
#[derive(Debug)]
pub enum ArbflowError {
    /// IO error (storage file, export output, etc.)
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// HTTP client construction error
    Http(reqwest::Error),

    /// JSON (de)serialization error
    Json(serde_json::Error),

    /// TOML parsing error
    TomlParsing(toml::de::Error),

    /// Persistent storage error
    Storage(String),

    /// Request collaborator failure
    Api(ApiError),

    /// Invalid argument error
    InvalidArgument(String),

    /// No session is stored
    NotAuthenticated,
}

impl fmt::Display for ArbflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArbflowError::Io(err) => write!(f, "IO error: {err}"),
            ArbflowError::Config(msg) => write!(f, "Configuration error: {msg}"),
            ArbflowError::Http(err) => write!(f, "HTTP error: {err}"),
            ArbflowError::Json(err) => write!(f, "JSON error: {err}"),
            ArbflowError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            ArbflowError::Storage(msg) => write!(f, "Storage error: {msg}"),
            ArbflowError::Api(err) => write!(f, "API error: {err}"),
            ArbflowError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            ArbflowError::NotAuthenticated => write!(f, "Not authenticated: please log in"),
        }
    }
}

impl std::error::Error for ArbflowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArbflowError::Io(err) => Some(err),
            ArbflowError::Http(err) => Some(err),
            ArbflowError::Json(err) => Some(err),
            ArbflowError::TomlParsing(err) => Some(err),
            ArbflowError::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ArbflowError {
    fn from(err: std::io::Error) -> Self {
        ArbflowError::Io(err)
    }
}

impl From<reqwest::Error> for ArbflowError {
    fn from(err: reqwest::Error) -> Self {
        ArbflowError::Http(err)
    }
}

impl From<serde_json::Error> for ArbflowError {
    fn from(err: serde_json::Error) -> Self {
        ArbflowError::Json(err)
    }
}

impl From<toml::de::Error> for ArbflowError {
    fn from(err: toml::de::Error) -> Self {
        ArbflowError::TomlParsing(err)
    }
}

impl From<ApiError> for ArbflowError {
    fn from(err: ApiError) -> Self {
        ArbflowError::Api(err)
    }
}

/// Type alias for Results using ArbflowError
pub type Result<T> = std::result::Result<T, ArbflowError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let config_error = ArbflowError::Config("Invalid timeout".to_string());
        assert_eq!(
            format!("{config_error}"),
            "Configuration error: Invalid timeout"
        );

        let storage_error = ArbflowError::Storage("disk full".to_string());
        assert_eq!(format!("{storage_error}"), "Storage error: disk full");
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let arbflow_error = ArbflowError::from(io_error);

        assert!(matches!(arbflow_error, ArbflowError::Io(_)));
        assert!(arbflow_error.source().is_some());
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let arbflow_error = ArbflowError::from(json_error);

        assert!(matches!(arbflow_error, ArbflowError::Json(_)));
        assert!(format!("{arbflow_error}").starts_with("JSON error:"));
    }

    #[test]
    fn test_error_from_toml() {
        let toml_error = toml::from_str::<toml::Value>("invalid toml [").unwrap_err();
        let arbflow_error = ArbflowError::from(toml_error);

        assert!(matches!(arbflow_error, ArbflowError::TomlParsing(_)));
    }

    #[test]
    fn test_error_from_api() {
        let arbflow_error = ArbflowError::from(ApiError::Unauthorized);

        assert!(matches!(arbflow_error, ArbflowError::Api(ApiError::Unauthorized)));
        assert!(arbflow_error.source().is_some());
    }

    #[test]
    fn test_error_no_source_variants() {
        let errors_without_source = vec![
            ArbflowError::Config("test".to_string()),
            ArbflowError::Storage("test".to_string()),
            ArbflowError::InvalidArgument("test".to_string()),
            ArbflowError::NotAuthenticated,
        ];

        for error in errors_without_source {
            assert!(error.source().is_none());
            assert!(format!("{error}").contains(':'));
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ArbflowError>();
    }
}
