use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("credential error: {0}")]
    CredentialError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum GptweeterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("ai error: {0}")]
    Ai(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("chat.retry_attempts = 0".into());
        assert_eq!(
            err.to_string(),
            "config validation error: chat.retry_attempts = 0"
        );

        let err = ConfigError::CredentialError("no home directory".into());
        assert_eq!(err.to_string(), "credential error: no home directory");
    }

    #[test]
    fn gptweeter_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: GptweeterError = config_err.into();
        assert!(matches!(err, GptweeterError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn gptweeter_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: GptweeterError = io_err.into();
        assert!(matches!(err, GptweeterError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn gptweeter_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: GptweeterError = json_err.into();
        assert!(matches!(err, GptweeterError::Json(_)));
    }

    #[test]
    fn gptweeter_error_other_variants() {
        let err = GptweeterError::Ai("model unavailable".into());
        assert_eq!(err.to_string(), "ai error: model unavailable");

        let err = GptweeterError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
