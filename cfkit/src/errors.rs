use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CfError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("No current key: add a row key before setting columns")]
    NoCurrentKey,

    #[error("Batch full: mutator already holds {limit} mutations")]
    BatchFull { limit: usize },

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CfError {
    pub(crate) fn wrong_length(type_name: &str, expected: usize, actual: usize) -> Self {
        CfError::Serialization(format!(
            "{} expects {} bytes, got {}",
            type_name, expected, actual
        ))
    }
}

impl From<config::ConfigError> for CfError {
    fn from(err: config::ConfigError) -> Self {
        CfError::ConfigError(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for CfError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        CfError::Serialization(format!("Invalid UTF-8: {}", err))
    }
}
