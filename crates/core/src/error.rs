use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("LIMIT argument offset={offset} is not valid")]
    InvalidOffset { offset: i64 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ConfigError {
    #[error("unknown platform option `{key}`")]
    UnknownKey { key: String },
    #[error("platform option `{key}` expects {expected}, got `{value}`")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}
