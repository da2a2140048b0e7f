use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("unknown property: {0}")]
    UnknownProperty(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("type mismatch for {path}: expected {expected}")]
    TypeMismatch { path: String, expected: &'static str },
    #[error("unknown aircraft preset: {0}")]
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
