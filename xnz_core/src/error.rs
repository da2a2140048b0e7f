use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum XnzError {
    /// A property or command the selected integration needs is missing.
    #[error("binding failed: {0}")]
    Binding(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid state: {0}")]
    State(String),
    #[error("unsupported host: {0}")]
    UnsupportedHost(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
