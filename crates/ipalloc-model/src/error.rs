use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),
    #[error("unknown allocation status: {0}")]
    UnknownStatus(String),
    #[error("unknown registry: {0}")]
    UnknownRegistry(String),
    #[error("invalid year range {start}..={end}")]
    InvalidYearRange { start: i32, end: i32 },
}

pub type Result<T> = std::result::Result<T, ModelError>;
