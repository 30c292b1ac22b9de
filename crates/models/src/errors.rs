use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("policy with application number {0} already exists")]
    Duplicate(String),
    #[error("database error: {0}")]
    Db(String),
}
