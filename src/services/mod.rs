//! Application services built on the repository traits.

use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub mod member;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Type constraint violated: {0}")]
    TypeConstraint(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
