use crate::workflows::ids::StatementId;

use super::domain::Statement;

/// Storage abstraction so the lifecycle can be exercised in isolation.
///
/// `update` must compare the incoming `version` with the stored one, reject a mismatch with
/// [`RepositoryError::Conflict`] and return the persisted record with its version bumped.
pub trait StatementRepository: Send + Sync {
    fn insert(&self, statement: Statement) -> Result<Statement, RepositoryError>;
    fn update(&self, statement: Statement) -> Result<Statement, RepositoryError>;
    fn fetch(&self, id: &StatementId) -> Result<Option<Statement>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record was modified concurrently")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
