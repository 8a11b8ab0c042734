//! Statement side of the pipeline: the application record, its forward-only lifecycle and the
//! deal orchestration that drives it through the calculator.

pub mod domain;
pub mod lifecycle;
pub mod repository;
pub mod router;
pub mod scorer;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AppliedOffer, ChangeType, ClientRecord, CreditStatus, FinishRegistrationRequest,
    IssuedCredit, Statement, StatementStatus, StatementView, StatusHistory, StatusHistoryEntry,
};
pub use lifecycle::{CompletionStatus, LifecycleError, StatementLifecycle};
pub use repository::{RepositoryError, StatementRepository};
pub use router::deal_router;
pub use scorer::{GuardedScorer, LocalScorer, RemoteScorer, UpstreamError};
pub use service::{DealService, DealServiceError};
