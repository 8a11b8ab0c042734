use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::workflows::ids::{CreditId, StatementId};
use crate::workflows::underwriting::{CreditTerms, Offer, RejectionReason};

use super::domain::{
    AppliedOffer, ChangeType, ClientRecord, CreditStatus, IssuedCredit, Statement,
    StatementStatus, StatusHistory, StatusHistoryEntry,
};
use super::repository::{RepositoryError, StatementRepository};

/// Terminal success status written by `issue_credit`. Collaborators disagree on which one they
/// expect, so it is chosen per deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    #[default]
    CreditIssued,
    CcApproved,
}

impl CompletionStatus {
    pub const fn status(self) -> StatementStatus {
        match self {
            CompletionStatus::CreditIssued => StatementStatus::CreditIssued,
            CompletionStatus::CcApproved => StatementStatus::CcApproved,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("statement {0} not found")]
    NotFound(StatementId),
    #[error("cannot {action} statement {statement_id} in status {status}")]
    InvalidState {
        statement_id: StatementId,
        status: StatementStatus,
        action: &'static str,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl Statement {
    /// New statement at PREAPPROVAL with a single automatic history entry.
    pub fn open(client: ClientRecord, at: DateTime<Utc>) -> Self {
        Self {
            statement_id: StatementId::generate(),
            client,
            status: StatementStatus::Preapproval,
            creation_date: at,
            applied_offer: None,
            credit: None,
            rejection: None,
            status_history: StatusHistory::starting_with(StatusHistoryEntry {
                status: StatementStatus::Preapproval,
                time: at,
                change_type: ChangeType::Automatic,
            }),
            version: 0,
        }
    }

    pub fn accept_offer(
        &mut self,
        offer: &Offer,
        at: DateTime<Utc>,
    ) -> Result<(), LifecycleError> {
        if self.status.is_terminal() {
            return Err(self.invalid("accept an offer for"));
        }

        match self.applied_offer.as_mut() {
            Some(applied) => applied.overwrite_with(offer),
            None => self.applied_offer = Some(AppliedOffer::from(offer)),
        }
        self.transition(StatementStatus::Approved, ChangeType::Manual, at);
        Ok(())
    }

    pub fn issue_credit(
        &mut self,
        terms: CreditTerms,
        completion: CompletionStatus,
        at: DateTime<Utc>,
    ) -> Result<&IssuedCredit, LifecycleError> {
        self.approved_offer("issue credit for")?;

        self.transition(completion.status(), ChangeType::Automatic, at);
        Ok(self.credit.insert(IssuedCredit {
            credit_id: CreditId::generate(),
            status: CreditStatus::Calculated,
            terms,
        }))
    }

    pub fn deny_credit(
        &mut self,
        reason: RejectionReason,
        at: DateTime<Utc>,
    ) -> Result<(), LifecycleError> {
        self.approved_offer("deny credit for")?;

        self.rejection = Some(reason);
        self.transition(StatementStatus::CcDenied, ChangeType::Automatic, at);
        Ok(())
    }

    /// The applied offer, provided the statement is APPROVED and ready for a credit decision.
    pub(super) fn approved_offer(
        &self,
        action: &'static str,
    ) -> Result<&AppliedOffer, LifecycleError> {
        match (&self.status, &self.applied_offer) {
            (StatementStatus::Approved, Some(offer)) => Ok(offer),
            _ => Err(self.invalid(action)),
        }
    }

    fn transition(&mut self, status: StatementStatus, change_type: ChangeType, at: DateTime<Utc>) {
        self.status = status;
        self.status_history.append(StatusHistoryEntry {
            status,
            time: at,
            change_type,
        });
    }

    fn invalid(&self, action: &'static str) -> LifecycleError {
        LifecycleError::InvalidState {
            statement_id: self.statement_id,
            status: self.status,
            action,
        }
    }
}

/// Persists statement transitions through a [`StatementRepository`].
///
/// Every transition is a read-modify-write; the repository's version check serialises
/// concurrent transitions on the same statement.
pub struct StatementLifecycle<R> {
    repository: Arc<R>,
    completion: CompletionStatus,
}

impl<R> StatementLifecycle<R>
where
    R: StatementRepository + 'static,
{
    pub fn new(repository: Arc<R>, completion: CompletionStatus) -> Self {
        Self {
            repository,
            completion,
        }
    }

    pub fn completion(&self) -> CompletionStatus {
        self.completion
    }

    pub fn create(&self, client: ClientRecord) -> Result<Statement, LifecycleError> {
        let statement = self.repository.insert(Statement::open(client, Utc::now()))?;
        info!(statement_id = %statement.statement_id(), "statement opened");
        Ok(statement)
    }

    pub fn accept_offer(
        &self,
        statement_id: &StatementId,
        offer: &Offer,
    ) -> Result<Statement, LifecycleError> {
        let mut statement = self.fetch(statement_id)?;
        statement.accept_offer(offer, Utc::now())?;
        let stored = self.repository.update(statement)?;
        info!(
            statement_id = %stored.statement_id(),
            offer_id = %offer.offer_id.0,
            rate = %offer.rate,
            "offer accepted"
        );
        Ok(stored)
    }

    pub fn issue_credit(
        &self,
        statement_id: &StatementId,
        terms: CreditTerms,
    ) -> Result<Statement, LifecycleError> {
        let mut statement = self.fetch(statement_id)?;
        statement.issue_credit(terms, self.completion, Utc::now())?;
        let stored = self.repository.update(statement)?;
        info!(
            statement_id = %stored.statement_id(),
            status = %stored.status(),
            "credit issued"
        );
        Ok(stored)
    }

    pub fn deny_credit(
        &self,
        statement_id: &StatementId,
        reason: RejectionReason,
    ) -> Result<Statement, LifecycleError> {
        let mut statement = self.fetch(statement_id)?;
        statement.deny_credit(reason, Utc::now())?;
        let stored = self.repository.update(statement)?;
        info!(
            statement_id = %stored.statement_id(),
            reason = ?stored.rejection().map(RejectionReason::summary),
            "credit denied"
        );
        Ok(stored)
    }

    pub fn fetch(&self, statement_id: &StatementId) -> Result<Statement, LifecycleError> {
        self.repository
            .fetch(statement_id)?
            .ok_or(LifecycleError::NotFound(*statement_id))
    }
}
