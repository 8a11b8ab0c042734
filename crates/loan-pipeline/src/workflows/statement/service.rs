use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::workflows::ids::StatementId;
use crate::workflows::underwriting::{
    ApplicantProfile, CreditCalculation, LoanApplicationRequest, LoanRequest, Offer, Passport,
    ScoringRequest, ValidationErrors,
};

use super::domain::{ClientRecord, FinishRegistrationRequest, Statement};
use super::lifecycle::{CompletionStatus, LifecycleError, StatementLifecycle};
use super::repository::StatementRepository;
use super::scorer::{RemoteScorer, UpstreamError};

/// Orchestrates the deal flow: open a statement, quote offers, accept one, then score and
/// settle the credit decision.
pub struct DealService<R, S> {
    lifecycle: StatementLifecycle<R>,
    scorer: Arc<S>,
}

impl<R, S> DealService<R, S>
where
    R: StatementRepository + 'static,
    S: RemoteScorer + 'static,
{
    pub fn new(repository: Arc<R>, scorer: Arc<S>, completion: CompletionStatus) -> Self {
        Self {
            lifecycle: StatementLifecycle::new(repository, completion),
            scorer,
        }
    }

    pub fn lifecycle(&self) -> &StatementLifecycle<R> {
        &self.lifecycle
    }

    /// Opens a statement and returns its pre-scoring offers stamped with the statement id,
    /// cheapest first.
    pub async fn create_statement(
        &self,
        request: LoanApplicationRequest,
    ) -> Result<Vec<Offer>, DealServiceError> {
        request.validate(Local::now().date_naive())?;

        let mut offers = self.scorer.offers(&request).await?;
        if offers.is_empty() {
            warn!(amount = %request.amount, term = request.term, "calculator returned no offers");
            return Err(UpstreamError::EmptyResponse.into());
        }

        // Only applications that received offers are persisted.
        let statement = self
            .lifecycle
            .create(ClientRecord::from_application(&request))?;
        let statement_id = statement.statement_id();

        for offer in &mut offers {
            offer.statement_id = Some(statement_id);
        }
        offers.sort_by(|left, right| left.rate.cmp(&right.rate));

        info!(%statement_id, offers = offers.len(), "statement created");
        Ok(offers)
    }

    pub fn select_offer(&self, offer: &Offer) -> Result<Statement, DealServiceError> {
        let statement_id = offer
            .statement_id
            .ok_or_else(|| ValidationErrors::single("statement_id", "is required"))?;
        offer.validate()?;
        Ok(self.lifecycle.accept_offer(&statement_id, offer)?)
    }

    /// Scores the applied offer with the finished registration data and records the decision.
    ///
    /// A rejection is not an error: the statement moves to CC_DENIED and is returned.
    pub async fn calculate_credit(
        &self,
        statement_id: &StatementId,
        finish: FinishRegistrationRequest,
    ) -> Result<Statement, DealServiceError> {
        finish.validate()?;

        let statement = self.lifecycle.fetch(statement_id)?;
        let scoring = scoring_request(&statement, finish)?;

        match self.scorer.calculate(&scoring).await? {
            CreditCalculation::Approved(terms) => {
                Ok(self.lifecycle.issue_credit(statement_id, terms)?)
            }
            CreditCalculation::Rejected(reason) => {
                Ok(self.lifecycle.deny_credit(statement_id, reason)?)
            }
        }
    }

    pub fn statement(&self, statement_id: &StatementId) -> Result<Statement, DealServiceError> {
        Ok(self.lifecycle.fetch(statement_id)?)
    }
}

fn scoring_request(
    statement: &Statement,
    finish: FinishRegistrationRequest,
) -> Result<ScoringRequest, LifecycleError> {
    let offer = statement.approved_offer("calculate credit for")?;
    let client = statement.client();

    Ok(ScoringRequest {
        loan: LoanRequest {
            amount: offer.requested_amount,
            term: offer.term,
        },
        applicant: ApplicantProfile {
            first_name: client.first_name.clone(),
            last_name: client.last_name.clone(),
            middle_name: client.middle_name.clone(),
            birthdate: client.birthdate,
            gender: finish.gender,
            marital_status: finish.marital_status,
            dependent_amount: finish.dependent_amount,
            employment: Some(finish.employment),
            passport: Passport {
                series: client.passport_series.clone(),
                number: client.passport_number.clone(),
                issue_date: finish.passport_issue_date,
                issue_branch: finish.passport_issue_branch,
            },
        },
        account_number: Some(finish.account_number),
        insurance_enabled: finish.insurance_enabled,
        salary_client: finish.salary_client,
    })
}

/// Error raised by the deal service.
#[derive(Debug, thiserror::Error)]
pub enum DealServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}
