use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::amortization::{build_schedule, monthly_payment, round_money, total_cost};
use super::decision::{RejectionReason, ScoringDecision, UnderwritingEngine, UnderwritingPolicy};
use super::domain::{CreditTerms, LoanApplicationRequest, Offer, ScoringRequest};
use super::offers::PreOfferGenerator;
use super::validation::ValidationErrors;

/// Outcome of a full calculation. Rejections are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum CreditCalculation {
    Approved(CreditTerms),
    Rejected(RejectionReason),
}

/// Facade composing pre-scoring, underwriting and amortization.
#[derive(Debug, Clone, Default)]
pub struct CalculatorService {
    engine: UnderwritingEngine,
    offers: PreOfferGenerator,
}

impl CalculatorService {
    pub fn new(policy: UnderwritingPolicy) -> Self {
        let offers = PreOfferGenerator::new(policy.base_rate);
        Self {
            engine: UnderwritingEngine::new(policy),
            offers,
        }
    }

    pub fn policy(&self) -> &UnderwritingPolicy {
        self.engine.policy()
    }

    /// Four indicative offers, cheapest first.
    pub fn offers(
        &self,
        request: &LoanApplicationRequest,
        today: NaiveDate,
    ) -> Result<Vec<Offer>, ValidationErrors> {
        request.validate(today)?;
        let offers = self.offers.generate(request.amount, request.term);
        info!(
            amount = %request.amount,
            term = request.term,
            offers = offers.len(),
            "pre-scoring offers generated"
        );
        Ok(offers)
    }

    /// Scores the applicant once and, when approved, prices the loan and builds its schedule.
    pub fn calculate(
        &self,
        request: &ScoringRequest,
        today: NaiveDate,
    ) -> Result<CreditCalculation, ValidationErrors> {
        request.validate(today)?;

        let rate = match self.engine.decide(&request.applicant, &request.loan, today) {
            ScoringDecision::Approved { rate, adjustments } => {
                info!(%rate, adjustments = adjustments.len(), "application approved");
                rate
            }
            ScoringDecision::Rejected { reason } => {
                info!(reason = %reason, "application rejected");
                return Ok(CreditCalculation::Rejected(reason));
            }
        };

        let amount = request.loan.amount;
        let term = request.loan.term;
        let psk = total_cost(amount, rate);
        let payment = monthly_payment(psk, term, rate);
        let schedule = build_schedule(psk, term, rate, payment, today);

        Ok(CreditCalculation::Approved(CreditTerms {
            amount,
            term,
            monthly_payment: round_money(payment),
            rate,
            psk: round_money(psk),
            schedule,
            insurance_enabled: request.insurance_enabled,
            salary_client: request.salary_client,
        }))
    }
}
