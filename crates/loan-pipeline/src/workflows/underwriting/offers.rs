use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::amortization::{monthly_payment, round_money};
use super::domain::Offer;
use super::rates::{RateFactors, RateRuleEngine, RuleScope};
use crate::workflows::ids::OfferId;

/// Principal added to an offer when insurance is bundled into the loan.
pub const INSURANCE_PRINCIPAL_SURCHARGE: Decimal = dec!(50000);

// (insurance_enabled, salary_client), in the order ties are kept after sorting.
const PRODUCT_MATRIX: [(bool, bool); 4] =
    [(false, false), (false, true), (true, false), (true, true)];

/// Builds the four indicative offers quoted before full underwriting.
#[derive(Debug, Clone)]
pub struct PreOfferGenerator {
    base_rate: Decimal,
}

impl Default for PreOfferGenerator {
    fn default() -> Self {
        Self::new(dec!(20))
    }
}

impl PreOfferGenerator {
    pub fn new(base_rate: Decimal) -> Self {
        Self { base_rate }
    }

    /// One offer per insurance/salary-client combination, sorted by rate ascending.
    pub fn generate(&self, amount: Decimal, term: u32) -> Vec<Offer> {
        let mut offers: Vec<Offer> = PRODUCT_MATRIX
            .iter()
            .map(|&(insurance_enabled, salary_client)| {
                self.offer_for(amount, term, insurance_enabled, salary_client)
            })
            .collect();

        offers.sort_by(|left, right| left.rate.cmp(&right.rate));
        offers
    }

    fn offer_for(
        &self,
        amount: Decimal,
        term: u32,
        insurance_enabled: bool,
        salary_client: bool,
    ) -> Offer {
        let factors = RateFactors::product(insurance_enabled, salary_client);
        let rate =
            RateRuleEngine::adjust_rate(self.base_rate, &factors, RuleScope::PreScoring).rate;

        let total_amount = if insurance_enabled {
            amount.saturating_add(INSURANCE_PRINCIPAL_SURCHARGE)
        } else {
            amount
        };

        Offer {
            offer_id: OfferId::generate(),
            statement_id: None,
            requested_amount: amount,
            total_amount,
            term,
            monthly_payment: round_money(monthly_payment(total_amount, term, rate)),
            rate,
            insurance_enabled,
            salary_client,
        }
    }
}
