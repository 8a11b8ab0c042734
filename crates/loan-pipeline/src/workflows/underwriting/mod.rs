//! Calculator side of the pipeline: pre-scoring offers, underwriting decisions and annuity
//! pricing.

pub mod amortization;
pub mod decision;
pub mod domain;
pub mod offers;
pub mod rates;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use decision::{
    age_on, RejectionReason, ScoringDecision, UnderwritingEngine, UnderwritingPolicy,
};
pub use domain::{
    ApplicantProfile, CreditTerms, Employment, EmploymentStatus, Gender, LoanApplicationRequest,
    LoanRequest, MaritalStatus, Offer, Passport, PaymentScheduleEntry, Position, ScoringRequest,
};
pub use offers::PreOfferGenerator;
pub use rates::{AdjustedRate, RateAdjustment, RateFactors, RateRuleEngine, RuleScope};
pub use router::calculator_router;
pub use service::{CalculatorService, CreditCalculation};
pub use validation::{FieldViolation, ValidationErrors};
