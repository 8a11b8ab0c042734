use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::domain::{ApplicantProfile, EmploymentStatus, LoanRequest};
use super::rates::{RateAdjustment, RateFactors, RateRuleEngine, RuleScope};

/// Hard-stop thresholds and the base rate used by full underwriting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnderwritingPolicy {
    pub base_rate: Decimal,
    pub min_age: u32,
    pub max_age: u32,
    pub min_total_experience_months: u32,
    pub min_current_experience_months: u32,
    pub max_salary_multiple: u32,
}

impl Default for UnderwritingPolicy {
    fn default() -> Self {
        Self {
            base_rate: dec!(20),
            min_age: 20,
            max_age: 65,
            min_total_experience_months: 18,
            min_current_experience_months: 3,
            max_salary_multiple: 24,
        }
    }
}

/// Business reasons for declining an application. These are outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum RejectionReason {
    AgeOutOfBounds {
        age: u32,
        min: u32,
        max: u32,
    },
    InsufficientExperience {
        total_months: u32,
        current_months: u32,
    },
    AmountExceedsSalaryMultiple {
        requested: Decimal,
        limit: Decimal,
        multiple: u32,
    },
    Unemployed,
}

impl RejectionReason {
    pub fn summary(&self) -> String {
        match self {
            RejectionReason::AgeOutOfBounds { age, min, max } => {
                format!("age out of bounds: {age} is outside {min}..={max}")
            }
            RejectionReason::InsufficientExperience {
                total_months,
                current_months,
            } => format!(
                "insufficient experience: {total_months} months total, \
                 {current_months} months current"
            ),
            RejectionReason::AmountExceedsSalaryMultiple {
                requested,
                limit,
                multiple,
            } => format!(
                "amount exceeds {multiple} salaries: requested {requested}, limit {limit}"
            ),
            RejectionReason::Unemployed => "unemployed".to_string(),
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Terminal result of underwriting. A rejection carries no rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ScoringDecision {
    Approved {
        rate: Decimal,
        adjustments: Vec<RateAdjustment>,
    },
    Rejected {
        reason: RejectionReason,
    },
}

impl ScoringDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, ScoringDecision::Approved { .. })
    }

    pub fn rate(&self) -> Option<Decimal> {
        match self {
            ScoringDecision::Approved { rate, .. } => Some(*rate),
            ScoringDecision::Rejected { .. } => None,
        }
    }

    pub fn rejection_reason(&self) -> Option<&RejectionReason> {
        match self {
            ScoringDecision::Approved { .. } => None,
            ScoringDecision::Rejected { reason } => Some(reason),
        }
    }
}

/// Whole years between `birthdate` and `today`; zero for birthdates in the future.
pub fn age_on(birthdate: NaiveDate, today: NaiveDate) -> u32 {
    today.years_since(birthdate).unwrap_or(0)
}

/// Stateless underwriter applying the policy's hard stops before pricing.
#[derive(Debug, Clone, Default)]
pub struct UnderwritingEngine {
    policy: UnderwritingPolicy,
}

impl UnderwritingEngine {
    pub fn new(policy: UnderwritingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &UnderwritingPolicy {
        &self.policy
    }

    /// Evaluates the hard stops in order and prices the loan when all of them pass.
    pub fn decide(
        &self,
        profile: &ApplicantProfile,
        request: &LoanRequest,
        today: NaiveDate,
    ) -> ScoringDecision {
        match self.hard_stop(profile, request, today) {
            Some(reason) => ScoringDecision::Rejected { reason },
            None => {
                let age = age_on(profile.birthdate, today);
                let factors = RateFactors::from_profile(profile, age);
                let adjusted = RateRuleEngine::adjust_rate(
                    self.policy.base_rate,
                    &factors,
                    RuleScope::Underwriting,
                );
                ScoringDecision::Approved {
                    rate: adjusted.rate,
                    adjustments: adjusted.adjustments,
                }
            }
        }
    }

    fn hard_stop(
        &self,
        profile: &ApplicantProfile,
        request: &LoanRequest,
        today: NaiveDate,
    ) -> Option<RejectionReason> {
        let policy = &self.policy;

        let age = age_on(profile.birthdate, today);
        if age < policy.min_age || age > policy.max_age {
            return Some(RejectionReason::AgeOutOfBounds {
                age,
                min: policy.min_age,
                max: policy.max_age,
            });
        }

        let employment = profile.employment.as_ref()?;

        let total_months = employment.total_experience_months();
        let current_months = employment.current_experience_months();
        if total_months < policy.min_total_experience_months
            || current_months < policy.min_current_experience_months
        {
            return Some(RejectionReason::InsufficientExperience {
                total_months,
                current_months,
            });
        }

        let salary = employment.salary.unwrap_or(Decimal::ZERO);
        if salary > Decimal::ZERO {
            // An overflowing limit exceeds any representable amount.
            let limit = salary.saturating_mul(Decimal::from(policy.max_salary_multiple));
            if request.amount > limit {
                return Some(RejectionReason::AmountExceedsSalaryMultiple {
                    requested: request.amount,
                    limit,
                    multiple: policy.max_salary_multiple,
                });
            }
        }

        if employment.employment_status == EmploymentStatus::Unemployed {
            return Some(RejectionReason::Unemployed);
        }

        None
    }
}
