//! Additive rate adjustments shared by pre-scoring and full underwriting.
//!
//! Both paths read the same rule table and differ only in the [`RuleScope`] they request, so a
//! change to a delta can never drift between the indicative offers and the final price.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::domain::{ApplicantProfile, EmploymentStatus, Gender, MaritalStatus, Position};

/// Which slice of the rule table a caller consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// Product flags only (insurance, salary client).
    PreScoring,
    /// Applicant attributes from the full profile.
    Underwriting,
}

/// Attributes the rules inspect. Pre-scoring only fills the product flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateFactors {
    pub marital_status: Option<MaritalStatus>,
    pub gender: Option<Gender>,
    pub age: Option<u32>,
    pub employment_status: Option<EmploymentStatus>,
    pub position: Option<Position>,
    pub insurance_enabled: bool,
    pub salary_client: bool,
}

impl RateFactors {
    pub fn product(insurance_enabled: bool, salary_client: bool) -> Self {
        Self {
            insurance_enabled,
            salary_client,
            ..Self::default()
        }
    }

    pub fn from_profile(profile: &ApplicantProfile, age: u32) -> Self {
        let employment = profile.employment.as_ref();
        Self {
            marital_status: Some(profile.marital_status),
            gender: Some(profile.gender),
            age: Some(age),
            employment_status: employment.map(|employment| employment.employment_status),
            position: employment.and_then(|employment| employment.position),
            insurance_enabled: false,
            salary_client: false,
        }
    }
}

/// A signed percentage-point delta that was applied to a rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateAdjustment {
    pub rule: String,
    pub delta: Decimal,
}

/// Result of running the rule table against a base rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustedRate {
    pub base: Decimal,
    pub rate: Decimal,
    pub adjustments: Vec<RateAdjustment>,
}

struct RateRule {
    name: &'static str,
    scope: RuleScope,
    delta: Decimal,
    applies: fn(&RateFactors) -> bool,
}

// Evaluation order is fixed for audit trails; every delta is additive.
const RATE_RULES: &[RateRule] = &[
    RateRule {
        name: "married",
        scope: RuleScope::Underwriting,
        delta: dec!(-3),
        applies: |factors| factors.marital_status == Some(MaritalStatus::Married),
    },
    RateRule {
        name: "divorced",
        scope: RuleScope::Underwriting,
        delta: dec!(1),
        applies: |factors| factors.marital_status == Some(MaritalStatus::Divorced),
    },
    RateRule {
        name: "female_32_to_60",
        scope: RuleScope::Underwriting,
        delta: dec!(-3),
        applies: |factors| {
            factors.gender == Some(Gender::Female)
                && factors.age.is_some_and(|age| (32..=60).contains(&age))
        },
    },
    RateRule {
        name: "male_30_to_55",
        scope: RuleScope::Underwriting,
        delta: dec!(-3),
        applies: |factors| {
            factors.gender == Some(Gender::Male)
                && factors.age.is_some_and(|age| (30..=55).contains(&age))
        },
    },
    RateRule {
        name: "non_binary",
        scope: RuleScope::Underwriting,
        delta: dec!(7),
        applies: |factors| factors.gender == Some(Gender::NonBinary),
    },
    RateRule {
        name: "self_employed",
        scope: RuleScope::Underwriting,
        delta: dec!(2),
        applies: |factors| factors.employment_status == Some(EmploymentStatus::SelfEmployed),
    },
    RateRule {
        name: "business_owner",
        scope: RuleScope::Underwriting,
        delta: dec!(1),
        applies: |factors| factors.employment_status == Some(EmploymentStatus::BusinessOwner),
    },
    RateRule {
        name: "middle_manager",
        scope: RuleScope::Underwriting,
        delta: dec!(-2),
        applies: |factors| factors.position == Some(Position::MiddleManager),
    },
    RateRule {
        name: "top_manager",
        scope: RuleScope::Underwriting,
        delta: dec!(-3),
        applies: |factors| factors.position == Some(Position::TopManager),
    },
    RateRule {
        name: "insurance",
        scope: RuleScope::PreScoring,
        delta: dec!(-1),
        applies: |factors| factors.insurance_enabled,
    },
    RateRule {
        name: "salary_client",
        scope: RuleScope::PreScoring,
        delta: dec!(-1),
        applies: |factors| factors.salary_client,
    },
];

/// Stateless engine applying [`RATE_RULES`] to a base annual rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateRuleEngine;

impl RateRuleEngine {
    /// Applies every in-scope rule and floors the result at zero.
    pub fn adjust_rate(base: Decimal, factors: &RateFactors, scope: RuleScope) -> AdjustedRate {
        let adjustments: Vec<RateAdjustment> = RATE_RULES
            .iter()
            .filter(|rule| rule.scope == scope && (rule.applies)(factors))
            .map(|rule| RateAdjustment {
                rule: rule.name.to_string(),
                delta: rule.delta,
            })
            .collect();

        let adjusted = adjustments
            .iter()
            .fold(base, |rate, adjustment| rate + adjustment.delta);

        AdjustedRate {
            base,
            rate: adjusted.max(Decimal::ZERO),
            adjustments,
        }
    }
}
