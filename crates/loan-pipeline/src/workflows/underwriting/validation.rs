//! Field-level checks applied at the HTTP boundary before anything reaches the core.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicantProfile, LoanApplicationRequest, Offer, ScoringRequest, MAX_LOAN_AMOUNT,
    MAX_MONTHLY_SALARY, MAX_TERM_MONTHS, MIN_LOAN_AMOUNT, MIN_TERM_MONTHS,
};

const NAME_MIN_LEN: usize = 2;
const NAME_MAX_LEN: usize = 30;
const EMAIL_SPECIALS: &str = "_!#$%&'*+/=?`{|}~^.-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Every violation found in a request, not just the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("request failed validation ({} field violation(s))", .errors.len())]
pub struct ValidationErrors {
    pub errors: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldViolation {
                field: field.to_string(),
                message: message.into(),
            }],
        }
    }

    pub fn mentions(&self, field: &str) -> bool {
        self.errors.iter().any(|violation| violation.field == field)
    }
}

#[derive(Default)]
pub(crate) struct ViolationCollector {
    errors: Vec<FieldViolation>,
}

impl ViolationCollector {
    pub(crate) fn check(&mut self, valid: bool, field: &str, message: &str) {
        if !valid {
            self.errors.push(FieldViolation {
                field: field.to_string(),
                message: message.to_string(),
            });
        }
    }

    pub(crate) fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                errors: self.errors,
            })
        }
    }
}

pub(crate) fn is_latin_name(value: &str) -> bool {
    (NAME_MIN_LEN..=NAME_MAX_LEN).contains(&value.len())
        && value.chars().all(|c| c.is_ascii_alphabetic())
}

pub(crate) fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || EMAIL_SPECIALS.contains(c))
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

pub(crate) fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn check_names(
    collector: &mut ViolationCollector,
    first_name: &str,
    last_name: &str,
    middle_name: Option<&str>,
) {
    collector.check(
        is_latin_name(first_name),
        "first_name",
        "must be 2 to 30 latin letters",
    );
    collector.check(
        is_latin_name(last_name),
        "last_name",
        "must be 2 to 30 latin letters",
    );
    if let Some(middle_name) = middle_name {
        collector.check(
            is_latin_name(middle_name),
            "middle_name",
            "must be 2 to 30 latin letters",
        );
    }
}

fn check_loan(collector: &mut ViolationCollector, amount: Decimal, term: u32) {
    collector.check(
        amount >= MIN_LOAN_AMOUNT,
        "amount",
        "must be at least 20000",
    );
    collector.check(
        amount <= MAX_LOAN_AMOUNT,
        "amount",
        "must not exceed 1000000000",
    );
    collector.check(
        term >= MIN_TERM_MONTHS,
        "term",
        "must be at least 6 months",
    );
    collector.check(
        term <= MAX_TERM_MONTHS,
        "term",
        "must not exceed 600 months",
    );
}

pub(crate) fn check_salary(collector: &mut ViolationCollector, salary: Decimal) {
    collector.check(
        !salary.is_sign_negative(),
        "employment.salary",
        "must not be negative",
    );
    collector.check(
        salary <= MAX_MONTHLY_SALARY,
        "employment.salary",
        "must not exceed 1000000000",
    );
}

impl LoanApplicationRequest {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut collector = ViolationCollector::default();
        check_loan(&mut collector, self.amount, self.term);
        check_names(
            &mut collector,
            &self.first_name,
            &self.last_name,
            self.middle_name.as_deref(),
        );
        collector.check(is_email(&self.email), "email", "is not a valid email address");
        collector.check(
            self.birthdate <= today,
            "birthdate",
            "must not be in the future",
        );
        collector.check(
            is_digits(&self.passport_series, 4),
            "passport_series",
            "must be exactly 4 digits",
        );
        collector.check(
            is_digits(&self.passport_number, 6),
            "passport_number",
            "must be exactly 6 digits",
        );
        collector.finish()
    }
}

pub(crate) fn check_applicant(
    collector: &mut ViolationCollector,
    applicant: &ApplicantProfile,
    today: NaiveDate,
) {
    check_names(
        collector,
        &applicant.first_name,
        &applicant.last_name,
        applicant.middle_name.as_deref(),
    );
    collector.check(
        applicant.birthdate <= today,
        "birthdate",
        "must not be in the future",
    );
    collector.check(
        is_digits(&applicant.passport.series, 4),
        "passport_series",
        "must be exactly 4 digits",
    );
    collector.check(
        is_digits(&applicant.passport.number, 6),
        "passport_number",
        "must be exactly 6 digits",
    );
    if let Some(salary) = applicant
        .employment
        .as_ref()
        .and_then(|employment| employment.salary)
    {
        check_salary(collector, salary);
    }
}

impl ScoringRequest {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut collector = ViolationCollector::default();
        check_loan(&mut collector, self.loan.amount, self.loan.term);
        check_applicant(&mut collector, &self.applicant, today);
        collector.finish()
    }
}

impl Offer {
    /// Checks the loan an offer commits to before it is accepted.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut collector = ViolationCollector::default();
        check_loan(&mut collector, self.requested_amount, self.term);
        collector.finish()
    }
}
