use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::workflows::ids::{OfferId, StatementId};

/// Smallest principal the lender will quote.
pub const MIN_LOAN_AMOUNT: Decimal = dec!(20000);
/// Shortest term, in months, the lender will quote.
pub const MIN_TERM_MONTHS: u32 = 6;
/// Largest principal accepted at the boundary. Keeps every derived figure inside `Decimal`.
pub const MAX_LOAN_AMOUNT: Decimal = dec!(1000000000);
/// Longest term, in months, accepted at the boundary.
pub const MAX_TERM_MONTHS: u32 = 600;
/// Largest monthly salary accepted at the boundary.
pub const MAX_MONTHLY_SALARY: Decimal = dec!(1000000000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    #[serde(alias = "NOT_BINARY")]
    NonBinary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    WidowWidower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentStatus {
    Unemployed,
    Employed,
    SelfEmployed,
    BusinessOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    Worker,
    MiddleManager,
    TopManager,
    Owner,
}

/// Employment block of a full applicant profile. Missing experience counts as zero months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employment {
    pub employment_status: EmploymentStatus,
    #[serde(default)]
    pub employer_inn: Option<String>,
    #[serde(default)]
    pub salary: Option<Decimal>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub work_experience_total: Option<u32>,
    #[serde(default)]
    pub work_experience_current: Option<u32>,
}

impl Employment {
    pub fn total_experience_months(&self) -> u32 {
        self.work_experience_total.unwrap_or(0)
    }

    pub fn current_experience_months(&self) -> u32 {
        self.work_experience_current.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passport {
    pub series: String,
    pub number: String,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub issue_branch: Option<String>,
}

/// Complete applicant data consumed by underwriting. Treated as immutable once scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub birthdate: NaiveDate,
    pub gender: Gender,
    pub marital_status: MaritalStatus,
    #[serde(default)]
    pub dependent_amount: u32,
    #[serde(default)]
    pub employment: Option<Employment>,
    pub passport: Passport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub amount: Decimal,
    pub term: u32,
}

/// Minimal data collected before pre-scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplicationRequest {
    pub amount: Decimal,
    pub term: u32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub email: String,
    pub birthdate: NaiveDate,
    pub passport_series: String,
    pub passport_number: String,
}

/// Full underwriting input: the loan, the applicant and the product flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRequest {
    pub loan: LoanRequest,
    pub applicant: ApplicantProfile,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub insurance_enabled: bool,
    #[serde(default)]
    pub salary_client: bool,
}

/// Indicative offer produced by pre-scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub offer_id: OfferId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_id: Option<StatementId>,
    pub requested_amount: Decimal,
    pub total_amount: Decimal,
    pub term: u32,
    pub monthly_payment: Decimal,
    pub rate: Decimal,
    pub insurance_enabled: bool,
    pub salary_client: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentScheduleEntry {
    pub period: u32,
    pub due_date: NaiveDate,
    pub total_payment: Decimal,
    pub interest_part: Decimal,
    pub principal_part: Decimal,
    pub remaining_balance: Decimal,
}

/// Priced loan produced by a successful underwriting pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTerms {
    pub amount: Decimal,
    pub term: u32,
    pub monthly_payment: Decimal,
    pub rate: Decimal,
    /// Flat-markup total cost of credit, not an effective APR.
    pub psk: Decimal,
    pub schedule: Vec<PaymentScheduleEntry>,
    pub insurance_enabled: bool,
    pub salary_client: bool,
}
