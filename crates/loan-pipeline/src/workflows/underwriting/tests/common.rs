use axum::response::Response;
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::workflows::underwriting::{
    ApplicantProfile, Employment, EmploymentStatus, Gender, LoanApplicationRequest, LoanRequest,
    MaritalStatus, Passport, Position, ScoringRequest,
};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn birthdate_for_age(today: NaiveDate, age: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(age * 12))
        .expect("valid birthdate")
}

pub(super) fn employment() -> Employment {
    Employment {
        employment_status: EmploymentStatus::Employed,
        employer_inn: Some("7707083893".to_string()),
        salary: Some(dec!(50000)),
        position: Some(Position::Worker),
        work_experience_total: Some(36),
        work_experience_current: Some(12),
    }
}

/// Applicant that matches no underwriting rate rule, so the base rate comes back untouched.
pub(super) fn profile_aged(today: NaiveDate, age: u32) -> ApplicantProfile {
    ApplicantProfile {
        first_name: "Anna".to_string(),
        last_name: "Petrova".to_string(),
        middle_name: None,
        birthdate: birthdate_for_age(today, age),
        gender: Gender::Female,
        marital_status: MaritalStatus::Single,
        dependent_amount: 0,
        employment: Some(employment()),
        passport: Passport {
            series: "4510".to_string(),
            number: "123456".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2015, 3, 1),
            issue_branch: Some("Central district".to_string()),
        },
    }
}

pub(super) fn profile() -> ApplicantProfile {
    profile_aged(today(), 28)
}

pub(super) fn loan() -> LoanRequest {
    LoanRequest {
        amount: dec!(200000),
        term: 12,
    }
}

pub(super) fn scoring_request_for(applicant: ApplicantProfile) -> ScoringRequest {
    ScoringRequest {
        loan: loan(),
        applicant,
        account_number: Some("40817810099910004312".to_string()),
        insurance_enabled: false,
        salary_client: false,
    }
}

pub(super) fn scoring_request() -> ScoringRequest {
    scoring_request_for(profile())
}

pub(super) fn application(today: NaiveDate) -> LoanApplicationRequest {
    LoanApplicationRequest {
        amount: dec!(200000),
        term: 12,
        first_name: "Anna".to_string(),
        last_name: "Petrova".to_string(),
        middle_name: Some("Sergeevna".to_string()),
        email: "anna.petrova@example.com".to_string(),
        birthdate: birthdate_for_age(today, 28),
        passport_series: "4510".to_string(),
        passport_number: "123456".to_string(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimal serialized as string")
        .parse()
        .expect("decimal value")
}
