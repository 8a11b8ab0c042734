use super::common::*;
use rust_decimal_macros::dec;

use crate::workflows::underwriting::validation::{is_digits, is_email, is_latin_name};

#[test]
fn valid_application_passes() {
    assert!(application(today()).validate(today()).is_ok());
}

#[test]
fn every_violation_is_reported() {
    let mut request = application(today());
    request.first_name = "A".to_string();
    request.last_name = "Petrova1".to_string();
    request.middle_name = Some("X".repeat(31));
    request.passport_series = "45100".to_string();
    request.passport_number = "12345a".to_string();
    request.birthdate = today().succ_opt().expect("valid date");

    let errors = request.validate(today()).expect_err("invalid request");
    for field in [
        "first_name",
        "last_name",
        "middle_name",
        "passport_series",
        "passport_number",
        "birthdate",
    ] {
        assert!(errors.mentions(field), "missing violation for {field}");
    }
    assert!(!errors.mentions("amount"));
}

#[test]
fn loan_minimums_are_inclusive() {
    let mut request = application(today());
    request.amount = dec!(20000);
    request.term = 6;
    assert!(request.validate(today()).is_ok());

    request.amount = dec!(19999.99);
    request.term = 5;
    let errors = request.validate(today()).expect_err("below minimums");
    assert!(errors.mentions("amount"));
    assert!(errors.mentions("term"));
}

#[test]
fn scoring_request_rejects_negative_salary() {
    let mut request = scoring_request();
    if let Some(employment) = request.applicant.employment.as_mut() {
        employment.salary = Some(dec!(-1));
    }

    let errors = request.validate(today()).expect_err("negative salary");
    assert!(errors.mentions("employment.salary"));
}

#[test]
fn field_predicates() {
    assert!(is_latin_name("Li"));
    assert!(!is_latin_name("Ölga"));
    assert!(!is_latin_name("Anna Maria"));

    assert!(is_email("first.last+tag@mail.example.org"));
    assert!(!is_email("missing-at.example.org"));
    assert!(!is_email("@example.org"));
    assert!(!is_email("user@"));
    assert!(!is_email("user@exa mple.org"));

    assert!(is_digits("0042", 4));
    assert!(!is_digits("042", 4));
    assert!(!is_digits("04a2", 4));
}

#[test]
fn loan_maximums_are_inclusive() {
    let mut request = application(today());
    request.amount = dec!(1000000000);
    request.term = 600;
    assert!(request.validate(today()).is_ok());

    request.amount = dec!(1000000000.01);
    request.term = 601;
    let errors = request.validate(today()).expect_err("above maximums");
    assert!(errors.mentions("amount"));
    assert!(errors.mentions("term"));
}

#[test]
fn scoring_request_rejects_unbounded_salary() {
    let mut request = scoring_request();
    if let Some(employment) = request.applicant.employment.as_mut() {
        employment.salary = Some(dec!(1000000000.01));
    }

    let errors = request.validate(today()).expect_err("salary above bound");
    assert!(errors.mentions("employment.salary"));
}
