use super::common::*;
use rust_decimal_macros::dec;

use crate::workflows::underwriting::{
    age_on, EmploymentStatus, Gender, LoanRequest, MaritalStatus, Position, RejectionReason,
    ScoringDecision, UnderwritingEngine,
};

fn decide_for_age(age: u32) -> ScoringDecision {
    UnderwritingEngine::default().decide(&profile_aged(today(), age), &loan(), today())
}

#[test]
fn age_bounds_are_inclusive() {
    for age in [19, 66] {
        let decision = decide_for_age(age);
        assert!(
            matches!(
                decision.rejection_reason(),
                Some(RejectionReason::AgeOutOfBounds { .. })
            ),
            "age {age} should be rejected, got {decision:?}"
        );
        assert!(decision
            .rejection_reason()
            .map(RejectionReason::summary)
            .is_some_and(|summary| summary.starts_with("age out of bounds")));
    }

    for age in [20, 65] {
        assert!(decide_for_age(age).is_approved(), "age {age} should pass");
    }
}

#[test]
fn age_counts_whole_years() {
    let birthdate = chrono::NaiveDate::from_ymd_opt(2000, 6, 16).expect("valid date");
    assert_eq!(age_on(birthdate, today()), 24);
    let birthdate = chrono::NaiveDate::from_ymd_opt(2000, 6, 15).expect("valid date");
    assert_eq!(age_on(birthdate, today()), 25);
}

#[test]
fn experience_thresholds() {
    let engine = UnderwritingEngine::default();

    let mut applicant = profile();
    if let Some(employment) = applicant.employment.as_mut() {
        employment.work_experience_total = Some(17);
        employment.work_experience_current = Some(12);
    }
    let decision = engine.decide(&applicant, &loan(), today());
    assert_eq!(
        decision.rejection_reason(),
        Some(&RejectionReason::InsufficientExperience {
            total_months: 17,
            current_months: 12,
        })
    );
    assert!(decision
        .rejection_reason()
        .map(RejectionReason::summary)
        .is_some_and(|summary| summary.starts_with("insufficient experience")));

    if let Some(employment) = applicant.employment.as_mut() {
        employment.work_experience_total = Some(18);
        employment.work_experience_current = Some(3);
    }
    assert!(engine.decide(&applicant, &loan(), today()).is_approved());

    if let Some(employment) = applicant.employment.as_mut() {
        employment.work_experience_current = Some(2);
    }
    assert!(!engine.decide(&applicant, &loan(), today()).is_approved());
}

#[test]
fn missing_experience_counts_as_zero() {
    let mut applicant = profile();
    if let Some(employment) = applicant.employment.as_mut() {
        employment.work_experience_total = None;
    }

    let decision = UnderwritingEngine::default().decide(&applicant, &loan(), today());
    assert!(matches!(
        decision.rejection_reason(),
        Some(RejectionReason::InsufficientExperience { total_months: 0, .. })
    ));
}

#[test]
fn requested_amount_is_capped_at_twenty_four_salaries() {
    let engine = UnderwritingEngine::default();
    let mut applicant = profile();
    if let Some(employment) = applicant.employment.as_mut() {
        employment.salary = Some(dec!(10000));
    }

    let over = LoanRequest {
        amount: dec!(250000),
        term: 12,
    };
    assert_eq!(
        engine.decide(&applicant, &over, today()).rejection_reason(),
        Some(&RejectionReason::AmountExceedsSalaryMultiple {
            requested: dec!(250000),
            limit: dec!(240000),
            multiple: 24,
        })
    );

    let at_limit = LoanRequest {
        amount: dec!(240000),
        term: 12,
    };
    assert!(engine.decide(&applicant, &at_limit, today()).is_approved());
}

#[test]
fn unemployed_applicants_are_rejected() {
    let mut applicant = profile();
    if let Some(employment) = applicant.employment.as_mut() {
        employment.employment_status = EmploymentStatus::Unemployed;
    }

    let decision = UnderwritingEngine::default().decide(&applicant, &loan(), today());
    assert_eq!(decision.rejection_reason(), Some(&RejectionReason::Unemployed));
    assert_eq!(decision.rate(), None);
}

#[test]
fn applicant_without_employment_skips_employment_checks() {
    let mut applicant = profile();
    applicant.employment = None;

    let decision = UnderwritingEngine::default().decide(&applicant, &loan(), today());
    assert_eq!(decision.rate(), Some(dec!(20)));
}

#[test]
fn approval_carries_rate_and_adjustment_trail() {
    let mut applicant = profile_aged(today(), 35);
    applicant.gender = Gender::Male;
    applicant.marital_status = MaritalStatus::Married;
    if let Some(employment) = applicant.employment.as_mut() {
        employment.employment_status = EmploymentStatus::SelfEmployed;
        employment.position = Some(Position::TopManager);
    }

    match UnderwritingEngine::default().decide(&applicant, &loan(), today()) {
        ScoringDecision::Approved { rate, adjustments } => {
            assert_eq!(rate, dec!(13));
            let rules: Vec<&str> = adjustments
                .iter()
                .map(|adjustment| adjustment.rule.as_str())
                .collect();
            assert_eq!(
                rules,
                vec!["married", "male_30_to_55", "self_employed", "top_manager"]
            );
        }
        other => panic!("expected approval, got {other:?}"),
    }
}

#[test]
fn rejection_reason_serializes_with_code() {
    let reason = RejectionReason::AgeOutOfBounds {
        age: 19,
        min: 20,
        max: 65,
    };
    let value = serde_json::to_value(&reason).expect("serialize");
    assert_eq!(value["code"], "age_out_of_bounds");
    assert_eq!(value["age"], 19);
}

#[test]
fn income_check_tolerates_salaries_near_the_decimal_limit() {
    let mut applicant = profile();
    if let Some(employment) = applicant.employment.as_mut() {
        employment.salary = Some(
            "10000000000000000000000000000"
                .parse()
                .expect("representable salary"),
        );
    }
    let request = LoanRequest {
        amount: "70000000000000000000000000000"
            .parse()
            .expect("representable amount"),
        term: 12,
    };

    let decision = UnderwritingEngine::default().decide(&applicant, &request, today());
    assert!(decision.is_approved());
}
