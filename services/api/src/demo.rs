use crate::infra::InMemoryStatementRepository;
use chrono::{Local, Months, NaiveDate};
use clap::Args;
use loan_pipeline::error::AppError;
use loan_pipeline::workflows::statement::{
    CompletionStatus, DealService, FinishRegistrationRequest, LocalScorer, Statement,
};
use loan_pipeline::workflows::underwriting::amortization::{
    build_schedule, monthly_payment, round_money,
};
use loan_pipeline::workflows::underwriting::domain::{
    MAX_LOAN_AMOUNT, MAX_TERM_MONTHS, MIN_LOAN_AMOUNT, MIN_TERM_MONTHS,
};
use loan_pipeline::workflows::underwriting::{
    Employment, EmploymentStatus, Gender, LoanApplicationRequest, MaritalStatus, Offer,
    PaymentScheduleEntry, Position, PreOfferGenerator, UnderwritingPolicy,
};
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct OffersArgs {
    /// Requested loan amount
    #[arg(long)]
    pub(crate) amount: Decimal,
    /// Term in months
    #[arg(long)]
    pub(crate) term: u32,
    /// Base annual rate in percent before adjustments
    #[arg(long)]
    pub(crate) base_rate: Option<Decimal>,
}

#[derive(Args, Debug)]
pub(crate) struct ScheduleArgs {
    /// Principal to amortize
    #[arg(long)]
    pub(crate) amount: Decimal,
    /// Term in months
    #[arg(long)]
    pub(crate) term: u32,
    /// Annual rate in percent
    #[arg(long)]
    pub(crate) rate: Decimal,
    /// Issue date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) issue_date: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Requested loan amount. Defaults to 300000.
    #[arg(long)]
    pub(crate) amount: Option<Decimal>,
    /// Term in months. Defaults to 24.
    #[arg(long)]
    pub(crate) term: Option<u32>,
    /// Finish registration as unemployed to show a denial.
    #[arg(long)]
    pub(crate) unemployed: bool,
}

pub(crate) fn print_offers(args: OffersArgs) -> Result<(), AppError> {
    let OffersArgs {
        amount,
        term,
        base_rate,
    } = args;

    let amount_in_range = (MIN_LOAN_AMOUNT..=MAX_LOAN_AMOUNT).contains(&amount);
    if !amount_in_range || !(MIN_TERM_MONTHS..=MAX_TERM_MONTHS).contains(&term) {
        println!(
            "Amount must be {MIN_LOAN_AMOUNT} to {MAX_LOAN_AMOUNT} and term \
             {MIN_TERM_MONTHS} to {MAX_TERM_MONTHS} months"
        );
        return Ok(());
    }

    let base_rate = base_rate.unwrap_or_else(|| UnderwritingPolicy::default().base_rate);
    let offers = PreOfferGenerator::new(base_rate).generate(amount, term);
    println!("Pre-scoring offers for {amount} over {term} months (base rate {base_rate}%)");
    for offer in &offers {
        println!("{}", offer_line(offer));
    }
    Ok(())
}

pub(crate) fn print_schedule(args: ScheduleArgs) -> Result<(), AppError> {
    let ScheduleArgs {
        amount,
        term,
        rate,
        issue_date,
    } = args;

    if term == 0 || term > MAX_TERM_MONTHS || amount <= Decimal::ZERO || amount > MAX_LOAN_AMOUNT
    {
        println!("Amount must be positive up to {MAX_LOAN_AMOUNT}, term 1 to {MAX_TERM_MONTHS}");
        return Ok(());
    }
    if rate.is_sign_negative() || rate > Decimal::ONE_HUNDRED {
        println!("Rate must be between 0 and 100 percent");
        return Ok(());
    }

    let issue_date = issue_date.unwrap_or_else(|| Local::now().date_naive());
    let payment = monthly_payment(amount, term, rate);
    let schedule = build_schedule(amount, term, rate, payment, issue_date);

    println!(
        "Annuity schedule for {amount} at {rate}% over {term} months: {} per month",
        round_money(payment)
    );
    for entry in &schedule {
        println!("{}", schedule_line(entry));
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        amount,
        term,
        unemployed,
    } = args;

    let today = Local::now().date_naive();
    let request = demo_application(
        amount.unwrap_or(Decimal::from(300_000)),
        term.unwrap_or(24),
        today,
    );

    println!("Loan pipeline demo (in-memory storage)");
    let repository = Arc::new(InMemoryStatementRepository::default());
    let service = DealService::new(
        repository,
        Arc::new(LocalScorer::default()),
        CompletionStatus::CreditIssued,
    );

    let offers = match service.create_statement(request).await {
        Ok(offers) => offers,
        Err(err) => {
            println!("  Application rejected: {}", err);
            return Ok(());
        }
    };
    println!("- Pre-scoring returned {} offers:", offers.len());
    for offer in &offers {
        println!("  {}", offer_line(offer));
    }

    let Some(chosen) = offers.first() else {
        return Ok(());
    };
    let Some(statement_id) = chosen.statement_id else {
        println!("  Offers were not linked to a statement");
        return Ok(());
    };

    let approved = service.select_offer(chosen)?;
    println!(
        "- Selected offer at {}% -> statement {} is {}",
        chosen.rate,
        statement_id,
        approved.status()
    );

    let finish = demo_finish_registration(chosen, unemployed);
    let decided = service.calculate_credit(&statement_id, finish).await?;
    print_outcome(&decided);

    match serde_json::to_string_pretty(&decided.view()) {
        Ok(json) => println!("  Statement payload:\n{}", json),
        Err(err) => println!("  Statement payload unavailable: {}", err),
    }

    Ok(())
}

fn print_outcome(statement: &Statement) {
    println!("- Final status: {}", statement.status());
    if let Some(reason) = statement.rejection() {
        println!("  Rejection reason: {}", reason);
    }
    if let Some(credit) = statement.credit() {
        let terms = &credit.terms;
        println!(
            "  Credit {}: {} over {} months at {}% | {} per month | psk {}",
            credit.credit_id,
            terms.amount,
            terms.term,
            terms.rate,
            terms.monthly_payment,
            terms.psk
        );
        for entry in terms.schedule.iter().take(3) {
            println!("    {}", schedule_line(entry));
        }
        if terms.schedule.len() > 3 {
            println!("    ... {} more payments", terms.schedule.len() - 3);
        }
    }
    println!("  History:");
    for entry in statement.status_history().entries() {
        println!(
            "    - {} at {} ({:?})",
            entry.status,
            entry.time.format("%Y-%m-%d %H:%M:%S"),
            entry.change_type
        );
    }
}

fn offer_line(offer: &Offer) -> String {
    format!(
        "- rate {:>5}% | insurance {:<5} | salary client {:<5} | total {} | monthly {}",
        offer.rate,
        offer.insurance_enabled,
        offer.salary_client,
        offer.total_amount,
        offer.monthly_payment
    )
}

fn schedule_line(entry: &PaymentScheduleEntry) -> String {
    format!(
        "#{:>3} {} | payment {} | interest {} | principal {} | remaining {}",
        entry.period,
        entry.due_date,
        entry.total_payment,
        entry.interest_part,
        entry.principal_part,
        entry.remaining_balance
    )
}

fn demo_application(amount: Decimal, term: u32, today: NaiveDate) -> LoanApplicationRequest {
    LoanApplicationRequest {
        amount,
        term,
        first_name: "Maria".to_string(),
        last_name: "Orlova".to_string(),
        middle_name: None,
        email: "maria.orlova@example.com".to_string(),
        birthdate: today
            .checked_sub_months(Months::new(34 * 12))
            .unwrap_or(today),
        passport_series: "4512".to_string(),
        passport_number: "100200".to_string(),
    }
}

fn demo_finish_registration(offer: &Offer, unemployed: bool) -> FinishRegistrationRequest {
    let employment_status = if unemployed {
        EmploymentStatus::Unemployed
    } else {
        EmploymentStatus::Employed
    };

    FinishRegistrationRequest {
        gender: Gender::Female,
        marital_status: MaritalStatus::Married,
        dependent_amount: 1,
        employment: Employment {
            employment_status,
            employer_inn: Some("7736207543".to_string()),
            salary: Some(Decimal::from(90_000)),
            position: Some(Position::MiddleManager),
            work_experience_total: Some(120),
            work_experience_current: Some(40),
        },
        passport_issue_date: None,
        passport_issue_branch: None,
        account_number: "40817810500000000001".to_string(),
        insurance_enabled: offer.insurance_enabled,
        salary_client: offer.salary_client,
    }
}
