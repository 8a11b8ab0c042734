//! Annuity pricing and payment schedules.
//!
//! Every intermediate value keeps the full precision of [`Decimal`]; only the figures that are
//! displayed or persisted are rounded, half-up, to two places.

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::domain::PaymentScheduleEntry;

const PERCENT_PER_MONTH_DIVISOR: Decimal = dec!(1200);

/// Rounds a monetary amount to cents, half-up.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / PERCENT_PER_MONTH_DIVISOR
}

/// Fixed annuity payment: `P * r / (1 - (1 + r)^-n)`, unrounded.
pub fn monthly_payment(
    principal_cost: Decimal,
    term_months: u32,
    annual_rate_percent: Decimal,
) -> Decimal {
    if term_months == 0 {
        return principal_cost;
    }

    let rate = monthly_rate(annual_rate_percent);
    if rate.is_zero() {
        return principal_cost / Decimal::from(term_months);
    }

    let discount = pow_u32(Decimal::ONE / (Decimal::ONE + rate), term_months);
    principal_cost * rate / (Decimal::ONE - discount)
}

/// Total cost of credit as a flat markup on the amount. This is not an effective APR.
///
/// Saturates at `Decimal::MAX`; the HTTP boundary bounds amounts well below that.
pub fn total_cost(amount: Decimal, rate_percent: Decimal) -> Decimal {
    amount.saturating_mul(Decimal::ONE + rate_percent / dec!(100))
}

/// Splits each period's payment into interest and principal.
///
/// The last period settles whatever balance is left, so the final entry always closes at zero
/// and the principal parts add up to `principal_cost` within rounding.
pub fn build_schedule(
    principal_cost: Decimal,
    term_months: u32,
    annual_rate_percent: Decimal,
    monthly_payment: Decimal,
    issue_date: NaiveDate,
) -> Vec<PaymentScheduleEntry> {
    let rate = monthly_rate(annual_rate_percent);
    let mut remaining = principal_cost;
    let mut schedule = Vec::with_capacity(term_months as usize);

    for period in 1..=term_months {
        let interest_part = remaining * rate;
        let mut principal_part = monthly_payment - interest_part;
        let mut total_payment = monthly_payment;

        if remaining < principal_part || period == term_months {
            principal_part = remaining;
            total_payment = interest_part + principal_part;
        }

        remaining = (remaining - principal_part).max(Decimal::ZERO);

        schedule.push(PaymentScheduleEntry {
            period,
            due_date: due_date(issue_date, period),
            total_payment: round_money(total_payment),
            interest_part: round_money(interest_part),
            principal_part: round_money(principal_part),
            remaining_balance: round_money(remaining),
        });
    }

    schedule
}

fn due_date(issue_date: NaiveDate, period: u32) -> NaiveDate {
    issue_date
        .checked_add_months(Months::new(period))
        .unwrap_or(NaiveDate::MAX)
}

// Square-and-multiply; callers pass bases below one so the product cannot overflow.
fn pow_u32(base: Decimal, exponent: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let mut factor = base;
    let mut remaining = exponent;
    while remaining > 0 {
        if remaining & 1 == 1 {
            result *= factor;
        }
        factor *= factor;
        remaining >>= 1;
    }
    result
}
