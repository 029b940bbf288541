//! Amortization engine: loan terms in, full repayment schedule out.
//!
//! Balances run on unrounded `Decimal` values. Level-payment balances come
//! from the closed form of the recurrence, so the last row clears exactly
//! even when compounding outruns decimal precision. Each emitted
//! [`ScheduleRow`] carries amounts rounded to cents, and the totals are
//! summed from those rounded rows so that they reconcile with the table.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::calendar::parse_start_date;
use crate::amortization::frequency::{AmortizationMethod, RepaymentFrequency};
use crate::error::PathPayError;
use crate::time_value::{equal_principal_installment, level_balance, level_payment};
use crate::types::{round_money, with_metadata, ComputationOutput, Money, Rate};
use crate::PathPayResult;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// Loan terms for a single calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    /// Amount borrowed.
    pub principal: Money,
    /// Nominal annual interest rate as a percentage (12 = 12% p.a.).
    pub annual_rate_percent: Decimal,
    /// Loan term in months.
    pub term_months: i32,
    #[serde(default)]
    pub repayment_frequency: RepaymentFrequency,
    #[serde(default)]
    pub amortization_method: AmortizationMethod,
    /// First due date as typed (`DD/MM/YYYY` or `YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}

/// One installment of the schedule. Amounts are rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based installment number.
    pub period: u32,
    /// `None` when the loan has no usable start date.
    pub due_date: Option<NaiveDate>,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    /// Outstanding balance after this installment, never negative.
    pub remaining_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// Level installment, or the first (largest) installment for equal-principal loans.
    pub periodic_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub payoff_date: Option<NaiveDate>,
    pub total_periods: u32,
    /// Unrounded per-period rate as a decimal.
    pub periodic_rate: Rate,
    pub schedule: Vec<ScheduleRow>,
}

impl AmortizationResult {
    pub fn first_payment(&self) -> Option<Money> {
        self.schedule.first().map(|r| r.payment)
    }

    pub fn last_payment(&self) -> Option<Money> {
        self.schedule.last().map(|r| r.payment)
    }
}

/// Rows reserved up front; longer schedules grow the vector as they go.
const PREALLOCATED_ROWS: u32 = 2_600;

fn row_capacity(total_periods: u32) -> usize {
    total_periods.min(PREALLOCATED_ROWS) as usize
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the full repayment schedule for `input`.
///
/// # Errors
///
/// Returns [`PathPayError::InvalidInput`] when the principal is not positive,
/// the rate is negative, or the term is not at least one month. Amounts so
/// large that a single period's interest leaves decimal range are rejected too.
pub fn amortize(input: &LoanInput) -> PathPayResult<AmortizationResult> {
    validate(input)?;

    let frequency = input.repayment_frequency;
    let total_periods = frequency.total_periods(input.term_months)?;
    let rate = frequency.periodic_rate(input.annual_rate_percent);
    let start = input.start_date.as_deref().and_then(parse_start_date);

    let level = match input.amortization_method {
        AmortizationMethod::EqualTotalPayment => {
            Some(level_payment(rate, total_periods, input.principal)?)
        }
        AmortizationMethod::EqualPrincipalPayment => None,
    };
    let fixed_principal = equal_principal_installment(input.principal, total_periods)?;

    let mut balance = input.principal;
    let mut schedule = Vec::with_capacity(row_capacity(total_periods));

    for period in 1..=total_periods {
        let interest = balance.checked_mul(rate).ok_or_else(|| {
            PathPayError::invalid("principal", "Interest overflows decimal precision")
        })?;
        let (payment, principal_part, next_balance) = match level {
            Some(payment) => {
                let next = level_balance(rate, total_periods, input.principal, period);
                (payment, balance - next, next)
            }
            None => (fixed_principal + interest, fixed_principal, balance - fixed_principal),
        };

        balance = if next_balance.is_sign_negative() {
            Decimal::ZERO
        } else {
            next_balance
        };

        schedule.push(ScheduleRow {
            period,
            due_date: start.and_then(|d| frequency.advance(d, period - 1)),
            payment: round_money(payment),
            interest: round_money(interest),
            principal: round_money(principal_part),
            remaining_balance: round_money(balance),
        });
    }

    let periodic_payment = match level {
        Some(payment) => round_money(payment),
        None => schedule.first().map(|r| r.payment).unwrap_or_default(),
    };
    let total_payment: Money = schedule.iter().map(|r| r.payment).sum();

    Ok(AmortizationResult {
        periodic_payment,
        total_payment,
        total_interest: total_payment - input.principal,
        payoff_date: start.and_then(|d| frequency.advance(d, total_periods)),
        total_periods,
        periodic_rate: rate,
        schedule,
    })
}

/// [`amortize`] wrapped in the standard computation envelope, with warnings
/// for inputs that were adjusted or only partly usable.
pub fn calculate_loan(input: &LoanInput) -> PathPayResult<ComputationOutput<AmortizationResult>> {
    let start = Instant::now();
    let result = amortize(input)?;
    let warnings = collect_warnings(input, &result);

    let methodology = match input.amortization_method {
        AmortizationMethod::EqualTotalPayment => "Equal Total Payment (annuity) amortization",
        AmortizationMethod::EqualPrincipalPayment => {
            "Equal Principal Payment (declining balance) amortization"
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, result))
}

// ---------------------------------------------------------------------------
// Validation and warnings
// ---------------------------------------------------------------------------

fn validate(input: &LoanInput) -> PathPayResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(PathPayError::invalid("principal", "Loan amount must be positive"));
    }
    if input.annual_rate_percent.is_sign_negative() && !input.annual_rate_percent.is_zero() {
        return Err(PathPayError::invalid(
            "annual_rate_percent",
            "Interest rate cannot be negative",
        ));
    }
    if input.term_months <= 0 {
        return Err(PathPayError::invalid(
            "term_months",
            "Loan term must be at least one month",
        ));
    }
    Ok(())
}

fn collect_warnings(input: &LoanInput, result: &AmortizationResult) -> Vec<String> {
    let mut warnings = Vec::new();
    let frequency = input.repayment_frequency;

    if input.annual_rate_percent.is_zero() {
        warnings.push("Zero interest rate: principal is repaid in equal straight-line installments".into());
    }

    let exact = Decimal::from(input.term_months) * Decimal::from(frequency.periods_per_year())
        / Decimal::from(12);
    if exact != Decimal::from(result.total_periods) {
        if frequency == RepaymentFrequency::Yearly && input.term_months < 12 {
            warnings.push(format!(
                "Term of {} months is shorter than one year; a single yearly installment is scheduled",
                input.term_months
            ));
        } else {
            warnings.push(format!(
                "Term of {} months is {} {} periods; rounded to {}",
                input.term_months,
                exact.round_dp(2).normalize(),
                frequency,
                result.total_periods
            ));
        }
    }

    if let Some(raw) = input.start_date.as_deref() {
        if result.payoff_date.is_none() {
            warnings.push(format!(
                "Start date '{raw}' could not be read; the schedule carries no calendar dates"
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const TOL: Decimal = dec!(0.01);

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_input(principal: Decimal, rate: Decimal, months: i32) -> LoanInput {
        LoanInput {
            principal,
            annual_rate_percent: rate,
            term_months: months,
            repayment_frequency: RepaymentFrequency::Monthly,
            amortization_method: AmortizationMethod::EqualTotalPayment,
            start_date: None,
        }
    }

    #[test]
    fn test_equal_total_reference_loan() {
        let input = monthly_input(dec!(10_000_000), dec!(12), 12);
        let result = amortize(&input).unwrap();

        assert_eq!(result.periodic_rate, dec!(0.01));
        assert_eq!(result.total_periods, 12);
        assert_eq!(result.periodic_payment, dec!(888487.89));
        assert_close(result.total_payment, dec!(10_661_854.68), TOL, "total payment");
        assert_close(result.total_interest, dec!(661_854.68), TOL, "total interest");

        let first = &result.schedule[0];
        assert_eq!(first.interest, dec!(100000.00));
        assert_eq!(first.principal, dec!(788487.89));
        assert_eq!(first.remaining_balance, dec!(9211512.11));
    }

    #[test]
    fn test_every_level_row_pays_the_same() {
        let result = amortize(&monthly_input(dec!(12_000), dec!(12), 12)).unwrap();
        assert_eq!(result.periodic_payment, dec!(1066.19));
        assert!(result.schedule.iter().all(|r| r.payment == dec!(1066.19)));
        assert_eq!(result.total_payment, dec!(12794.28));
    }

    #[test]
    fn test_equal_principal_schedule() {
        let mut input = monthly_input(dec!(12_000), dec!(12), 12);
        input.amortization_method = AmortizationMethod::EqualPrincipalPayment;
        let result = amortize(&input).unwrap();

        assert_eq!(result.periodic_payment, dec!(1120.00));
        assert_eq!(result.first_payment(), Some(dec!(1120.00)));
        assert_eq!(result.last_payment(), Some(dec!(1010.00)));
        assert_eq!(result.total_payment, dec!(12780.00));
        assert_eq!(result.total_interest, dec!(780.00));
        assert!(result.schedule.iter().all(|r| r.principal == dec!(1000.00)));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let result = amortize(&monthly_input(dec!(12_000), dec!(0), 12)).unwrap();
        assert_eq!(result.periodic_rate, Decimal::ZERO);
        assert_eq!(result.periodic_payment, dec!(1000));
        assert!(result.schedule.iter().all(|r| r.interest.is_zero()));
        assert_eq!(result.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_final_balance_is_zero() {
        let mut input = monthly_input(dec!(360_000), dec!(10.5), 420);
        let result = amortize(&input).unwrap();
        assert_eq!(result.schedule.last().unwrap().remaining_balance, dec!(0.00));
        assert_eq!(result.periodic_payment, dec!(3233.28));

        input.amortization_method = AmortizationMethod::EqualPrincipalPayment;
        let result = amortize(&input).unwrap();
        assert_eq!(result.schedule.last().unwrap().remaining_balance, dec!(0.00));
    }

    #[test]
    fn test_yearly_sub_year_term_has_one_period() {
        let input = LoanInput {
            principal: dec!(5000),
            annual_rate_percent: dec!(10),
            term_months: 6,
            repayment_frequency: RepaymentFrequency::Yearly,
            amortization_method: AmortizationMethod::EqualTotalPayment,
            start_date: Some("15/03/2024".into()),
        };
        let result = amortize(&input).unwrap();
        assert_eq!(result.total_periods, 1);
        assert_eq!(result.periodic_payment, dec!(5500.00));
        assert_eq!(result.schedule[0].due_date, Some(ymd(2024, 3, 15)));
        assert_eq!(result.payoff_date, Some(ymd(2025, 3, 15)));
    }

    #[test]
    fn test_due_dates_and_payoff_monthly() {
        let mut input = monthly_input(dec!(3000), dec!(6), 3);
        input.start_date = Some("01/01/2024".into());
        let result = amortize(&input).unwrap();

        let dates: Vec<_> = result.schedule.iter().map(|r| r.due_date).collect();
        assert_eq!(
            dates,
            vec![Some(ymd(2024, 1, 1)), Some(ymd(2024, 2, 1)), Some(ymd(2024, 3, 1))]
        );
        assert_eq!(result.payoff_date, Some(ymd(2024, 4, 1)));
    }

    #[test]
    fn test_due_dates_weekly() {
        let mut input = monthly_input(dec!(10_000), dec!(6), 12);
        input.repayment_frequency = RepaymentFrequency::Weekly;
        input.start_date = Some("2024-01-01".into());
        let result = amortize(&input).unwrap();

        assert_eq!(result.total_periods, 52);
        assert_eq!(result.schedule[1].due_date, Some(ymd(2024, 1, 8)));
        assert_eq!(result.schedule[51].due_date, Some(ymd(2024, 12, 23)));
        assert_eq!(result.payoff_date, Some(ymd(2024, 12, 30)));
        assert_close(result.periodic_payment, dec!(198.25), TOL, "weekly payment");
    }

    #[test]
    fn test_missing_or_bad_start_date_gives_unknown_dates() {
        let mut input = monthly_input(dec!(1000), dec!(5), 6);
        let result = amortize(&input).unwrap();
        assert!(result.schedule.iter().all(|r| r.due_date.is_none()));
        assert_eq!(result.payoff_date, None);

        input.start_date = Some("not a date".into());
        let result = amortize(&input).unwrap();
        assert!(result.schedule.iter().all(|r| r.due_date.is_none()));
        assert_eq!(result.payoff_date, None);
    }

    #[test]
    fn test_month_end_start_rolls_into_next_month() {
        let mut input = monthly_input(dec!(3000), dec!(6), 3);
        input.start_date = Some("31/01/2024".into());
        let result = amortize(&input).unwrap();

        let dates: Vec<_> = result.schedule.iter().map(|r| r.due_date).collect();
        assert_eq!(
            dates,
            vec![Some(ymd(2024, 1, 31)), Some(ymd(2024, 3, 2)), Some(ymd(2024, 3, 31))]
        );
        assert_eq!(result.payoff_date, Some(ymd(2024, 5, 1)));
    }

    #[test]
    fn test_extreme_rate_pays_interest_until_the_end() {
        // 300% p.a. weekly over 30 years: (1 + r)^1560 exceeds decimal range
        let input = LoanInput {
            principal: dec!(10_000),
            annual_rate_percent: dec!(300),
            term_months: 360,
            repayment_frequency: RepaymentFrequency::Weekly,
            amortization_method: AmortizationMethod::EqualTotalPayment,
            start_date: None,
        };
        let result = amortize(&input).unwrap();

        assert_eq!(result.total_periods, 1560);
        assert_eq!(result.periodic_payment, dec!(576.92));
        assert_eq!(result.schedule[0].interest, dec!(576.92));
        assert_eq!(result.schedule[0].principal, dec!(0.00));
        assert!(result
            .schedule
            .iter()
            .all(|r| !r.remaining_balance.is_sign_negative()));
        assert_eq!(result.schedule.last().unwrap().remaining_balance, dec!(0.00));

        let repaid: Decimal = result.schedule.iter().map(|r| r.principal).sum();
        assert_close(repaid, dec!(10_000), dec!(0.01) * dec!(1560), "principal repaid");
    }

    #[test]
    fn test_row_capacity_is_bounded() {
        assert_eq!(row_capacity(12), 12);
        assert_eq!(row_capacity(u32::MAX), PREALLOCATED_ROWS as usize);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let cases = [
            (monthly_input(dec!(0), dec!(5), 12), "principal"),
            (monthly_input(dec!(-100), dec!(5), 12), "principal"),
            (monthly_input(dec!(1000), dec!(-1), 12), "annual_rate_percent"),
            (monthly_input(dec!(1000), dec!(5), 0), "term_months"),
            (monthly_input(dec!(1000), dec!(5), -3), "term_months"),
        ];
        for (input, expected_field) in cases {
            match amortize(&input) {
                Err(PathPayError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
                other => panic!("expected InvalidInput for {expected_field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_amortize_is_deterministic() {
        let mut input = monthly_input(dec!(250_000), dec!(7.25), 360);
        input.start_date = Some("29/02/2024".into());
        assert_eq!(amortize(&input).unwrap(), amortize(&input).unwrap());
    }

    #[test]
    fn test_calculate_loan_warnings() {
        let mut input = monthly_input(dec!(1000), dec!(0), 7);
        input.repayment_frequency = RepaymentFrequency::Weekly;
        input.start_date = Some("32/01/2024".into());

        let out = calculate_loan(&input).unwrap();
        assert_eq!(out.result.total_periods, 30);
        assert_eq!(out.warnings.len(), 3, "warnings: {:?}", out.warnings);
        assert!(out.warnings[1].contains("rounded to 30"));
        assert!(out.methodology.starts_with("Equal Total Payment"));
    }

    #[test]
    fn test_calculate_loan_clean_input_has_no_warnings() {
        let mut input = monthly_input(dec!(1000), dec!(5), 12);
        input.start_date = Some("01/06/2025".into());
        let out = calculate_loan(&input).unwrap();
        assert!(out.warnings.is_empty(), "warnings: {:?}", out.warnings);
    }
}
