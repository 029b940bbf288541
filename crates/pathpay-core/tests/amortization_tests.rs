use chrono::NaiveDate;
use pathpay_core::amortization::{
    amortize, calculate_loan, AmortizationMethod, LoanInput, RepaymentFrequency,
};
use pathpay_core::PathPayError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Helpers
// ===========================================================================

fn loan(
    principal: Decimal,
    rate: Decimal,
    months: i32,
    frequency: RepaymentFrequency,
    method: AmortizationMethod,
) -> LoanInput {
    LoanInput {
        principal,
        annual_rate_percent: rate,
        term_months: months,
        repayment_frequency: frequency,
        amortization_method: method,
        start_date: None,
    }
}

/// A spread of realistic loans across every frequency and method.
fn loan_grid() -> Vec<LoanInput> {
    let mut inputs = Vec::new();
    let terms = [
        (dec!(10_000_000), dec!(12), 12),
        (dec!(25_000), dec!(7.9), 60),
        (dec!(450_000), dec!(4.25), 360),
        (dec!(3_500.50), dec!(18), 7),
        (dec!(80_000), dec!(0), 48),
    ];
    for (principal, rate, months) in terms {
        for frequency in RepaymentFrequency::ALL {
            for method in [
                AmortizationMethod::EqualTotalPayment,
                AmortizationMethod::EqualPrincipalPayment,
            ] {
                inputs.push(loan(principal, rate, months, frequency, method));
            }
        }
    }
    inputs
}

// ===========================================================================
// Schedule invariants
// ===========================================================================

#[test]
fn test_principal_components_sum_to_principal() {
    for input in loan_grid() {
        let result = amortize(&input).unwrap();
        let repaid: Decimal = result.schedule.iter().map(|r| r.principal).sum();
        let tolerance = dec!(0.01) * Decimal::from(result.total_periods);
        assert!(
            (repaid - input.principal).abs() <= tolerance,
            "{input:?}: repaid {repaid}, tolerance {tolerance}"
        );
    }
}

#[test]
fn test_last_row_clears_the_balance() {
    for input in loan_grid() {
        let result = amortize(&input).unwrap();
        let last = result.schedule.last().unwrap();
        assert_eq!(last.remaining_balance, dec!(0.00), "{input:?}");
        assert!(result
            .schedule
            .iter()
            .all(|r| !r.remaining_balance.is_sign_negative()));
    }
}

#[test]
fn test_total_interest_is_total_payment_less_principal() {
    for input in loan_grid() {
        let result = amortize(&input).unwrap();
        assert_eq!(result.total_interest, result.total_payment - input.principal);
        let summed: Decimal = result.schedule.iter().map(|r| r.payment).sum();
        assert_eq!(result.total_payment, summed);
    }
}

#[test]
fn test_schedule_length_and_numbering() {
    for input in loan_grid() {
        let result = amortize(&input).unwrap();
        assert_eq!(result.schedule.len(), result.total_periods as usize);
        for (i, row) in result.schedule.iter().enumerate() {
            assert_eq!(row.period as usize, i + 1);
        }
    }
}

#[test]
fn test_equal_principal_payments_never_increase() {
    for input in loan_grid()
        .into_iter()
        .filter(|i| i.amortization_method == AmortizationMethod::EqualPrincipalPayment)
    {
        let result = amortize(&input).unwrap();
        for pair in result.schedule.windows(2) {
            assert!(
                pair[1].payment <= pair[0].payment,
                "{input:?}: period {} pays {} after {}",
                pair[1].period,
                pair[1].payment,
                pair[0].payment
            );
        }
        assert_eq!(Some(result.periodic_payment), result.first_payment());
    }
}

#[test]
fn test_zero_rate_level_payment() {
    for frequency in RepaymentFrequency::ALL {
        let input = loan(
            dec!(12_000),
            dec!(0),
            24,
            frequency,
            AmortizationMethod::EqualTotalPayment,
        );
        let result = amortize(&input).unwrap();
        let n = Decimal::from(result.total_periods);
        assert!((result.periodic_payment - dec!(12_000) / n).abs() < dec!(0.005));
        assert!(result.schedule.iter().all(|r| r.interest.is_zero()));
    }
}

// ===========================================================================
// Reference scenarios
// ===========================================================================

#[test]
fn test_period_conversion_examples() {
    let cases = [
        (12, RepaymentFrequency::Monthly, 12),
        (12, RepaymentFrequency::Weekly, 52),
        (6, RepaymentFrequency::Yearly, 1),
        (24, RepaymentFrequency::Biweekly, 52),
    ];
    for (months, frequency, expected) in cases {
        let input = loan(
            dec!(1000),
            dec!(5),
            months,
            frequency,
            AmortizationMethod::EqualTotalPayment,
        );
        assert_eq!(amortize(&input).unwrap().total_periods, expected);
    }
}

#[test]
fn test_ten_million_at_twelve_percent() {
    let input = loan(
        dec!(10_000_000),
        dec!(12),
        12,
        RepaymentFrequency::Monthly,
        AmortizationMethod::EqualTotalPayment,
    );
    let out = calculate_loan(&input).unwrap();
    let r = &out.result;

    assert_eq!(r.periodic_rate, dec!(0.01));
    assert_eq!(r.total_periods, 12);
    assert_eq!(r.periodic_payment, dec!(888_487.89));
    assert!((r.total_payment - dec!(10_661_854.68)).abs() <= dec!(0.01));
    assert!((r.total_interest - dec!(661_854.68)).abs() <= dec!(0.01));
    assert!(out.warnings.is_empty());
}

#[test]
fn test_date_projection_three_months() {
    let mut input = loan(
        dec!(3000),
        dec!(12),
        3,
        RepaymentFrequency::Monthly,
        AmortizationMethod::EqualTotalPayment,
    );
    input.start_date = Some("01/01/2024".into());
    let result = amortize(&input).unwrap();

    assert_eq!(result.schedule[0].due_date, NaiveDate::from_ymd_opt(2024, 1, 1));
    assert_eq!(result.payoff_date, NaiveDate::from_ymd_opt(2024, 4, 1));
}

#[test]
fn test_absent_start_date_is_not_an_error() {
    let input = loan(
        dec!(3000),
        dec!(12),
        3,
        RepaymentFrequency::Biweekly,
        AmortizationMethod::EqualPrincipalPayment,
    );
    let result = amortize(&input).unwrap();
    assert!(result.schedule.iter().all(|r| r.due_date.is_none()));
    assert!(result.payoff_date.is_none());
}

// ===========================================================================
// Input contract
// ===========================================================================

#[test]
fn test_loan_input_from_json() {
    let json = r#"{
        "principal": "250000",
        "annual_rate_percent": "6.5",
        "term_months": 240,
        "repayment_frequency": "biweekly",
        "amortization_method": "equalPrincipal",
        "start_date": "15/08/2025"
    }"#;
    let input: LoanInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.repayment_frequency, RepaymentFrequency::Biweekly);
    assert_eq!(input.amortization_method, AmortizationMethod::EqualPrincipalPayment);

    let result = amortize(&input).unwrap();
    assert_eq!(result.total_periods, 520);
    assert_eq!(result.schedule[1].due_date, NaiveDate::from_ymd_opt(2025, 8, 29));
}

#[test]
fn test_loan_input_defaults_to_monthly_equal_total() {
    let json = r#"{"principal": "1000", "annual_rate_percent": "5", "term_months": 12}"#;
    let input: LoanInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.repayment_frequency, RepaymentFrequency::Monthly);
    assert_eq!(input.amortization_method, AmortizationMethod::EqualTotalPayment);
    assert_eq!(input.start_date, None);
}

#[test]
fn test_invalid_input_leaves_no_output() {
    let input = loan(
        dec!(1000),
        dec!(5),
        0,
        RepaymentFrequency::Yearly,
        AmortizationMethod::EqualTotalPayment,
    );
    assert!(matches!(
        calculate_loan(&input),
        Err(PathPayError::InvalidInput { .. })
    ));
}

#[test]
fn test_loan_input_with_unknown_frequency_names_the_field() {
    let json = r#"{"principal": "1000", "annual_rate_percent": "5", "term_months": 12,
                   "repayment_frequency": "daily"}"#;
    let err = serde_json::from_str::<LoanInput>(json).unwrap_err();
    let message = PathPayError::from(err).to_string();
    assert!(message.contains("Invalid input: repayment_frequency"), "{message}");
}
