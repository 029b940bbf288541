//! Repayment frequency and amortization method vocabulary.

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PathPayError;
use crate::types::Rate;
use crate::PathPayResult;

/// How often an installment falls due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RepaymentFrequency {
    Weekly,
    Biweekly,
    #[default]
    Monthly,
    Yearly,
}

/// How each installment splits between principal and interest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AmortizationMethod {
    /// Level installment (annuity); the principal share grows over time.
    #[default]
    EqualTotalPayment,
    /// Constant principal share; installments decline with the balance.
    EqualPrincipalPayment,
}

impl RepaymentFrequency {
    pub const ALL: [RepaymentFrequency; 4] = [
        RepaymentFrequency::Weekly,
        RepaymentFrequency::Biweekly,
        RepaymentFrequency::Monthly,
        RepaymentFrequency::Yearly,
    ];

    pub fn periods_per_year(&self) -> u32 {
        match self {
            RepaymentFrequency::Weekly => 52,
            RepaymentFrequency::Biweekly => 26,
            RepaymentFrequency::Monthly => 12,
            RepaymentFrequency::Yearly => 1,
        }
    }

    /// Singular label for one period, as shown in schedule headings.
    pub fn period_label(&self) -> &'static str {
        match self {
            RepaymentFrequency::Weekly => "Week",
            RepaymentFrequency::Biweekly => "Bi-Week",
            RepaymentFrequency::Monthly => "Month",
            RepaymentFrequency::Yearly => "Year",
        }
    }

    /// Number of installments for a term given in months.
    ///
    /// `round(term_months / 12 * periods_per_year)` with halves rounded up.
    /// Yearly schedules never drop below one period.
    pub fn total_periods(&self, term_months: i32) -> PathPayResult<u32> {
        if term_months <= 0 {
            return Err(PathPayError::invalid(
                "term_months",
                "Loan term must be at least one month",
            ));
        }

        let months = term_months as u64;
        let periods = (months * u64::from(self.periods_per_year()) + 6) / 12;
        let periods = match self {
            RepaymentFrequency::Yearly => periods.max(1),
            _ => periods,
        };

        match u32::try_from(periods) {
            Ok(0) => Err(PathPayError::invalid(
                "term_months",
                format!("Term of {term_months} months yields no {self} installments"),
            )),
            Ok(n) => Ok(n),
            Err(_) => Err(PathPayError::invalid("term_months", "Loan term is too long")),
        }
    }

    /// Nominal annual percentage converted to a per-period decimal rate.
    pub fn periodic_rate(&self, annual_rate_percent: Decimal) -> Rate {
        if annual_rate_percent.is_zero() {
            return Decimal::ZERO;
        }
        annual_rate_percent / dec!(100) / Decimal::from(self.periods_per_year())
    }

    /// `date` moved forward by `steps` periods. `None` past the calendar's end.
    ///
    /// Month and year steps keep the day of month and carry any excess into
    /// the following month, so 31 January plus one month is 2 March in 2024.
    pub fn advance(&self, date: NaiveDate, steps: u32) -> Option<NaiveDate> {
        match self {
            RepaymentFrequency::Weekly => date.checked_add_days(Days::new(7 * u64::from(steps))),
            RepaymentFrequency::Biweekly => {
                date.checked_add_days(Days::new(14 * u64::from(steps)))
            }
            RepaymentFrequency::Monthly => add_months_rolling(date, steps),
            RepaymentFrequency::Yearly => add_months_rolling(date, steps.checked_mul(12)?),
        }
    }
}

fn add_months_rolling(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(Months::new(months))?
        .checked_add_days(Days::new(u64::from(date.day0())))
}

impl fmt::Display for RepaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RepaymentFrequency::Weekly => "weekly",
            RepaymentFrequency::Biweekly => "biweekly",
            RepaymentFrequency::Monthly => "monthly",
            RepaymentFrequency::Yearly => "yearly",
        };
        f.write_str(s)
    }
}

impl FromStr for RepaymentFrequency {
    type Err = PathPayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "weekly" => Ok(RepaymentFrequency::Weekly),
            "biweekly" | "fortnightly" => Ok(RepaymentFrequency::Biweekly),
            "monthly" => Ok(RepaymentFrequency::Monthly),
            "yearly" | "annual" | "annually" => Ok(RepaymentFrequency::Yearly),
            _ => Err(PathPayError::invalid(
                "repayment_frequency",
                format!("Unknown frequency '{s}' (expected weekly, biweekly, monthly or yearly)"),
            )),
        }
    }
}

impl AmortizationMethod {
    pub fn label(&self) -> &'static str {
        match self {
            AmortizationMethod::EqualTotalPayment => "Equal Total Payments",
            AmortizationMethod::EqualPrincipalPayment => "Equal Principal Payments",
        }
    }
}

impl fmt::Display for AmortizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AmortizationMethod::EqualTotalPayment => "equal-total",
            AmortizationMethod::EqualPrincipalPayment => "equal-principal",
        };
        f.write_str(s)
    }
}

impl FromStr for AmortizationMethod {
    type Err = PathPayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "equaltotal" | "equaltotalpayment" | "equaltotalpayments" | "annuity" | "level" => {
                Ok(AmortizationMethod::EqualTotalPayment)
            }
            "equalprincipal" | "equalprincipalpayment" | "equalprincipalpayments" | "declining" => {
                Ok(AmortizationMethod::EqualPrincipalPayment)
            }
            _ => Err(PathPayError::invalid(
                "amortization_method",
                format!("Unknown method '{s}' (expected equal-total or equal-principal)"),
            )),
        }
    }
}

// Deserialised through `FromStr` so unknown text is an `InvalidInput` naming the field.
impl<'de> Deserialize<'de> for RepaymentFrequency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for AmortizationMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
