//! Loan entry forms: raw text fields in, engine input out.
//!
//! A form only produces a [`LoanInput`] once amount, term, rate and start
//! date have all been filled in. Until then it reports "not ready" rather
//! than an error, so callers can recompute on every keystroke.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::amortization::{amortize, AmortizationMethod, AmortizationResult, LoanInput, RepaymentFrequency};
use crate::error::PathPayError;
use crate::PathPayResult;

/// Kind of loan a calculation was made for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoanCategory {
    #[default]
    Personal,
    Mortgage,
    Auto,
    Business,
}

impl LoanCategory {
    pub fn label(&self) -> &'static str {
        match self {
            LoanCategory::Personal => "Personal Loan",
            LoanCategory::Mortgage => "Mortgage",
            LoanCategory::Auto => "Auto Loan",
            LoanCategory::Business => "Business Loan",
        }
    }
}

impl fmt::Display for LoanCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LoanCategory {
    type Err = PathPayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let key = lowered.trim_end_matches(" loan").trim_end_matches("-loan");
        match key {
            "personal" => Ok(LoanCategory::Personal),
            "mortgage" => Ok(LoanCategory::Mortgage),
            "auto" | "car" => Ok(LoanCategory::Auto),
            "business" => Ok(LoanCategory::Business),
            _ => Err(PathPayError::invalid(
                "category",
                format!("Unknown loan category '{s}' (expected personal, mortgage, auto or business)"),
            )),
        }
    }
}

/// Loan form exactly as the user typed it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanForm {
    #[serde(default)]
    pub category: LoanCategory,
    #[serde(default)]
    pub amount: String,
    /// Term in months.
    #[serde(default)]
    pub term: String,
    /// Annual rate in percent.
    #[serde(default)]
    pub rate: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub repayment_frequency: RepaymentFrequency,
    #[serde(default)]
    pub amortization_method: AmortizationMethod,
}

impl LoanForm {
    /// True once every required field has some text in it.
    pub fn is_complete(&self) -> bool {
        [&self.amount, &self.term, &self.rate, &self.start_date]
            .iter()
            .all(|f| !f.trim().is_empty())
    }

    /// Convert the form into engine input.
    ///
    /// `Ok(None)` while a required field is blank. Text that is present but
    /// not a number is an [`PathPayError::InvalidInput`] naming the field.
    pub fn to_input(&self) -> PathPayResult<Option<LoanInput>> {
        if !self.is_complete() {
            return Ok(None);
        }

        let principal = parse_decimal(LoanField::Amount, &self.amount)?;
        let annual_rate_percent = parse_decimal(LoanField::Rate, &self.rate)?;
        let term_months = self.term.trim().parse::<i32>().map_err(|_| {
            PathPayError::invalid(
                LoanField::Term.key(),
                format!("'{}' is not a whole number of months", self.term.trim()),
            )
        })?;

        Ok(Some(LoanInput {
            principal,
            annual_rate_percent,
            term_months,
            repayment_frequency: self.repayment_frequency,
            amortization_method: self.amortization_method,
            start_date: Some(self.start_date.trim().to_string()),
        }))
    }

    /// Run the engine when the form is complete.
    pub fn calculate(&self) -> PathPayResult<Option<AmortizationResult>> {
        self.to_input()?.map(|input| amortize(&input)).transpose()
    }
}

fn parse_decimal(field: LoanField, raw: &str) -> PathPayResult<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    Decimal::from_str(&cleaned)
        .map_err(|_| PathPayError::invalid(field.key(), format!("'{}' is not a number", raw.trim())))
}

/// Form fields that carry an info tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoanField {
    Amount,
    Term,
    Rate,
    LoanType,
    RepaymentType,
    StartDate,
}

impl LoanField {
    pub const ALL: [LoanField; 6] = [
        LoanField::Amount,
        LoanField::Term,
        LoanField::Rate,
        LoanField::LoanType,
        LoanField::RepaymentType,
        LoanField::StartDate,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            LoanField::Amount => "amount",
            LoanField::Term => "term",
            LoanField::Rate => "rate",
            LoanField::LoanType => "loan_type",
            LoanField::RepaymentType => "repayment_type",
            LoanField::StartDate => "start_date",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LoanField::Amount => "Loan Amount",
            LoanField::Term => "Loan Term",
            LoanField::Rate => "Interest Rate",
            LoanField::LoanType => "Loan Type",
            LoanField::RepaymentType => "Repayment Type",
            LoanField::StartDate => "Start Date",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            LoanField::Amount => "Enter the loan amount you want to borrow.",
            LoanField::Term => {
                "Enter the loan term: the length of time you have to repay, in months."
            }
            LoanField::Rate => "Enter the annual interest rate (p.a.) as a percentage.",
            LoanField::LoanType => {
                "Equal total payments keep every installment the same. Equal principal \
                 payments repay a fixed share of the principal each period, so installments \
                 shrink as interest falls."
            }
            LoanField::RepaymentType => {
                "Monthly repayment is the usual choice. If the lender agrees you can also \
                 repay weekly, biweekly or yearly."
            }
            LoanField::StartDate => "Pick the date of the first installment (DD/MM/YYYY).",
        }
    }
}

impl FromStr for LoanField {
    type Err = PathPayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        LoanField::ALL
            .into_iter()
            .find(|f| f.key() == wanted || (wanted == "date" && *f == LoanField::StartDate))
            .ok_or_else(|| PathPayError::invalid("field", format!("Unknown form field '{s}'")))
    }
}
