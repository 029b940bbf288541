pub mod compare;
pub mod fields;
pub mod history;
pub mod loan;

use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use pathpay_core::amortization::{AmortizationMethod, LoanInput, RepaymentFrequency};
use pathpay_core::forms::LoanCategory;
use pathpay_core::storage::LoanRecord;

use crate::config::Context;
use crate::input;

/// Loan terms, shared by every command that runs the engine
#[derive(Args, Debug, Clone)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan category: personal, mortgage, auto, business
    #[arg(long)]
    pub category: Option<String>,

    /// Loan amount
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<Decimal>,

    /// Loan term in months
    #[arg(long, allow_hyphen_values = true)]
    pub term: Option<i32>,

    /// Annual interest rate in percent
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// First due date (DD/MM/YYYY or YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Repayment frequency: weekly, biweekly, monthly, yearly
    #[arg(long)]
    pub frequency: Option<String>,

    /// Amortization method: equal-total, equal-principal
    #[arg(long)]
    pub method: Option<String>,
}

impl LoanArgs {
    pub fn category(&self, ctx: &Context) -> Result<LoanCategory, Box<dyn std::error::Error>> {
        match self.category.as_deref() {
            Some(raw) => Ok(raw.parse()?),
            None => Ok(ctx.config.category.unwrap_or_default()),
        }
    }

    /// Loan terms from `--input`, piped JSON, or the individual flags, in that order.
    pub fn to_input(&self, ctx: &Context) -> Result<LoanInput, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return input::file::read_json(path);
        }
        if let Some(data) = input::stdin::read_stdin()? {
            return Ok(serde_json::from_value(data)?);
        }

        let repayment_frequency = match self.frequency.as_deref() {
            Some(raw) => raw.parse::<RepaymentFrequency>()?,
            None => ctx.config.repayment_frequency.unwrap_or_default(),
        };
        let amortization_method = match self.method.as_deref() {
            Some(raw) => raw.parse::<AmortizationMethod>()?,
            None => ctx.config.amortization_method.unwrap_or_default(),
        };

        Ok(LoanInput {
            principal: self
                .amount
                .ok_or("--amount is required (or provide --input)")?,
            term_months: self.term.ok_or("--term is required (or provide --input)")?,
            annual_rate_percent: self.rate.ok_or("--rate is required (or provide --input)")?,
            repayment_frequency,
            amortization_method,
            start_date: self.start_date.clone(),
        })
    }
}

/// JSON view of a saved record with its 1-based list position.
pub(crate) fn record_row(position: usize, record: &LoanRecord) -> Result<Value, Box<dyn std::error::Error>> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(ref mut map) = value {
        map.insert("index".into(), Value::from(position));
        map.insert("title".into(), Value::from(record.display_title()));
        map.insert("category".into(), Value::from(record.category.label()));
    }
    Ok(value)
}

/// Convert a 1-based `--index` into a list offset.
pub(crate) fn list_offset(index: usize) -> Result<usize, Box<dyn std::error::Error>> {
    index
        .checked_sub(1)
        .ok_or_else(|| "--index counts from 1".into())
}
