use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::{AmortizationMethod, AmortizationResult, LoanInput, RepaymentFrequency};
use crate::forms::LoanCategory;
use crate::types::Money;

/// Title shown for compare entries saved without one.
pub const UNTITLED: &str = "Untitled";

/// A saved calculation: the loan terms, the engine's headline figures and
/// bookkeeping added by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub category: LoanCategory,
    pub principal: Money,
    pub term_months: i32,
    pub annual_rate_percent: Decimal,
    #[serde(default)]
    pub repayment_frequency: RepaymentFrequency,
    #[serde(default)]
    pub amortization_method: AmortizationMethod,
    pub periodic_payment: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    pub payoff_date: Option<NaiveDate>,
    pub start_date: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LoanRecord {
    /// Capture `result` for `input`. The engine output is copied verbatim.
    pub fn from_calculation(
        category: LoanCategory,
        input: &LoanInput,
        result: &AmortizationResult,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: None,
            category,
            principal: input.principal,
            term_months: input.term_months,
            annual_rate_percent: input.annual_rate_percent,
            repayment_frequency: input.repayment_frequency,
            amortization_method: input.amortization_method,
            periodic_payment: result.periodic_payment,
            total_interest: result.total_interest,
            total_payment: result.total_payment,
            payoff_date: result.payoff_date,
            start_date: input.start_date.clone(),
            created_at,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        let trimmed = title.trim();
        self.title = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    /// The loan terms this record was computed from, for recalculating its schedule.
    pub fn to_input(&self) -> LoanInput {
        LoanInput {
            principal: self.principal,
            annual_rate_percent: self.annual_rate_percent,
            term_months: self.term_months,
            repayment_frequency: self.repayment_frequency,
            amortization_method: self.amortization_method,
            start_date: self.start_date.clone(),
        }
    }
}
