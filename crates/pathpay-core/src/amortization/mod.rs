pub mod calendar;
pub mod engine;
pub mod frequency;

pub use engine::{amortize, calculate_loan, AmortizationResult, LoanInput, ScheduleRow};
pub use frequency::{AmortizationMethod, RepaymentFrequency};
