//! Loan amortization for the PathPay calculator.
//!
//! The [`amortization`] engine turns a [`LoanInput`](amortization::LoanInput)
//! into a full payment schedule with totals and a payoff date. [`forms`]
//! builds that input from raw text fields, and [`storage`] keeps calculation
//! history and the compare list behind a small key-value contract.

pub mod amortization;
pub mod error;
pub mod forms;
pub mod time_value;
pub mod types;

#[cfg(feature = "storage")]
pub mod storage;

pub use error::PathPayError;
pub use types::*;

/// Standard result type for all pathpay operations
pub type PathPayResult<T> = Result<T, PathPayError>;
