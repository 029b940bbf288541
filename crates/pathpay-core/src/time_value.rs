use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::PathPayError;
use crate::types::{Money, Rate};
use crate::PathPayResult;

/// `(1 + rate)^-periods`. Compounding beyond decimal range discounts to zero.
pub fn discount_factor(rate: Rate, periods: u32) -> Decimal {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(periods))
        .and_then(|factor| Decimal::ONE.checked_div(factor))
        .unwrap_or(Decimal::ZERO)
}

/// Level payment that retires `principal` over `nper` periods at `rate` per period.
///
/// `PMT = P * r / (1 - (1 + r)^-n)`. A zero rate degenerates to straight-line
/// repayment `P / n`, as does a rate too small to move the discount factor.
pub fn level_payment(rate: Rate, nper: u32, principal: Money) -> PathPayResult<Money> {
    if nper == 0 {
        return Err(PathPayError::invalid("nper", "Number of periods must be > 0"));
    }

    let annuity = Decimal::ONE - discount_factor(rate, nper);
    if rate.is_zero() || annuity.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_div(annuity))
        .ok_or_else(|| {
            PathPayError::invalid("principal", "Loan amount overflows decimal precision")
        })
}

/// Balance still owed on a level-payment loan after `paid` of `nper` installments.
///
/// `B_k = P * (1 - (1 + r)^-(n-k)) / (1 - (1 + r)^-n)`, the closed form of
/// `B_k = B_{k-1} * (1 + r) - PMT`. Exactly zero once every installment is paid.
pub fn level_balance(rate: Rate, nper: u32, principal: Money, paid: u32) -> Money {
    let remaining = nper.saturating_sub(paid);
    if remaining == 0 {
        return Decimal::ZERO;
    }

    let annuity = Decimal::ONE - discount_factor(rate, nper);
    if rate.is_zero() || annuity.is_zero() {
        return principal / Decimal::from(nper) * Decimal::from(remaining);
    }

    let outstanding = Decimal::ONE - discount_factor(rate, remaining);
    principal * (outstanding / annuity)
}

/// Constant principal component for equal-principal repayment.
pub fn equal_principal_installment(principal: Money, nper: u32) -> PathPayResult<Money> {
    if nper == 0 {
        return Err(PathPayError::invalid("nper", "Number of periods must be > 0"));
    }
    Ok(principal / Decimal::from(nper))
}
