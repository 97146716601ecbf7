//! Fixed-rate loan amortization used for vehicle financing.

use crate::domain::error::DomainError;
use serde::Serialize;

/// Nominal annual interest rate applied to every financing request.
pub const ANNUAL_INTEREST_RATE: f64 = 0.08;

/// Amount to finance and the resulting fixed monthly installment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanQuote {
    pub principal: f64,
    pub monthly_payment: f64,
}

/// Amortizes `price - down_payment` over `term_months` at [`ANNUAL_INTEREST_RATE`].
pub fn amortize(price: f64, down_payment: f64, term_months: u32) -> Result<LoanQuote, DomainError> {
    amortize_at_rate(price, down_payment, term_months, ANNUAL_INTEREST_RATE)
}

/// Standard fixed-rate amortization:
/// `P * r(1+r)^n / ((1+r)^n - 1)` with `r = annual_rate / 12`,
/// falling back to `P / n` when the rate is zero.
///
/// Evaluated as `P * r / (1 - (1+r)^-n)`, which stays finite for any term
/// and approaches `P * r` as the term grows.
///
/// Requires `price > 0`, `0 <= down_payment <= price` and `term_months >= 1`.
pub fn amortize_at_rate(
    price: f64,
    down_payment: f64,
    term_months: u32,
    annual_rate: f64,
) -> Result<LoanQuote, DomainError> {
    if term_months == 0 {
        return Err(DomainError::Validation(
            "El plazo debe ser de al menos una mensualidad".to_string(),
        ));
    }
    if !price.is_finite() || price <= 0.0 {
        return Err(DomainError::Validation("El precio no es válido".to_string()));
    }
    if !down_payment.is_finite() || down_payment < 0.0 {
        return Err(DomainError::Validation(
            "El enganche no puede ser negativo".to_string(),
        ));
    }
    if down_payment > price {
        return Err(DomainError::Validation(
            "El enganche no puede superar el precio del auto".to_string(),
        ));
    }
    if !annual_rate.is_finite() || annual_rate < 0.0 {
        return Err(DomainError::Validation("La tasa no es válida".to_string()));
    }

    let principal = price - down_payment;
    let months = f64::from(term_months);
    let monthly_rate = annual_rate / 12.0;

    let monthly_payment = if monthly_rate > 0.0 {
        principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-months))
    } else {
        principal / months
    };
    if !monthly_payment.is_finite() {
        return Err(DomainError::Validation(
            "No es posible calcular la mensualidad para ese plazo".to_string(),
        ));
    }

    Ok(LoanQuote {
        principal,
        monthly_payment,
    })
}
