//! Pricing
//!
//! Amounts travel over the wire as JSON numbers in the major unit of the cart
//! currency. They are held as [`Decimal`] so fractional server figures survive
//! exactly, and are only turned into [`Money`] for display.

use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Errors that can occur while formatting a price.
#[derive(Debug, Error, PartialEq)]
pub enum PriceFormatError {
    /// The currency code is not a known ISO 4217 code.
    #[error("unknown currency code {0:?}")]
    UnknownCurrency(String),
}

/// Look up an ISO currency by code.
///
/// # Errors
///
/// Returns [`PriceFormatError::UnknownCurrency`] for unknown codes.
pub fn find_currency(code: &str) -> Result<&'static Currency, PriceFormatError> {
    iso::find(code).ok_or_else(|| PriceFormatError::UnknownCurrency(code.to_string()))
}

/// Format an amount in the given currency, rounded to the currency's
/// precision.
///
/// # Errors
///
/// Returns [`PriceFormatError::UnknownCurrency`] if the currency code is
/// unknown.
pub fn format_price(amount: Decimal, currency: &str) -> Result<String, PriceFormatError> {
    let currency = find_currency(currency)?;

    Ok(format!("{}", Money::from_decimal(amount, currency)))
}
