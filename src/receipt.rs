//! Receipt

use std::io;

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    carts::{Cart, Promotion},
    pricing::{PriceFormatError, format_price},
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A price could not be formatted.
    #[error(transparent)]
    Price(#[from] PriceFormatError),

    /// Writing the rendered receipt failed.
    #[error("failed to write receipt")]
    Io(#[from] io::Error),
}

/// A purchased line on the receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    /// Product name
    pub name: String,

    /// Product sku
    pub sku: String,

    /// Units purchased
    pub quantity: u32,

    /// Unit price
    pub unit_price: Decimal,

    /// Line total after line discounts
    pub line_total: Decimal,
}

/// Confirmation view of a checked-out cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    lines: Vec<ReceiptLine>,
    promotions: Vec<Promotion>,
    subtotal: Decimal,
    discount: Decimal,
    total: Decimal,
    currency: String,
}

impl Receipt {
    /// Build a receipt from the cart returned by checkout.
    ///
    /// Missing aggregates are derived from the lines.
    pub fn from_cart(cart: &Cart) -> Self {
        let lines: Vec<ReceiptLine> = cart
            .items
            .iter()
            .map(|item| ReceiptLine {
                name: item.product_name.clone(),
                sku: item.product_sku.clone(),
                quantity: item.quantity,
                unit_price: item.price,
                line_total: item.line_total(),
            })
            .collect();

        let subtotal = cart.sub_total_amount.unwrap_or_else(|| {
            lines
                .iter()
                .fold(Decimal::ZERO, |acc, line| acc.saturating_add(line.line_total))
        });

        let discount = cart.total_discount.unwrap_or_default();
        let total = cart
            .total_amount
            .unwrap_or_else(|| subtotal.saturating_sub(discount).max(Decimal::ZERO));

        Self {
            lines,
            promotions: cart.promotions.clone(),
            subtotal,
            discount,
            total,
            currency: cart.currency.clone(),
        }
    }

    /// Purchased lines
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Promotions applied by the server
    pub fn promotions(&self) -> &[Promotion] {
        &self.promotions
    }

    /// Total cost before discounts
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Total amount paid
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Amount saved through discounts and promotions.
    pub fn savings(&self) -> Decimal {
        self.subtotal.saturating_sub(self.total).max(Decimal::ZERO)
    }

    /// Currency code of every amount on the receipt
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Write the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount cannot be formatted or the writer fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Unit Price", "Total"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                format!("x{}", line.quantity),
                format_price(line.unit_price, &self.currency)?,
                format_price(line.line_total, &self.currency)?,
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(
            1,
            HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
        );

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(1..4), Alignment::right());

        writeln!(out, "\n{table}")?;

        for promotion in &self.promotions {
            let amount = promotion
                .discount_amount
                .map(|amount| format_price(amount, &self.currency))
                .transpose()?
                .unwrap_or_default();

            writeln!(out, "Promotion {}: -{amount}", promotion.code)?;
        }

        writeln!(
            out,
            "Subtotal: {}",
            format_price(self.subtotal, &self.currency)?
        )?;
        writeln!(
            out,
            "Discount: -{}",
            format_price(self.discount, &self.currency)?
        )?;
        writeln!(out, "Total: {}", format_price(self.total, &self.currency)?)?;

        Ok(())
    }
}
