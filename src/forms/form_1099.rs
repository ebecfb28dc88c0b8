//! Generator for the 1099-MISC summary.
//!
//! Lists every payee whose total for the ledger reaches the reporting
//! threshold. Payees below it are left off the form.

use rust_decimal::Decimal;

use super::common::{format_currency, Font};
use super::layout::{Color, LaidOutDocument, LayoutBuilder, LineStyle};
use super::pdf::write_pdf;
use super::traits::Generator;
use super::{GeneratedForm, RenderError};
use crate::ledger::{aggregate_by_payee, PayeeTotal, Transaction};

/// Minimum payee total that must be reported: $600.00.
pub const REPORTING_THRESHOLD: Decimal = Decimal::from_parts(60000, 0, 0, false, 2);

const TITLE: LineStyle = LineStyle::new(Font::Bold, 16.0, 28.0);
const ROW: LineStyle = LineStyle::new(Font::Regular, 12.0, 28.0);

#[derive(Default)]
pub struct Form1099Generator;

impl Form1099Generator {
    pub fn new() -> Self {
        Self
    }

    /// Payee totals at or above the reporting threshold, ordered by payee.
    pub fn reportable_payees(&self, transactions: &[Transaction]) -> Vec<PayeeTotal> {
        aggregate_by_payee(transactions)
            .into_iter()
            .filter(|payee| payee.total >= REPORTING_THRESHOLD)
            .collect()
    }

    pub fn layout(&self, payees: &[PayeeTotal]) -> LaidOutDocument {
        let mut page = LayoutBuilder::new();
        page.text("1099-MISC Forms Summary", TITLE).gap(28.0);

        for payee in payees {
            page.amount_row(
                &payee.merchant,
                &format_currency(payee.total),
                ROW,
                Color::Black,
            );
        }

        page.finish()
    }
}

impl Generator for Form1099Generator {
    fn generate(&self, transactions: &[Transaction]) -> Result<GeneratedForm, RenderError> {
        let payees = self.reportable_payees(transactions);
        log::debug!("1099: {} payees at or above threshold", payees.len());

        let document = self.layout(&payees);
        let pdf = write_pdf(&document)?;
        Ok(GeneratedForm { document, pdf })
    }
}
