//! Generator for Schedule C (Form 1040), Profit or Loss From Business.
//!
//! Expenses come from the ledger grouped by category. Income is not derived
//! from transactions and is supplied by the caller (zero by default).

use std::sync::Arc;

use rust_decimal::Decimal;

use super::common::{format_currency, Font};
use super::labels::CategoryLabels;
use super::layout::{Color, LaidOutDocument, LayoutBuilder, LineStyle};
use super::pdf::write_pdf;
use super::traits::Generator;
use super::{GeneratedForm, RenderError};
use crate::ledger::{aggregate_by_category, CategoryTotal, Transaction};

const TITLE: LineStyle = LineStyle::new(Font::Bold, 16.0, 28.0);
const SUBTITLE: LineStyle = LineStyle::new(Font::Regular, 12.0, 20.0);
const SECTION: LineStyle = LineStyle::new(Font::Bold, 14.0, 28.0);
const ROW: LineStyle = LineStyle::new(Font::Regular, 12.0, 20.0);
const TOTAL: LineStyle = LineStyle::new(Font::Bold, 12.0, 28.0);
const NET: LineStyle = LineStyle::new(Font::Bold, 14.0, 28.0);

/// Figures printed on a Schedule C.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleCSummary {
    pub income: Decimal,
    pub expenses: Vec<CategoryTotal>,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
}

impl ScheduleCSummary {
    pub fn new(income: Decimal, expenses: Vec<CategoryTotal>) -> Self {
        let total_expenses: Decimal = expenses.iter().map(|expense| expense.total).sum();
        Self {
            income,
            net_profit: income - total_expenses,
            expenses,
            total_expenses,
        }
    }

    pub fn is_loss(&self) -> bool {
        self.net_profit < Decimal::ZERO
    }
}

pub struct ScheduleCGenerator {
    labels: Arc<CategoryLabels>,
    income: Decimal,
}

impl ScheduleCGenerator {
    pub fn new(labels: Arc<CategoryLabels>) -> Self {
        Self {
            labels,
            income: Decimal::ZERO,
        }
    }

    pub fn with_income(mut self, income: Decimal) -> Self {
        self.income = income;
        self
    }

    pub fn summarize(&self, transactions: &[Transaction]) -> ScheduleCSummary {
        ScheduleCSummary::new(self.income, aggregate_by_category(transactions))
    }

    pub fn layout(&self, summary: &ScheduleCSummary) -> LaidOutDocument {
        let mut page = LayoutBuilder::new();

        page.text("Schedule C (Form 1040)", TITLE)
            .text("Profit or Loss From Business", SUBTITLE)
            .gap(36.0);

        page.text("Part I - Income", SECTION).amount_row(
            "1. Gross receipts",
            &format_currency(summary.income),
            ROW,
            Color::Black,
        );
        page.gap(22.0);

        page.text("Part II - Expenses", SECTION);
        for expense in &summary.expenses {
            page.amount_row(
                self.labels.label_for(&expense.category),
                &format_currency(expense.total),
                ROW,
                Color::Black,
            );
        }
        page.gap(28.0);

        page.amount_row(
            "Total Expenses",
            &format_currency(summary.total_expenses),
            TOTAL,
            Color::Black,
        )
        .gap(14.0);

        let net_color = if summary.is_loss() { Color::Red } else { Color::Black };
        page.amount_row(
            "Net Profit (or Loss)",
            &format_currency(summary.net_profit),
            NET,
            net_color,
        );

        page.finish()
    }
}

impl Generator for ScheduleCGenerator {
    fn generate(&self, transactions: &[Transaction]) -> Result<GeneratedForm, RenderError> {
        let summary = self.summarize(transactions);
        log::debug!(
            "Schedule C: {} categories, total expenses {}, net {}",
            summary.expenses.len(),
            summary.total_expenses,
            summary.net_profit
        );

        let document = self.layout(&summary);
        let pdf = write_pdf(&document)?;
        Ok(GeneratedForm { document, pdf })
    }
}
