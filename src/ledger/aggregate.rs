//! Grouping of transactions into per-category and per-payee totals.
//!
//! Sums use `Decimal`, so repeated additions never drift the way binary
//! floats do. Results come back ordered by group key, which keeps rendered
//! output reproducible.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::model::Transaction;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayeeTotal {
    pub merchant: String,
    pub total: Decimal,
}

/// Group by category label. Transactions without a category are left out
/// entirely rather than collected into a catch-all group.
pub fn aggregate_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut groups: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();

    for tx in transactions {
        let Some(category) = tx.category_label() else {
            continue;
        };
        let entry = groups.entry(category).or_insert((Decimal::ZERO, 0));
        entry.0 += tx.amount;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category: category.to_string(),
            total,
            count,
        })
        .collect()
}

/// Group by merchant name. Every transaction has a merchant, so nothing is
/// excluded.
pub fn aggregate_by_payee(transactions: &[Transaction]) -> Vec<PayeeTotal> {
    let mut groups: BTreeMap<&str, Decimal> = BTreeMap::new();

    for tx in transactions {
        *groups.entry(tx.merchant.as_str()).or_insert(Decimal::ZERO) += tx.amount;
    }

    groups
        .into_iter()
        .map(|(merchant, total)| PayeeTotal {
            merchant: merchant.to_string(),
            total,
        })
        .collect()
}
