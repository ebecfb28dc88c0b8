//! Transaction ledger: the records a form is built from and the grouping
//! rules that turn them into category and payee totals.

pub mod aggregate;
pub mod model;
pub mod store;

pub use aggregate::{aggregate_by_category, aggregate_by_payee, CategoryTotal, PayeeTotal};
pub use model::Transaction;
pub use store::{PostgrestTransactionStore, StoreError, TransactionStore};
