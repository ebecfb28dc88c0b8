//! Common interface of the form generators.

use super::{GeneratedForm, RenderError};
use crate::ledger::Transaction;

/// A form generator renders one kind of form from a ledger.
pub trait Generator: Send + Sync {
    fn generate(&self, transactions: &[Transaction]) -> Result<GeneratedForm, RenderError>;
}
