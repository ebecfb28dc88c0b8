//! Form generators - turn a user's ledger into a rendered PDF.
//!
//! Each supported form has its own generator:
//! - `ScheduleCGenerator` - profit or loss report grouped by expense category
//! - `Form1099Generator` - payees that reached the 1099 reporting threshold

pub mod common;
pub mod form_1099;
pub mod labels;
pub mod layout;
pub mod pdf;
pub mod schedule_c;
pub mod traits;

pub use form_1099::{Form1099Generator, REPORTING_THRESHOLD};
pub use labels::CategoryLabels;
pub use layout::LaidOutDocument;
pub use schedule_c::{ScheduleCGenerator, ScheduleCSummary};
pub use traits::Generator;

use thiserror::Error;

/// Errors that can occur while rendering a form.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to encode PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("failed to write PDF: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a successful form generation.
#[derive(Debug)]
pub struct GeneratedForm {
    /// Page layout the PDF was written from.
    pub document: LaidOutDocument,
    pub pdf: Vec<u8>,
}
