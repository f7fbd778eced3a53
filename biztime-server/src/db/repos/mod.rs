//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - One parameterized statement per operation where possible
//! - Reads that need related rows use JOINs (no N+1)
//! - Zero rows matched on a keyed read/update/delete is `NotFound`
//! - Constraint violations are classified, not leaked

pub mod companies;
pub mod invoices;

pub use companies::{Company, CompanyChanges, CompanyDetail, CompanyRepo, CompanySummary, NewCompany};
pub use invoices::{Invoice, InvoiceRepo, InvoiceSummary, InvoiceWithCompany, NewInvoice};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{key}'")]
    NotFound { resource: &'static str, key: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unknown company: {code}")]
    UnknownCompany { code: String },
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            resource,
            key: key.to_string(),
        }
    }
}

/// Name of the violated constraint, if `err` is a unique violation.
pub(crate) fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Some(db_err.constraint().unwrap_or_default().to_owned())
        }
        _ => None,
    }
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
