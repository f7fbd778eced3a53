//! Route handlers organized by resource

pub mod companies;
pub mod health;
pub mod invoices;

use serde::Serialize;

/// `{"message": ...}` body returned by deletes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
