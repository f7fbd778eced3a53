//! Store trait - the persistence gateway injected into handlers
//!
//! `PgStore` is the production implementation; `MemoryStore` backs tests
//! and local experiments without a database.

use async_trait::async_trait;
use sqlx::PgPool;

use super::repos::{
    Company, CompanyChanges, CompanyDetail, CompanyRepo, CompanySummary, DbError, Invoice,
    InvoiceRepo, InvoiceSummary, InvoiceWithCompany, NewCompany, NewInvoice,
};
use crate::models::Amount;

/// Persistence operations over companies and invoices
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_companies(&self) -> Result<Vec<CompanySummary>, DbError>;

    async fn get_company(&self, code: &str) -> Result<CompanyDetail, DbError>;

    async fn company_exists(&self, code: &str) -> Result<bool, DbError>;

    async fn create_company(&self, new: NewCompany) -> Result<Company, DbError>;

    async fn update_company(&self, code: &str, changes: CompanyChanges)
        -> Result<Company, DbError>;

    async fn delete_company(&self, code: &str) -> Result<(), DbError>;

    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, DbError>;

    async fn get_invoice(&self, id: i32) -> Result<InvoiceWithCompany, DbError>;

    async fn create_invoice(&self, new: NewInvoice) -> Result<Invoice, DbError>;

    async fn update_invoice_amount(&self, id: i32, amt: Amount) -> Result<Invoice, DbError>;

    async fn set_invoice_paid(&self, id: i32, paid: bool) -> Result<Invoice, DbError>;

    async fn delete_invoice(&self, id: i32) -> Result<(), DbError>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_companies(&self) -> Result<Vec<CompanySummary>, DbError> {
        CompanyRepo::new(&self.pool).list().await
    }

    async fn get_company(&self, code: &str) -> Result<CompanyDetail, DbError> {
        CompanyRepo::new(&self.pool).get(code).await
    }

    async fn company_exists(&self, code: &str) -> Result<bool, DbError> {
        CompanyRepo::new(&self.pool).exists(code).await
    }

    async fn create_company(&self, new: NewCompany) -> Result<Company, DbError> {
        CompanyRepo::new(&self.pool).create(&new).await
    }

    async fn update_company(
        &self,
        code: &str,
        changes: CompanyChanges,
    ) -> Result<Company, DbError> {
        CompanyRepo::new(&self.pool).update(code, &changes).await
    }

    async fn delete_company(&self, code: &str) -> Result<(), DbError> {
        CompanyRepo::new(&self.pool).delete(code).await
    }

    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, DbError> {
        InvoiceRepo::new(&self.pool).list().await
    }

    async fn get_invoice(&self, id: i32) -> Result<InvoiceWithCompany, DbError> {
        InvoiceRepo::new(&self.pool).get(id).await
    }

    async fn create_invoice(&self, new: NewInvoice) -> Result<Invoice, DbError> {
        InvoiceRepo::new(&self.pool).create(&new).await
    }

    async fn update_invoice_amount(&self, id: i32, amt: Amount) -> Result<Invoice, DbError> {
        InvoiceRepo::new(&self.pool).update_amount(id, amt).await
    }

    async fn set_invoice_paid(&self, id: i32, paid: bool) -> Result<Invoice, DbError> {
        InvoiceRepo::new(&self.pool).set_paid(id, paid).await
    }

    async fn delete_invoice(&self, id: i32) -> Result<(), DbError> {
        InvoiceRepo::new(&self.pool).delete(id).await
    }
}
