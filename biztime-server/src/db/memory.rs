//! In-memory implementation of Store for testing and development
//!
//! Mirrors the PostgreSQL schema: store-assigned invoice ids, unique company
//! codes and names, `add_date` defaulting to today, and cascading deletion
//! of a company's invoices.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use super::repos::{
    Company, CompanyChanges, CompanyDetail, CompanySummary, DbError, Invoice, InvoiceSummary,
    InvoiceWithCompany, NewCompany, NewInvoice,
};
use super::store::Store;
use crate::models::Amount;

#[derive(Default)]
struct Tables {
    companies: BTreeMap<String, Company>,
    invoices: BTreeMap<i32, Invoice>,
    last_invoice_id: i32,
}

impl Tables {
    fn name_taken(&self, name: &str, except_code: Option<&str>) -> bool {
        self.companies
            .values()
            .any(|c| c.name == name && Some(c.code.as_str()) != except_code)
    }
}

/// In-memory store. Cheap to clone; clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_companies(&self) -> Result<Vec<CompanySummary>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .companies
            .values()
            .map(|c| CompanySummary {
                code: c.code.clone(),
                name: c.name.clone(),
            })
            .collect())
    }

    async fn get_company(&self, code: &str) -> Result<CompanyDetail, DbError> {
        let tables = self.tables.read().await;
        let company = tables
            .companies
            .get(code)
            .ok_or_else(|| DbError::not_found("company", code))?;

        let invoices = tables
            .invoices
            .values()
            .filter(|inv| inv.comp_code == code)
            .map(|inv| inv.id)
            .collect();

        Ok(CompanyDetail {
            code: company.code.clone(),
            name: company.name.clone(),
            description: company.description.clone(),
            invoices,
        })
    }

    async fn company_exists(&self, code: &str) -> Result<bool, DbError> {
        Ok(self.tables.read().await.companies.contains_key(code))
    }

    async fn create_company(&self, new: NewCompany) -> Result<Company, DbError> {
        let mut tables = self.tables.write().await;

        if tables.companies.contains_key(new.code.as_str()) {
            return Err(DbError::Conflict(format!(
                "Company already exists: {}",
                new.code.as_str()
            )));
        }
        if tables.name_taken(new.name.as_str(), None) {
            return Err(DbError::Conflict(format!(
                "Company name already in use: {}",
                new.name.as_str()
            )));
        }

        let company = Company {
            code: new.code.into_string(),
            name: new.name.into_string(),
            description: new.description,
        };
        tables
            .companies
            .insert(company.code.clone(), company.clone());

        Ok(company)
    }

    async fn update_company(
        &self,
        code: &str,
        changes: CompanyChanges,
    ) -> Result<Company, DbError> {
        let mut tables = self.tables.write().await;

        if !tables.companies.contains_key(code) {
            return Err(DbError::not_found("company", code));
        }
        if tables.name_taken(changes.name.as_str(), Some(code)) {
            return Err(DbError::Conflict(format!(
                "Company name already in use: {}",
                changes.name.as_str()
            )));
        }

        let company = tables
            .companies
            .get_mut(code)
            .ok_or_else(|| DbError::not_found("company", code))?;
        company.name = changes.name.into_string();
        company.description = changes.description;

        Ok(company.clone())
    }

    async fn delete_company(&self, code: &str) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;

        tables
            .companies
            .remove(code)
            .ok_or_else(|| DbError::not_found("company", code))?;
        tables.invoices.retain(|_, inv| inv.comp_code != code);

        Ok(())
    }

    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .invoices
            .values()
            .map(|inv| InvoiceSummary {
                id: inv.id,
                comp_code: inv.comp_code.clone(),
            })
            .collect())
    }

    async fn get_invoice(&self, id: i32) -> Result<InvoiceWithCompany, DbError> {
        // Single read guard: invoice and company come from the same snapshot
        let tables = self.tables.read().await;
        let invoice = tables
            .invoices
            .get(&id)
            .ok_or_else(|| DbError::not_found("invoice", id))?;
        let company = tables
            .companies
            .get(&invoice.comp_code)
            .ok_or_else(|| DbError::not_found("invoice", id))?;

        Ok(InvoiceWithCompany::new(invoice.clone(), company.clone()))
    }

    async fn create_invoice(&self, new: NewInvoice) -> Result<Invoice, DbError> {
        let mut tables = self.tables.write().await;

        if !tables.companies.contains_key(&new.comp_code) {
            return Err(DbError::UnknownCompany {
                code: new.comp_code,
            });
        }

        tables.last_invoice_id += 1;
        let invoice = Invoice {
            id: tables.last_invoice_id,
            comp_code: new.comp_code,
            amt: new.amt.value(),
            paid: false,
            add_date: today(),
            paid_date: None,
        };
        tables.invoices.insert(invoice.id, invoice.clone());

        Ok(invoice)
    }

    async fn update_invoice_amount(&self, id: i32, amt: Amount) -> Result<Invoice, DbError> {
        let mut tables = self.tables.write().await;
        let invoice = tables
            .invoices
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("invoice", id))?;

        invoice.amt = amt.value();
        Ok(invoice.clone())
    }

    async fn set_invoice_paid(&self, id: i32, paid: bool) -> Result<Invoice, DbError> {
        let mut tables = self.tables.write().await;
        let invoice = tables
            .invoices
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("invoice", id))?;

        invoice.paid_date = match (invoice.paid, paid) {
            (_, false) => None,
            (true, true) => invoice.paid_date,
            (false, true) => Some(today()),
        };
        invoice.paid = paid;

        Ok(invoice.clone())
    }

    async fn delete_invoice(&self, id: i32) -> Result<(), DbError> {
        self.tables
            .write()
            .await
            .invoices
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::not_found("invoice", id))
    }
}
