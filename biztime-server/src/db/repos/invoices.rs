//! Invoice repository
//!
//! - get: single JOIN with companies, flat row reshaped into a nested company
//! - create: foreign-key violation becomes `UnknownCompany`
//! - payment: `paid_date` is set and cleared together with `paid`

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::{is_foreign_key_violation, Company, DbError};
use crate::models::Amount;

/// Invoice record from database
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Invoice {
    pub id: i32,
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

/// List projection: no amount, payment state or dates
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct InvoiceSummary {
    pub id: i32,
    pub comp_code: String,
}

/// Invoice with its owning company embedded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceWithCompany {
    pub id: i32,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub company: Company,
}

impl InvoiceWithCompany {
    /// Combine an invoice with the company it references.
    pub fn new(invoice: Invoice, company: Company) -> Self {
        Self {
            id: invoice.id,
            amt: invoice.amt,
            paid: invoice.paid,
            add_date: invoice.add_date,
            paid_date: invoice.paid_date,
            company,
        }
    }
}

/// Flat row produced by the invoices/companies JOIN
#[derive(Debug, FromRow)]
struct InvoiceCompanyRow {
    id: i32,
    amt: f64,
    paid: bool,
    add_date: NaiveDate,
    paid_date: Option<NaiveDate>,
    code: String,
    name: String,
    description: Option<String>,
}

impl From<InvoiceCompanyRow> for InvoiceWithCompany {
    fn from(row: InvoiceCompanyRow) -> Self {
        Self {
            id: row.id,
            amt: row.amt,
            paid: row.paid,
            add_date: row.add_date,
            paid_date: row.paid_date,
            company: Company {
                code: row.code,
                name: row.name,
                description: row.description,
            },
        }
    }
}

/// Validated input for invoice creation
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub comp_code: String,
    pub amt: Amount,
}

/// Invoice repository
pub struct InvoiceRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> InvoiceRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List `{id, comp_code}` for every invoice, ordered by id.
    pub async fn list(&self) -> Result<Vec<InvoiceSummary>, DbError> {
        let invoices = sqlx::query_as::<_, InvoiceSummary>(
            r#"
            SELECT id, comp_code
            FROM invoices
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(invoices)
    }

    /// Get one invoice with its company, in a single round trip.
    pub async fn get(&self, id: i32) -> Result<InvoiceWithCompany, DbError> {
        let row = sqlx::query_as::<_, InvoiceCompanyRow>(
            r#"
            SELECT
                i.id,
                i.amt,
                i.paid,
                i.add_date,
                i.paid_date,
                c.code,
                c.name,
                c.description
            FROM invoices i
            JOIN companies c ON c.code = i.comp_code
            WHERE i.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("invoice", id))?;

        Ok(row.into())
    }

    /// Insert with store defaults for `paid` and `add_date`.
    pub async fn create(&self, new: &NewInvoice) -> Result<Invoice, DbError> {
        sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (comp_code, amt)
            VALUES ($1, $2)
            RETURNING id, comp_code, amt, paid, add_date, paid_date
            "#,
        )
        .bind(&new.comp_code)
        .bind(new.amt.value())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DbError::UnknownCompany {
                    code: new.comp_code.clone(),
                }
            } else {
                DbError::Sqlx(e)
            }
        })
    }

    /// Change the amount only; payment state is untouched.
    pub async fn update_amount(&self, id: i32, amt: Amount) -> Result<Invoice, DbError> {
        sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET amt = $2
            WHERE id = $1
            RETURNING id, comp_code, amt, paid, add_date, paid_date
            "#,
        )
        .bind(id)
        .bind(amt.value())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("invoice", id))
    }

    /// Set payment state. `unpaid -> paid` stamps today's date,
    /// `paid -> paid` keeps the original date, `-> unpaid` clears it.
    pub async fn set_paid(&self, id: i32, paid: bool) -> Result<Invoice, DbError> {
        sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET paid = $2::boolean,
                paid_date = CASE
                    WHEN NOT $2::boolean THEN NULL
                    WHEN paid THEN paid_date
                    ELSE CURRENT_DATE
                END
            WHERE id = $1
            RETURNING id, comp_code, amt, paid, add_date, paid_date
            "#,
        )
        .bind(id)
        .bind(paid)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("invoice", id))
    }

    pub async fn delete(&self, id: i32) -> Result<(), DbError> {
        sqlx::query_scalar::<_, i32>("DELETE FROM invoices WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(|_| ())
            .ok_or_else(|| DbError::not_found("invoice", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> InvoiceCompanyRow {
        InvoiceCompanyRow {
            id: 7,
            amt: 100.0,
            paid: false,
            add_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            paid_date: None,
            code: "test1".into(),
            name: "testName".into(),
            description: Some("testDescription".into()),
        }
    }

    #[test]
    fn join_row_nests_company() {
        let invoice = InvoiceWithCompany::from(sample_row());
        assert_eq!(invoice.id, 7);
        assert_eq!(
            invoice.company,
            Company {
                code: "test1".into(),
                name: "testName".into(),
                description: Some("testDescription".into()),
            }
        );
    }

    #[test]
    fn nested_shape_has_no_flat_company_fields() {
        let json = serde_json::to_value(InvoiceWithCompany::from(sample_row())).unwrap();
        let obj = json.as_object().unwrap();

        assert!(!obj.contains_key("comp_code"));
        assert!(!obj.contains_key("code"));
        assert!(!obj.contains_key("name"));
        assert_eq!(json["add_date"], "2024-03-01");
        assert!(json["paid_date"].is_null());
        assert_eq!(json["company"]["code"], "test1");
    }
}
