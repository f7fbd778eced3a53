//! Company repository
//!
//! - get: LEFT JOIN + array_agg embeds invoice ids in one query
//! - create/update: unique violations become `Conflict`
//! - update/delete: zero rows affected is `NotFound`

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::{unique_violation, DbError};
use crate::models::{CompanyCode, CompanyName};

/// Company record from database
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// List projection: description is deliberately absent
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct CompanySummary {
    pub code: String,
    pub name: String,
}

/// Company with the ids of its invoices
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct CompanyDetail {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub invoices: Vec<i32>,
}

/// Validated input for company creation
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub code: CompanyCode,
    pub name: CompanyName,
    pub description: Option<String>,
}

/// Mutable company fields; the code is never among them
#[derive(Debug, Clone)]
pub struct CompanyChanges {
    pub name: CompanyName,
    pub description: Option<String>,
}

/// Constraint backing `companies.name UNIQUE`
const NAME_CONSTRAINT: &str = "companies_name_key";

/// Company repository
pub struct CompanyRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CompanyRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List `{code, name}` for every company, ordered by code.
    pub async fn list(&self) -> Result<Vec<CompanySummary>, DbError> {
        let companies = sqlx::query_as::<_, CompanySummary>(
            r#"
            SELECT code, name
            FROM companies
            ORDER BY code
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(companies)
    }

    /// Get a single company with its invoice ids.
    pub async fn get(&self, code: &str) -> Result<CompanyDetail, DbError> {
        sqlx::query_as::<_, CompanyDetail>(
            r#"
            SELECT
                c.code,
                c.name,
                c.description,
                COALESCE(
                    array_agg(i.id ORDER BY i.id) FILTER (WHERE i.id IS NOT NULL),
                    '{}'
                ) AS invoices
            FROM companies c
            LEFT JOIN invoices i ON i.comp_code = c.code
            WHERE c.code = $1
            GROUP BY c.code, c.name, c.description
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("company", code))
    }

    pub async fn exists(&self, code: &str) -> Result<bool, DbError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM companies WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool)
                .await?;

        Ok(exists.0)
    }

    /// Insert a company. A duplicate code or name is a `Conflict`.
    pub async fn create(&self, new: &NewCompany) -> Result<Company, DbError> {
        sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (code, name, description)
            VALUES ($1, $2, $3)
            RETURNING code, name, description
            "#,
        )
        .bind(new.code.as_str())
        .bind(new.name.as_str())
        .bind(new.description.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(constraint) if constraint == NAME_CONSTRAINT => {
                DbError::Conflict(format!("Company name already in use: {}", new.name.as_str()))
            }
            Some(_) => DbError::Conflict(format!("Company already exists: {}", new.code.as_str())),
            None => DbError::Sqlx(e),
        })
    }

    /// Update name/description by code.
    pub async fn update(&self, code: &str, changes: &CompanyChanges) -> Result<Company, DbError> {
        sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET name = $2, description = $3
            WHERE code = $1
            RETURNING code, name, description
            "#,
        )
        .bind(code)
        .bind(changes.name.as_str())
        .bind(changes.description.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(_) => DbError::Conflict(format!(
                "Company name already in use: {}",
                changes.name.as_str()
            )),
            None => DbError::Sqlx(e),
        })?
        .ok_or_else(|| DbError::not_found("company", code))
    }

    /// Delete by code. Invoices go with it (`ON DELETE CASCADE`).
    pub async fn delete(&self, code: &str) -> Result<(), DbError> {
        sqlx::query_scalar::<_, String>("DELETE FROM companies WHERE code = $1 RETURNING code")
            .bind(code)
            .fetch_optional(self.pool)
            .await?
            .map(|_| ())
            .ok_or_else(|| DbError::not_found("company", code))
    }
}
