//! Schema for companies and invoices
//!
//! Every statement is idempotent so `run` is safe on each startup.

use sqlx::PgPool;

use super::DbError;

/// Create tables and indexes if they do not exist yet.
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running biztime migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            code TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;
    tracing::debug!("companies table ready");

    // paid_date is present exactly when paid is true
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS invoices (
            id SERIAL PRIMARY KEY,
            comp_code TEXT NOT NULL REFERENCES companies (code) ON DELETE CASCADE,
            amt FLOAT8 NOT NULL CHECK (amt > 0),
            paid BOOLEAN NOT NULL DEFAULT FALSE,
            add_date DATE NOT NULL DEFAULT CURRENT_DATE,
            paid_date DATE,
            CONSTRAINT invoices_paid_date_matches_paid CHECK (paid = (paid_date IS NOT NULL))
        )
        "#,
    )
    .execute(pool)
    .await?;
    tracing::debug!("invoices table ready");

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_invoices_comp_code ON invoices(comp_code)")
        .execute(pool)
        .await?;

    tracing::info!("biztime migrations complete");
    Ok(())
}
