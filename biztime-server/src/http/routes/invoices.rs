//! Invoice endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::db::{Invoice, InvoiceSummary, InvoiceWithCompany, NewInvoice};
use crate::http::error::ApiError;
use crate::http::extractors::{present, InvoiceId, JsonBody};
use crate::http::server::AppState;
use crate::models::{Amount, ValidationError};

/// Create invoice request
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub comp_code: String,
    pub amt: f64,
}

/// Update invoice request. `id` is only captured to reject it.
#[derive(Debug, Deserialize)]
pub struct UpdateInvoiceRequest {
    #[serde(default, deserialize_with = "present")]
    pub id: Option<serde_json::Value>,
    pub amt: Option<f64>,
}

/// Payment request
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub paid: bool,
}

/// `{"invoices": [...]}`
#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<InvoiceSummary>,
}

/// `{"invoice": {...}}`
#[derive(Debug, Serialize)]
pub struct InvoiceResponse<T> {
    pub invoice: T,
}

/// GET /invoices
async fn list_invoices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<InvoiceListResponse>, ApiError> {
    let invoices = state.store.list_invoices().await?;
    Ok(Json(InvoiceListResponse { invoices }))
}

/// GET /invoices/{id} - invoice with its company nested
async fn get_invoice(
    State(state): State<Arc<AppState>>,
    InvoiceId(id): InvoiceId,
) -> Result<Json<InvoiceResponse<InvoiceWithCompany>>, ApiError> {
    let invoice = state.store.get_invoice(id).await?;
    Ok(Json(InvoiceResponse { invoice }))
}

/// POST /invoices
///
/// The company must exist; otherwise 400 "Not allowed" and nothing is inserted.
async fn create_invoice(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse<Invoice>>), ApiError> {
    let amt = Amount::new(req.amt)?;

    if !state.store.company_exists(&req.comp_code).await? {
        tracing::warn!(comp_code = %req.comp_code, "invoice references unknown company");
        return Err(ApiError::not_allowed());
    }

    let invoice = state
        .store
        .create_invoice(NewInvoice {
            comp_code: req.comp_code,
            amt,
        })
        .await?;
    tracing::info!(id = invoice.id, comp_code = %invoice.comp_code, "invoice created");

    Ok((StatusCode::CREATED, Json(InvoiceResponse { invoice })))
}

/// PUT|PATCH /invoices/{id} - amount only
async fn update_invoice(
    State(state): State<Arc<AppState>>,
    InvoiceId(id): InvoiceId,
    JsonBody(req): JsonBody<UpdateInvoiceRequest>,
) -> Result<Json<InvoiceResponse<Invoice>>, ApiError> {
    if req.id.is_some() {
        tracing::warn!(id, "rejected attempt to change invoice id");
        return Err(ApiError::not_allowed());
    }

    let amt = req.amt.ok_or(ValidationError::Empty { field: "amt" })?;
    let invoice = state
        .store
        .update_invoice_amount(id, Amount::new(amt)?)
        .await?;

    Ok(Json(InvoiceResponse { invoice }))
}

/// PUT /invoices/{id}/payment
async fn set_payment(
    State(state): State<Arc<AppState>>,
    InvoiceId(id): InvoiceId,
    JsonBody(req): JsonBody<PaymentRequest>,
) -> Result<Json<InvoiceResponse<Invoice>>, ApiError> {
    let invoice = state.store.set_invoice_paid(id, req.paid).await?;
    tracing::info!(id, paid = invoice.paid, "invoice payment state set");

    Ok(Json(InvoiceResponse { invoice }))
}

/// DELETE /invoices/{id}
async fn delete_invoice(
    State(state): State<Arc<AppState>>,
    InvoiceId(id): InvoiceId,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete_invoice(id).await?;
    tracing::info!(id, "invoice deleted");

    Ok(Json(MessageResponse {
        message: "Invoice deleted",
    }))
}

/// Invoice routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route(
            "/invoices/{id}",
            get(get_invoice)
                .put(update_invoice)
                .patch(update_invoice)
                .delete(delete_invoice),
        )
        .route("/invoices/{id}/payment", put(set_payment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_detects_null_id() {
        let req: UpdateInvoiceRequest =
            serde_json::from_str(r#"{"id": null, "amt": 5}"#).unwrap();
        assert!(req.id.is_some());
        assert_eq!(req.amt, Some(5.0));
    }

    #[test]
    fn create_request_accepts_integer_amount() {
        let req: CreateInvoiceRequest =
            serde_json::from_str(r#"{"comp_code": "test1", "amt": 100}"#).unwrap();
        assert_eq!(req.amt, 100.0);
    }
}
