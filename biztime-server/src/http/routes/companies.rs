//! Company endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::db::{Company, CompanyChanges, CompanyDetail, CompanySummary, NewCompany};
use crate::http::error::ApiError;
use crate::http::extractors::{present, JsonBody};
use crate::http::server::AppState;
use crate::models::{CompanyCode, CompanyName, ValidationError};

/// Create company request
#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Update company request. `code` is only captured to reject it.
#[derive(Debug, Deserialize)]
pub struct UpdateCompanyRequest {
    #[serde(default, deserialize_with = "present")]
    pub code: Option<serde_json::Value>,
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// `{"companies": [...]}`
#[derive(Debug, Serialize)]
pub struct CompanyListResponse {
    pub companies: Vec<CompanySummary>,
}

/// `{"company": {...}}`
#[derive(Debug, Serialize)]
pub struct CompanyResponse<T> {
    pub company: T,
}

/// GET /companies
async fn list_companies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CompanyListResponse>, ApiError> {
    let companies = state.store.list_companies().await?;
    Ok(Json(CompanyListResponse { companies }))
}

/// GET /companies/{code}
async fn get_company(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<CompanyResponse<CompanyDetail>>, ApiError> {
    let company = state.store.get_company(&code).await?;
    Ok(Json(CompanyResponse { company }))
}

/// POST /companies
async fn create_company(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse<Company>>), ApiError> {
    let new = NewCompany {
        code: CompanyCode::new(&req.code)?,
        name: CompanyName::new(&req.name)?,
        description: req.description,
    };

    let company = state.store.create_company(new).await?;
    tracing::info!(code = %company.code, "company created");

    Ok((StatusCode::CREATED, Json(CompanyResponse { company })))
}

/// PUT|PATCH /companies/{code}
async fn update_company(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    JsonBody(req): JsonBody<UpdateCompanyRequest>,
) -> Result<Json<CompanyResponse<Company>>, ApiError> {
    if req.code.is_some() {
        tracing::warn!(%code, "rejected attempt to change company code");
        return Err(ApiError::not_allowed());
    }

    let name = req
        .name
        .ok_or(ValidationError::Empty { field: "company name" })?;
    let changes = CompanyChanges {
        name: CompanyName::new(&name)?,
        description: req.description,
    };

    let company = state.store.update_company(&code, changes).await?;
    Ok(Json(CompanyResponse { company }))
}

/// DELETE /companies/{code}
async fn delete_company(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete_company(&code).await?;
    tracing::info!(%code, "company deleted");

    Ok(Json(MessageResponse {
        message: "Company deleted",
    }))
}

/// Company routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/{code}",
            get(get_company)
                .put(update_company)
                .patch(update_company)
                .delete(delete_company),
        )
}
