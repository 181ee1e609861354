//! Fiscal year routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use ledgerflow_db::{entities::fiscal_years, repositories::FiscalRepository};
use serde::{Deserialize, Serialize};

use super::vouchers::resolve_date;
use crate::{AppState, error::ApiError, middleware::ActorUser};

/// Creates the fiscal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies/{company_id}/fiscal-years/resolve",
            get(resolve_fiscal_year),
        )
        .route(
            "/companies/{company_id}/fiscal-years/{fiscal_year_id}",
            get(get_fiscal_year),
        )
}

/// Query for resolving a fiscal year.
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// Posting date (YYYY-MM-DD); today when absent.
    pub date: Option<String>,
}

/// Response for a fiscal year.
#[derive(Debug, Serialize)]
pub struct FiscalYearResponse {
    /// Fiscal year id.
    pub id: i64,
    /// Fiscal year code (e.g. "FY2026" or "FY2025/26").
    pub code: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Whether postings are accepted.
    pub is_open: bool,
}

impl From<fiscal_years::Model> for FiscalYearResponse {
    fn from(year: fiscal_years::Model) -> Self {
        Self {
            id: year.id,
            code: year.code,
            start_date: year.start_date,
            end_date: year.end_date,
            is_open: year.is_open,
        }
    }
}

/// GET /companies/{company_id}/fiscal-years/resolve?date=YYYY-MM-DD
///
/// May create or re-open a year, so it needs an acting user like the
/// posting routes do.
async fn resolve_fiscal_year(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    _actor: ActorUser,
    Query(query): Query<ResolveQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let date = resolve_date(&state, query.date.as_deref())?;
    let year = FiscalRepository::new(
        (*state.db).clone(),
        state.posting.default_fiscal_year_start_month,
    )
    .resolve(company_id, date)
    .await?;

    Ok(Json(FiscalYearResponse::from(year)))
}

/// GET /companies/{company_id}/fiscal-years/{fiscal_year_id}
async fn get_fiscal_year(
    State(state): State<AppState>,
    Path((company_id, fiscal_year_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let year = FiscalRepository::new(
        (*state.db).clone(),
        state.posting.default_fiscal_year_start_month,
    )
    .find_by_id(company_id, fiscal_year_id)
    .await?;

    Ok(Json(FiscalYearResponse::from(year)))
}
