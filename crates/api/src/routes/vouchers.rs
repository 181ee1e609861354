//! Voucher posting routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::NaiveDate;
use ledgerflow_core::fiscal::parse_posting_date;
use ledgerflow_core::ledger::{LedgerService, VoucherLeg};
use ledgerflow_db::entities::sea_orm_active_enums::VoucherStatus;
use ledgerflow_db::repositories::{LedgerPoster, PostVoucherInput, PostedVoucher};
use ledgerflow_shared::AppError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, error::ApiError, middleware::ActorUser};

/// Creates the voucher routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/companies/{company_id}/vouchers", post(post_voucher))
}

/// Request body for posting a voucher.
#[derive(Debug, Deserialize)]
pub struct PostVoucherRequest {
    /// Optional branch.
    #[serde(default)]
    pub branch_id: Option<i64>,
    /// Fiscal year; resolved from the posting date when absent.
    #[serde(default)]
    pub fiscal_year_id: Option<i64>,
    /// Voucher type; the journal type when absent.
    #[serde(default)]
    pub voucher_type_id: Option<i64>,
    /// Posting date (YYYY-MM-DD); today when absent.
    #[serde(default)]
    pub posting_date: Option<String>,
    /// Header narration.
    pub narration: String,
    /// Debit and credit legs.
    pub legs: Vec<VoucherLeg>,
    /// Originating document type.
    #[serde(default)]
    pub source_document_type: Option<String>,
    /// Originating document id.
    #[serde(default)]
    pub source_document_id: Option<i64>,
}

/// A posted voucher line.
#[derive(Debug, Serialize)]
pub struct VoucherLineResponse {
    /// One-based line number.
    pub line_no: i32,
    /// Resolved account.
    pub account_id: i64,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line description.
    pub description: Option<String>,
    /// Source document reference.
    pub reference_no: Option<String>,
}

/// A posted voucher.
#[derive(Debug, Serialize)]
pub struct VoucherResponse {
    /// Voucher id.
    pub id: i64,
    /// Voucher number.
    pub voucher_no: String,
    /// Voucher date.
    pub voucher_date: NaiveDate,
    /// Fiscal year the voucher is dated in.
    pub fiscal_year_id: i64,
    /// Voucher type.
    pub voucher_type_id: i64,
    /// Voucher status.
    pub status: VoucherStatus,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Lines in line order.
    pub lines: Vec<VoucherLineResponse>,
}

impl From<PostedVoucher> for VoucherResponse {
    fn from(posted: PostedVoucher) -> Self {
        let voucher = posted.voucher;
        Self {
            id: voucher.id,
            voucher_no: voucher.voucher_no,
            voucher_date: voucher.voucher_date,
            fiscal_year_id: voucher.fiscal_year_id,
            voucher_type_id: voucher.voucher_type_id,
            status: voucher.status,
            total_debit: voucher.total_debit,
            total_credit: voucher.total_credit,
            lines: posted
                .lines
                .into_iter()
                .map(|line| VoucherLineResponse {
                    line_no: line.line_no,
                    account_id: line.account_id,
                    debit: line.debit,
                    credit: line.credit,
                    description: line.description,
                    reference_no: line.reference_no,
                })
                .collect(),
        }
    }
}

/// Resolves an optional request date against the configured timezone.
pub(crate) fn resolve_date(
    state: &AppState,
    raw: Option<&str>,
) -> Result<NaiveDate, ApiError> {
    match raw {
        Some(raw) => Ok(parse_posting_date(raw)?),
        None => Ok(state.posting.today()),
    }
}

/// POST /companies/{company_id}/vouchers
async fn post_voucher(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    actor: ActorUser,
    Json(req): Json<PostVoucherRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Reject bad legs before touching the database.
    LedgerService::validate_legs(&req.legs, state.posting.scale())?;
    if req.narration.trim().is_empty() {
        return Err(AppError::Validation("narration is required".to_string()).into());
    }
    let posting_date = resolve_date(&state, req.posting_date.as_deref())?;

    // Missing fiscal year and voucher type are resolved on the posting
    // transaction.
    let posted = LedgerPoster::new((*state.db).clone(), state.posting.scale())
        .with_default_start_month(state.posting.default_fiscal_year_start_month)
        .post(PostVoucherInput {
            company_id,
            branch_id: req.branch_id,
            fiscal_year_id: req.fiscal_year_id,
            voucher_type_id: req.voucher_type_id,
            posting_date,
            narration: req.narration,
            legs: req.legs,
            actor_user_id: actor.user_id(),
            source_document_type: req.source_document_type,
            source_document_id: req.source_document_id,
        })
        .await?;

    info!(
        company_id,
        voucher_id = posted.voucher_id(),
        user_id = actor.user_id(),
        "Voucher posted via API"
    );

    Ok((StatusCode::CREATED, Json(VoucherResponse::from(posted))))
}
