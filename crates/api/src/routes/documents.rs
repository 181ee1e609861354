//! Document submission routes.
//!
//! Submitting a document either opens an approval instance, auto-approves
//! it (optionally posting a voucher), or marks it submitted. When the
//! request names a `document_table`, the document's `status` column is
//! written back in the same transaction.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::post,
};
use ledgerflow_core::ledger::VoucherLeg;
use ledgerflow_core::workflow::DocumentStatus;
use ledgerflow_db::repositories::{
    ApprovalRouter, DocumentStatusWriter, DocumentTable, SubmitDocumentInput, SubmitOutcome,
    UntrackedDocument, VoucherDraft,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::vouchers::{VoucherResponse, resolve_date};
use crate::{AppState, error::ApiError, middleware::ActorUser};

/// Creates the document submission routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/documents/submit", post(submit_document))
        .route(
            "/companies/{company_id}/workflows/{workflow_id}/start",
            post(start_workflow),
        )
}

/// Voucher to post if the document is auto-approved.
#[derive(Debug, Deserialize)]
pub struct VoucherDraftRequest {
    /// Optional branch.
    #[serde(default)]
    pub branch_id: Option<i64>,
    /// Voucher type; the journal type when absent.
    #[serde(default)]
    pub voucher_type_id: Option<i64>,
    /// Fiscal year; resolved from the posting date when absent.
    #[serde(default)]
    pub fiscal_year_id: Option<i64>,
    /// Posting date (YYYY-MM-DD); today when absent.
    #[serde(default)]
    pub posting_date: Option<String>,
    /// Header narration.
    pub narration: String,
    /// Debit and credit legs.
    pub legs: Vec<VoucherLeg>,
}

/// Request body for submitting a document.
#[derive(Debug, Deserialize)]
pub struct SubmitDocumentRequest {
    /// Document id in its own table.
    pub document_id: i64,
    /// Document type key (e.g. "PURCHASE_ORDER").
    #[serde(default)]
    pub document_type: Option<String>,
    /// Document route key (e.g. "/purchase-orders").
    #[serde(default)]
    pub document_route: Option<String>,
    /// Amount compared against workflow bounds.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Preferred first-step assignee.
    #[serde(default)]
    pub target_user_id: Option<i64>,
    /// Table whose `status` column tracks the document.
    #[serde(default)]
    pub document_table: Option<String>,
    /// Voucher to post on auto-approval.
    #[serde(default)]
    pub voucher: Option<VoucherDraftRequest>,
}

/// Result of a submission.
#[derive(Debug, Serialize)]
pub struct SubmitDocumentResponse {
    /// Status the document moved to.
    pub status: DocumentStatus,
    /// Approval instance, when one was opened.
    pub instance_id: Option<i64>,
    /// First-step assignee, when an instance was opened.
    pub assigned_to: Option<i64>,
    /// Voucher posted on auto-approval.
    pub voucher: Option<VoucherResponse>,
}

impl From<SubmitOutcome> for SubmitDocumentResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        Self {
            status: outcome.status,
            instance_id: outcome.instance_id,
            assigned_to: outcome.assigned_to,
            voucher: outcome.voucher.map(VoucherResponse::from),
        }
    }
}

fn to_input(
    state: &AppState,
    company_id: i64,
    actor: ActorUser,
    req: SubmitDocumentRequest,
) -> Result<(SubmitDocumentInput, Option<DocumentTable>), ApiError> {
    let table = req
        .document_table
        .map(|name| DocumentTable::allowed(name, &state.posting.document_tables))
        .transpose()?;

    let voucher = match req.voucher {
        Some(draft) => Some(VoucherDraft {
            branch_id: draft.branch_id,
            voucher_type_id: draft.voucher_type_id,
            fiscal_year_id: draft.fiscal_year_id,
            posting_date: resolve_date(state, draft.posting_date.as_deref())?,
            narration: draft.narration,
            legs: draft.legs,
        }),
        None => None,
    };

    let input = SubmitDocumentInput {
        company_id,
        document_id: req.document_id,
        document_type: req.document_type,
        document_route: req.document_route,
        amount: req.amount,
        submitted_by: actor.user_id(),
        target_user_id: req.target_user_id,
        voucher,
    };

    Ok((input, table))
}

fn approval_router(state: &AppState) -> ApprovalRouter {
    ApprovalRouter::new(
        (*state.db).clone(),
        state.posting.clone(),
        (*state.email_service).clone(),
    )
}

/// POST /companies/{company_id}/documents/submit
async fn submit_document(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    actor: ActorUser,
    Json(req): Json<SubmitDocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (input, table) = to_input(&state, company_id, actor, req)?;
    let document_id = input.document_id;
    let writer: &dyn DocumentStatusWriter = match &table {
        Some(table) => table,
        None => &UntrackedDocument,
    };

    let outcome = approval_router(&state).submit(input, writer).await?;

    info!(
        company_id,
        document_id,
        status = outcome.status.as_str(),
        instance_id = ?outcome.instance_id,
        "Document submitted"
    );

    Ok(Json(SubmitDocumentResponse::from(outcome)))
}

/// POST /companies/{company_id}/workflows/{workflow_id}/start
async fn start_workflow(
    State(state): State<AppState>,
    Path((company_id, workflow_id)): Path<(i64, i64)>,
    actor: ActorUser,
    Json(req): Json<SubmitDocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (input, table) = to_input(&state, company_id, actor, req)?;
    let writer: &dyn DocumentStatusWriter = match &table {
        Some(table) => table,
        None => &UntrackedDocument,
    };

    let outcome = approval_router(&state)
        .start_workflow(input, workflow_id, writer)
        .await?;

    Ok(Json(SubmitDocumentResponse::from(outcome)))
}
