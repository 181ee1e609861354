//! Ledger poster: balanced vouchers written atomically.
//!
//! Legs are validated and rounded before any database access. A missing
//! fiscal year or voucher type is resolved on the posting transaction, so a
//! failed post leaves neither behind. Account resolution happens before the
//! voucher-type row is locked, so the lock is held only for numbering and
//! the header/line inserts.

use chrono::{NaiveDate, Utc};
use ledgerflow_core::ledger::{
    AccountRef, LedgerError, LedgerService, NormalizedLeg, VoucherLeg, VoucherStatus, VoucherTotals,
};
use ledgerflow_core::sequence::WellKnownVoucherType;
use ledgerflow_shared::types::CurrencyScale;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use tracing::info;

use super::account::AccountRepository;
use super::fiscal::FiscalRepository;
use super::ledger_db_err;
use super::voucher_type::VoucherTypeRepository;
use crate::entities::{fiscal_years, voucher_lines, vouchers};

/// Input for posting a voucher.
#[derive(Debug, Clone)]
pub struct PostVoucherInput {
    /// Company the voucher belongs to.
    pub company_id: i64,
    /// Optional branch.
    pub branch_id: Option<i64>,
    /// Fiscal year the voucher is dated in; resolved from the date when absent.
    pub fiscal_year_id: Option<i64>,
    /// Voucher type supplying the number; the journal type when absent.
    pub voucher_type_id: Option<i64>,
    /// Voucher date.
    pub posting_date: NaiveDate,
    /// Header narration.
    pub narration: String,
    /// Ordered legs; line numbers follow this order.
    pub legs: Vec<VoucherLeg>,
    /// User creating, approving, and posting the voucher.
    pub actor_user_id: i64,
    /// Originating document type, if any.
    pub source_document_type: Option<String>,
    /// Originating document id, if any.
    pub source_document_id: Option<i64>,
}

/// A committed voucher with its lines.
#[derive(Debug, Clone)]
pub struct PostedVoucher {
    /// Voucher header.
    pub voucher: vouchers::Model,
    /// Voucher lines in line order.
    pub lines: Vec<voucher_lines::Model>,
}

impl PostedVoucher {
    /// Voucher id.
    #[must_use]
    pub const fn voucher_id(&self) -> i64 {
        self.voucher.id
    }

    /// Voucher number.
    #[must_use]
    pub fn voucher_no(&self) -> &str {
        &self.voucher.voucher_no
    }
}

/// Posts balanced vouchers into the ledger.
#[derive(Debug, Clone)]
pub struct LedgerPoster {
    db: DatabaseConnection,
    scale: CurrencyScale,
    default_start_month: u32,
}

impl LedgerPoster {
    /// Creates a new poster rounding amounts to `scale`.
    #[must_use]
    pub const fn new(db: DatabaseConnection, scale: CurrencyScale) -> Self {
        Self {
            db,
            scale,
            default_start_month: 1,
        }
    }

    /// Sets the first month of synthesised fiscal years for companies
    /// without their own setting.
    #[must_use]
    pub const fn with_default_start_month(mut self, month: u32) -> Self {
        self.default_start_month = month;
        self
    }

    /// Posts a voucher in its own transaction.
    ///
    /// Either the header and every line are committed, or nothing is.
    ///
    /// # Errors
    ///
    /// - Validation errors (`NoLegs`, `InvalidLegAmount`, `UnbalancedVoucher`)
    ///   before any database access
    /// - `AccountNotFound` / `AccountNotConfigured` for unresolved legs
    /// - `FiscalYearNotFound`, `VoucherTypeNotFound`, `VoucherTypeInactive`
    /// - `Fiscal` if no fiscal year can be resolved for the date
    /// - `LockContention` on deadlock or serialization failure (retryable)
    pub async fn post(&self, input: PostVoucherInput) -> Result<PostedVoucher, LedgerError> {
        let (legs, totals) = LedgerService::validate_legs(&input.legs, self.scale)?;

        let txn = self.db.begin().await.map_err(ledger_db_err)?;
        let posted =
            Self::post_validated_in(&txn, &input, legs, totals, self.default_start_month).await?;
        txn.commit().await.map_err(ledger_db_err)?;

        info!(
            company_id = input.company_id,
            voucher_id = posted.voucher.id,
            voucher_no = %posted.voucher.voucher_no,
            total = %posted.voucher.total_debit,
            lines = posted.lines.len(),
            "Voucher posted"
        );
        Ok(posted)
    }

    /// Posts already-validated legs inside the caller's transaction.
    ///
    /// Defaults for the fiscal year and voucher type are resolved on `conn`,
    /// so they roll back with everything else.
    pub(crate) async fn post_validated_in<C>(
        conn: &C,
        input: &PostVoucherInput,
        legs: Vec<NormalizedLeg>,
        totals: VoucherTotals,
        default_start_month: u32,
    ) -> Result<PostedVoucher, LedgerError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let fiscal_year_id = match input.fiscal_year_id {
            Some(id) => {
                fiscal_years::Entity::find_by_id(id)
                    .filter(fiscal_years::Column::CompanyId.eq(input.company_id))
                    .one(conn)
                    .await
                    .map_err(ledger_db_err)?
                    .ok_or(LedgerError::FiscalYearNotFound(id))?
                    .id
            }
            None => {
                FiscalRepository::resolve_in(
                    conn,
                    input.company_id,
                    input.posting_date,
                    default_start_month,
                )
                .await?
                .id
            }
        };
        let voucher_type_id = match input.voucher_type_id {
            Some(id) => id,
            None => {
                VoucherTypeRepository::ensure_in(conn, input.company_id, WellKnownVoucherType::Journal)
                    .await?
                    .id
            }
        };

        let refs: Vec<&AccountRef> = legs.iter().map(|l| &l.account).collect();
        let accounts = AccountRepository::resolve_all_in(conn, input.company_id, refs).await?;
        let lines = LedgerService::resolve_lines(legs, |account| {
            accounts
                .get(account)
                .copied()
                .ok_or_else(|| LedgerError::AccountNotConfigured(account.to_string()))
        })?;

        let issued =
            VoucherTypeRepository::issue_number_in(conn, input.company_id, voucher_type_id).await?;

        let now = Utc::now().into();
        let voucher = vouchers::ActiveModel {
            company_id: Set(input.company_id),
            branch_id: Set(input.branch_id),
            fiscal_year_id: Set(fiscal_year_id),
            voucher_type_id: Set(voucher_type_id),
            voucher_no: Set(issued.voucher_no),
            voucher_date: Set(input.posting_date),
            narration: Set(input.narration.clone()),
            total_debit: Set(totals.total_debit),
            total_credit: Set(totals.total_credit),
            status: Set(VoucherStatus::Posted.into()),
            source_document_type: Set(input.source_document_type.clone()),
            source_document_id: Set(input.source_document_id),
            created_by: Set(input.actor_user_id),
            approved_by: Set(Some(input.actor_user_id)),
            posted_by: Set(Some(input.actor_user_id)),
            posted_at: Set(Some(now)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(ledger_db_err)?;

        let mut inserted = Vec::with_capacity(lines.len());
        for line in lines {
            let model = voucher_lines::ActiveModel {
                voucher_id: Set(voucher.id),
                line_no: Set(line.line_no),
                account_id: Set(line.account_id),
                description: Set(line.description),
                debit: Set(line.debit),
                credit: Set(line.credit),
                reference_no: Set(line.reference_no),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(ledger_db_err)?;
            inserted.push(model);
        }

        Ok(PostedVoucher {
            voucher,
            lines: inserted,
        })
    }
}
