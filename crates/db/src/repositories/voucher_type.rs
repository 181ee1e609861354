//! Voucher types and gapless voucher numbering.

use chrono::Utc;
use ledgerflow_core::ledger::LedgerError;
use ledgerflow_core::sequence::{WellKnownVoucherType, format_voucher_no};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionSession, TransactionTrait,
};
use tracing::{debug, info};

use super::{is_unique_violation, ledger_db_err};
use crate::entities::voucher_types;

/// A voucher number taken from a voucher type's counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedNumber {
    /// Voucher type the number belongs to.
    pub voucher_type_id: i64,
    /// The counter value consumed.
    pub number: i64,
    /// Formatted voucher number (`prefix-number`).
    pub voucher_no: String,
}

/// Voucher type repository.
///
/// Every operation runs on the caller's connection or transaction, so the
/// counter increment and any lazily created type commit with the voucher.
#[derive(Debug, Clone, Copy)]
pub struct VoucherTypeRepository;

impl VoucherTypeRepository {
    async fn find_by_code_in<C: ConnectionTrait>(
        conn: &C,
        company_id: i64,
        code: &str,
    ) -> Result<Option<voucher_types::Model>, LedgerError> {
        voucher_types::Entity::find()
            .filter(voucher_types::Column::CompanyId.eq(company_id))
            .filter(voucher_types::Column::Code.eq(code))
            .one(conn)
            .await
            .map_err(ledger_db_err)
    }

    /// Resolves or lazily creates a well-known voucher type.
    ///
    /// A concurrent creator winning the insert is not an error: the loser
    /// rolls back its savepoint and re-reads the winner's row.
    pub async fn ensure_in<C>(
        conn: &C,
        company_id: i64,
        kind: WellKnownVoucherType,
    ) -> Result<voucher_types::Model, LedgerError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        if let Some(existing) = Self::find_by_code_in(conn, company_id, kind.code()).await? {
            return Ok(existing);
        }

        let savepoint = conn.begin().await.map_err(ledger_db_err)?;
        let now = Utc::now().into();
        let inserted = voucher_types::ActiveModel {
            company_id: Set(company_id),
            code: Set(kind.code().to_string()),
            name: Set(kind.name().to_string()),
            category: Set(kind.category().to_string()),
            prefix: Set(kind.code().to_string()),
            next_number: Set(1),
            requires_approval: Set(false),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&savepoint)
        .await;

        match inserted {
            Ok(model) => {
                savepoint.commit().await.map_err(ledger_db_err)?;
                info!(
                    company_id,
                    voucher_type_id = model.id,
                    code = %model.code,
                    "Created voucher type"
                );
                Ok(model)
            }
            Err(e) if is_unique_violation(&e) => {
                savepoint.rollback().await.map_err(ledger_db_err)?;
                debug!(company_id, code = kind.code(), "Voucher type created concurrently");
                Self::find_by_code_in(conn, company_id, kind.code())
                    .await?
                    .ok_or_else(|| LedgerError::VoucherTypeNotFound(kind.code().to_string()))
            }
            Err(e) => Err(ledger_db_err(e)),
        }
    }

    /// Takes the next voucher number for a voucher type.
    ///
    /// Reads the type row `FOR UPDATE`, so concurrent issuers for the same
    /// type queue on the row until the holder commits or rolls back. The
    /// increment is part of the caller's transaction: a rollback returns the
    /// number and leaves no gap.
    ///
    /// # Errors
    ///
    /// - `VoucherTypeNotFound` if the type does not belong to the company
    /// - `VoucherTypeInactive` if the type is switched off
    pub async fn issue_number_in<C: ConnectionTrait>(
        conn: &C,
        company_id: i64,
        voucher_type_id: i64,
    ) -> Result<IssuedNumber, LedgerError> {
        let voucher_type = voucher_types::Entity::find_by_id(voucher_type_id)
            .filter(voucher_types::Column::CompanyId.eq(company_id))
            .lock_exclusive()
            .one(conn)
            .await
            .map_err(ledger_db_err)?
            .ok_or_else(|| LedgerError::VoucherTypeNotFound(voucher_type_id.to_string()))?;

        if !voucher_type.is_active {
            return Err(LedgerError::VoucherTypeInactive(voucher_type.code));
        }

        let number = voucher_type.next_number;
        let voucher_no = format_voucher_no(&voucher_type.prefix, number);

        let mut active: voucher_types::ActiveModel = voucher_type.into();
        active.next_number = Set(number + 1);
        active.updated_at = Set(Utc::now().into());
        active.update(conn).await.map_err(ledger_db_err)?;

        Ok(IssuedNumber {
            voucher_type_id,
            number,
            voucher_no,
        })
    }
}
