//! Account resolution for voucher legs.
//!
//! Explicit references (id or code) are looked up directly. Purpose
//! references go through the company's `posting_account_mappings` first and
//! fall back to the name/nature heuristic in `ledgerflow_core::account`.

use std::collections::HashMap;

use ledgerflow_core::account::{AccountCandidate, AccountHint, PostingPurpose, pick_best_account};
use ledgerflow_core::ledger::{AccountRef, LedgerError};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::{debug, warn};

use super::ledger_db_err;
use crate::entities::{account_groups, accounts, posting_account_mappings};

/// Builds a heuristic candidate from an account and its group.
///
/// Accounts without a group have no nature and cannot be ranked.
pub fn to_candidate(
    account: &accounts::Model,
    group: Option<&account_groups::Model>,
) -> Option<AccountCandidate> {
    let group = group?;
    Some(AccountCandidate {
        id: account.id,
        code: account.code.clone(),
        name: account.name.clone(),
        nature: group.nature.into(),
        is_active: account.is_active,
        is_postable: account.is_postable,
    })
}

const fn is_postable(account: &accounts::Model) -> bool {
    account.is_active && account.is_postable
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolves one account reference to a postable account id.
    pub async fn resolve(&self, company_id: i64, account: &AccountRef) -> Result<i64, LedgerError> {
        Self::resolve_in(&self.db, company_id, account).await
    }

    /// Resolves an account reference on the given connection.
    ///
    /// Only active, postable accounts are ever returned.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` for an id or code that does not name a postable
    ///   account of this company
    /// - `AccountNotConfigured` for a purpose with no mapping and no
    ///   heuristic match
    pub async fn resolve_in<C: ConnectionTrait>(
        conn: &C,
        company_id: i64,
        account: &AccountRef,
    ) -> Result<i64, LedgerError> {
        match account {
            AccountRef::Id(id) => {
                let found = accounts::Entity::find_by_id(*id)
                    .filter(accounts::Column::CompanyId.eq(company_id))
                    .one(conn)
                    .await
                    .map_err(ledger_db_err)?;
                Self::require_postable(found, account)
            }
            AccountRef::Code(code) => {
                let found = accounts::Entity::find()
                    .filter(accounts::Column::CompanyId.eq(company_id))
                    .filter(accounts::Column::Code.eq(code.as_str()))
                    .one(conn)
                    .await
                    .map_err(ledger_db_err)?;
                Self::require_postable(found, account)
            }
            AccountRef::Purpose(purpose) => Self::resolve_purpose_in(conn, company_id, *purpose).await,
        }
    }

    /// Resolves every distinct reference in `refs`, failing on the first miss.
    pub async fn resolve_all_in<'a, C, I>(
        conn: &C,
        company_id: i64,
        refs: I,
    ) -> Result<HashMap<AccountRef, i64>, LedgerError>
    where
        C: ConnectionTrait,
        I: IntoIterator<Item = &'a AccountRef>,
    {
        let mut resolved = HashMap::new();
        for account in refs {
            if resolved.contains_key(account) {
                continue;
            }
            let id = Self::resolve_in(conn, company_id, account).await?;
            resolved.insert(account.clone(), id);
        }
        Ok(resolved)
    }

    /// Resolves a posting purpose: explicit mapping first, heuristic second.
    pub async fn resolve_purpose_in<C: ConnectionTrait>(
        conn: &C,
        company_id: i64,
        purpose: PostingPurpose,
    ) -> Result<i64, LedgerError> {
        let mapping = posting_account_mappings::Entity::find()
            .filter(posting_account_mappings::Column::CompanyId.eq(company_id))
            .filter(posting_account_mappings::Column::Purpose.eq(purpose.as_str()))
            .find_also_related(accounts::Entity)
            .one(conn)
            .await
            .map_err(ledger_db_err)?;

        if let Some((mapping, account)) = mapping {
            match account {
                Some(account) if account.company_id == company_id && is_postable(&account) => {
                    return Ok(account.id);
                }
                _ => warn!(
                    company_id,
                    purpose = %purpose,
                    account_id = mapping.account_id,
                    "Mapped account is not postable, falling back to heuristic"
                ),
            }
        }

        let candidates = Self::candidates_in(conn, company_id).await?;
        let hint = AccountHint::for_purpose(purpose);
        let best = pick_best_account(&candidates, &hint)
            .ok_or_else(|| LedgerError::AccountNotConfigured(format!("purpose {purpose}")))?;

        debug!(
            company_id,
            purpose = %purpose,
            account_id = best.id,
            account_code = %best.code,
            "Resolved account by heuristic"
        );
        Ok(best.id)
    }

    /// Loads the company's postable accounts with their group nature.
    pub async fn candidates_in<C: ConnectionTrait>(
        conn: &C,
        company_id: i64,
    ) -> Result<Vec<AccountCandidate>, LedgerError> {
        let rows = accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(company_id))
            .filter(accounts::Column::IsActive.eq(true))
            .filter(accounts::Column::IsPostable.eq(true))
            .find_also_related(account_groups::Entity)
            .order_by_asc(accounts::Column::Code)
            .all(conn)
            .await
            .map_err(ledger_db_err)?;

        Ok(rows
            .iter()
            .filter_map(|(account, group)| to_candidate(account, group.as_ref()))
            .collect())
    }

    fn require_postable(
        found: Option<accounts::Model>,
        account: &AccountRef,
    ) -> Result<i64, LedgerError> {
        match found {
            Some(model) if is_postable(&model) => Ok(model.id),
            Some(_) => Err(LedgerError::AccountNotFound(format!(
                "{account} is inactive or not postable"
            ))),
            None => Err(LedgerError::AccountNotFound(account.to_string())),
        }
    }
}
