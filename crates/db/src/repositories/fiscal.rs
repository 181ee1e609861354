//! Fiscal year resolution for posting dates.
//!
//! Resolution order: the company's open year, then a closed year containing
//! the date (re-opened), then a freshly synthesised twelve-month year.

use chrono::{NaiveDate, Utc};
use ledgerflow_core::fiscal::{
    FiscalError, FiscalWindow, MAX_CODE_ATTEMPTS, clamp_start_month, suffixed_code,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionSession, TransactionTrait,
};
use tracing::{debug, info};

use super::{fiscal_db_err, is_unique_violation};
use crate::entities::{companies, fiscal_years};

/// Fiscal year repository.
#[derive(Debug, Clone)]
pub struct FiscalRepository {
    db: DatabaseConnection,
    default_start_month: u32,
}

impl FiscalRepository {
    /// Creates a new fiscal repository.
    ///
    /// `default_start_month` applies to companies without a row in `companies`.
    #[must_use]
    pub const fn new(db: DatabaseConnection, default_start_month: u32) -> Self {
        Self {
            db,
            default_start_month,
        }
    }

    /// Resolves the fiscal year to post into on `date`, in its own transaction.
    pub async fn resolve(
        &self,
        company_id: i64,
        date: NaiveDate,
    ) -> Result<fiscal_years::Model, FiscalError> {
        let txn = self.db.begin().await.map_err(fiscal_db_err)?;
        let year = Self::resolve_in(&txn, company_id, date, self.default_start_month).await?;
        txn.commit().await.map_err(fiscal_db_err)?;
        Ok(year)
    }

    /// Gets a fiscal year by id, scoped to the company.
    pub async fn find_by_id(
        &self,
        company_id: i64,
        fiscal_year_id: i64,
    ) -> Result<fiscal_years::Model, FiscalError> {
        fiscal_years::Entity::find_by_id(fiscal_year_id)
            .filter(fiscal_years::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await
            .map_err(fiscal_db_err)?
            .ok_or(FiscalError::YearNotFound(fiscal_year_id))
    }

    /// Resolves a fiscal year on the given connection or transaction.
    ///
    /// Year synthesis runs in a savepoint so a lost insert race only rolls
    /// back the attempt, never the caller's transaction.
    ///
    /// # Errors
    ///
    /// - `Unresolvable` if no twelve-month window can be built for `date`
    /// - `CodeExhausted` if every suffixed code is already taken
    /// - `Database` on query failure
    pub async fn resolve_in<C>(
        conn: &C,
        company_id: i64,
        date: NaiveDate,
        default_start_month: u32,
    ) -> Result<fiscal_years::Model, FiscalError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        if let Some(open) = Self::find_open_in(conn, company_id).await? {
            return Ok(open);
        }

        if let Some(year) = Self::find_containing_in(conn, company_id, date).await? {
            return Self::reopen_in(conn, year).await;
        }

        let start_month = Self::start_month_in(conn, company_id, default_start_month).await?;
        let window = FiscalWindow::containing(date, start_month).ok_or_else(|| {
            FiscalError::Unresolvable(format!("no fiscal window contains {date}"))
        })?;

        Self::synthesise_in(conn, company_id, date, window).await
    }

    /// The company's open year; the latest start wins when several are open.
    async fn find_open_in<C: ConnectionTrait>(
        conn: &C,
        company_id: i64,
    ) -> Result<Option<fiscal_years::Model>, FiscalError> {
        fiscal_years::Entity::find()
            .filter(fiscal_years::Column::CompanyId.eq(company_id))
            .filter(fiscal_years::Column::IsOpen.eq(true))
            .order_by_desc(fiscal_years::Column::StartDate)
            .order_by_desc(fiscal_years::Column::Id)
            .one(conn)
            .await
            .map_err(fiscal_db_err)
    }

    async fn find_containing_in<C: ConnectionTrait>(
        conn: &C,
        company_id: i64,
        date: NaiveDate,
    ) -> Result<Option<fiscal_years::Model>, FiscalError> {
        fiscal_years::Entity::find()
            .filter(fiscal_years::Column::CompanyId.eq(company_id))
            .filter(fiscal_years::Column::StartDate.lte(date))
            .filter(fiscal_years::Column::EndDate.gte(date))
            .order_by_asc(fiscal_years::Column::StartDate)
            .order_by_asc(fiscal_years::Column::Id)
            .one(conn)
            .await
            .map_err(fiscal_db_err)
    }

    async fn reopen_in<C: ConnectionTrait>(
        conn: &C,
        year: fiscal_years::Model,
    ) -> Result<fiscal_years::Model, FiscalError> {
        if year.is_open {
            return Ok(year);
        }

        let id = year.id;
        let code = year.code.clone();
        let mut active: fiscal_years::ActiveModel = year.into();
        active.is_open = Set(true);
        active.updated_at = Set(Utc::now().into());
        let reopened = active.update(conn).await.map_err(fiscal_db_err)?;

        info!(fiscal_year_id = id, code = %code, "Re-opened fiscal year");
        Ok(reopened)
    }

    async fn start_month_in<C: ConnectionTrait>(
        conn: &C,
        company_id: i64,
        default_start_month: u32,
    ) -> Result<u32, FiscalError> {
        let company = companies::Entity::find_by_id(company_id)
            .one(conn)
            .await
            .map_err(fiscal_db_err)?;

        Ok(company.map_or_else(
            || default_start_month.clamp(1, 12),
            |c| clamp_start_month(c.fiscal_year_start_month),
        ))
    }

    async fn synthesise_in<C>(
        conn: &C,
        company_id: i64,
        date: NaiveDate,
        window: FiscalWindow,
    ) -> Result<fiscal_years::Model, FiscalError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let base = window.code();

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = suffixed_code(&base, attempt);
            let savepoint = conn.begin().await.map_err(fiscal_db_err)?;
            let now = Utc::now().into();

            let inserted = fiscal_years::ActiveModel {
                company_id: Set(company_id),
                code: Set(code.clone()),
                start_date: Set(window.start_date),
                end_date: Set(window.end_date),
                is_open: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&savepoint)
            .await;

            match inserted {
                Ok(year) => {
                    savepoint.commit().await.map_err(fiscal_db_err)?;
                    info!(
                        company_id,
                        fiscal_year_id = year.id,
                        code = %year.code,
                        start_date = %year.start_date,
                        end_date = %year.end_date,
                        "Created fiscal year"
                    );
                    return Ok(year);
                }
                Err(e) if is_unique_violation(&e) => {
                    savepoint.rollback().await.map_err(fiscal_db_err)?;
                    // Another writer may have created the same year.
                    if let Some(year) = Self::find_containing_in(conn, company_id, date).await? {
                        return Ok(year);
                    }
                    debug!(company_id, code = %code, attempt, "Fiscal year code taken");
                }
                Err(e) => return Err(fiscal_db_err(e)),
            }
        }

        Err(FiscalError::CodeExhausted {
            base,
            attempts: MAX_CODE_ATTEMPTS,
        })
    }
}
