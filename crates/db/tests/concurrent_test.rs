//! Concurrent voucher numbering tests.
//!
//! Several posters race for the same voucher type; the row lock must hand
//! out `prefix-1..=prefix-N` exactly once each.

mod common;

use std::sync::Arc;

use futures::future::join_all;
use ledgerflow_core::ledger::{AccountRef, VoucherLeg};
use ledgerflow_db::entities::voucher_types;
use ledgerflow_db::repositories::{LedgerPoster, PostVoucherInput};
use ledgerflow_shared::types::CurrencyScale;
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use tokio::sync::Barrier;

use common::{LedgerFixture, connect, date, ledger_fixture};

fn input(fx: &LedgerFixture, n: usize) -> PostVoucherInput {
    PostVoucherInput {
        company_id: fx.company_id,
        branch_id: None,
        fiscal_year_id: Some(fx.fiscal_year_id),
        voucher_type_id: Some(fx.voucher_type_id),
        posting_date: date(2026, 6, 1),
        narration: format!("Concurrent sale {n}"),
        legs: vec![
            VoucherLeg::debit(AccountRef::Id(fx.cash_account_id), dec!(10.00)),
            VoucherLeg::credit(AccountRef::Id(fx.revenue_account_id), dec!(10.00)),
        ],
        actor_user_id: fx.user_id,
        source_document_type: None,
        source_document_id: None,
    }
}

async fn race(writers: usize) -> (LedgerFixture, Vec<String>) {
    let db = connect().await;
    let fx = ledger_fixture(&db).await.unwrap();
    let poster = LedgerPoster::new(db.clone(), CurrencyScale::CENTS);
    let barrier = Arc::new(Barrier::new(writers));

    let handles = (0..writers).map(|n| {
        let poster = poster.clone();
        let barrier = Arc::clone(&barrier);
        let input = input(&fx, n);
        tokio::spawn(async move {
            barrier.wait().await;
            poster.post(input).await
        })
    });

    let mut numbers: Vec<String> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked").expect("post failed"))
        .map(|posted| posted.voucher.voucher_no)
        .collect();
    numbers.sort_by_key(|no| no.rsplit('-').next().and_then(|n| n.parse::<i64>().ok()));

    let voucher_type = voucher_types::Entity::find_by_id(fx.voucher_type_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(voucher_type.next_number, i64::try_from(writers).unwrap() + 1);

    (fx, numbers)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires a migrated PostgreSQL at DATABASE_URL"]
async fn test_two_concurrent_posters_get_consecutive_numbers() {
    let (fx, numbers) = race(2).await;
    assert_eq!(
        numbers,
        vec![format!("{}-1", fx.prefix), format!("{}-2", fx.prefix)]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore = "requires a migrated PostgreSQL at DATABASE_URL"]
async fn test_many_concurrent_posters_leave_no_gaps() {
    let writers = 20;
    let (fx, numbers) = race(writers).await;
    let expected: Vec<String> = (1..=writers).map(|n| format!("{}-{n}", fx.prefix)).collect();
    assert_eq!(numbers, expected);
}
