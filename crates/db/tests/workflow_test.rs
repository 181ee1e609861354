//! Integration tests for the approval router.

mod common;

use ledgerflow_core::ledger::{AccountRef, LedgerError, VoucherLeg};
use ledgerflow_core::workflow::{DocumentStatus, WorkflowError};
use ledgerflow_db::entities::{
    document_workflow_instances, notifications, vouchers, workflow_logs, workflow_tasks,
};
use ledgerflow_db::repositories::{
    ApprovalRouter, DocumentTable, SubmitDocumentInput, UntrackedDocument, VoucherDraft,
};
use ledgerflow_shared::config::{EmailConfig, PostingConfig};
use ledgerflow_shared::email::EmailService;
use rust_decimal_macros::dec;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Statement,
};

use common::{
    WorkflowSpec, add_step, allow_approver, connect, create_company, create_user, create_workflow,
    date, ledger_fixture,
};

const MATERIAL_REQUISITION: &str = "MATERIAL_REQUISITION";

fn router(db: &DatabaseConnection) -> ApprovalRouter {
    ApprovalRouter::new(
        db.clone(),
        PostingConfig::default(),
        EmailService::new(EmailConfig::default()),
    )
}

fn submission(company_id: i64, submitted_by: i64) -> SubmitDocumentInput {
    SubmitDocumentInput {
        company_id,
        document_id: 9001,
        document_type: Some(MATERIAL_REQUISITION.to_string()),
        document_route: None,
        amount: Some(dec!(1000)),
        submitted_by,
        target_user_id: None,
        voucher: None,
    }
}

async fn instance_count(db: &DatabaseConnection, company_id: i64) -> u64 {
    document_workflow_instances::Entity::find()
        .filter(document_workflow_instances::Column::CompanyId.eq(company_id))
        .count(db)
        .await
        .unwrap()
}

// ============================================================================
// Routing into a workflow
// ============================================================================

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL at DATABASE_URL"]
async fn test_active_workflow_opens_instance_task_and_log() {
    let db = connect().await;
    let company_id = create_company(&db, 1).await.unwrap();
    let submitter = create_user(&db, "Storekeeper").await.unwrap();
    let approver = create_user(&db, "Manager").await.unwrap();
    let workflow_id = create_workflow(&db, company_id, WorkflowSpec::for_type(MATERIAL_REQUISITION))
        .await
        .unwrap();
    add_step(&db, workflow_id, 1, Some(approver)).await.unwrap();

    let outcome = router(&db)
        .submit(submission(company_id, submitter), &UntrackedDocument)
        .await
        .unwrap();

    assert_eq!(outcome.status, DocumentStatus::PendingApproval);
    assert_eq!(outcome.assigned_to, Some(approver));
    let instance_id = outcome.instance_id.expect("instance");

    let instance = document_workflow_instances::Entity::find_by_id(instance_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(instance.status, "PENDING");
    assert_eq!(instance.current_step_order, 1);
    assert_eq!(instance.assigned_to_user_id, approver);
    assert_eq!(instance.amount, Some(dec!(1000)));

    let tasks = workflow_tasks::Entity::find()
        .filter(workflow_tasks::Column::InstanceId.eq(instance_id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].assigned_to_user_id, approver);
    assert_eq!(tasks[0].action, "PENDING");

    let logs = workflow_logs::Entity::find()
        .filter(workflow_logs::Column::InstanceId.eq(instance_id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, "SUBMIT");
    assert_eq!(logs[0].actor_user_id, submitter);
    assert_eq!(logs[0].comment, "");

    let notified = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(approver))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(notified, 1);
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL at DATABASE_URL"]
async fn test_allow_listed_target_becomes_assignee() {
    let db = connect().await;
    let company_id = create_company(&db, 1).await.unwrap();
    let submitter = create_user(&db, "Clerk").await.unwrap();
    let default_approver = create_user(&db, "Lead").await.unwrap();
    let first_listed = create_user(&db, "Deputy").await.unwrap();
    let target = create_user(&db, "Controller").await.unwrap();
    let outsider = create_user(&db, "Outsider").await.unwrap();
    let workflow_id = create_workflow(&db, company_id, WorkflowSpec::for_type(MATERIAL_REQUISITION))
        .await
        .unwrap();
    add_step(&db, workflow_id, 1, Some(default_approver)).await.unwrap();
    allow_approver(&db, workflow_id, 1, first_listed).await.unwrap();
    allow_approver(&db, workflow_id, 1, target).await.unwrap();

    let mut input = submission(company_id, submitter);
    input.target_user_id = Some(target);
    let outcome = router(&db).submit(input, &UntrackedDocument).await.unwrap();
    assert_eq!(outcome.assigned_to, Some(target));

    let mut input = submission(company_id, submitter);
    input.target_user_id = Some(outsider);
    let outcome = router(&db).submit(input, &UntrackedDocument).await.unwrap();
    assert_eq!(outcome.assigned_to, Some(first_listed));
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL at DATABASE_URL"]
async fn test_resubmission_opens_a_second_instance() {
    let db = connect().await;
    let company_id = create_company(&db, 1).await.unwrap();
    let submitter = create_user(&db, "Clerk").await.unwrap();
    let approver = create_user(&db, "Lead").await.unwrap();
    let workflow_id = create_workflow(&db, company_id, WorkflowSpec::for_type(MATERIAL_REQUISITION))
        .await
        .unwrap();
    add_step(&db, workflow_id, 1, Some(approver)).await.unwrap();

    let router = router(&db);
    router
        .submit(submission(company_id, submitter), &UntrackedDocument)
        .await
        .unwrap();
    router
        .submit(submission(company_id, submitter), &UntrackedDocument)
        .await
        .unwrap();

    assert_eq!(instance_count(&db, company_id).await, 2);
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL at DATABASE_URL"]
async fn test_out_of_range_workflow_falls_through_to_next() {
    let db = connect().await;
    let company_id = create_company(&db, 1).await.unwrap();
    let submitter = create_user(&db, "Clerk").await.unwrap();
    let small_approver = create_user(&db, "Supervisor").await.unwrap();
    let large_approver = create_user(&db, "Director").await.unwrap();

    let mut small = WorkflowSpec::for_type(MATERIAL_REQUISITION);
    small.min_amount = Some(dec!(100));
    small.max_amount = Some(dec!(500));
    let small_id = create_workflow(&db, company_id, small).await.unwrap();
    add_step(&db, small_id, 1, Some(small_approver)).await.unwrap();

    let mut large = WorkflowSpec::for_type(MATERIAL_REQUISITION);
    large.min_amount = Some(dec!(500.01));
    let large_id = create_workflow(&db, company_id, large).await.unwrap();
    add_step(&db, large_id, 1, Some(large_approver)).await.unwrap();

    let mut input = submission(company_id, submitter);
    input.amount = Some(dec!(600));
    let outcome = router(&db).submit(input, &UntrackedDocument).await.unwrap();
    assert_eq!(outcome.assigned_to, Some(large_approver));

    let mut input = submission(company_id, submitter);
    input.amount = Some(dec!(50));
    let outcome = router(&db).submit(input, &UntrackedDocument).await.unwrap();
    assert_eq!(outcome.status, DocumentStatus::Submitted);
    assert!(outcome.instance_id.is_none());
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL at DATABASE_URL"]
async fn test_route_match_beats_type_match() {
    let db = connect().await;
    let company_id = create_company(&db, 1).await.unwrap();
    let submitter = create_user(&db, "Clerk").await.unwrap();
    let type_approver = create_user(&db, "TypeApprover").await.unwrap();
    let route_approver = create_user(&db, "RouteApprover").await.unwrap();

    let by_type = create_workflow(&db, company_id, WorkflowSpec::for_type(MATERIAL_REQUISITION))
        .await
        .unwrap();
    add_step(&db, by_type, 1, Some(type_approver)).await.unwrap();

    let mut route = WorkflowSpec::for_type(MATERIAL_REQUISITION);
    route.document_type = None;
    route.document_route = Some("inventory/material-requisitions");
    let by_route = create_workflow(&db, company_id, route).await.unwrap();
    add_step(&db, by_route, 1, Some(route_approver)).await.unwrap();

    let mut input = submission(company_id, submitter);
    input.document_route = Some("inventory/material-requisitions".to_string());
    let outcome = router(&db).submit(input, &UntrackedDocument).await.unwrap();
    assert_eq!(outcome.assigned_to, Some(route_approver));
}

// ============================================================================
// Misconfiguration
// ============================================================================

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL at DATABASE_URL"]
async fn test_first_step_without_approver_is_rejected_without_writes() {
    let db = connect().await;
    let company_id = create_company(&db, 1).await.unwrap();
    let submitter = create_user(&db, "Clerk").await.unwrap();
    let workflow_id = create_workflow(&db, company_id, WorkflowSpec::for_type(MATERIAL_REQUISITION))
        .await
        .unwrap();
    add_step(&db, workflow_id, 1, None).await.unwrap();

    let err = router(&db)
        .submit(submission(company_id, submitter), &UntrackedDocument)
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::FirstStepWithoutApprover(id) if id == workflow_id));
    assert_eq!(instance_count(&db, company_id).await, 0);
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL at DATABASE_URL"]
async fn test_unknown_workflow_is_not_found() {
    let db = connect().await;
    let company_id = create_company(&db, 1).await.unwrap();
    let submitter = create_user(&db, "Clerk").await.unwrap();

    let err = router(&db)
        .start_workflow(submission(company_id, submitter), i64::MAX, &UntrackedDocument)
        .await
        .unwrap_err();
    assert_eq!(err.http_status_code(), 404);
}

// ============================================================================
// Fallback behavior
// ============================================================================

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL at DATABASE_URL"]
async fn test_inactive_auto_approve_workflow_approves_without_instance() {
    let db = connect().await;
    let company_id = create_company(&db, 1).await.unwrap();
    let submitter = create_user(&db, "Clerk").await.unwrap();
    let approver = create_user(&db, "Lead").await.unwrap();
    let mut spec = WorkflowSpec::for_type(MATERIAL_REQUISITION);
    spec.is_active = false;
    spec.default_behavior = Some("AUTO_APPROVE");
    let workflow_id = create_workflow(&db, company_id, spec).await.unwrap();
    add_step(&db, workflow_id, 1, Some(approver)).await.unwrap();

    let outcome = router(&db)
        .submit(submission(company_id, submitter), &UntrackedDocument)
        .await
        .unwrap();

    assert_eq!(outcome.status, DocumentStatus::Approved);
    assert!(outcome.instance_id.is_none());
    assert_eq!(instance_count(&db, company_id).await, 0);

    let tasks = workflow_tasks::Entity::find()
        .filter(workflow_tasks::Column::CompanyId.eq(company_id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(tasks, 0);
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL at DATABASE_URL"]
async fn test_auto_approve_with_draft_posts_voucher() {
    let db = connect().await;
    let fx = ledger_fixture(&db).await.unwrap();
    let mut spec = WorkflowSpec::for_type("POS_SESSION_CLOSE");
    spec.is_active = false;
    spec.default_behavior = Some("AUTO_APPROVE");
    create_workflow(&db, fx.company_id, spec).await.unwrap();

    let input = SubmitDocumentInput {
        company_id: fx.company_id,
        document_id: 31,
        document_type: Some("POS_SESSION_CLOSE".to_string()),
        document_route: None,
        amount: Some(dec!(480.50)),
        submitted_by: fx.user_id,
        target_user_id: None,
        voucher: Some(VoucherDraft {
            branch_id: Some(2),
            voucher_type_id: None,
            fiscal_year_id: None,
            posting_date: date(2026, 5, 2),
            narration: "POS session 31 takings".to_string(),
            legs: vec![
                VoucherLeg::debit(AccountRef::Id(fx.cash_account_id), dec!(480.50)),
                VoucherLeg::credit(AccountRef::Id(fx.revenue_account_id), dec!(480.50)),
            ],
        }),
    };

    let outcome = router(&db).submit(input, &UntrackedDocument).await.unwrap();

    assert_eq!(outcome.status, DocumentStatus::Posted);
    let voucher = outcome.voucher.expect("voucher");
    // The fixture's open year is used and the JV type already exists.
    assert_eq!(voucher.voucher.fiscal_year_id, fx.fiscal_year_id);
    assert_eq!(voucher.voucher.voucher_type_id, fx.voucher_type_id);
    assert_eq!(voucher.voucher.source_document_id, Some(31));
    assert_eq!(voucher.lines.len(), 2);
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL at DATABASE_URL"]
async fn test_auto_approve_with_unresolvable_account_writes_nothing() {
    let db = connect().await;
    let fx = ledger_fixture(&db).await.unwrap();
    let mut spec = WorkflowSpec::for_type("GOODS_RECEIPT");
    spec.is_active = false;
    spec.default_behavior = Some("AUTO_APPROVE");
    create_workflow(&db, fx.company_id, spec).await.unwrap();

    let input = SubmitDocumentInput {
        company_id: fx.company_id,
        document_id: 12,
        document_type: Some("GOODS_RECEIPT".to_string()),
        document_route: None,
        amount: None,
        submitted_by: fx.user_id,
        target_user_id: None,
        voucher: Some(VoucherDraft {
            branch_id: None,
            voucher_type_id: Some(fx.voucher_type_id),
            fiscal_year_id: Some(fx.fiscal_year_id),
            posting_date: date(2026, 5, 2),
            narration: "GRN 12".to_string(),
            legs: vec![
                VoucherLeg::debit(AccountRef::Code("no-such-code".into()), dec!(10)),
                VoucherLeg::credit(AccountRef::Id(fx.cash_account_id), dec!(10)),
            ],
        }),
    };

    let err = router(&db).submit(input, &UntrackedDocument).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Posting(LedgerError::AccountNotFound(_))));

    let count = vouchers::Entity::find()
        .filter(vouchers::Column::CompanyId.eq(fx.company_id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

// ============================================================================
// Status write-back
// ============================================================================

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL at DATABASE_URL"]
async fn test_document_table_receives_status() {
    let db = connect().await;
    let company_id = create_company(&db, 1).await.unwrap();
    let submitter = create_user(&db, "Clerk").await.unwrap();
    let table = format!("test_requisitions_{company_id}");

    db.execute_unprepared(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (id BIGINT PRIMARY KEY, company_id BIGINT NOT NULL, status VARCHAR(30) NOT NULL)"
    ))
    .await
    .unwrap();
    db.execute_unprepared(&format!(
        "INSERT INTO {table} (id, company_id, status) VALUES (9001, {company_id}, 'DRAFT')"
    ))
    .await
    .unwrap();

    let writer = DocumentTable::new(table.clone()).unwrap();
    let outcome = router(&db)
        .submit(submission(company_id, submitter), &writer)
        .await
        .unwrap();
    assert_eq!(outcome.status, DocumentStatus::Submitted);

    let row = db
        .query_one_raw(Statement::from_string(
            db.get_database_backend(),
            format!("SELECT status FROM {table} WHERE id = 9001"),
        ))
        .await
        .unwrap()
        .unwrap();
    let status: String = row.try_get("", "status").unwrap();
    assert_eq!(status, "SUBMITTED");

    // A document of another company is not touched.
    let mut input = submission(company_id + 1_000_000, submitter);
    input.document_id = 9001;
    let err = router(&db).submit(input, &writer).await.unwrap_err();
    assert!(matches!(err, WorkflowError::DocumentNotFound { .. }));

    db.execute_unprepared(&format!("DROP TABLE {table}")).await.unwrap();
}
