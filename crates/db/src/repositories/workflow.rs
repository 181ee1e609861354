//! Approval router: submit a document into a workflow or straight through.
//!
//! A submission either opens a pending approval (instance + task + log in
//! one transaction), auto-approves (optionally posting a voucher in the same
//! transaction), or is marked submitted with nothing else written.

use chrono::{NaiveDate, Utc};
use ledgerflow_core::ledger::{LedgerService, VoucherLeg};
use ledgerflow_core::workflow::{
    ApprovalState, DefaultBehavior, DocumentStatus, LogAction, RoutingDecision, WorkflowError,
    WorkflowRule, WorkflowSelector, first_step_approver, resolve_assignee,
};
use ledgerflow_shared::config::PostingConfig;
use ledgerflow_shared::email::{ApprovalRequest, EmailService};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{info, warn};

use super::document::DocumentStatusWriter;
use super::ledger::{LedgerPoster, PostVoucherInput, PostedVoucher};
use super::notification::{NewNotification, NotificationRepository};
use super::workflow_db_err;
use crate::entities::{
    document_workflow_instances, users, workflow_definitions, workflow_logs,
    workflow_step_approvers, workflow_steps, workflow_tasks,
};

/// First step of every new instance.
const FIRST_STEP: i32 = 1;

/// Voucher to post when a document auto-approves.
#[derive(Debug, Clone)]
pub struct VoucherDraft {
    /// Optional branch.
    pub branch_id: Option<i64>,
    /// Voucher type; the Journal Voucher type when absent.
    pub voucher_type_id: Option<i64>,
    /// Fiscal year; resolved from `posting_date` when absent.
    pub fiscal_year_id: Option<i64>,
    /// Voucher date.
    pub posting_date: NaiveDate,
    /// Header narration.
    pub narration: String,
    /// Ordered legs.
    pub legs: Vec<VoucherLeg>,
}

/// Input for submitting a document.
#[derive(Debug, Clone)]
pub struct SubmitDocumentInput {
    /// Company scope.
    pub company_id: i64,
    /// Source document id.
    pub document_id: i64,
    /// Document type tag (e.g. `MATERIAL_REQUISITION`).
    pub document_type: Option<String>,
    /// Canonical module route.
    pub document_route: Option<String>,
    /// Document amount used for range matching.
    pub amount: Option<Decimal>,
    /// Submitting user.
    pub submitted_by: i64,
    /// Requested first approver; honoured only if allow-listed.
    pub target_user_id: Option<i64>,
    /// Voucher to post on auto-approval.
    pub voucher: Option<VoucherDraft>,
}

impl SubmitDocumentInput {
    fn document_type(&self) -> Option<&str> {
        self.document_type.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn document_route(&self) -> Option<&str> {
        self.document_route.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Tag stored on instances and tasks: the type, else the route.
    fn document_key(&self) -> Result<String, WorkflowError> {
        self.document_type()
            .or_else(|| self.document_route())
            .map(ToString::to_string)
            .ok_or(WorkflowError::MissingDocumentKey)
    }
}

/// Result of a submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// New status of the source document.
    pub status: DocumentStatus,
    /// Workflow instance, when one was opened.
    pub instance_id: Option<i64>,
    /// First assignee, when an instance was opened.
    pub assigned_to: Option<i64>,
    /// Voucher posted on auto-approval.
    pub voucher: Option<PostedVoucher>,
}

/// Routes submitted documents through approval workflows.
#[derive(Debug, Clone)]
pub struct ApprovalRouter {
    db: DatabaseConnection,
    posting: PostingConfig,
    email: EmailService,
}

impl ApprovalRouter {
    /// Creates a new approval router.
    #[must_use]
    pub const fn new(db: DatabaseConnection, posting: PostingConfig, email: EmailService) -> Self {
        Self { db, posting, email }
    }

    /// Submits a document.
    ///
    /// Route-matched definitions are tried before type-matched ones. When
    /// nothing active matches, the lowest-id type-matched definition's
    /// `default_behavior` decides between auto-approval and plain submission.
    ///
    /// # Errors
    ///
    /// - `MissingDocumentKey` if neither type nor route is given
    /// - Configuration errors for a workflow without a usable first step
    /// - Posting errors when auto-approval posts a voucher
    /// - `DocumentNotFound` if the status write-back matches no row
    pub async fn submit(
        &self,
        input: SubmitDocumentInput,
        writer: &dyn DocumentStatusWriter,
    ) -> Result<SubmitOutcome, WorkflowError> {
        input.document_key()?;

        let route_rules = match input.document_route() {
            Some(route) => {
                self.load_rules(
                    input.company_id,
                    workflow_definitions::Column::DocumentRoute.eq(route),
                )
                .await?
            }
            None => Vec::new(),
        };
        let type_rules = match input.document_type() {
            Some(document_type) => {
                self.load_rules(
                    input.company_id,
                    workflow_definitions::Column::DocumentType.eq(document_type),
                )
                .await?
            }
            None => Vec::new(),
        };

        match WorkflowSelector::decide(&route_rules, &type_rules, input.amount) {
            RoutingDecision::Route { workflow_id } => self.route(&input, workflow_id, writer).await,
            RoutingDecision::AutoApprove => self.auto_approve(input, writer).await,
            RoutingDecision::Submit => self.mark_submitted(&input, writer).await,
        }
    }

    /// Opens an approval instance on a specific workflow.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowNotFound` if the workflow does not belong to the company.
    pub async fn start_workflow(
        &self,
        input: SubmitDocumentInput,
        workflow_id: i64,
        writer: &dyn DocumentStatusWriter,
    ) -> Result<SubmitOutcome, WorkflowError> {
        input.document_key()?;

        workflow_definitions::Entity::find_by_id(workflow_id)
            .filter(workflow_definitions::Column::CompanyId.eq(input.company_id))
            .one(&self.db)
            .await
            .map_err(workflow_db_err)?
            .ok_or(WorkflowError::WorkflowNotFound(workflow_id))?;

        self.route(&input, workflow_id, writer).await
    }

    async fn load_rules(
        &self,
        company_id: i64,
        key: sea_orm::sea_query::SimpleExpr,
    ) -> Result<Vec<WorkflowRule>, WorkflowError> {
        let definitions = workflow_definitions::Entity::find()
            .filter(workflow_definitions::Column::CompanyId.eq(company_id))
            .filter(key)
            .order_by_asc(workflow_definitions::Column::Id)
            .all(&self.db)
            .await
            .map_err(workflow_db_err)?;

        Ok(definitions.iter().map(to_rule).collect())
    }

    async fn route(
        &self,
        input: &SubmitDocumentInput,
        workflow_id: i64,
        writer: &dyn DocumentStatusWriter,
    ) -> Result<SubmitOutcome, WorkflowError> {
        let document_key = input.document_key()?;

        // Step and approver reads share the transaction that opens the instance.
        let txn = self.db.begin().await.map_err(workflow_db_err)?;

        let first_step = workflow_steps::Entity::find()
            .filter(workflow_steps::Column::WorkflowId.eq(workflow_id))
            .filter(workflow_steps::Column::StepOrder.eq(FIRST_STEP))
            .one(&txn)
            .await
            .map_err(workflow_db_err)?;
        let default_approver =
            first_step_approver(workflow_id, first_step.map(|s| s.approver_user_id))?;

        let allow_list: Vec<i64> = workflow_step_approvers::Entity::find()
            .filter(workflow_step_approvers::Column::WorkflowId.eq(workflow_id))
            .filter(workflow_step_approvers::Column::StepOrder.eq(FIRST_STEP))
            .order_by_asc(workflow_step_approvers::Column::Id)
            .all(&txn)
            .await
            .map_err(workflow_db_err)?
            .into_iter()
            .map(|a| a.user_id)
            .collect();
        let assignee = resolve_assignee(input.target_user_id, &allow_list, default_approver);

        let instance_id =
            Self::open_instance(&txn, input, workflow_id, &document_key, assignee).await?;
        writer
            .set_status(&txn, input.company_id, input.document_id, DocumentStatus::PendingApproval)
            .await?;
        NotificationRepository::notify_in(
            &txn,
            NewNotification {
                company_id: input.company_id,
                user_id: assignee,
                title: "Approval required".to_string(),
                message: format!("{document_key} #{} is waiting for your approval", input.document_id),
                link: Some(format!("/approvals/{instance_id}")),
            },
        )
        .await;
        txn.commit().await.map_err(workflow_db_err)?;

        info!(
            company_id = input.company_id,
            document_id = input.document_id,
            document_type = %document_key,
            workflow_id,
            instance_id,
            assigned_to = assignee,
            "Document routed for approval"
        );

        self.send_approval_email(&document_key, input.document_id, instance_id, assignee)
            .await;

        Ok(SubmitOutcome {
            status: DocumentStatus::PendingApproval,
            instance_id: Some(instance_id),
            assigned_to: Some(assignee),
            voucher: None,
        })
    }

    async fn open_instance(
        txn: &DatabaseTransaction,
        input: &SubmitDocumentInput,
        workflow_id: i64,
        document_key: &str,
        assignee: i64,
    ) -> Result<i64, WorkflowError> {
        let now = Utc::now().into();

        let instance = document_workflow_instances::ActiveModel {
            company_id: Set(input.company_id),
            workflow_id: Set(workflow_id),
            document_type: Set(document_key.to_string()),
            document_id: Set(input.document_id),
            current_step_order: Set(FIRST_STEP),
            amount: Set(input.amount),
            status: Set(ApprovalState::Pending.as_str().to_string()),
            assigned_to_user_id: Set(assignee),
            submitted_by: Set(input.submitted_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(workflow_db_err)?;

        workflow_tasks::ActiveModel {
            instance_id: Set(instance.id),
            company_id: Set(input.company_id),
            document_type: Set(document_key.to_string()),
            document_id: Set(input.document_id),
            step_order: Set(FIRST_STEP),
            assigned_to_user_id: Set(assignee),
            action: Set(ApprovalState::Pending.as_str().to_string()),
            acted_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(workflow_db_err)?;

        workflow_logs::ActiveModel {
            instance_id: Set(instance.id),
            step_order: Set(FIRST_STEP),
            action: Set(LogAction::Submit.as_str().to_string()),
            actor_user_id: Set(input.submitted_by),
            comment: Set(String::new()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(workflow_db_err)?;

        Ok(instance.id)
    }

    async fn auto_approve(
        &self,
        input: SubmitDocumentInput,
        writer: &dyn DocumentStatusWriter,
    ) -> Result<SubmitOutcome, WorkflowError> {
        let Some(draft) = input.voucher.clone() else {
            let txn = self.db.begin().await.map_err(workflow_db_err)?;
            writer
                .set_status(&txn, input.company_id, input.document_id, DocumentStatus::Approved)
                .await?;
            txn.commit().await.map_err(workflow_db_err)?;

            info!(
                company_id = input.company_id,
                document_id = input.document_id,
                "Document auto-approved"
            );
            return Ok(Self::outcome(RoutingDecision::AutoApprove, None));
        };

        // Reject bad legs before opening the transaction.
        let (legs, totals) = LedgerService::validate_legs(&draft.legs, self.posting.scale())?;

        let txn = self.db.begin().await.map_err(workflow_db_err)?;

        let posting = PostVoucherInput {
            company_id: input.company_id,
            branch_id: draft.branch_id,
            fiscal_year_id: draft.fiscal_year_id,
            voucher_type_id: draft.voucher_type_id,
            posting_date: draft.posting_date,
            narration: draft.narration,
            legs: draft.legs,
            actor_user_id: input.submitted_by,
            source_document_type: input.document_key().ok(),
            source_document_id: Some(input.document_id),
        };
        let posted = LedgerPoster::post_validated_in(
            &txn,
            &posting,
            legs,
            totals,
            self.posting.default_fiscal_year_start_month,
        )
        .await?;

        writer
            .set_status(&txn, input.company_id, input.document_id, DocumentStatus::Posted)
            .await?;
        txn.commit().await.map_err(workflow_db_err)?;

        info!(
            company_id = input.company_id,
            document_id = input.document_id,
            voucher_id = posted.voucher.id,
            voucher_no = %posted.voucher.voucher_no,
            "Document auto-approved and posted"
        );
        Ok(Self::outcome(RoutingDecision::AutoApprove, Some(posted)))
    }

    async fn mark_submitted(
        &self,
        input: &SubmitDocumentInput,
        writer: &dyn DocumentStatusWriter,
    ) -> Result<SubmitOutcome, WorkflowError> {
        let txn = self.db.begin().await.map_err(workflow_db_err)?;
        writer
            .set_status(&txn, input.company_id, input.document_id, DocumentStatus::Submitted)
            .await?;
        txn.commit().await.map_err(workflow_db_err)?;

        info!(
            company_id = input.company_id,
            document_id = input.document_id,
            "Document submitted without workflow"
        );
        Ok(Self::outcome(RoutingDecision::Submit, None))
    }

    fn outcome(decision: RoutingDecision, voucher: Option<PostedVoucher>) -> SubmitOutcome {
        SubmitOutcome {
            status: decision.document_status(voucher.is_some()),
            instance_id: None,
            assigned_to: None,
            voucher,
        }
    }

    /// Mails the assignee on a detached task; failures are only logged.
    async fn send_approval_email(
        &self,
        document_key: &str,
        document_id: i64,
        instance_id: i64,
        assignee: i64,
    ) {
        if !self.email.is_enabled() {
            return;
        }

        let user = match users::Entity::find_by_id(assignee).one(&self.db).await {
            Ok(Some(user)) if user.is_active => user,
            Ok(_) => {
                warn!(user_id = assignee, "Assignee has no active account, email skipped");
                return;
            }
            Err(e) => {
                warn!(error = %e, user_id = assignee, "Assignee lookup failed, email skipped");
                return;
            }
        };

        let email = self.email.clone();
        let document_key = document_key.to_string();
        tokio::spawn(async move {
            let request = ApprovalRequest {
                assignee_name: &user.full_name,
                document_type: &document_key,
                document_id,
                instance_id,
            };
            if let Err(e) = email.send_approval_request(&user.email, &request).await {
                warn!(error = %e, instance_id, "Approval email not delivered");
            }
        });
    }
}

/// Maps a stored definition onto the selector's rule.
fn to_rule(definition: &workflow_definitions::Model) -> WorkflowRule {
    WorkflowRule {
        id: definition.id,
        is_active: definition.is_active,
        min_amount: definition.min_amount,
        max_amount: definition.max_amount,
        default_behavior: DefaultBehavior::from_column(definition.default_behavior.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::UntrackedDocument;
    use ledgerflow_core::ledger::{AccountRef, LedgerError};
    use ledgerflow_shared::config::EmailConfig;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn definition(id: i64, active: bool, behavior: Option<&str>) -> workflow_definitions::Model {
        let now = Utc::now().into();
        workflow_definitions::Model {
            id,
            company_id: 1,
            name: format!("wf-{id}"),
            document_type: Some("MATERIAL_REQUISITION".to_string()),
            document_route: None,
            min_amount: None,
            max_amount: None,
            is_active: active,
            default_behavior: behavior.map(ToString::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    fn input() -> SubmitDocumentInput {
        SubmitDocumentInput {
            company_id: 1,
            document_id: 55,
            document_type: Some("MATERIAL_REQUISITION".to_string()),
            document_route: None,
            amount: Some(dec!(1000)),
            submitted_by: 7,
            target_user_id: None,
            voucher: None,
        }
    }

    fn router(db: DatabaseConnection) -> ApprovalRouter {
        ApprovalRouter::new(db, PostingConfig::default(), EmailService::new(EmailConfig::default()))
    }

    #[test]
    fn test_to_rule_reads_default_behavior() {
        let rule = to_rule(&definition(4, false, Some("auto_approve")));
        assert_eq!(rule.id, 4);
        assert!(!rule.is_active);
        assert_eq!(rule.default_behavior, DefaultBehavior::AutoApprove);

        let rule = to_rule(&definition(5, true, None));
        assert_eq!(rule.default_behavior, DefaultBehavior::Submit);
    }

    #[test]
    fn test_document_key_prefers_type() {
        let mut submit = input();
        submit.document_route = Some("inventory/requisitions".to_string());
        assert_eq!(submit.document_key().unwrap(), "MATERIAL_REQUISITION");

        submit.document_type = Some("  ".to_string());
        assert_eq!(submit.document_key().unwrap(), "inventory/requisitions");

        submit.document_route = None;
        assert!(matches!(
            submit.document_key(),
            Err(WorkflowError::MissingDocumentKey)
        ));
    }

    #[tokio::test]
    async fn test_missing_key_is_rejected_before_any_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let mut submit = input();
        submit.document_type = None;

        let err = router(db.clone())
            .submit(submit, &UntrackedDocument)
            .await
            .unwrap_err();

        assert_eq!(err.http_status_code(), 400);
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_workflow_without_steps_is_a_configuration_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![definition(3, true, None)]])
            .append_query_results([Vec::<workflow_steps::Model>::new()])
            .into_connection();

        let err = router(db).submit(input(), &UntrackedDocument).await.unwrap_err();

        assert!(matches!(err, WorkflowError::NoWorkflowSteps(3)));
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_first_step_is_read_inside_the_routing_transaction() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![definition(3, true, None)]])
            .append_query_results([Vec::<workflow_steps::Model>::new()])
            .into_connection();

        router(db.clone())
            .submit(input(), &UntrackedDocument)
            .await
            .unwrap_err();

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        let routing = format!("{:?}", log[1]);
        assert!(routing.contains("BEGIN"), "{routing}");
        assert!(routing.contains("workflow_steps"), "{routing}");
    }

    #[tokio::test]
    async fn test_auto_approve_rejects_unbalanced_draft_before_writing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![definition(3, false, Some("AUTO_APPROVE"))]])
            .into_connection();

        let mut submit = input();
        submit.voucher = Some(VoucherDraft {
            branch_id: None,
            voucher_type_id: None,
            fiscal_year_id: None,
            posting_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            narration: "Requisition 55".to_string(),
            legs: vec![
                VoucherLeg::debit(AccountRef::Id(1), dec!(100.00)),
                VoucherLeg::credit(AccountRef::Id(2), dec!(60.00)),
            ],
        });

        let err = router(db.clone())
            .submit(submit, &UntrackedDocument)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Posting(LedgerError::UnbalancedVoucher { .. })
        ));
        // Only the definition lookup ran.
        assert_eq!(db.into_transaction_log().len(), 1);
    }
}
