//! Posting engine schema.
//!
//! Creates the tenant, chart-of-accounts, fiscal, voucher, and workflow
//! tables together with the balance and immutability triggers.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TENANTS & USERS
        // ============================================================
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNT_GROUPS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(POSTING_ACCOUNT_MAPPINGS_SQL).await?;

        // ============================================================
        // PART 4: FISCAL YEARS & VOUCHER TYPES
        // ============================================================
        db.execute_unprepared(FISCAL_YEARS_SQL).await?;
        db.execute_unprepared(VOUCHER_TYPES_SQL).await?;

        // ============================================================
        // PART 5: VOUCHERS
        // ============================================================
        db.execute_unprepared(VOUCHERS_SQL).await?;
        db.execute_unprepared(VOUCHER_LINES_SQL).await?;

        // ============================================================
        // PART 6: WORKFLOWS
        // ============================================================
        db.execute_unprepared(WORKFLOW_DEFINITIONS_SQL).await?;
        db.execute_unprepared(WORKFLOW_STEPS_SQL).await?;
        db.execute_unprepared(WORKFLOW_RUNTIME_SQL).await?;
        db.execute_unprepared(NOTIFICATIONS_SQL).await?;

        // ============================================================
        // PART 7: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Account group nature
CREATE TYPE account_nature AS ENUM ('ASSET', 'LIABILITY', 'EQUITY', 'INCOME', 'EXPENSE');

-- Voucher header status
CREATE TYPE voucher_status AS ENUM ('DRAFT', 'POSTED');
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(200) NOT NULL,
    fiscal_year_start_month INTEGER NOT NULL DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id BIGSERIAL PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    full_name VARCHAR(200) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ACCOUNT_GROUPS_SQL: &str = r"
CREATE TABLE account_groups (
    id BIGSERIAL PRIMARY KEY,
    company_id BIGINT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    parent_id BIGINT REFERENCES account_groups(id),
    name VARCHAR(200) NOT NULL,
    nature account_nature NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_account_groups_company ON account_groups(company_id, nature);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id BIGSERIAL PRIMARY KEY,
    company_id BIGINT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    group_id BIGINT NOT NULL REFERENCES account_groups(id),
    code VARCHAR(30) NOT NULL,
    name VARCHAR(200) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    is_postable BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (company_id, code)
);

CREATE INDEX idx_accounts_postable ON accounts(company_id, code) WHERE is_active AND is_postable;
";

const POSTING_ACCOUNT_MAPPINGS_SQL: &str = r"
CREATE TABLE posting_account_mappings (
    id BIGSERIAL PRIMARY KEY,
    company_id BIGINT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    purpose VARCHAR(40) NOT NULL,
    account_id BIGINT NOT NULL REFERENCES accounts(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (company_id, purpose)
);
";

const FISCAL_YEARS_SQL: &str = r"
CREATE TABLE fiscal_years (
    id BIGSERIAL PRIMARY KEY,
    company_id BIGINT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    code VARCHAR(30) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    is_open BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_fiscal_year_dates CHECK (end_date > start_date),
    UNIQUE (company_id, code)
);

CREATE INDEX idx_fiscal_years_company ON fiscal_years(company_id, start_date);
CREATE INDEX idx_fiscal_years_open ON fiscal_years(company_id, start_date DESC) WHERE is_open;
";

const VOUCHER_TYPES_SQL: &str = r"
CREATE TABLE voucher_types (
    id BIGSERIAL PRIMARY KEY,
    company_id BIGINT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    code VARCHAR(20) NOT NULL,
    name VARCHAR(100) NOT NULL,
    category VARCHAR(30) NOT NULL,
    prefix VARCHAR(20) NOT NULL,
    next_number BIGINT NOT NULL DEFAULT 1,
    requires_approval BOOLEAN NOT NULL DEFAULT false,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_next_number_positive CHECK (next_number >= 1),
    UNIQUE (company_id, code)
);
";

const VOUCHERS_SQL: &str = r"
CREATE TABLE vouchers (
    id BIGSERIAL PRIMARY KEY,
    company_id BIGINT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    branch_id BIGINT,
    fiscal_year_id BIGINT NOT NULL REFERENCES fiscal_years(id),
    voucher_type_id BIGINT NOT NULL REFERENCES voucher_types(id),
    voucher_no VARCHAR(50) NOT NULL,
    voucher_date DATE NOT NULL,
    narration TEXT NOT NULL DEFAULT '',
    total_debit NUMERIC(19, 4) NOT NULL,
    total_credit NUMERIC(19, 4) NOT NULL,
    status voucher_status NOT NULL DEFAULT 'DRAFT',
    source_document_type VARCHAR(60),
    source_document_id BIGINT,
    created_by BIGINT NOT NULL REFERENCES users(id),
    approved_by BIGINT REFERENCES users(id),
    posted_by BIGINT REFERENCES users(id),
    posted_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_voucher_balanced CHECK (total_debit = total_credit),
    UNIQUE (company_id, voucher_type_id, voucher_no)
);

CREATE INDEX idx_vouchers_company_date ON vouchers(company_id, voucher_date);
CREATE INDEX idx_vouchers_fiscal_year ON vouchers(fiscal_year_id);
CREATE INDEX idx_vouchers_source ON vouchers(company_id, source_document_type, source_document_id);
";

const VOUCHER_LINES_SQL: &str = r"
CREATE TABLE voucher_lines (
    id BIGSERIAL PRIMARY KEY,
    voucher_id BIGINT NOT NULL REFERENCES vouchers(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    account_id BIGINT NOT NULL REFERENCES accounts(id),
    description TEXT,
    debit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    reference_no VARCHAR(100),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_debit_or_credit CHECK (
        (debit > 0 AND credit = 0) OR (debit = 0 AND credit > 0)
    ),
    CONSTRAINT chk_line_no_positive CHECK (line_no >= 1),
    UNIQUE (voucher_id, line_no)
);

CREATE INDEX idx_voucher_lines_account ON voucher_lines(account_id);
";

const WORKFLOW_DEFINITIONS_SQL: &str = r"
CREATE TABLE workflow_definitions (
    id BIGSERIAL PRIMARY KEY,
    company_id BIGINT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(150) NOT NULL,
    document_type VARCHAR(60),
    document_route VARCHAR(200),
    min_amount NUMERIC(19, 4),
    max_amount NUMERIC(19, 4),
    is_active BOOLEAN NOT NULL DEFAULT true,
    default_behavior VARCHAR(30),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_workflow_key CHECK (document_type IS NOT NULL OR document_route IS NOT NULL),
    CONSTRAINT chk_workflow_range CHECK (
        min_amount IS NULL OR max_amount IS NULL OR min_amount <= max_amount
    )
);

CREATE INDEX idx_workflow_definitions_type ON workflow_definitions(company_id, document_type, id);
CREATE INDEX idx_workflow_definitions_route ON workflow_definitions(company_id, document_route, id);
";

const WORKFLOW_STEPS_SQL: &str = r"
CREATE TABLE workflow_steps (
    id BIGSERIAL PRIMARY KEY,
    workflow_id BIGINT NOT NULL REFERENCES workflow_definitions(id) ON DELETE CASCADE,
    step_order INTEGER NOT NULL,
    name VARCHAR(150) NOT NULL DEFAULT '',
    approver_user_id BIGINT REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_step_order_positive CHECK (step_order >= 1),
    UNIQUE (workflow_id, step_order)
);

CREATE TABLE workflow_step_approvers (
    id BIGSERIAL PRIMARY KEY,
    workflow_id BIGINT NOT NULL REFERENCES workflow_definitions(id) ON DELETE CASCADE,
    step_order INTEGER NOT NULL,
    user_id BIGINT NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (workflow_id, step_order, user_id)
);
";

const WORKFLOW_RUNTIME_SQL: &str = r"
CREATE TABLE document_workflow_instances (
    id BIGSERIAL PRIMARY KEY,
    company_id BIGINT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    workflow_id BIGINT NOT NULL REFERENCES workflow_definitions(id),
    document_type VARCHAR(200) NOT NULL,
    document_id BIGINT NOT NULL,
    current_step_order INTEGER NOT NULL DEFAULT 1,
    amount NUMERIC(19, 4),
    status VARCHAR(20) NOT NULL DEFAULT 'PENDING',
    assigned_to_user_id BIGINT NOT NULL REFERENCES users(id),
    submitted_by BIGINT NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_dwi_document ON document_workflow_instances(company_id, document_type, document_id);
CREATE INDEX idx_dwi_assignee ON document_workflow_instances(assigned_to_user_id) WHERE status = 'PENDING';

CREATE TABLE workflow_tasks (
    id BIGSERIAL PRIMARY KEY,
    instance_id BIGINT NOT NULL REFERENCES document_workflow_instances(id) ON DELETE CASCADE,
    company_id BIGINT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    document_type VARCHAR(200) NOT NULL,
    document_id BIGINT NOT NULL,
    step_order INTEGER NOT NULL,
    assigned_to_user_id BIGINT NOT NULL REFERENCES users(id),
    action VARCHAR(20) NOT NULL DEFAULT 'PENDING',
    acted_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_workflow_tasks_inbox ON workflow_tasks(assigned_to_user_id, created_at) WHERE action = 'PENDING';

CREATE TABLE workflow_logs (
    id BIGSERIAL PRIMARY KEY,
    instance_id BIGINT NOT NULL REFERENCES document_workflow_instances(id) ON DELETE CASCADE,
    step_order INTEGER NOT NULL,
    action VARCHAR(20) NOT NULL,
    actor_user_id BIGINT NOT NULL REFERENCES users(id),
    comment TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_workflow_logs_instance ON workflow_logs(instance_id, created_at);
";

const NOTIFICATIONS_SQL: &str = r"
CREATE TABLE notifications (
    id BIGSERIAL PRIMARY KEY,
    company_id BIGINT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    user_id BIGINT NOT NULL REFERENCES users(id),
    title VARCHAR(200) NOT NULL,
    message TEXT NOT NULL,
    link VARCHAR(300),
    is_read BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_notifications_unread ON notifications(user_id, created_at) WHERE NOT is_read;
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: check_voucher_balance
-- Re-checks double-entry balance for posted vouchers at commit
-- ============================================================
CREATE OR REPLACE FUNCTION check_voucher_balance()
RETURNS TRIGGER AS $$
DECLARE
    v_status voucher_status;
    v_total_debit NUMERIC(19, 4);
    line_debit NUMERIC(19, 4);
    line_credit NUMERIC(19, 4);
BEGIN
    SELECT status, total_debit INTO v_status, v_total_debit
    FROM vouchers
    WHERE id = NEW.voucher_id;

    IF v_status = 'POSTED' THEN
        SELECT
            COALESCE(SUM(debit), 0),
            COALESCE(SUM(credit), 0)
        INTO line_debit, line_credit
        FROM voucher_lines
        WHERE voucher_id = NEW.voucher_id;

        IF line_debit <> line_credit THEN
            RAISE EXCEPTION 'Voucher % is not balanced. Debit: %, Credit: %',
                NEW.voucher_id, line_debit, line_credit;
        END IF;

        IF line_debit <> v_total_debit THEN
            RAISE EXCEPTION 'Voucher % lines total % but header says %',
                NEW.voucher_id, line_debit, v_total_debit;
        END IF;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE CONSTRAINT TRIGGER trg_check_voucher_balance
AFTER INSERT OR UPDATE ON voucher_lines
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_voucher_balance();

-- ============================================================
-- FUNCTION: prevent_posted_voucher_modification
-- Posted vouchers are corrected by reversing vouchers, never edited
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_posted_voucher_modification()
RETURNS TRIGGER AS $$
BEGIN
    IF OLD.status = 'POSTED' THEN
        RAISE EXCEPTION 'Cannot modify posted voucher %. Create a reversing voucher instead.', OLD.id;
    END IF;
    IF TG_OP = 'DELETE' THEN
        RETURN OLD;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_posted_voucher_mod
BEFORE UPDATE OR DELETE ON vouchers
FOR EACH ROW
EXECUTE FUNCTION prevent_posted_voucher_modification();

CREATE OR REPLACE FUNCTION prevent_posted_line_modification()
RETURNS TRIGGER AS $$
DECLARE
    v_status voucher_status;
BEGIN
    SELECT status INTO v_status FROM vouchers WHERE id = OLD.voucher_id;
    IF v_status = 'POSTED' THEN
        RAISE EXCEPTION 'Cannot modify lines of posted voucher %', OLD.voucher_id;
    END IF;
    IF TG_OP = 'DELETE' THEN
        RETURN OLD;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_posted_line_mod
BEFORE UPDATE OR DELETE ON voucher_lines
FOR EACH ROW
EXECUTE FUNCTION prevent_posted_line_modification();

-- ============================================================
-- FUNCTION: update_updated_at
-- ============================================================
CREATE OR REPLACE FUNCTION update_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_companies_updated_at BEFORE UPDATE ON companies
FOR EACH ROW EXECUTE FUNCTION update_updated_at();
CREATE TRIGGER trg_accounts_updated_at BEFORE UPDATE ON accounts
FOR EACH ROW EXECUTE FUNCTION update_updated_at();
CREATE TRIGGER trg_fiscal_years_updated_at BEFORE UPDATE ON fiscal_years
FOR EACH ROW EXECUTE FUNCTION update_updated_at();
CREATE TRIGGER trg_voucher_types_updated_at BEFORE UPDATE ON voucher_types
FOR EACH ROW EXECUTE FUNCTION update_updated_at();
CREATE TRIGGER trg_workflow_definitions_updated_at BEFORE UPDATE ON workflow_definitions
FOR EACH ROW EXECUTE FUNCTION update_updated_at();
CREATE TRIGGER trg_dwi_updated_at BEFORE UPDATE ON document_workflow_instances
FOR EACH ROW EXECUTE FUNCTION update_updated_at();
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

-- Drop triggers
DROP TRIGGER IF EXISTS trg_dwi_updated_at ON document_workflow_instances;
DROP TRIGGER IF EXISTS trg_workflow_definitions_updated_at ON workflow_definitions;
DROP TRIGGER IF EXISTS trg_voucher_types_updated_at ON voucher_types;
DROP TRIGGER IF EXISTS trg_fiscal_years_updated_at ON fiscal_years;
DROP TRIGGER IF EXISTS trg_accounts_updated_at ON accounts;
DROP TRIGGER IF EXISTS trg_companies_updated_at ON companies;
DROP TRIGGER IF EXISTS trg_prevent_posted_line_mod ON voucher_lines;
DROP TRIGGER IF EXISTS trg_prevent_posted_voucher_mod ON vouchers;
DROP TRIGGER IF EXISTS trg_check_voucher_balance ON voucher_lines;

-- Drop functions
DROP FUNCTION IF EXISTS update_updated_at();
DROP FUNCTION IF EXISTS prevent_posted_line_modification();
DROP FUNCTION IF EXISTS prevent_posted_voucher_modification();
DROP FUNCTION IF EXISTS check_voucher_balance();

-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS notifications CASCADE;
DROP TABLE IF EXISTS workflow_logs CASCADE;
DROP TABLE IF EXISTS workflow_tasks CASCADE;
DROP TABLE IF EXISTS document_workflow_instances CASCADE;
DROP TABLE IF EXISTS workflow_step_approvers CASCADE;
DROP TABLE IF EXISTS workflow_steps CASCADE;
DROP TABLE IF EXISTS workflow_definitions CASCADE;
DROP TABLE IF EXISTS voucher_lines CASCADE;
DROP TABLE IF EXISTS vouchers CASCADE;
DROP TABLE IF EXISTS voucher_types CASCADE;
DROP TABLE IF EXISTS fiscal_years CASCADE;
DROP TABLE IF EXISTS posting_account_mappings CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS account_groups CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TABLE IF EXISTS companies CASCADE;

-- Drop enums
DROP TYPE IF EXISTS voucher_status CASCADE;
DROP TYPE IF EXISTS account_nature CASCADE;
";
