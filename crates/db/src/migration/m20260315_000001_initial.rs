//! Initial database migration.
//!
//! Creates all enums and core tables.

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
        // PART 2: TENANCY & MASTER DATA
        // ============================================================
        db.execute_unprepared(TENANTS_SQL).await?;
        db.execute_unprepared(CHART_OF_ACCOUNTS_SQL).await?;
        db.execute_unprepared(COST_CENTERS_SQL).await?;
        db.execute_unprepared(PEOPLE_SQL).await?;

        // ============================================================
        // PART 3: LEDGER
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRY_LINES_SQL).await?;

        // ============================================================
        // PART 4: DOCUMENTS
        // ============================================================
        db.execute_unprepared(DOCUMENTS_SQL).await?;
        db.execute_unprepared(DOCUMENT_ITEMS_SQL).await?;
        db.execute_unprepared(DOCUMENT_PAYMENTS_SQL).await?;
        db.execute_unprepared(DOCUMENT_FISCAL_INFOS_SQL).await?;

        // ============================================================
        // PART 5: CASH & BANK
        // ============================================================
        db.execute_unprepared(CASH_BOXES_SQL).await?;
        db.execute_unprepared(CASH_SESSIONS_SQL).await?;
        db.execute_unprepared(BANK_ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 6: TRANSACTIONS & MOVEMENTS
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(TRANSACTION_DOCUMENTS_SQL).await?;
        db.execute_unprepared(CASH_MOVEMENTS_SQL).await?;
        db.execute_unprepared(BANK_MOVEMENTS_SQL).await?;
        db.execute_unprepared(BANK_MOVEMENT_DETAILS_SQL).await?;

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
-- Account classification
CREATE TYPE account_kind AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense'
);

-- Document kind
CREATE TYPE document_kind AS ENUM (
    'sales_invoice',
    'credit_note',
    'purchase_invoice',
    'withholding'
);

-- Document business status
CREATE TYPE document_status AS ENUM (
    'draft',
    'issued',
    'confirmed',
    'void'
);

-- Fiscal authorization status
CREATE TYPE sri_status AS ENUM (
    'draft',
    'sent',
    'received',
    'in_process',
    'authorized',
    'rejected'
);

-- Movement direction
CREATE TYPE movement_direction AS ENUM ('in', 'out');

-- Payment method
CREATE TYPE payment_method AS ENUM ('cash', 'transfer');

-- Cash session status
CREATE TYPE cash_session_status AS ENUM ('open', 'closed');

-- Journal entry kind
CREATE TYPE entry_kind AS ENUM (
    'sale',
    'purchase',
    'cash',
    'bank',
    'withholding',
    'transfer',
    'adjustment'
);
";

const TENANTS_SQL: &str = r"
CREATE TABLE tenants (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    legal_name VARCHAR(255) NOT NULL,
    ruc VARCHAR(13) NOT NULL UNIQUE,
    establishment_code VARCHAR(3) NOT NULL DEFAULT '001',
    emission_point_code VARCHAR(3) NOT NULL DEFAULT '001',
    sri_environment SMALLINT NOT NULL DEFAULT 1,
    certificate_key VARCHAR(512),
    certificate_password VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CHART_OF_ACCOUNTS_SQL: &str = r"
CREATE TABLE chart_of_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id),
    code VARCHAR(32) NOT NULL,
    name VARCHAR(255) NOT NULL,
    kind account_kind NOT NULL,
    parent_id UUID REFERENCES chart_of_accounts(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (tenant_id, code)
);

CREATE INDEX idx_coa_tenant ON chart_of_accounts(tenant_id);
CREATE INDEX idx_coa_parent ON chart_of_accounts(parent_id);
";

const COST_CENTERS_SQL: &str = r"
CREATE TABLE cost_centers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id),
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const PEOPLE_SQL: &str = r"
CREATE TABLE people (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id),
    name VARCHAR(255) NOT NULL,
    tax_id VARCHAR(13) NOT NULL,
    receivable_account_id UUID REFERENCES chart_of_accounts(id),
    payable_account_id UUID REFERENCES chart_of_accounts(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (tenant_id, tax_id)
);

CREATE INDEX idx_people_tenant ON people(tenant_id);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id),
    entry_date DATE NOT NULL,
    description VARCHAR(512) NOT NULL,
    kind entry_kind NOT NULL,
    source_kind VARCHAR(32),
    source_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_journal_entries_tenant ON journal_entries(tenant_id);
CREATE INDEX idx_journal_entries_source ON journal_entries(tenant_id, source_kind, source_id);
";

const JOURNAL_ENTRY_LINES_SQL: &str = r"
CREATE TABLE journal_entry_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES chart_of_accounts(id),
    debit NUMERIC(14, 2) NOT NULL DEFAULT 0 CHECK (debit >= 0),
    credit NUMERIC(14, 2) NOT NULL DEFAULT 0 CHECK (credit >= 0),
    cost_center_id UUID REFERENCES cost_centers(id),
    person_id UUID REFERENCES people(id),
    -- A line is either a debit or a credit, never both, never neither.
    CHECK ((debit > 0 AND credit = 0) OR (credit > 0 AND debit = 0))
);

CREATE INDEX idx_journal_lines_entry ON journal_entry_lines(journal_entry_id);
CREATE INDEX idx_journal_lines_account ON journal_entry_lines(account_id);
";

const DOCUMENTS_SQL: &str = r"
CREATE TABLE documents (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id),
    kind document_kind NOT NULL,
    person_id UUID NOT NULL REFERENCES people(id),
    issue_date DATE NOT NULL,
    reference VARCHAR(64) NOT NULL,
    status document_status NOT NULL DEFAULT 'issued',
    subtotal NUMERIC(14, 2) NOT NULL DEFAULT 0,
    tax_total NUMERIC(14, 2) NOT NULL DEFAULT 0,
    discount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    total NUMERIC(14, 2) NOT NULL DEFAULT 0,
    paid_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    balance NUMERIC(14, 2) NOT NULL DEFAULT 0 CHECK (balance >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_documents_tenant ON documents(tenant_id);
CREATE INDEX idx_documents_person ON documents(person_id);
CREATE INDEX idx_documents_balance ON documents(tenant_id) WHERE balance > 0;
";

const DOCUMENT_ITEMS_SQL: &str = r"
CREATE TABLE document_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    document_id UUID NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    description VARCHAR(512) NOT NULL,
    account_id UUID REFERENCES chart_of_accounts(id),
    quantity NUMERIC(14, 4) NOT NULL DEFAULT 1,
    unit_price NUMERIC(14, 4) NOT NULL DEFAULT 0,
    net_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    discount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    tax_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    tax_account_id UUID REFERENCES chart_of_accounts(id),
    cost_center_id UUID REFERENCES cost_centers(id)
);

CREATE INDEX idx_document_items_document ON document_items(document_id);
";

const DOCUMENT_PAYMENTS_SQL: &str = r"
CREATE TABLE document_payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    document_id UUID NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    method payment_method NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    term_days INTEGER
);

CREATE INDEX idx_document_payments_document ON document_payments(document_id);
";

const DOCUMENT_FISCAL_INFOS_SQL: &str = r"
CREATE TABLE document_fiscal_infos (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id),
    document_id UUID NOT NULL REFERENCES documents(id),
    establishment VARCHAR(3) NOT NULL,
    emission_point VARCHAR(3) NOT NULL,
    sequence BIGINT NOT NULL,
    access_key VARCHAR(49),
    signed_xml_key VARCHAR(512),
    authorization_number VARCHAR(64),
    authorization_date TIMESTAMPTZ,
    sri_status sri_status NOT NULL DEFAULT 'draft',
    last_response TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (document_id)
);

CREATE INDEX idx_fiscal_infos_status ON document_fiscal_infos(sri_status);
CREATE INDEX idx_fiscal_infos_tenant ON document_fiscal_infos(tenant_id);
";

const CASH_BOXES_SQL: &str = r"
CREATE TABLE cash_boxes (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id),
    name VARCHAR(255) NOT NULL,
    account_id UUID REFERENCES chart_of_accounts(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CASH_SESSIONS_SQL: &str = r"
CREATE TABLE cash_sessions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id),
    cash_box_id UUID NOT NULL REFERENCES cash_boxes(id),
    user_id UUID NOT NULL,
    status cash_session_status NOT NULL DEFAULT 'open',
    opened_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    closed_at TIMESTAMPTZ
);

-- One open session per user per tenant.
CREATE UNIQUE INDEX idx_cash_sessions_open_user
    ON cash_sessions(tenant_id, user_id) WHERE status = 'open';
";

const BANK_ACCOUNTS_SQL: &str = r"
CREATE TABLE bank_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id),
    bank_name VARCHAR(255) NOT NULL,
    account_number VARCHAR(64) NOT NULL,
    account_id UUID REFERENCES chart_of_accounts(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id),
    person_id UUID REFERENCES people(id),
    method payment_method NOT NULL,
    direction movement_direction NOT NULL,
    amount NUMERIC(14, 2) NOT NULL CHECK (amount > 0),
    transaction_date DATE NOT NULL,
    user_id UUID NOT NULL,
    bank_account_id UUID REFERENCES bank_accounts(id),
    description VARCHAR(512),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_transactions_tenant ON transactions(tenant_id);
";

const TRANSACTION_DOCUMENTS_SQL: &str = r"
CREATE TABLE transaction_documents (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    transaction_id UUID NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
    document_id UUID NOT NULL REFERENCES documents(id),
    applied_amount NUMERIC(14, 2) NOT NULL CHECK (applied_amount > 0)
);

CREATE INDEX idx_transaction_documents_txn ON transaction_documents(transaction_id);
CREATE INDEX idx_transaction_documents_doc ON transaction_documents(document_id);
";

const CASH_MOVEMENTS_SQL: &str = r"
CREATE TABLE cash_movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id),
    cash_session_id UUID NOT NULL REFERENCES cash_sessions(id),
    cash_box_id UUID NOT NULL REFERENCES cash_boxes(id),
    direction movement_direction NOT NULL,
    amount NUMERIC(14, 2) NOT NULL CHECK (amount > 0),
    movement_date DATE NOT NULL,
    description VARCHAR(512) NOT NULL,
    person_id UUID REFERENCES people(id),
    transaction_id UUID REFERENCES transactions(id),
    journal_entry_id UUID REFERENCES journal_entries(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_cash_movements_session ON cash_movements(cash_session_id);
CREATE INDEX idx_cash_movements_transaction ON cash_movements(transaction_id);
";

const BANK_MOVEMENTS_SQL: &str = r"
CREATE TABLE bank_movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id),
    bank_account_id UUID NOT NULL REFERENCES bank_accounts(id),
    direction movement_direction NOT NULL,
    movement_date DATE NOT NULL,
    description VARCHAR(512) NOT NULL,
    transaction_id UUID REFERENCES transactions(id),
    journal_entry_id UUID REFERENCES journal_entries(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_bank_movements_account ON bank_movements(bank_account_id);
CREATE INDEX idx_bank_movements_transaction ON bank_movements(transaction_id);
";

const BANK_MOVEMENT_DETAILS_SQL: &str = r"
CREATE TABLE bank_movement_details (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    bank_movement_id UUID NOT NULL REFERENCES bank_movements(id) ON DELETE CASCADE,
    account_id UUID REFERENCES chart_of_accounts(id),
    amount NUMERIC(14, 2) NOT NULL CHECK (amount > 0),
    person_id UUID REFERENCES people(id),
    cost_center_id UUID REFERENCES cost_centers(id)
);

CREATE INDEX idx_bank_movement_details_movement ON bank_movement_details(bank_movement_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS bank_movement_details;
DROP TABLE IF EXISTS bank_movements;
DROP TABLE IF EXISTS cash_movements;
DROP TABLE IF EXISTS transaction_documents;
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS bank_accounts;
DROP TABLE IF EXISTS cash_sessions;
DROP TABLE IF EXISTS cash_boxes;
DROP TABLE IF EXISTS document_fiscal_infos;
DROP TABLE IF EXISTS document_payments;
DROP TABLE IF EXISTS document_items;
DROP TABLE IF EXISTS documents;
DROP TABLE IF EXISTS journal_entry_lines;
DROP TABLE IF EXISTS journal_entries;
DROP TABLE IF EXISTS people;
DROP TABLE IF EXISTS cost_centers;
DROP TABLE IF EXISTS chart_of_accounts;
DROP TABLE IF EXISTS tenants;
DROP TYPE IF EXISTS entry_kind;
DROP TYPE IF EXISTS cash_session_status;
DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS movement_direction;
DROP TYPE IF EXISTS sri_status;
DROP TYPE IF EXISTS document_status;
DROP TYPE IF EXISTS document_kind;
DROP TYPE IF EXISTS account_kind;
";
