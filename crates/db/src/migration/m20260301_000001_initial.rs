//! Initial database migration.
//!
//! Creates all enums, tables, and indexes for the school administration
//! schema: branch hierarchy, users and role-based permissions, fee
//! structures, dues, payments, allocations, audit logs, and sessions.

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
        // PART 2: BRANCH HIERARCHY
        // ============================================================
        db.execute_unprepared(BRANCHES_SQL).await?;

        // ============================================================
        // PART 3: USERS, ROLES, PERMISSIONS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(ROLES_SQL).await?;
        db.execute_unprepared(PERMISSIONS_SQL).await?;
        db.execute_unprepared(ROLE_PERMISSIONS_SQL).await?;
        db.execute_unprepared(USER_ROLES_SQL).await?;

        // ============================================================
        // PART 4: FEES
        // ============================================================
        db.execute_unprepared(FEE_STRUCTURES_SQL).await?;
        db.execute_unprepared(FEE_DUES_SQL).await?;
        db.execute_unprepared(FEE_PAYMENTS_SQL).await?;
        db.execute_unprepared(PAYMENT_ALLOCATIONS_SQL).await?;

        // ============================================================
        // PART 5: AUDIT & SESSIONS
        // ============================================================
        db.execute_unprepared(AUDIT_LOGS_SQL).await?;
        db.execute_unprepared(SESSIONS_SQL).await?;

        // ============================================================
        // PART 6: INDEXES
        // ============================================================
        db.execute_unprepared(INDEXES_SQL).await?;

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
-- User roles
CREATE TYPE user_role AS ENUM (
    'super_admin',
    'branch_admin',
    'accountant',
    'teacher',
    'staff'
);

-- Fee due status
CREATE TYPE due_status AS ENUM (
    'pending',
    'partially_paid',
    'paid',
    'waived',
    'overdue'
);

-- Payment settlement status
CREATE TYPE payment_status AS ENUM (
    'completed',
    'pending',
    'failed',
    'refunded'
);

-- Fee recurrence
CREATE TYPE fee_recurrence AS ENUM (
    'one_time',
    'monthly',
    'quarterly',
    'annual'
);
";

const BRANCHES_SQL: &str = r"
CREATE TABLE branches (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    code VARCHAR(32) NOT NULL UNIQUE,
    parent_branch_id UUID REFERENCES branches(id),
    is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CHECK (parent_branch_id IS DISTINCT FROM id)
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    role user_role NOT NULL DEFAULT 'staff',
    branch_id UUID REFERENCES branches(id),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const ROLES_SQL: &str = r"
CREATE TABLE roles (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(128) NOT NULL UNIQUE,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PERMISSIONS_SQL: &str = r"
CREATE TABLE permissions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    slug VARCHAR(128) NOT NULL UNIQUE,
    description TEXT
);
";

const ROLE_PERMISSIONS_SQL: &str = r"
CREATE TABLE role_permissions (
    role_id UUID NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
    permission_id UUID NOT NULL REFERENCES permissions(id) ON DELETE CASCADE,
    PRIMARY KEY (role_id, permission_id)
);
";

const USER_ROLES_SQL: &str = r"
CREATE TABLE user_roles (
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    role_id UUID NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
    PRIMARY KEY (user_id, role_id)
);
";

const FEE_STRUCTURES_SQL: &str = r"
CREATE TABLE fee_structures (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    branch_id UUID NOT NULL REFERENCES branches(id),
    grade VARCHAR(32) NOT NULL,
    fee_type VARCHAR(64) NOT NULL,
    amount NUMERIC(15, 2) NOT NULL CHECK (amount >= 0),
    academic_year VARCHAR(16) NOT NULL,
    due_date DATE NOT NULL,
    recurrence fee_recurrence NOT NULL DEFAULT 'one_time',
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const FEE_DUES_SQL: &str = r"
CREATE TABLE fee_dues (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_id UUID NOT NULL,
    fee_structure_id UUID NOT NULL REFERENCES fee_structures(id),
    fee_type VARCHAR(64) NOT NULL,
    academic_year VARCHAR(16) NOT NULL,
    current_grade VARCHAR(32),
    due_date DATE NOT NULL,
    original_amount NUMERIC(15, 2) NOT NULL CHECK (original_amount >= 0),
    balance_amount NUMERIC(15, 2) NOT NULL,
    status due_status NOT NULL DEFAULT 'pending',
    metadata JSONB NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CHECK (balance_amount >= 0 AND balance_amount <= original_amount)
);
";

const FEE_PAYMENTS_SQL: &str = r"
CREATE TABLE fee_payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_id UUID NOT NULL,
    fee_structure_id UUID REFERENCES fee_structures(id),
    amount_paid NUMERIC(15, 2) NOT NULL CHECK (amount_paid >= 0),
    discount_amount NUMERIC(15, 2) NOT NULL DEFAULT 0 CHECK (discount_amount >= 0),
    late_fee NUMERIC(15, 2) NOT NULL DEFAULT 0 CHECK (late_fee >= 0),
    total_amount NUMERIC(15, 2) NOT NULL CHECK (total_amount >= 0),
    payment_date DATE NOT NULL,
    payment_status payment_status NOT NULL DEFAULT 'completed',
    payment_method VARCHAR(32) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CHECK (total_amount = amount_paid + late_fee - discount_amount)
);
";

const PAYMENT_ALLOCATIONS_SQL: &str = r"
CREATE TABLE payment_allocations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    payment_id UUID NOT NULL REFERENCES fee_payments(id),
    due_id UUID NOT NULL REFERENCES fee_dues(id),
    amount NUMERIC(15, 2) NOT NULL CHECK (amount > 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const AUDIT_LOGS_SQL: &str = r"
CREATE TABLE audit_logs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    kind VARCHAR(64) NOT NULL,
    subject_id UUID NOT NULL,
    actor_id UUID,
    payload JSONB NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const SESSIONS_SQL: &str = r"
CREATE TABLE sessions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    refresh_token_hash VARCHAR(64) NOT NULL,
    user_agent TEXT,
    ip_address VARCHAR(45),
    expires_at TIMESTAMPTZ NOT NULL,
    revoked_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const INDEXES_SQL: &str = r"
CREATE INDEX idx_branches_parent ON branches(parent_branch_id) WHERE NOT is_deleted;
CREATE INDEX idx_users_branch ON users(branch_id);
CREATE INDEX idx_fee_structures_branch ON fee_structures(branch_id);
CREATE INDEX idx_fee_structures_year ON fee_structures(academic_year);
CREATE INDEX idx_fee_dues_student ON fee_dues(student_id);
CREATE INDEX idx_fee_dues_structure ON fee_dues(fee_structure_id);
CREATE INDEX idx_fee_dues_status_due_date ON fee_dues(status, due_date);
CREATE INDEX idx_fee_payments_student ON fee_payments(student_id);
CREATE INDEX idx_payment_allocations_payment ON payment_allocations(payment_id);
CREATE INDEX idx_payment_allocations_due ON payment_allocations(due_id);
CREATE INDEX idx_audit_logs_subject ON audit_logs(subject_id);
CREATE INDEX idx_sessions_user ON sessions(user_id);
CREATE INDEX idx_sessions_token ON sessions(refresh_token_hash);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS sessions CASCADE;
DROP TABLE IF EXISTS audit_logs CASCADE;
DROP TABLE IF EXISTS payment_allocations CASCADE;
DROP TABLE IF EXISTS fee_payments CASCADE;
DROP TABLE IF EXISTS fee_dues CASCADE;
DROP TABLE IF EXISTS fee_structures CASCADE;
DROP TABLE IF EXISTS user_roles CASCADE;
DROP TABLE IF EXISTS role_permissions CASCADE;
DROP TABLE IF EXISTS permissions CASCADE;
DROP TABLE IF EXISTS roles CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TABLE IF EXISTS branches CASCADE;
DROP TYPE IF EXISTS fee_recurrence;
DROP TYPE IF EXISTS payment_status;
DROP TYPE IF EXISTS due_status;
DROP TYPE IF EXISTS user_role;
";
