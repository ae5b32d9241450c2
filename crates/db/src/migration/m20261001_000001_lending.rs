//! Initial lending schema.
//!
//! Creates the status enums, the borrower/loan/installment/voucher/payment
//! tables, and seeds the loan periods.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;

        db.execute_unprepared(BORROWERS_SQL).await?;
        db.execute_unprepared(LOAN_PERIODS_SQL).await?;
        db.execute_unprepared(LOANS_SQL).await?;
        db.execute_unprepared(INSTALLMENTS_SQL).await?;
        db.execute_unprepared(VOUCHERS_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;

        db.execute_unprepared(SEED_LOAN_PERIODS_SQL).await?;

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
CREATE TYPE credit_health AS ENUM ('good', 'warning', 'blocked');

CREATE TYPE contract_status AS ENUM (
    'unconfirmed',
    'pending_review',
    'rejected',
    'accepted',
    'confirmed'
);

CREATE TYPE loan_status AS ENUM (
    'pending',
    'active',
    'repaying',
    'paid_off',
    'rejected'
);

CREATE TYPE installment_status AS ENUM ('unpaid', 'paid');
";

const BORROWERS_SQL: &str = r"
CREATE TABLE borrowers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    full_name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    credit_limit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit_used NUMERIC(19, 4) NOT NULL DEFAULT 0,
    total_delay INTEGER NOT NULL DEFAULT 0,
    credit_health credit_health NOT NULL DEFAULT 'good',
    contract_status contract_status NOT NULL DEFAULT 'unconfirmed',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_credit_limit_non_negative CHECK (credit_limit >= 0),
    CONSTRAINT chk_total_delay_non_negative CHECK (total_delay >= 0)
);

CREATE INDEX idx_borrowers_pending_review ON borrowers(created_at)
    WHERE contract_status = 'pending_review';
";

const LOAN_PERIODS_SQL: &str = r"
CREATE TABLE loan_periods (
    id SERIAL PRIMARY KEY,
    duration_months INTEGER NOT NULL,
    percentage INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (duration_months, percentage),
    CONSTRAINT chk_duration_positive CHECK (duration_months > 0),
    CONSTRAINT chk_percentage_positive CHECK (percentage > 0)
);
";

const LOANS_SQL: &str = r"
CREATE TABLE loans (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    borrower_id UUID NOT NULL REFERENCES borrowers(id),
    loan_period_id INTEGER NOT NULL REFERENCES loan_periods(id),
    name VARCHAR(255) NOT NULL,
    requested_amount NUMERIC(19, 4) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    status loan_status NOT NULL DEFAULT 'pending',
    approved_at TIMESTAMPTZ,
    rejected_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_loan_amount_positive CHECK (amount > 0 AND requested_amount > 0)
);

CREATE INDEX idx_loans_borrower ON loans(borrower_id);
CREATE INDEX idx_loans_pending ON loans(created_at) WHERE status = 'pending';
";

const INSTALLMENTS_SQL: &str = r"
CREATE TABLE installments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    loan_id UUID NOT NULL REFERENCES loans(id) ON DELETE CASCADE,
    sequence INTEGER NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    due_date TIMESTAMPTZ NOT NULL,
    status installment_status NOT NULL DEFAULT 'unpaid',
    paid_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (loan_id, sequence),
    CONSTRAINT chk_installment_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_paid_at_matches_status CHECK (
        (status = 'paid') = (paid_at IS NOT NULL)
    )
);

CREATE INDEX idx_installments_loan_due ON installments(loan_id, due_date);
";

const VOUCHERS_SQL: &str = r"
CREATE TABLE vouchers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    discount_percent INTEGER NOT NULL,
    quota INTEGER NOT NULL,
    active_date TIMESTAMPTZ NOT NULL,
    expire_date TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_discount_percent_range CHECK (discount_percent BETWEEN 1 AND 100),
    CONSTRAINT chk_voucher_window CHECK (expire_date >= active_date)
);

CREATE INDEX idx_vouchers_expire_date ON vouchers(expire_date);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    borrower_id UUID NOT NULL REFERENCES borrowers(id),
    loan_id UUID NOT NULL REFERENCES loans(id),
    installment_id UUID NOT NULL UNIQUE REFERENCES installments(id),
    voucher_id UUID,
    delay_days INTEGER NOT NULL DEFAULT 0,
    payment_fine NUMERIC(19, 4) NOT NULL DEFAULT 0,
    payment_discount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    payment_amount NUMERIC(19, 4) NOT NULL,
    payment_date TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_payment_figures CHECK (
        payment_fine >= 0 AND payment_discount >= 0 AND payment_amount >= 0
    )
);

CREATE INDEX idx_payments_loan ON payments(loan_id);
CREATE INDEX idx_payments_borrower ON payments(borrower_id);
";

const SEED_LOAN_PERIODS_SQL: &str = r"
INSERT INTO loan_periods (duration_months, percentage) VALUES
    (1, 100),
    (3, 105),
    (6, 110),
    (12, 120);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS vouchers CASCADE;
DROP TABLE IF EXISTS installments CASCADE;
DROP TABLE IF EXISTS loans CASCADE;
DROP TABLE IF EXISTS loan_periods CASCADE;
DROP TABLE IF EXISTS borrowers CASCADE;

DROP TYPE IF EXISTS installment_status;
DROP TYPE IF EXISTS loan_status;
DROP TYPE IF EXISTS contract_status;
DROP TYPE IF EXISTS credit_health;
";
