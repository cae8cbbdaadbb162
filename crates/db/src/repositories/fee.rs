//! Fee repository: dues queries and the transactional ledger operations.
//!
//! Read paths load due rows and delegate the math to `sekolah_core::fees`.
//! Mutating paths (allocation, waiver) run inside a single database
//! transaction with compare-and-set balance updates: every write is
//! predicated on the balance value it was planned against, so concurrent
//! attempts against the same due cannot both succeed in over-drawing it.
//! The loser fails with `ConcurrentModification` and retries the whole
//! batch; partial progress is never resumed.

use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, TransactionTrait,
};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use sekolah_core::access::AccessScope;
use sekolah_core::fees::{
    AgingReport, AllocationPlan, AllocationRequest, DueStatus, DuesReport, DuesService, FeeDue,
    FeeError, PaymentSnapshot, effective_status, plan_allocation,
};
use sekolah_shared::Metadata;

use super::audit::AuditRepository;
use crate::entities::{fee_dues, fee_payments, fee_structures, payment_allocations};
use crate::entities::sea_orm_active_enums::{self, PaymentStatus};
use crate::scope::BranchScopeExt;

/// Error types for fee repository operations.
#[derive(Debug, thiserror::Error)]
pub enum FeeRepositoryError {
    /// A ledger invariant violation from the dues engine.
    #[error(transparent)]
    Fee(#[from] FeeError),

    /// The payment exists but is not settled, so it cannot be allocated.
    #[error("Payment {0} is not settled and cannot be allocated")]
    PaymentNotSettled(Uuid),

    /// A concurrent writer changed a due between plan and write.
    #[error("Concurrent modification detected for due {0}, please retry")]
    ConcurrentModification(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl FeeRepositoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Fee(e) => e.error_code(),
            Self::PaymentNotSettled(_) => "PAYMENT_NOT_SETTLED",
            Self::ConcurrentModification(_) => "CONCURRENT_MODIFICATION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Fee(e) => e.http_status_code(),
            Self::PaymentNotSettled(_) => 422,
            Self::ConcurrentModification(_) => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns true if the caller should retry the whole operation.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification(_))
    }
}

/// Filters for a student's dues listing.
#[derive(Debug, Clone, Default)]
pub struct DueFilter {
    /// Restrict to one academic year.
    pub academic_year: Option<String>,
    /// Restrict to one fee type.
    pub fee_type: Option<String>,
    /// Restrict to one effective status (re-derived, not stored).
    pub status: Option<DueStatus>,
}

/// Filters for overdue and report queries.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Restrict to one academic year.
    pub academic_year: Option<String>,
    /// Restrict to one fee type.
    pub fee_type: Option<String>,
}

/// A student's dues with their grouped summary.
#[derive(Debug, Clone)]
pub struct StudentDues {
    /// The dues, statuses re-derived against today.
    pub dues: Vec<FeeDue>,
    /// Grouped-by-type totals.
    pub summary: sekolah_core::fees::DuesSummary,
}

/// Fee repository for dues, payments, and allocations.
#[derive(Debug, Clone)]
pub struct FeeRepository {
    db: DatabaseConnection,
}

impl FeeRepository {
    /// Creates a new fee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads a student's dues with per-type totals.
    ///
    /// Read-only and idempotent. Statuses are re-derived against a single
    /// today snapshot, which is where overdue surfaces; the status filter
    /// matches the derived value, not the possibly stale stored one.
    pub async fn student_dues(
        &self,
        student_id: Uuid,
        filter: &DueFilter,
    ) -> Result<StudentDues, FeeRepositoryError> {
        let today = Utc::now().date_naive();

        let mut query = fee_dues::Entity::find()
            .filter(fee_dues::Column::StudentId.eq(student_id));
        if let Some(year) = &filter.academic_year {
            query = query.filter(fee_dues::Column::AcademicYear.eq(year.clone()));
        }
        if let Some(fee_type) = &filter.fee_type {
            query = query.filter(fee_dues::Column::FeeType.eq(fee_type.clone()));
        }

        let mut dues: Vec<FeeDue> = query
            .all(&self.db)
            .await?
            .into_iter()
            .map(due_to_domain)
            .collect();

        for due in &mut dues {
            due.status = effective_status(due, today);
        }
        if let Some(status) = filter.status {
            dues.retain(|d| d.status == status);
        }

        let summary = DuesService::summarize_dues(&dues);
        Ok(StudentDues { dues, summary })
    }

    /// Applies one payment across a batch of dues atomically.
    ///
    /// The whole batch is planned against the payment's unallocated value
    /// and the current balances, then written with compare-and-set updates
    /// inside one transaction. Any violation or write conflict aborts the
    /// transaction; either every due is updated and every allocation row
    /// recorded, or nothing is.
    pub async fn apply_payment_to_dues(
        &self,
        payment_id: Uuid,
        requests: &[AllocationRequest],
    ) -> Result<AllocationPlan, FeeRepositoryError> {
        let today = Utc::now().date_naive();
        let txn = self.db.begin().await?;

        let payment = fee_payments::Entity::find_by_id(payment_id)
            .one(&txn)
            .await?
            .ok_or(FeeError::PaymentNotFound(payment_id))?;
        if payment.payment_status != PaymentStatus::Completed {
            return Err(FeeRepositoryError::PaymentNotSettled(payment_id));
        }

        let allocated = allocated_total(&txn, payment_id).await?;
        let snapshot = PaymentSnapshot {
            id: payment.id,
            total_amount: payment.total_amount,
            allocated_amount: allocated,
        };

        let mut due_ids: Vec<Uuid> = requests.iter().map(|r| r.due_id).collect();
        due_ids.sort_unstable();
        due_ids.dedup();
        let dues: Vec<FeeDue> = fee_dues::Entity::find()
            .filter(fee_dues::Column::Id.is_in(due_ids))
            .all(&txn)
            .await?
            .into_iter()
            .map(due_to_domain)
            .collect();

        let plan = plan_allocation(&snapshot, &dues, requests, today)?;

        let now = Utc::now();
        for update in &plan.updates {
            let result = fee_dues::Entity::update_many()
                .set(fee_dues::ActiveModel {
                    balance_amount: Set(update.new_balance),
                    status: Set(sea_orm_active_enums::DueStatus::from(update.new_status)),
                    updated_at: Set(now.into()),
                    ..Default::default()
                })
                .filter(fee_dues::Column::Id.eq(update.due_id))
                .filter(fee_dues::Column::BalanceAmount.eq(update.previous_balance))
                .exec(&txn)
                .await?;

            if result.rows_affected != 1 {
                // Dropping the transaction rolls back every prior update.
                return Err(FeeRepositoryError::ConcurrentModification(update.due_id));
            }
        }

        let rows: Vec<payment_allocations::ActiveModel> = plan
            .updates
            .iter()
            .map(|update| payment_allocations::ActiveModel {
                id: Set(Uuid::new_v4()),
                payment_id: Set(plan.payment_id),
                due_id: Set(update.due_id),
                amount: Set(update.amount),
                created_at: Set(now.into()),
            })
            .collect();
        payment_allocations::Entity::insert_many(rows).exec(&txn).await?;

        txn.commit().await?;
        Ok(plan)
    }

    /// Waives a due's remaining balance.
    ///
    /// One-way: paid or already-waived dues are rejected. The balance
    /// write is compare-and-set like allocations. The audit record is
    /// written after commit and is best-effort: a failure is logged, not
    /// propagated, and never rolls back the waiver.
    pub async fn waive_due(
        &self,
        due_id: Uuid,
        reason: &str,
        actor_id: Uuid,
    ) -> Result<FeeDue, FeeRepositoryError> {
        let waived_at = Utc::now();
        let txn = self.db.begin().await?;

        let due = fee_dues::Entity::find_by_id(due_id)
            .one(&txn)
            .await?
            .map(due_to_domain)
            .ok_or(FeeError::DueNotFound(due_id))?;

        let outcome = DuesService::plan_waiver(&due, reason, actor_id, waived_at)?;

        let result = fee_dues::Entity::update_many()
            .set(fee_dues::ActiveModel {
                balance_amount: Set(rust_decimal::Decimal::ZERO),
                status: Set(sea_orm_active_enums::DueStatus::Waived),
                metadata: Set(outcome.metadata.clone().into_json()),
                updated_at: Set(waived_at.into()),
                ..Default::default()
            })
            .filter(fee_dues::Column::Id.eq(due_id))
            .filter(fee_dues::Column::BalanceAmount.eq(due.balance_amount))
            .filter(
                fee_dues::Column::Status.is_not_in([
                    sea_orm_active_enums::DueStatus::Paid,
                    sea_orm_active_enums::DueStatus::Waived,
                ]),
            )
            .exec(&txn)
            .await?;

        if result.rows_affected != 1 {
            return Err(FeeRepositoryError::ConcurrentModification(due_id));
        }

        txn.commit().await?;

        let audit = AuditRepository::new(self.db.clone());
        let payload = json!({
            "amount_before": outcome.amount_waived,
            "amount_after": rust_decimal::Decimal::ZERO,
            "reason": reason,
        });
        if let Err(e) = audit.record("waiver", due_id, Some(actor_id), payload).await {
            warn!(due_id = %due_id, error = %e, "failed to write waiver audit record");
        }

        let mut waived = due;
        waived.balance_amount = rust_decimal::Decimal::ZERO;
        waived.status = DueStatus::Waived;
        waived.metadata = outcome.metadata;
        Ok(waived)
    }

    /// Builds the overdue aging report.
    ///
    /// One today snapshot drives eligibility and band boundaries for the
    /// whole computation. The scope restricts rows through the owning fee
    /// structure's branch.
    pub async fn overdue_aging(
        &self,
        scope: &AccessScope,
        filter: &ReportFilter,
    ) -> Result<AgingReport, FeeRepositoryError> {
        let today = Utc::now().date_naive();

        let dues = self.load_for_report(scope, filter, true, today).await?;
        Ok(sekolah_core::fees::age_overdue(&dues, today))
    }

    /// Builds the composed dues report: outstanding totals, per-type
    /// summary, and aging buckets.
    pub async fn dues_report(
        &self,
        scope: &AccessScope,
        filter: &ReportFilter,
    ) -> Result<DuesReport, FeeRepositoryError> {
        let today = Utc::now().date_naive();

        let dues = self.load_for_report(scope, filter, false, today).await?;
        Ok(DuesService::generate_dues_report(&dues, today))
    }

    /// Loads dues for reporting, optionally restricted to overdue-eligible
    /// rows (outstanding status, due date in the past).
    async fn load_for_report(
        &self,
        scope: &AccessScope,
        filter: &ReportFilter,
        overdue_only: bool,
        today: chrono::NaiveDate,
    ) -> Result<Vec<FeeDue>, FeeRepositoryError> {
        use sea_orm::QuerySelect;

        let mut query = fee_dues::Entity::find()
            .inner_join(fee_structures::Entity)
            .in_branch_scope(scope, fee_structures::Column::BranchId);

        if let Some(year) = &filter.academic_year {
            query = query.filter(fee_dues::Column::AcademicYear.eq(year.clone()));
        }
        if let Some(fee_type) = &filter.fee_type {
            query = query.filter(fee_dues::Column::FeeType.eq(fee_type.clone()));
        }
        if overdue_only {
            query = query
                .filter(fee_dues::Column::DueDate.lt(today))
                .filter(fee_dues::Column::Status.is_in([
                    sea_orm_active_enums::DueStatus::Pending,
                    sea_orm_active_enums::DueStatus::PartiallyPaid,
                    sea_orm_active_enums::DueStatus::Overdue,
                ]));
        }

        let dues = query
            .distinct()
            .all(&self.db)
            .await?
            .into_iter()
            .map(due_to_domain)
            .collect();
        Ok(dues)
    }
}

/// Sums the value a payment has already distributed.
async fn allocated_total(
    txn: &DatabaseTransaction,
    payment_id: Uuid,
) -> Result<rust_decimal::Decimal, DbErr> {
    let rows = payment_allocations::Entity::find()
        .filter(payment_allocations::Column::PaymentId.eq(payment_id))
        .all(txn)
        .await?;
    Ok(rows.iter().map(|a| a.amount).sum())
}

/// Maps a due row into the domain snapshot the engine consumes.
fn due_to_domain(model: fee_dues::Model) -> FeeDue {
    FeeDue {
        id: model.id,
        student_id: model.student_id,
        fee_structure_id: model.fee_structure_id,
        fee_type: model.fee_type,
        academic_year: model.academic_year,
        current_grade: model.current_grade,
        due_date: model.due_date,
        original_amount: model.original_amount,
        balance_amount: model.balance_amount,
        status: model.status.into(),
        metadata: Metadata::from_json(model.metadata),
    }
}
