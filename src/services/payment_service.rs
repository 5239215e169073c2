use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::payment_dto::{
    DisputePayload, MarkSentPayload, RecordPaymentPayload, ScheduleEntry,
};
use crate::error::{Error, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::contract::{Contract, ContractStatus};
use crate::models::job::{JobPost, JobStatus};
use crate::models::notification::NotificationKind;
use crate::models::payment::{
    PaymentFrequency, PaymentSchedule, PaymentStatus, PaymentTransaction,
};
use crate::services::contract_service::ContractService;
use crate::services::notification_service::NotificationService;
use crate::services::schedule_service::ScheduleService;
use crate::utils::time;

/// Payment ledger: schedule rows, their proof-of-payment transactions, and
/// the completion side effects a confirmation can trigger.
#[derive(Clone)]
pub struct PaymentService {
    pool: PgPool,
}

impl PaymentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Non-cash methods must name a reference the other side can verify.
    pub fn validate_payment_details(method: &str, reference_number: Option<&str>) -> Result<()> {
        let method = method.trim();
        if method.is_empty() {
            return Err(Error::BadRequest("payment method is required".to_string()));
        }
        let missing_reference = reference_number.map(str::trim).map_or(true, str::is_empty);
        if !method.eq_ignore_ascii_case("cash") && missing_reference {
            return Err(Error::BadRequest(format!(
                "payment method {} requires a reference number",
                method
            )));
        }
        Ok(())
    }

    /// Seeds PENDING rows for a freshly activated contract. The unique
    /// constraint on (contract, due date) absorbs reruns and races.
    pub async fn insert_pending_rows(
        conn: &mut PgConnection,
        contract: &Contract,
        due_dates: &[NaiveDate],
        amount: Decimal,
    ) -> Result<()> {
        for due in due_dates {
            sqlx::query(
                r#"
                INSERT INTO payment_schedules
                    (id, contract_id, worker_id, worker_name, due_date, amount, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (contract_id, due_date) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(contract.id)
            .bind(contract.worker_id)
            .bind(contract.worker_name.as_deref())
            .bind(due)
            .bind(amount)
            .bind(PaymentStatus::Pending)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub async fn list_for_contract(
        &self,
        contract_id: Uuid,
        user: &CurrentUser,
    ) -> Result<Vec<ScheduleEntry>> {
        let contract = self.load_contract(contract_id).await?;
        if contract.worker_id != user.id && contract.employer_id != user.id {
            return Err(Error::Forbidden(
                "not a party to this contract".to_string(),
            ));
        }

        self.sweep_overdue().await?;

        let schedules = sqlx::query_as::<_, PaymentSchedule>(
            "SELECT * FROM payment_schedules WHERE contract_id = $1 ORDER BY due_date ASC",
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_transactions(schedules).await
    }

    pub async fn list_for_job(
        &self,
        job_id: Uuid,
        employer: &CurrentUser,
    ) -> Result<Vec<ScheduleEntry>> {
        let job = self.load_job(job_id).await?;
        if job.employer_id != employer.id {
            return Err(Error::Forbidden("not the owner of this job".to_string()));
        }

        self.sweep_overdue().await?;

        let schedules = sqlx::query_as::<_, PaymentSchedule>(
            r#"
            SELECT ps.* FROM payment_schedules ps
            JOIN contracts c ON c.id = ps.contract_id
            WHERE c.post_id = $1
            ORDER BY ps.due_date ASC, ps.worker_id ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_transactions(schedules).await
    }

    pub async fn list_for_worker(&self, worker_id: Uuid) -> Result<Vec<ScheduleEntry>> {
        self.sweep_overdue().await?;

        let schedules = sqlx::query_as::<_, PaymentSchedule>(
            "SELECT * FROM payment_schedules WHERE worker_id = $1 ORDER BY due_date ASC",
        )
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_transactions(schedules).await
    }

    /// Everything the employer owes across their jobs, oldest due first.
    pub async fn list_outgoing(
        &self,
        employer: &CurrentUser,
        job_id: Option<Uuid>,
    ) -> Result<Vec<ScheduleEntry>> {
        self.sweep_overdue().await?;

        let mut sql = String::from(
            "SELECT ps.* FROM payment_schedules ps \
             JOIN contracts c ON c.id = ps.contract_id \
             WHERE c.employer_id = $1",
        );
        if job_id.is_some() {
            sql.push_str(" AND c.post_id = $2");
        }
        sql.push_str(" ORDER BY ps.due_date ASC, ps.worker_id ASC");

        let mut query = sqlx::query_as::<_, PaymentSchedule>(&sql).bind(employer.id);
        if let Some(job_id) = job_id {
            query = query.bind(job_id);
        }
        let schedules = query.fetch_all(&self.pool).await?;

        self.attach_transactions(schedules).await
    }

    pub async fn get_transaction(
        &self,
        schedule_id: Uuid,
        user: &CurrentUser,
    ) -> Result<Option<PaymentTransaction>> {
        let schedule = sqlx::query_as::<_, PaymentSchedule>(
            "SELECT * FROM payment_schedules WHERE id = $1",
        )
        .bind(schedule_id)
        .fetch_one(&self.pool)
        .await?;
        let contract = self.load_contract(schedule.contract_id).await?;
        if contract.worker_id != user.id && contract.employer_id != user.id {
            return Err(Error::Forbidden(
                "not a party to this contract".to_string(),
            ));
        }

        let transaction = sqlx::query_as::<_, PaymentTransaction>(
            "SELECT * FROM payment_transactions WHERE schedule_id = $1",
        )
        .bind(schedule_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Employer reports a payment as sent, attaching proof. Re-sending an
    /// already SENT payment just refreshes the proof fields.
    pub async fn mark_sent(
        &self,
        schedule_id: Uuid,
        employer: &CurrentUser,
        payload: MarkSentPayload,
        notif: &NotificationService,
    ) -> Result<PaymentSchedule> {
        Self::validate_payment_details(
            &payload.payment_method,
            payload.reference_number.as_deref(),
        )?;

        let mut tx = self.pool.begin().await?;

        let schedule = Self::load_schedule_for_update(&mut tx, schedule_id).await?;
        let contract = Self::load_contract_in(&mut tx, schedule.contract_id).await?;
        if contract.employer_id != employer.id {
            return Err(Error::Forbidden(
                "only the employer can send payments".to_string(),
            ));
        }

        let resend = schedule.status == PaymentStatus::Sent;
        if !resend && !schedule.status.can_transition_to(PaymentStatus::Sent) {
            return Err(Error::IllegalTransition(format!(
                "payment in status {} cannot be marked sent",
                schedule.status
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO payment_transactions
                (id, schedule_id, amount_paid, payment_method, reference_number,
                 proof_url, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (schedule_id) DO UPDATE SET
                amount_paid = EXCLUDED.amount_paid,
                payment_method = EXCLUDED.payment_method,
                reference_number = EXCLUDED.reference_number,
                proof_url = EXCLUDED.proof_url,
                sent_at = NOW(),
                updated_at = NOW()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(schedule_id)
        .bind(payload.amount_paid.unwrap_or(schedule.amount))
        .bind(&payload.payment_method)
        .bind(&payload.reference_number)
        .bind(&payload.proof_url)
        .execute(&mut *tx)
        .await?;

        let schedule = sqlx::query_as::<_, PaymentSchedule>(
            "UPDATE payment_schedules SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(schedule_id)
        .bind(PaymentStatus::Sent)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        notif
            .notify(
                schedule.worker_id,
                NotificationKind::PaymentSent,
                "Payment sent",
                &format!("A payment of {} was sent for confirmation", schedule.amount),
                "payment_schedule",
                schedule.id,
            )
            .await;

        Ok(schedule)
    }

    /// Worker confirms receipt. Confirming twice is a no-op success. On a
    /// recurring job the next PENDING row is inserted here; on a plain
    /// long-term job full confirmation completes the job and its contracts.
    pub async fn confirm(
        &self,
        schedule_id: Uuid,
        worker: &CurrentUser,
        notif: &NotificationService,
    ) -> Result<PaymentSchedule> {
        let mut tx = self.pool.begin().await?;

        let schedule = Self::load_schedule_for_update(&mut tx, schedule_id).await?;
        if schedule.worker_id != worker.id {
            return Err(Error::Forbidden(
                "only the worker on this schedule can confirm".to_string(),
            ));
        }

        if schedule.status == PaymentStatus::Confirmed {
            tx.commit().await?;
            return Ok(schedule);
        }
        if schedule.status != PaymentStatus::Sent {
            return Err(Error::IllegalTransition(format!(
                "payment in status {} cannot be confirmed",
                schedule.status
            )));
        }

        let updated = sqlx::query(
            r#"
            UPDATE payment_transactions
            SET confirmed_at = NOW(), confirmed_by_worker = TRUE, updated_at = NOW()
            WHERE schedule_id = $1
            "#,
        )
        .bind(schedule_id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(Error::IllegalTransition(
                "payment has not been sent yet".to_string(),
            ));
        }

        let schedule = sqlx::query_as::<_, PaymentSchedule>(
            "UPDATE payment_schedules SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(schedule_id)
        .bind(PaymentStatus::Confirmed)
        .fetch_one(&mut *tx)
        .await?;

        let contract = Self::load_contract_in(&mut tx, schedule.contract_id).await?;
        let job = Self::load_job_in(&mut tx, contract.post_id).await?;

        if job.recurring_active() {
            self.extend_recurring(&mut tx, &job, &schedule).await?;
        } else if job.is_genuinely_longterm() && !job.is_recurring {
            // A recurring service never auto-completes, even after its
            // cadence was cancelled; the employer closes it explicitly.
            self.complete_when_fully_paid(&mut tx, &job).await?;
        }

        tx.commit().await?;

        notif
            .notify(
                job.employer_id,
                NotificationKind::PaymentReceived,
                "Payment confirmed",
                &format!("The worker confirmed a payment for \"{}\"", job.title),
                "payment_schedule",
                schedule.id,
            )
            .await;

        Ok(schedule)
    }

    /// Worker reports a problem with a recorded payment.
    pub async fn dispute(
        &self,
        schedule_id: Uuid,
        worker: &CurrentUser,
        payload: DisputePayload,
        notif: &NotificationService,
    ) -> Result<PaymentSchedule> {
        let mut tx = self.pool.begin().await?;

        let schedule = Self::load_schedule_for_update(&mut tx, schedule_id).await?;
        if schedule.worker_id != worker.id {
            return Err(Error::Forbidden(
                "only the worker on this schedule can dispute".to_string(),
            ));
        }
        if !schedule.status.can_transition_to(PaymentStatus::Disputed) {
            return Err(Error::IllegalTransition(format!(
                "payment in status {} cannot be disputed",
                schedule.status
            )));
        }

        let updated = sqlx::query(
            r#"
            UPDATE payment_transactions
            SET dispute_reason = $2, updated_at = NOW()
            WHERE schedule_id = $1
            "#,
        )
        .bind(schedule_id)
        .bind(&payload.reason)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(Error::BadRequest(
                "no recorded payment to dispute".to_string(),
            ));
        }

        let schedule = sqlx::query_as::<_, PaymentSchedule>(
            "UPDATE payment_schedules SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(schedule_id)
        .bind(PaymentStatus::Disputed)
        .fetch_one(&mut *tx)
        .await?;

        let contract = Self::load_contract_in(&mut tx, schedule.contract_id).await?;
        tx.commit().await?;

        notif
            .notify(
                contract.employer_id,
                NotificationKind::System,
                "Payment disputed",
                "A worker disputed a recorded payment",
                "payment_schedule",
                schedule.id,
            )
            .await;

        Ok(schedule)
    }

    /// Short-term settlement: one call records an already settled payment
    /// as a CONFIRMED schedule row plus its transaction. Once every engaged
    /// contract is paid the job completes.
    pub async fn record_short_term_payment(
        &self,
        contract_id: Uuid,
        employer: &CurrentUser,
        payload: RecordPaymentPayload,
        notif: &NotificationService,
    ) -> Result<PaymentSchedule> {
        Self::validate_payment_details(
            &payload.payment_method,
            payload.reference_number.as_deref(),
        )?;
        if payload.amount <= Decimal::ZERO {
            return Err(Error::BadRequest("amount must be positive".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let contract = sqlx::query_as::<_, Contract>(
            "SELECT * FROM contracts WHERE id = $1 FOR UPDATE",
        )
        .bind(contract_id)
        .fetch_one(&mut *tx)
        .await?;
        if contract.employer_id != employer.id {
            return Err(Error::Forbidden(
                "only the employer can record payments".to_string(),
            ));
        }
        if matches!(
            contract.status,
            ContractStatus::Pending | ContractStatus::Cancelled
        ) {
            return Err(Error::BadRequest(
                "contract is not engaged on this job".to_string(),
            ));
        }

        let job = Self::load_job_in(&mut tx, contract.post_id).await?;
        if job.is_genuinely_longterm() {
            return Err(Error::BadRequest(
                "long-term jobs are paid through their schedule".to_string(),
            ));
        }

        let schedule = sqlx::query_as::<_, PaymentSchedule>(
            r#"
            INSERT INTO payment_schedules
                (id, contract_id, worker_id, worker_name, due_date, amount, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (contract_id, due_date) DO UPDATE SET
                amount = EXCLUDED.amount,
                status = EXCLUDED.status,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(contract.id)
        .bind(contract.worker_id)
        .bind(contract.worker_name.as_deref())
        .bind(time::today())
        .bind(payload.amount)
        .bind(PaymentStatus::Confirmed)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO payment_transactions
                (id, schedule_id, amount_paid, payment_method, reference_number,
                 proof_url, sent_at, confirmed_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            ON CONFLICT (schedule_id) DO UPDATE SET
                amount_paid = EXCLUDED.amount_paid,
                payment_method = EXCLUDED.payment_method,
                reference_number = EXCLUDED.reference_number,
                proof_url = EXCLUDED.proof_url,
                sent_at = NOW(),
                confirmed_at = NOW(),
                updated_at = NOW()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(schedule.id)
        .bind(payload.amount)
        .bind(&payload.payment_method)
        .bind(&payload.reference_number)
        .bind(&payload.proof_url)
        .execute(&mut *tx)
        .await?;

        ContractService::record_payment_proof(&mut tx, contract.id, payload.proof_url.as_deref())
            .await?;

        let engaged = ContractService::load_engaged_for_job(&mut tx, job.id).await?;
        if ContractService::all_paid(&engaged) && job.status.can_transition_to(JobStatus::Completed)
        {
            sqlx::query(
                r#"
                UPDATE job_posts
                SET status = $2, completed_at = NOW(), updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(job.id)
            .bind(JobStatus::Completed)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                UPDATE contracts
                SET status = $2, completed_at = COALESCE(completed_at, NOW()), updated_at = NOW()
                WHERE post_id = $1 AND status NOT IN ('pending', 'cancelled')
                "#,
            )
            .bind(job.id)
            .bind(ContractStatus::Completed)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        notif
            .notify(
                contract.worker_id,
                NotificationKind::PaymentSent,
                "Payment recorded",
                &format!("A payment of {} was recorded for \"{}\"", payload.amount, job.title),
                "payment_schedule",
                schedule.id,
            )
            .await;

        Ok(schedule)
    }

    /// Flips every past-due PENDING row to OVERDUE. Runs ahead of the read
    /// paths; OVERDUE is derived state, not a transition anyone requests.
    async fn sweep_overdue(&self) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE payment_schedules SET status = $1, updated_at = NOW() WHERE status = $2 AND due_date < $3",
        )
        .bind(PaymentStatus::Overdue)
        .bind(PaymentStatus::Pending)
        .bind(time::today())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Inserts the follow-up PENDING row for an active recurring service.
    /// Skipped when the cadence has run past the job's end date or a live
    /// row already sits on the next date.
    async fn extend_recurring(
        &self,
        tx: &mut PgConnection,
        job: &JobPost,
        confirmed: &PaymentSchedule,
    ) -> Result<()> {
        let frequency = job
            .recurrence_frequency
            .or(job.payment_frequency)
            .unwrap_or(PaymentFrequency::Weekly);

        let Some(next_due) =
            ScheduleService::recurring_follow_up(confirmed.due_date, frequency, job.end_date)
        else {
            return Ok(());
        };

        let live_row_exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM payment_schedules
                WHERE contract_id = $1 AND due_date = $2 AND status <> $3
            )
            "#,
        )
        .bind(confirmed.contract_id)
        .bind(next_due)
        .bind(PaymentStatus::Confirmed)
        .fetch_one(&mut *tx)
        .await?;
        if live_row_exists {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO payment_schedules
                (id, contract_id, worker_id, worker_name, due_date, amount, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (contract_id, due_date) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(confirmed.contract_id)
        .bind(confirmed.worker_id)
        .bind(confirmed.worker_name.as_deref())
        .bind(next_due)
        .bind(confirmed.amount)
        .bind(PaymentStatus::Pending)
        .execute(&mut *tx)
        .await?;

        Ok(())
    }

    /// Long-term payment completion rule: every schedule row under every
    /// contract of the job CONFIRMED, with at least one row present.
    async fn complete_when_fully_paid(&self, tx: &mut PgConnection, job: &JobPost) -> Result<()> {
        let (total, unconfirmed) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE ps.status <> $2)
            FROM payment_schedules ps
            JOIN contracts c ON c.id = ps.contract_id
            WHERE c.post_id = $1
            "#,
        )
        .bind(job.id)
        .bind(PaymentStatus::Confirmed)
        .fetch_one(&mut *tx)
        .await?;

        if total == 0 || unconfirmed > 0 {
            return Ok(());
        }
        if !job.status.can_transition_to(JobStatus::Completed) {
            return Ok(());
        }

        sqlx::query(
            r#"
            UPDATE job_posts
            SET status = $2, completed_at = NOW(), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(job.id)
        .bind(JobStatus::Completed)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE contracts
            SET status = $2, completed_at = COALESCE(completed_at, NOW()), updated_at = NOW()
            WHERE post_id = $1 AND status NOT IN ('pending', 'cancelled')
            "#,
        )
        .bind(job.id)
        .bind(ContractStatus::Completed)
        .execute(&mut *tx)
        .await?;

        Ok(())
    }

    /// Pairs schedule rows with their transactions in one extra query.
    async fn attach_transactions(
        &self,
        schedules: Vec<PaymentSchedule>,
    ) -> Result<Vec<ScheduleEntry>> {
        if schedules.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = schedules.iter().map(|s| s.id).collect();
        let transactions = sqlx::query_as::<_, PaymentTransaction>(
            "SELECT * FROM payment_transactions WHERE schedule_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_schedule: HashMap<Uuid, PaymentTransaction> = transactions
            .into_iter()
            .map(|t| (t.schedule_id, t))
            .collect();

        Ok(schedules
            .into_iter()
            .map(|schedule| {
                let transaction = by_schedule.remove(&schedule.id);
                ScheduleEntry {
                    schedule,
                    transaction,
                }
            })
            .collect())
    }

    async fn load_schedule_for_update(
        tx: &mut PgConnection,
        schedule_id: Uuid,
    ) -> Result<PaymentSchedule> {
        let schedule = sqlx::query_as::<_, PaymentSchedule>(
            "SELECT * FROM payment_schedules WHERE id = $1 FOR UPDATE",
        )
        .bind(schedule_id)
        .fetch_one(&mut *tx)
        .await?;

        Ok(schedule)
    }

    async fn load_contract_in(tx: &mut PgConnection, contract_id: Uuid) -> Result<Contract> {
        let contract = sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = $1")
            .bind(contract_id)
            .fetch_one(&mut *tx)
            .await?;

        Ok(contract)
    }

    async fn load_job_in(tx: &mut PgConnection, job_id: Uuid) -> Result<JobPost> {
        let job = sqlx::query_as::<_, JobPost>("SELECT * FROM job_posts WHERE id = $1")
            .bind(job_id)
            .fetch_one(&mut *tx)
            .await?;

        Ok(job)
    }

    async fn load_contract(&self, contract_id: Uuid) -> Result<Contract> {
        let contract = sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = $1")
            .bind(contract_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(contract)
    }

    async fn load_job(&self, job_id: Uuid) -> Result<JobPost> {
        let job = sqlx::query_as::<_, JobPost>(
            "SELECT * FROM job_posts WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cash_payments_need_no_reference() {
        assert!(PaymentService::validate_payment_details("cash", None).is_ok());
        assert!(PaymentService::validate_payment_details("Cash", Some("")).is_ok());
    }

    #[test]
    fn electronic_payments_require_a_reference() {
        assert!(PaymentService::validate_payment_details("gcash", None).is_err());
        assert!(PaymentService::validate_payment_details("gcash", Some("  ")).is_err());
        assert!(PaymentService::validate_payment_details("gcash", Some("REF-123")).is_ok());
        assert!(PaymentService::validate_payment_details("bank_transfer", Some("TX99")).is_ok());
    }

    #[test]
    fn blank_method_is_rejected() {
        assert!(PaymentService::validate_payment_details("", Some("REF")).is_err());
        assert!(PaymentService::validate_payment_details("   ", None).is_err());
    }
}
