use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::direct_hire_dto::{
    CreateDirectHirePayload, DirectHireListQuery, HirePaymentPayload, SubmitHireCompletionPayload,
};
use crate::error::{Error, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::direct_hire::{DirectHire, DirectHireStatus};
use crate::models::job::RecurrenceStatus;
use crate::models::notification::NotificationKind;
use crate::services::conversation_service::ConversationService;
use crate::services::notification_service::NotificationService;
use crate::services::payment_service::PaymentService;

/// Single-worker bookings with a linear lifecycle: requested by the
/// employer, driven forward by the worker, closed out by payment.
#[derive(Clone)]
pub struct DirectHireService {
    pool: PgPool,
}

impl DirectHireService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        employer: &CurrentUser,
        payload: CreateDirectHirePayload,
        notif: &NotificationService,
    ) -> Result<DirectHire> {
        if payload.total_amount <= Decimal::ZERO {
            return Err(Error::BadRequest("total amount must be positive".to_string()));
        }
        if payload.worker_id == employer.id {
            return Err(Error::BadRequest("cannot book yourself".to_string()));
        }

        let recurring_status = if payload.is_recurring {
            Some(RecurrenceStatus::Active)
        } else {
            None
        };

        let hire = sqlx::query_as::<_, DirectHire>(
            r#"
            INSERT INTO direct_hires (
                id, employer_id, worker_id, package_ids, total_amount, status,
                scheduled_date, scheduled_time, special_instructions,
                is_recurring, recurrence_day_of_week, recurrence_start_time,
                recurrence_end_time, recurrence_frequency, recurring_status
            ) VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, $8, $9,
                $10, $11, $12,
                $13, $14, $15
            )
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(employer.id)
        .bind(payload.worker_id)
        .bind(sqlx::types::Json(payload.package_ids.clone()))
        .bind(payload.total_amount)
        .bind(DirectHireStatus::Pending)
        .bind(payload.scheduled_date)
        .bind(&payload.scheduled_time)
        .bind(&payload.special_instructions)
        .bind(payload.is_recurring)
        .bind(&payload.recurrence_day_of_week)
        .bind(&payload.recurrence_start_time)
        .bind(&payload.recurrence_end_time)
        .bind(payload.recurrence_frequency)
        .bind(recurring_status)
        .fetch_one(&self.pool)
        .await?;

        notif
            .notify(
                hire.worker_id,
                NotificationKind::DirectHireRequest,
                "New booking request",
                "An employer wants to book you directly",
                "direct_hire",
                hire.id,
            )
            .await;

        Ok(hire)
    }

    pub async fn get(&self, hire_id: Uuid, user: &CurrentUser) -> Result<DirectHire> {
        let hire = sqlx::query_as::<_, DirectHire>("SELECT * FROM direct_hires WHERE id = $1")
            .bind(hire_id)
            .fetch_one(&self.pool)
            .await?;
        if !hire.involves(user.id) {
            return Err(Error::Forbidden("not a party to this booking".to_string()));
        }

        Ok(hire)
    }

    pub async fn list_for_employer(
        &self,
        employer_id: Uuid,
        query: DirectHireListQuery,
    ) -> Result<Vec<DirectHire>> {
        self.list_by_party("employer_id", employer_id, query).await
    }

    pub async fn list_for_worker(
        &self,
        worker_id: Uuid,
        query: DirectHireListQuery,
    ) -> Result<Vec<DirectHire>> {
        self.list_by_party("worker_id", worker_id, query).await
    }

    /// Worker takes the booking. The conversation is opened in the same
    /// transaction so both parties can talk as soon as it is accepted.
    pub async fn accept(
        &self,
        hire_id: Uuid,
        worker: &CurrentUser,
        notif: &NotificationService,
    ) -> Result<DirectHire> {
        let mut tx = self.pool.begin().await?;

        let hire = Self::load_for_update(&mut tx, hire_id).await?;
        Self::ensure_worker(&hire, worker)?;
        Self::ensure_transition(&hire, DirectHireStatus::Accepted)?;

        let hire = Self::set_status(&mut tx, hire_id, DirectHireStatus::Accepted).await?;

        ConversationService::ensure_for_hire(&mut tx, hire_id, hire.employer_id, hire.worker_id)
            .await?;

        tx.commit().await?;

        notif
            .notify(
                hire.employer_id,
                NotificationKind::DirectHireAccepted,
                "Booking accepted",
                "The worker accepted your booking",
                "direct_hire",
                hire.id,
            )
            .await;

        Ok(hire)
    }

    pub async fn reject(
        &self,
        hire_id: Uuid,
        worker: &CurrentUser,
        notif: &NotificationService,
    ) -> Result<DirectHire> {
        let mut tx = self.pool.begin().await?;

        let hire = Self::load_for_update(&mut tx, hire_id).await?;
        Self::ensure_worker(&hire, worker)?;
        Self::ensure_transition(&hire, DirectHireStatus::Rejected)?;

        let hire = Self::set_status(&mut tx, hire_id, DirectHireStatus::Rejected).await?;
        tx.commit().await?;

        notif
            .notify(
                hire.employer_id,
                NotificationKind::DirectHireRejected,
                "Booking declined",
                "The worker declined your booking",
                "direct_hire",
                hire.id,
            )
            .await;

        Ok(hire)
    }

    /// Employer backs out. Possible only before the work starts.
    pub async fn cancel(
        &self,
        hire_id: Uuid,
        employer: &CurrentUser,
        notif: &NotificationService,
    ) -> Result<DirectHire> {
        let mut tx = self.pool.begin().await?;

        let hire = Self::load_for_update(&mut tx, hire_id).await?;
        Self::ensure_employer(&hire, employer)?;
        Self::ensure_transition(&hire, DirectHireStatus::Cancelled)?;

        let hire = sqlx::query_as::<_, DirectHire>(
            r#"
            UPDATE direct_hires
            SET status = $2, cancelled_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(hire_id)
        .bind(DirectHireStatus::Cancelled)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        notif
            .notify(
                hire.worker_id,
                NotificationKind::System,
                "Booking cancelled",
                "The employer cancelled the booking",
                "direct_hire",
                hire.id,
            )
            .await;

        Ok(hire)
    }

    pub async fn start(
        &self,
        hire_id: Uuid,
        worker: &CurrentUser,
        notif: &NotificationService,
    ) -> Result<DirectHire> {
        let mut tx = self.pool.begin().await?;

        let hire = Self::load_for_update(&mut tx, hire_id).await?;
        Self::ensure_worker(&hire, worker)?;
        Self::ensure_transition(&hire, DirectHireStatus::InProgress)?;

        let hire = Self::set_status(&mut tx, hire_id, DirectHireStatus::InProgress).await?;
        tx.commit().await?;

        notif
            .notify(
                hire.employer_id,
                NotificationKind::DirectHireStarted,
                "Work started",
                "The worker started the booked work",
                "direct_hire",
                hire.id,
            )
            .await;

        Ok(hire)
    }

    pub async fn submit_completion(
        &self,
        hire_id: Uuid,
        worker: &CurrentUser,
        payload: SubmitHireCompletionPayload,
        notif: &NotificationService,
    ) -> Result<DirectHire> {
        let mut tx = self.pool.begin().await?;

        let hire = Self::load_for_update(&mut tx, hire_id).await?;
        Self::ensure_worker(&hire, worker)?;
        Self::ensure_transition(&hire, DirectHireStatus::PendingCompletion)?;

        let hire = sqlx::query_as::<_, DirectHire>(
            r#"
            UPDATE direct_hires
            SET status = $2, completion_proof_url = $3, completion_notes = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(hire_id)
        .bind(DirectHireStatus::PendingCompletion)
        .bind(&payload.proof_url)
        .bind(&payload.notes)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        notif
            .notify(
                hire.employer_id,
                NotificationKind::DirectHireCompleted,
                "Completion submitted",
                "The worker reported the booking as finished",
                "direct_hire",
                hire.id,
            )
            .await;

        Ok(hire)
    }

    pub async fn approve_completion(
        &self,
        hire_id: Uuid,
        employer: &CurrentUser,
        notif: &NotificationService,
    ) -> Result<DirectHire> {
        let mut tx = self.pool.begin().await?;

        let hire = Self::load_for_update(&mut tx, hire_id).await?;
        Self::ensure_employer(&hire, employer)?;
        Self::ensure_transition(&hire, DirectHireStatus::Completed)?;

        let hire = sqlx::query_as::<_, DirectHire>(
            r#"
            UPDATE direct_hires
            SET status = $2, completed_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(hire_id)
        .bind(DirectHireStatus::Completed)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        notif
            .notify(
                hire.worker_id,
                NotificationKind::DirectHireApproved,
                "Completion approved",
                "The employer approved the finished booking",
                "direct_hire",
                hire.id,
            )
            .await;

        Ok(hire)
    }

    /// Employer settles an approved booking. Non-cash methods must carry a
    /// reference number.
    pub async fn submit_payment(
        &self,
        hire_id: Uuid,
        employer: &CurrentUser,
        payload: HirePaymentPayload,
        notif: &NotificationService,
    ) -> Result<DirectHire> {
        PaymentService::validate_payment_details(
            &payload.payment_method,
            payload.payment_reference.as_deref(),
        )?;

        let mut tx = self.pool.begin().await?;

        let hire = Self::load_for_update(&mut tx, hire_id).await?;
        Self::ensure_employer(&hire, employer)?;
        Self::ensure_transition(&hire, DirectHireStatus::Paid)?;

        let hire = sqlx::query_as::<_, DirectHire>(
            r#"
            UPDATE direct_hires
            SET status = $2, payment_method = $3, payment_reference = $4,
                payment_proof_url = $5, paid_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(hire_id)
        .bind(DirectHireStatus::Paid)
        .bind(&payload.payment_method)
        .bind(&payload.payment_reference)
        .bind(&payload.payment_proof_url)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        notif
            .notify(
                hire.worker_id,
                NotificationKind::DirectHirePaid,
                "Booking paid",
                "The employer paid for the booking",
                "direct_hire",
                hire.id,
            )
            .await;

        Ok(hire)
    }

    /// Worker-side finalization. Advances COMPLETED to PAID; anything else
    /// returns the booking unchanged, so either party may close out payment
    /// once the work is approved.
    pub async fn confirm_payment_received(
        &self,
        hire_id: Uuid,
        worker: &CurrentUser,
        notif: &NotificationService,
    ) -> Result<DirectHire> {
        let mut tx = self.pool.begin().await?;

        let hire = Self::load_for_update(&mut tx, hire_id).await?;
        Self::ensure_worker(&hire, worker)?;

        if hire.status != DirectHireStatus::Completed {
            tx.commit().await?;
            return Ok(hire);
        }

        let hire = sqlx::query_as::<_, DirectHire>(
            r#"
            UPDATE direct_hires
            SET status = $2, paid_at = COALESCE(paid_at, NOW()), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(hire_id)
        .bind(DirectHireStatus::Paid)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        notif
            .notify(
                hire.employer_id,
                NotificationKind::DirectHirePaid,
                "Payment confirmed",
                "The worker confirmed receiving payment",
                "direct_hire",
                hire.id,
            )
            .await;

        Ok(hire)
    }

    async fn list_by_party(
        &self,
        column: &str,
        user_id: Uuid,
        query: DirectHireListQuery,
    ) -> Result<Vec<DirectHire>> {
        let sql = match query.status {
            Some(_) => format!(
                "SELECT * FROM direct_hires WHERE {} = $1 AND status = $2 ORDER BY created_at DESC",
                column
            ),
            None => format!(
                "SELECT * FROM direct_hires WHERE {} = $1 ORDER BY created_at DESC",
                column
            ),
        };

        let mut statement = sqlx::query_as::<_, DirectHire>(&sql).bind(user_id);
        if let Some(status) = query.status {
            statement = statement.bind(status);
        }
        let hires = statement.fetch_all(&self.pool).await?;

        Ok(hires)
    }

    async fn load_for_update(tx: &mut PgConnection, hire_id: Uuid) -> Result<DirectHire> {
        let hire = sqlx::query_as::<_, DirectHire>(
            "SELECT * FROM direct_hires WHERE id = $1 FOR UPDATE",
        )
        .bind(hire_id)
        .fetch_one(&mut *tx)
        .await?;

        Ok(hire)
    }

    async fn set_status(
        tx: &mut PgConnection,
        hire_id: Uuid,
        status: DirectHireStatus,
    ) -> Result<DirectHire> {
        let hire = sqlx::query_as::<_, DirectHire>(
            "UPDATE direct_hires SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(hire_id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        Ok(hire)
    }

    fn ensure_worker(hire: &DirectHire, user: &CurrentUser) -> Result<()> {
        if hire.worker_id != user.id {
            return Err(Error::Forbidden(
                "only the booked worker can do this".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_employer(hire: &DirectHire, user: &CurrentUser) -> Result<()> {
        if hire.employer_id != user.id {
            return Err(Error::Forbidden(
                "only the booking employer can do this".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_transition(hire: &DirectHire, next: DirectHireStatus) -> Result<()> {
        if !hire.status.can_transition_to(next) {
            return Err(Error::IllegalTransition(format!(
                "direct hire in status {} cannot move to {}",
                hire.status, next
            )));
        }
        Ok(())
    }
}
