use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::Result;

/// Two-party messaging threads opened when an engagement is accepted.
/// Creation runs inside the caller's transaction so an accepted worker
/// never ends up without a thread.
pub struct ConversationService;

impl ConversationService {
    fn sorted_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Opens the thread between two parties on a job if none exists yet.
    /// Safe to call on every acceptance; the unique pair index absorbs races.
    pub async fn ensure_for_job(
        conn: &mut PgConnection,
        job_id: Uuid,
        employer_id: Uuid,
        worker_id: Uuid,
    ) -> Result<()> {
        let (one, two) = Self::sorted_pair(employer_id, worker_id);
        sqlx::query(
            r#"
            INSERT INTO conversations (id, job_id, participant_one, participant_two)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (job_id, participant_one, participant_two)
                WHERE job_id IS NOT NULL DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job_id)
        .bind(one)
        .bind(two)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Opens the thread for a direct hire if none exists yet.
    pub async fn ensure_for_hire(
        conn: &mut PgConnection,
        hire_id: Uuid,
        employer_id: Uuid,
        worker_id: Uuid,
    ) -> Result<()> {
        let (one, two) = Self::sorted_pair(employer_id, worker_id);
        sqlx::query(
            r#"
            INSERT INTO conversations (id, hire_id, participant_one, participant_two)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (hire_id) WHERE hire_id IS NOT NULL DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(hire_id)
        .bind(one)
        .bind(two)
        .execute(conn)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_order_is_deterministic() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(
            ConversationService::sorted_pair(a, b),
            ConversationService::sorted_pair(b, a)
        );
    }
}
