use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::Result;
use crate::models::contract::{Contract, ContractStatus};

/// Per-worker engagement records under a job post. Mutations take the
/// caller's transaction so application, selection, and completion writes
/// commit atomically with the job-level status change.
#[derive(Clone)]
pub struct ContractService {
    pool: PgPool,
}

impl ContractService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, contract_id: Uuid) -> Result<Contract> {
        let mut conn = self.pool.acquire().await?;
        let contract = sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = $1")
            .bind(contract_id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(contract)
    }

    pub async fn find_for_worker(&self, post_id: Uuid, worker_id: Uuid) -> Result<Option<Contract>> {
        let mut conn = self.pool.acquire().await?;
        Self::load_for_worker(&mut conn, post_id, worker_id).await
    }

    pub async fn list_for_job(&self, post_id: Uuid) -> Result<Vec<Contract>> {
        let mut conn = self.pool.acquire().await?;
        Self::load_for_job(&mut conn, post_id).await
    }

    /// New PENDING contract recorded together with the worker's application.
    /// The worker flag is set because applying is the worker's consent; the
    /// employer consents later by selecting the worker.
    pub async fn create_on_apply(
        conn: &mut PgConnection,
        post_id: Uuid,
        worker_id: Uuid,
        worker_name: Option<&str>,
        employer_id: Uuid,
    ) -> Result<Contract> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            INSERT INTO contracts
                (id, post_id, worker_id, worker_name, employer_id, status,
                 worker_accepted, employer_accepted)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, FALSE)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(post_id)
        .bind(worker_id)
        .bind(worker_name)
        .bind(employer_id)
        .bind(ContractStatus::Pending)
        .fetch_one(conn)
        .await?;

        Ok(contract)
    }

    pub async fn activate(conn: &mut PgConnection, contract_id: Uuid) -> Result<Contract> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            UPDATE contracts
            SET status = $2, employer_accepted = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(contract_id)
        .bind(ContractStatus::Active)
        .fetch_one(conn)
        .await?;

        Ok(contract)
    }

    pub async fn submit_completion(
        conn: &mut PgConnection,
        contract_id: Uuid,
        proof_url: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Contract> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            UPDATE contracts
            SET status = $2, completion_proof_url = $3, completion_notes = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(contract_id)
        .bind(ContractStatus::PendingCompletion)
        .bind(proof_url)
        .bind(notes)
        .fetch_one(conn)
        .await?;

        Ok(contract)
    }

    pub async fn mark_completed(conn: &mut PgConnection, contract_id: Uuid) -> Result<Contract> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            UPDATE contracts
            SET status = $2, completed_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(contract_id)
        .bind(ContractStatus::Completed)
        .fetch_one(conn)
        .await?;

        Ok(contract)
    }

    pub async fn record_payment_proof(
        conn: &mut PgConnection,
        contract_id: Uuid,
        proof_url: Option<&str>,
    ) -> Result<Contract> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            UPDATE contracts
            SET payment_proof_url = $2, paid_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(contract_id)
        .bind(proof_url)
        .fetch_one(conn)
        .await?;

        Ok(contract)
    }

    pub async fn load_for_job(conn: &mut PgConnection, post_id: Uuid) -> Result<Vec<Contract>> {
        let contracts = sqlx::query_as::<_, Contract>(
            "SELECT * FROM contracts WHERE post_id = $1 ORDER BY created_at ASC",
        )
        .bind(post_id)
        .fetch_all(conn)
        .await?;

        Ok(contracts)
    }

    /// Contracts that were actually activated at some point. Applications
    /// that were never selected, or were rejected, leave PENDING or
    /// CANCELLED contracts behind; those must not count toward completion.
    pub async fn load_engaged_for_job(
        conn: &mut PgConnection,
        post_id: Uuid,
    ) -> Result<Vec<Contract>> {
        let contracts = sqlx::query_as::<_, Contract>(
            r#"
            SELECT * FROM contracts
            WHERE post_id = $1 AND status NOT IN ('pending', 'cancelled')
            ORDER BY created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(conn)
        .await?;

        Ok(contracts)
    }

    pub async fn load_for_worker(
        conn: &mut PgConnection,
        post_id: Uuid,
        worker_id: Uuid,
    ) -> Result<Option<Contract>> {
        let contract = sqlx::query_as::<_, Contract>(
            "SELECT * FROM contracts WHERE post_id = $1 AND worker_id = $2",
        )
        .bind(post_id)
        .bind(worker_id)
        .fetch_optional(conn)
        .await?;

        Ok(contract)
    }

    /// Approval-path completion rule: a job finishes only when every one of
    /// its contracts has been individually approved.
    pub fn all_completed(contracts: &[Contract]) -> bool {
        !contracts.is_empty()
            && contracts
                .iter()
                .all(|c| c.status == ContractStatus::Completed)
    }

    /// Payment-path completion rule for short-term jobs: the job finishes
    /// once every contract carries a payment timestamp.
    pub fn all_paid(contracts: &[Contract]) -> bool {
        !contracts.is_empty() && contracts.iter().all(|c| c.paid_at.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn contract(status: ContractStatus, paid: bool) -> Contract {
        Contract {
            id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            worker_id: Uuid::new_v4(),
            worker_name: Some("Worker".into()),
            employer_id: Uuid::new_v4(),
            status,
            worker_accepted: true,
            employer_accepted: true,
            completion_proof_url: None,
            completion_notes: None,
            completed_at: None,
            payment_proof_url: None,
            paid_at: if paid { Some(Utc::now()) } else { None },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn approving_two_of_three_contracts_does_not_finish_the_job() {
        let contracts = vec![
            contract(ContractStatus::Completed, false),
            contract(ContractStatus::Completed, false),
            contract(ContractStatus::PendingCompletion, false),
        ];

        assert!(!ContractService::all_completed(&contracts));
    }

    #[test]
    fn all_contracts_approved_finishes_the_job() {
        let contracts = vec![
            contract(ContractStatus::Completed, false),
            contract(ContractStatus::Completed, false),
            contract(ContractStatus::Completed, false),
        ];

        assert!(ContractService::all_completed(&contracts));
    }

    #[test]
    fn jobs_without_contracts_never_aggregate_to_complete() {
        assert!(!ContractService::all_completed(&[]));
        assert!(!ContractService::all_paid(&[]));
    }

    #[test]
    fn payment_rule_needs_every_contract_paid() {
        let mut contracts = vec![
            contract(ContractStatus::Active, true),
            contract(ContractStatus::Active, false),
        ];
        assert!(!ContractService::all_paid(&contracts));

        contracts[1].paid_at = Some(Utc::now());
        assert!(ContractService::all_paid(&contracts));
    }
}
