use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::checkin_dto::CheckInPayload;
use crate::error::{Error, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::checkin::CheckIn;
use crate::models::contract::{Contract, ContractStatus};
use crate::utils::time;

/// Daily attendance records under an active contract.
#[derive(Clone)]
pub struct CheckinService {
    pool: PgPool,
}

impl CheckinService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records today's check-in for the worker. One per contract per day;
    /// a second attempt is rejected.
    pub async fn check_in(
        &self,
        contract: &Contract,
        worker: &CurrentUser,
        payload: CheckInPayload,
    ) -> Result<CheckIn> {
        if contract.worker_id != worker.id {
            return Err(Error::Forbidden(
                "only the contracted worker can check in".to_string(),
            ));
        }
        if contract.status != ContractStatus::Active {
            return Err(Error::BadRequest(format!(
                "contract in status {} does not take check-ins",
                contract.status
            )));
        }

        let inserted = sqlx::query_as::<_, CheckIn>(
            r#"
            INSERT INTO check_ins (id, contract_id, worker_id, check_in_date, notes, photo_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(contract.id)
        .bind(worker.id)
        .bind(time::today())
        .bind(&payload.notes)
        .bind(&payload.photo_url)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(check_in) => Ok(check_in),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(Error::BadRequest(
                "already checked in today".to_string(),
            )),
            Err(other) => Err(other.into()),
        }
    }

    pub async fn list_for_contract(
        &self,
        contract: &Contract,
        user: &CurrentUser,
    ) -> Result<Vec<CheckIn>> {
        if contract.worker_id != user.id && contract.employer_id != user.id {
            return Err(Error::Forbidden(
                "not a party to this contract".to_string(),
            ));
        }

        let check_ins = sqlx::query_as::<_, CheckIn>(
            "SELECT * FROM check_ins WHERE contract_id = $1 ORDER BY check_in_date DESC",
        )
        .bind(contract.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(check_ins)
    }
}
