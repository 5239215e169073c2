pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    checkin_service::CheckinService, contract_service::ContractService,
    direct_hire_service::DirectHireService, job_service::JobService,
    notification_service::NotificationService, payment_service::PaymentService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub job_service: JobService,
    pub contract_service: ContractService,
    pub payment_service: PaymentService,
    pub direct_hire_service: DirectHireService,
    pub checkin_service: CheckinService,
    pub notification_service: NotificationService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let job_service = JobService::new(pool.clone());
        let contract_service = ContractService::new(pool.clone());
        let payment_service = PaymentService::new(pool.clone());
        let direct_hire_service = DirectHireService::new(pool.clone());
        let checkin_service = CheckinService::new(pool.clone());
        let notification_service = NotificationService::new(pool.clone());

        Self {
            pool,
            job_service,
            contract_service,
            payment_service,
            direct_hire_service,
            checkin_service,
            notification_service,
        }
    }
}
