pub mod checkin_service;
pub mod contract_service;
pub mod conversation_service;
pub mod direct_hire_service;
pub mod job_service;
pub mod notification_service;
pub mod payment_service;
pub mod schedule_service;
