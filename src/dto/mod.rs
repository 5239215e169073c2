pub mod checkin_dto;
pub mod direct_hire_dto;
pub mod job_dto;
pub mod notification_dto;
pub mod payment_dto;
