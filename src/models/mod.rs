pub mod application;
pub mod checkin;
pub mod contract;
pub mod conversation;
pub mod direct_hire;
pub mod job;
pub mod notification;
pub mod payment;
