pub mod checkins;
pub mod direct_hire;
pub mod health;
pub mod jobs;
pub mod notifications;
pub mod payments;
