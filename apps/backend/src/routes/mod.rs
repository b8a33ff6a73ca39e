pub mod auth;
pub mod dashboard;
pub mod health;
pub mod reports;
pub mod sessions;
pub mod tags;
