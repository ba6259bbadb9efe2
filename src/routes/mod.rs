pub mod error;
pub mod health;
pub mod task;
pub mod user;
