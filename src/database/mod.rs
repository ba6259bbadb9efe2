pub mod postgres_repository;
pub mod task;
pub mod user;
