pub mod appointment_repository;
pub mod financing_repository;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod user_repository;
pub mod vehicle_repository;
