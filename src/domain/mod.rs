pub mod error;
pub mod financing;
pub mod models;
pub mod repository;
pub mod user;
