// Repositories module - data access layer

pub mod cafe_repository;
pub mod database;
pub mod table_manager;


pub use cafe_repository::{CafeRepository, SqliteCafeRepository};
pub use database::create_pool;
pub use table_manager::{TableManager, CAFE_TABLE};
