// Services module - business logic layer

pub mod cafe_service;
pub mod credentials;

pub use cafe_service::CafeService;
pub use credentials::ApiKey;
