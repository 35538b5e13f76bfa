pub mod api;
pub mod health;
pub mod home;
pub mod metrics;
pub mod middleware;

pub use api::*;
pub use health::*;
pub use home::*;
pub use metrics::*;
pub use middleware::*;
