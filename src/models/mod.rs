// Re-export all model types
pub use self::cafe::*;
pub use self::errors::*;
pub use self::validation::*;

mod cafe;
mod errors;
mod validation;
