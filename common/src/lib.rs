pub mod cache;
pub mod config;
pub mod error;
pub mod types;
pub mod verify;

pub use cache::{CacheEntry, CacheSnapshot, CacheStats};
pub use config::*;
pub use error::{AppError, AppResult};
pub use types::*;
pub use verify::verify_by_longest_common_prefix;
