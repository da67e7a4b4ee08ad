pub mod debug_logger;
pub mod health;

pub use debug_logger::{get_debug_logger, EnhancedDebugLogger};
