pub mod health_table;
pub mod utils;

pub use health_table::{HealthRecord, HealthTableRenderer};
