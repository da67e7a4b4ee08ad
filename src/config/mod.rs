pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::{
    load_api_configs, resolve_api_configs_path, resolve_settings_path, unique_targets,
};
pub use types::*;
