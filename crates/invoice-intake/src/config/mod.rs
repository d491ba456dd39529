pub mod loader;
pub mod schema;

pub use loader::{ensure_roots, load_config, load_config_from_str, ConfigLoader};
pub use schema::IntakeConfig;
