//! Configuration: `.side-effects.toml` discovery, parsing and validation.

mod core;
mod loader;

pub use core::SideEffectsConfig;
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
