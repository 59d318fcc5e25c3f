//! CLI command implementations.
//!
//! - **analyze**: classify PHP files, `.phpt` sections or inline code
//! - **init**: write a default `.side-effects.toml`

pub mod analyze;
pub mod init;

pub use analyze::{handle_analyze, AnalyzeConfig};
pub use init::init_config;
