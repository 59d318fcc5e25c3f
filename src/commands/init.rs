use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = r#"# Side effects detector configuration

# Treat writes to standard output (echo, print, printf, ...) as harmless
ignore_output = false

# Section of .phpt files to analyze
phpt_section = "SKIPIF"

# Glob patterns for files to skip
ignore = [
    "vendor/**",
    "node_modules/**",
]

# Describe project functions the built-in table does not know.
# category is one of: scope_pollution, standard_output, input_output,
# process_exit, unknown_class
#
# [functions.my_logger]
# hasSideEffects = true
# category = "standard_output"
#
# [functions.my_pure_helper]
# hasSideEffects = false

# Declared return types for calls the table does not know.
# void and never mean the call is only useful for its effects.
#
# [[signatures]]
# name = "reset_state"
# returns = "void"
"#;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    write_default_config(&config_path, force)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);
    Ok(())
}

pub fn write_default_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(config_path, DEFAULT_CONFIG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_and_validate_config, SideEffectsConfig};
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = parse_and_validate_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.phpt_section, SideEffectsConfig::default().phpt_section);
        assert_eq!(config.ignore, vec!["vendor/**", "node_modules/**"]);
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "ignore_output = true\n").unwrap();

        assert!(write_default_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ignore_output = true\n");

        write_default_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
