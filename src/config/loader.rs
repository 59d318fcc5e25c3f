use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::SideEffectsConfig;
use crate::core::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".side-effects.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<SideEffectsConfig> {
    let config = toml::from_str::<SideEffectsConfig>(contents)
        .map_err(|e| Error::config(format!("failed to parse {}: {}", CONFIG_FILE_NAME, e)))?;
    config.validate()?;
    Ok(config)
}

/// Load one specific file; a missing file is an error here
pub fn load_config_from_path(config_path: &Path) -> Result<SideEffectsConfig> {
    let contents = read_config_file(config_path).map_err(|e| Error::io(config_path, e))?;

    let config = parse_and_validate_config(&contents).map_err(|e| match e {
        Error::Config { message, .. } => Error::config_at(message, config_path),
        other => other,
    })?;
    log::debug!("Loaded config from {}", config_path.display());
    Ok(config)
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Nearest config file at or above `start`
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
}

/// Search upwards from `start`, falling back to defaults when nothing is found
pub fn load_config_from(start: &Path) -> Result<SideEffectsConfig> {
    match discover_config(start) {
        Some(path) => load_config_from_path(&path),
        None => {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            Ok(SideEffectsConfig::default())
        }
    }
}

/// Explicit path if given, otherwise discovery from the working directory
pub fn load_config(explicit: Option<&Path>) -> Result<SideEffectsConfig> {
    if let Some(path) = explicit {
        return load_config_from_path(path);
    }

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return Ok(SideEffectsConfig::default());
        }
    };
    load_config_from(&current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_ancestors_stops_at_depth() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 3).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/a/b/c/d"),
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b")
            ]
        );
    }

    #[test]
    fn test_directory_ancestors_ends_at_root() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a"), 10).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a"), PathBuf::from("/")]);
    }

    #[test]
    fn test_parse_empty_config_gives_defaults() {
        assert_eq!(
            parse_and_validate_config("").unwrap(),
            SideEffectsConfig::default()
        );
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = parse_and_validate_config("ignore_outptu = true").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
