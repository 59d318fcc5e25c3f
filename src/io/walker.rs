use crate::core::{Result, ResultExt};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Extensions of files that hold analyzable PHP
pub const PHP_EXTENSIONS: &[&str] = &["php", "phpt"];

pub struct FileWalker {
    root: PathBuf,
    extensions: Vec<String>,
    ignore_patterns: Vec<glob::Pattern>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            extensions: PHP_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            ignore_patterns: vec![],
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Glob patterns matched against each candidate path
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Result<Self> {
        self.ignore_patterns = patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<_, _>>()?;
        Ok(self)
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        if self.root.is_file() {
            // An explicitly named file is analyzed whatever its extension.
            return Ok(if self.is_ignored(&self.root) {
                vec![]
            } else {
                vec![self.root.clone()]
            });
        }

        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };
            let path = entry.path();

            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        let Some(ext) = path.extension() else {
            return false;
        };
        let ext = ext.to_string_lossy();
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) && !self.is_ignored(path)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.ignore_patterns
            .iter()
            .any(|p| p.matches_path(relative) || p.matches_path(path))
    }
}

/// Every PHP file below each of `roots`, in a stable order
pub fn find_php_files(roots: &[PathBuf], ignore_patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for root in roots {
        let found = FileWalker::new(root.clone())
            .with_ignore_patterns(ignore_patterns)
            .context(format!("walking {}", root.display()))?
            .walk()?;
        log::debug!("Found {} PHP files under {}", found.len(), root.display());
        files.extend(found);
    }
    files.sort();
    files.dedup();
    Ok(files)
}
