use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::analyzers::{SideEffectsDetector, SignatureStub, SignatureTable};
use crate::core::{Error, Result};
use crate::knowledge::{FunctionEffects, FunctionEffectsTable};
use crate::sources::DEFAULT_PHPT_SECTION;

fn default_phpt_section() -> String {
    DEFAULT_PHPT_SECTION.to_string()
}

/// Root configuration structure, read from `.side-effects.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideEffectsConfig {
    /// Treat writes to standard output as harmless
    #[serde(default)]
    pub ignore_output: bool,

    /// Which `.phpt` section is analyzed
    #[serde(default = "default_phpt_section")]
    pub phpt_section: String,

    /// Glob patterns for files to skip while walking directories
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Extra or overriding function table entries
    #[serde(default)]
    pub functions: HashMap<String, FunctionEffects>,

    /// Declared signatures consulted for calls the table does not know
    #[serde(default)]
    pub signatures: Vec<SignatureStub>,
}

impl Default for SideEffectsConfig {
    fn default() -> Self {
        Self {
            ignore_output: false,
            phpt_section: default_phpt_section(),
            ignore: Vec::new(),
            functions: HashMap::new(),
            signatures: Vec::new(),
        }
    }
}

impl SideEffectsConfig {
    /// Check everything that deserialization alone cannot
    pub fn validate(&self) -> Result<()> {
        let section_ok = !self.phpt_section.is_empty()
            && self
                .phpt_section
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_');
        if !section_ok {
            return Err(Error::config(format!(
                "phpt_section `{}` must be an upper-case section name such as `SKIPIF`",
                self.phpt_section
            )));
        }

        for pattern in &self.ignore {
            glob::Pattern::new(pattern).map_err(|e| {
                Error::config(format!("invalid ignore pattern `{}`: {}", pattern, e))
            })?;
        }

        self.custom_functions()?;

        let mut seen = std::collections::HashSet::new();
        if let Some(duplicate) = self.signatures.iter().find(|s| !seen.insert(&s.name)) {
            return Err(Error::config(format!(
                "signature `{}` is declared more than once",
                duplicate.name
            )));
        }

        Ok(())
    }

    fn custom_functions(&self) -> Result<FunctionEffectsTable> {
        FunctionEffectsTable::from_entries(self.functions.clone())
            .map_err(|e| Error::config(format!("[functions] {}", e)))
    }

    /// The embedded table with this configuration's entries laid over it
    pub fn function_table(&self) -> Result<FunctionEffectsTable> {
        Ok(FunctionEffectsTable::builtin()?.merge(self.custom_functions()?))
    }

    pub fn build_detector(&self) -> Result<SideEffectsDetector> {
        let detector = SideEffectsDetector::with_table(self.function_table()?);
        if self.signatures.is_empty() {
            return Ok(detector);
        }
        let signatures = SignatureTable::new(self.signatures.iter().cloned());
        Ok(detector.with_reflection(Box::new(signatures)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SideEffect, Verdict};

    #[test]
    fn test_defaults() {
        let config = SideEffectsConfig::default();
        assert!(!config.ignore_output);
        assert_eq!(config.phpt_section, "SKIPIF");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lowercase_section_is_rejected() {
        let config = SideEffectsConfig {
            phpt_section: "skipif".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_bad_ignore_pattern_is_rejected() {
        let config = SideEffectsConfig {
            ignore: vec!["[".to_string()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("invalid ignore pattern"));
    }

    #[test]
    fn test_category_on_pure_function_is_a_config_error() {
        let mut config = SideEffectsConfig::default();
        config.functions.insert(
            "helper".to_string(),
            FunctionEffects {
                has_side_effects: false,
                category: Some(SideEffect::InputOutput),
            },
        );
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_duplicate_signatures_are_rejected() {
        let stub = SignatureStub {
            name: "f".to_string(),
            returns: None,
        };
        let config = SideEffectsConfig {
            signatures: vec![stub.clone(), stub],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_custom_functions_override_builtin_entries() {
        let mut config = SideEffectsConfig::default();
        config
            .functions
            .insert("strlen".to_string(), FunctionEffects::effectful(SideEffect::InputOutput));
        config
            .functions
            .insert("my_pure_helper".to_string(), FunctionEffects::pure());

        let detector = config.build_detector().unwrap();
        assert_eq!(
            detector.side_effects("<?php strlen('x');", false).as_slice(),
            &[SideEffect::InputOutput]
        );
        assert_eq!(
            detector.has_side_effects("<?php my_pure_helper();", false),
            Verdict::No
        );
        assert_eq!(
            detector.has_side_effects("<?php fopen('x');", false),
            Verdict::Yes
        );
    }

    #[test]
    fn test_signatures_feed_the_reflection_fallback() {
        let config = SideEffectsConfig {
            signatures: vec![SignatureStub {
                name: "get_name".to_string(),
                returns: Some("string".to_string()),
            }],
            ..Default::default()
        };
        let detector = config.build_detector().unwrap();
        assert_eq!(
            detector.has_side_effects("<?php get_name();", false),
            Verdict::No
        );
    }
}
