//! Function effects table
//!
//! Static knowledge about which callables have side effects. The default
//! table ships inside the binary; configuration can add or override
//! entries. Lookups never fail: a miss simply means "unknown".

use crate::core::{Error, Result, SideEffect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const BUILTIN_METADATA: &str = include_str!("../../data/function_metadata.json");

/// What the table knows about one callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionEffects {
    #[serde(rename = "hasSideEffects", alias = "has_side_effects")]
    pub has_side_effects: bool,
    /// Refines an effectful entry; absent means `UnknownClass`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<SideEffect>,
}

impl FunctionEffects {
    pub fn pure() -> Self {
        Self {
            has_side_effects: false,
            category: None,
        }
    }

    pub fn effectful(category: SideEffect) -> Self {
        Self {
            has_side_effects: true,
            category: Some(category),
        }
    }

    /// The category a call contributes, `None` for side-effect free callables
    pub fn side_effect(&self) -> Option<SideEffect> {
        self.has_side_effects
            .then(|| self.category.unwrap_or(SideEffect::UnknownClass))
    }

    fn validate(&self, name: &str) -> std::result::Result<(), String> {
        match (self.has_side_effects, self.category) {
            (false, Some(category)) => Err(format!(
                "`{}` has no side effects but declares category `{}`",
                name, category
            )),
            (true, Some(SideEffect::Maybe)) => Err(format!(
                "`{}` cannot use `maybe`: table entries are definite",
                name
            )),
            _ => Ok(()),
        }
    }
}

/// Immutable-after-construction mapping from callable name to known effects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionEffectsTable {
    entries: HashMap<String, FunctionEffects>,
}

impl FunctionEffectsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table embedded in the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_METADATA)
    }

    /// Parse a JSON object of `name -> {"hasSideEffects": bool, "category"?: tag}`
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: HashMap<String, FunctionEffects> = serde_json::from_str(json)
            .map_err(|e| Error::function_table("could not parse function metadata", e))?;
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: HashMap<String, FunctionEffects>) -> Result<Self> {
        validate_entries(&entries)?;
        Ok(Self { entries })
    }

    /// Overlay `other` on top of this table; its entries win
    pub fn merge(mut self, other: FunctionEffectsTable) -> Self {
        self.entries.extend(other.entries);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FunctionEffects> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_entries(entries: &HashMap<String, FunctionEffects>) -> Result<()> {
    let mut problems: Vec<String> = entries
        .iter()
        .filter_map(|(name, effects)| effects.validate(name).err())
        .collect();
    if problems.is_empty() {
        return Ok(());
    }
    problems.sort();
    Err(Error::invalid_function_entry(problems.join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_loads() {
        let table = FunctionEffectsTable::builtin().unwrap();
        assert!(table.len() > 100);
    }

    #[test]
    fn test_builtin_known_verdicts() {
        let table = FunctionEffectsTable::builtin().unwrap();
        let effect = |name: &str| table.get(name).and_then(FunctionEffects::side_effect);

        assert_eq!(effect("getenv"), None);
        assert_eq!(effect("strlen"), None);
        assert_eq!(effect("putenv"), Some(SideEffect::ScopePollution));
        assert_eq!(effect("class_exists"), Some(SideEffect::ScopePollution));
        assert_eq!(effect("printf"), Some(SideEffect::StandardOutput));
        assert_eq!(effect("fopen"), Some(SideEffect::InputOutput));
        assert_eq!(effect("unlink"), Some(SideEffect::InputOutput));
        assert_eq!(effect("trigger_error"), Some(SideEffect::UnknownClass));
        assert!(!table.contains("unknownFunction"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = FunctionEffectsTable::builtin().unwrap();
        assert!(table.contains("strlen"));
        assert!(!table.contains("STRLEN"));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = FunctionEffectsTable::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::FunctionTable { source: Some(_), .. }));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = FunctionEffectsTable::from_json(r#"{"f": {"hasSideEffects": true, "pure": 1}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_category_on_pure_entry_is_rejected() {
        let err = FunctionEffectsTable::from_json(
            r#"{"f": {"hasSideEffects": false, "category": "input_output"}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("`f` has no side effects"));
    }

    #[test]
    fn test_maybe_category_is_rejected() {
        let result =
            FunctionEffectsTable::from_json(r#"{"f": {"hasSideEffects": true, "category": "maybe"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_overrides_entries() {
        let base = FunctionEffectsTable::from_json(r#"{"a": {"hasSideEffects": false}}"#).unwrap();
        let overlay = FunctionEffectsTable::from_json(
            r#"{"a": {"hasSideEffects": true}, "b": {"hasSideEffects": false}}"#,
        )
        .unwrap();
        let merged = base.merge(overlay);

        assert_eq!(merged.len(), 2);
        assert_eq!(
            merged.get("a").and_then(FunctionEffects::side_effect),
            Some(SideEffect::UnknownClass)
        );
    }
}
