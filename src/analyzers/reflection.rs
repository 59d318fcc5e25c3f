//! Reflection fallback
//!
//! Consulted when a call target is missing from the function effects
//! table. The detector only needs one fact about the callable: what its
//! declared return type says.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the host knows about a callable's declared return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnTypeInfo {
    /// Returns a value; assumed usable without forced side effects
    DeclaredNonVoid,
    /// `void` or `never`: it can only be useful through effects
    DeclaredVoid,
    /// Known callable without a return type declaration
    NoTypeDeclared,
    NotFound,
}

/// Injectable lookup of declared return types.
pub trait ReflectionFallback: Send + Sync {
    fn lookup(&self, name: &str) -> ReturnTypeInfo;
}

/// Default fallback: knows nothing, so every miss stays uncertain.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReflection;

impl ReflectionFallback for NoReflection {
    fn lookup(&self, _name: &str) -> ReturnTypeInfo {
        ReturnTypeInfo::NotFound
    }
}

/// A callable signature supplied as configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignatureStub {
    pub name: String,
    /// Declared return type; omitted when the callable has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
}

/// Fallback backed by user-provided signature stubs.
#[derive(Debug, Clone, Default)]
pub struct SignatureTable {
    signatures: HashMap<String, Option<String>>,
}

impl SignatureTable {
    pub fn new(stubs: impl IntoIterator<Item = SignatureStub>) -> Self {
        Self {
            signatures: stubs
                .into_iter()
                .map(|stub| (stub.name, stub.returns))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

fn is_void_equivalent(return_type: &str) -> bool {
    let normalized = return_type.trim();
    normalized.eq_ignore_ascii_case("void") || normalized.eq_ignore_ascii_case("never")
}

impl ReflectionFallback for SignatureTable {
    fn lookup(&self, name: &str) -> ReturnTypeInfo {
        match self.signatures.get(name) {
            None => ReturnTypeInfo::NotFound,
            Some(None) => ReturnTypeInfo::NoTypeDeclared,
            Some(Some(ty)) if ty.trim().is_empty() => ReturnTypeInfo::NoTypeDeclared,
            Some(Some(ty)) if is_void_equivalent(ty) => ReturnTypeInfo::DeclaredVoid,
            Some(Some(_)) => ReturnTypeInfo::DeclaredNonVoid,
        }
    }
}
