//! Side-effect classifier
//!
//! Walks a token stream once, left to right, and accumulates the
//! categories of side effects the fragment could have. Syntactic
//! recognizers run first; then the token kind itself decides, and plain
//! calls are resolved through the function effects table with a
//! reflection fallback for names the table does not know.

use super::recognizers;
use super::reflection::{NoReflection, ReflectionFallback, ReturnTypeInfo};
use crate::core::{Result, SideEffect, SideEffectSet, Verdict};
use crate::knowledge::FunctionEffectsTable;
use crate::lexer::{tokenize, Token, TokenEffect};
use std::sync::Arc;

/// Reusable, thread-safe side-effect detector.
#[derive(Clone)]
pub struct SideEffectsDetector {
    table: Arc<FunctionEffectsTable>,
    reflection: Arc<dyn ReflectionFallback>,
}

impl std::fmt::Debug for SideEffectsDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SideEffectsDetector")
            .field("table_entries", &self.table.len())
            .finish_non_exhaustive()
    }
}

/// When the scan may stop before reaching the end of the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanMode {
    Complete,
    UntilDefinite,
}

impl SideEffectsDetector {
    /// Detector backed by the embedded function table and no reflection
    pub fn new() -> Result<Self> {
        Ok(Self::with_table(FunctionEffectsTable::builtin()?))
    }

    pub fn with_table(table: FunctionEffectsTable) -> Self {
        Self {
            table: Arc::new(table),
            reflection: Arc::new(NoReflection),
        }
    }

    pub fn with_reflection(mut self, reflection: Box<dyn ReflectionFallback>) -> Self {
        self.reflection = Arc::from(reflection);
        self
    }

    pub fn table(&self) -> &FunctionEffectsTable {
        &self.table
    }

    /// Tri-state verdict for a token stream.
    ///
    /// Stops at the first definite category; the result always equals
    /// `classify_detailed(tokens, ignore_output).verdict()`.
    pub fn classify(&self, tokens: &[Token], ignore_output: bool) -> Verdict {
        self.scan(tokens, ignore_output, ScanMode::UntilDefinite)
            .verdict()
    }

    /// Every category the stream exhibits, in order of first occurrence
    pub fn classify_detailed(&self, tokens: &[Token], ignore_output: bool) -> SideEffectSet {
        self.scan(tokens, ignore_output, ScanMode::Complete)
    }

    pub fn has_side_effects(&self, code: &str, ignore_output: bool) -> Verdict {
        self.classify(&tokenize(code), ignore_output)
    }

    pub fn side_effects(&self, code: &str, ignore_output: bool) -> SideEffectSet {
        self.classify_detailed(&tokenize(code), ignore_output)
    }

    fn scan(&self, tokens: &[Token], ignore_output: bool, mode: ScanMode) -> SideEffectSet {
        let mut effects = SideEffectSet::new();
        let record = |effect: SideEffect, effects: &mut SideEffectSet| {
            if !(ignore_output && effect == SideEffect::StandardOutput) {
                effects.insert(effect);
            }
        };

        let mut index = 0;
        while index < tokens.len() {
            if let Some(end) = recognizers::attribute_group_end(tokens, index) {
                index = end + 1;
                continue;
            }

            if recognizers::is_anonymous_function(tokens, index) {
                // A closure literal defines nothing; its body is scanned as usual.
            } else if recognizers::is_method_call(tokens, index)
                || recognizers::is_member_call(tokens, index)
            {
                record(SideEffect::Maybe, &mut effects);
            } else if recognizers::is_non_local_variable(tokens, index)
                || recognizers::is_static_property_access(tokens, index)
            {
                record(SideEffect::ScopePollution, &mut effects);
            } else if recognizers::is_variable_call(tokens, index) {
                record(SideEffect::Maybe, &mut effects);
            } else {
                match tokens[index].kind.effect() {
                    TokenEffect::ScopePollution => record(SideEffect::ScopePollution, &mut effects),
                    TokenEffect::ScopePollutionMaybe => {
                        // `new` and `throw` may run constructors or autoloaders
                        record(SideEffect::ScopePollution, &mut effects);
                        record(SideEffect::Maybe, &mut effects);
                    }
                    TokenEffect::ProcessExit => record(SideEffect::ProcessExit, &mut effects),
                    TokenEffect::Output => record(SideEffect::StandardOutput, &mut effects),
                    TokenEffect::InputOutput => record(SideEffect::InputOutput, &mut effects),
                    TokenEffect::Inert => {
                        if let Some(name) = recognizers::function_call_at(tokens, index) {
                            if let Some(effect) = self.call_effect(name) {
                                record(effect, &mut effects);
                            }
                        }
                    }
                }
            }

            if mode == ScanMode::UntilDefinite && effects.has_definite() {
                break;
            }
            index += 1;
        }
        effects
    }

    /// Resolve a plain call: table first, then reflection
    fn call_effect(&self, name: &str) -> Option<SideEffect> {
        if let Some(entry) = self.table.get(name) {
            return entry.side_effect();
        }
        match self.reflection.lookup(name) {
            ReturnTypeInfo::DeclaredVoid => Some(SideEffect::UnknownClass),
            ReturnTypeInfo::DeclaredNonVoid => None,
            ReturnTypeInfo::NoTypeDeclared | ReturnTypeInfo::NotFound => {
                log::trace!("unresolved call to `{}`", name);
                Some(SideEffect::Maybe)
            }
        }
    }
}
