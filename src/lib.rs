// Export modules for library usage
pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod formatting;
pub mod io;
pub mod knowledge;
pub mod lexer;
pub mod sources;

// Re-export commonly used types
pub use crate::core::{Error, Result, SideEffect, SideEffectSet, Verdict};

pub use crate::analyzers::{
    NoReflection, ReflectionFallback, ReturnTypeInfo, SideEffectsDetector, SignatureStub,
    SignatureTable,
};

pub use crate::knowledge::{FunctionEffects, FunctionEffectsTable};

pub use crate::lexer::{tokenize, Token, TokenKind};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
