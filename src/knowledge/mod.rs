//! Static knowledge base consulted at call sites.

pub mod function_table;

pub use function_table::{FunctionEffects, FunctionEffectsTable};
