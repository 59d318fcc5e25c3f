//! Side-effect analysis over token streams.

pub mod classifier;
pub mod recognizers;
pub mod reflection;

pub use classifier::SideEffectsDetector;
pub use reflection::{NoReflection, ReflectionFallback, ReturnTypeInfo, SignatureStub, SignatureTable};
