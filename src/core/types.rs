//! Verdict and side-effect category types shared by the classifier,
//! the knowledge base and the report writers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a code fragment is considered to have side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideEffect {
    /// Mutates state outside the fragment's local scope
    ScopePollution,
    /// Writes to standard output
    StandardOutput,
    /// Touches files, sockets or processes
    InputOutput,
    /// Terminates the process
    ProcessExit,
    /// Effectful call whose exact effect is not classified
    UnknownClass,
    /// A call target could not be resolved
    Maybe,
}

impl SideEffect {
    pub const ALL: [SideEffect; 6] = [
        SideEffect::ScopePollution,
        SideEffect::StandardOutput,
        SideEffect::InputOutput,
        SideEffect::ProcessExit,
        SideEffect::UnknownClass,
        SideEffect::Maybe,
    ];

    /// Stable tag used in reports and configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScopePollution => "scope_pollution",
            Self::StandardOutput => "standard_output",
            Self::InputOutput => "input_output",
            Self::ProcessExit => "process_exit",
            Self::UnknownClass => "unknown_class",
            Self::Maybe => "maybe",
        }
    }

    /// Get a concise description for terminal display
    pub fn description(&self) -> &'static str {
        match self {
            Self::ScopePollution => "pollutes scope or global state",
            Self::StandardOutput => "writes to standard output",
            Self::InputOutput => "performs input/output",
            Self::ProcessExit => "may terminate the process",
            Self::UnknownClass => "has side effects of unknown kind",
            Self::Maybe => "calls code that could not be resolved",
        }
    }

    /// `Maybe` is the only category that does not prove an effect
    pub fn is_definite(&self) -> bool {
        !matches!(self, Self::Maybe)
    }
}

impl fmt::Display for SideEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tri-state outcome of a scan.
///
/// Ordering is total: `No < Unknown < Yes`, so the verdict of a stream is
/// the maximum over everything it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    No,
    Unknown,
    Yes,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Unknown => "unknown",
            Self::Yes => "yes",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insertion-ordered, deduplicated set of side-effect categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SideEffectSet {
    effects: Vec<SideEffect>,
}

impl SideEffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a category; returns false when it was already present
    pub fn insert(&mut self, effect: SideEffect) -> bool {
        if self.effects.contains(&effect) {
            return false;
        }
        self.effects.push(effect);
        true
    }

    pub fn contains(&self, effect: SideEffect) -> bool {
        self.effects.contains(&effect)
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = SideEffect> + '_ {
        self.effects.iter().copied()
    }

    pub fn as_slice(&self) -> &[SideEffect] {
        &self.effects
    }

    /// Whether any category other than `Maybe` was recorded
    pub fn has_definite(&self) -> bool {
        self.effects.iter().any(SideEffect::is_definite)
    }

    /// Project the category set onto the tri-state verdict
    pub fn verdict(&self) -> Verdict {
        if self.has_definite() {
            Verdict::Yes
        } else if self.contains(SideEffect::Maybe) {
            Verdict::Unknown
        } else {
            Verdict::No
        }
    }
}

impl FromIterator<SideEffect> for SideEffectSet {
    fn from_iter<I: IntoIterator<Item = SideEffect>>(iter: I) -> Self {
        let mut set = Self::new();
        for effect in iter {
            set.insert(effect);
        }
        set
    }
}

impl<'a> IntoIterator for &'a SideEffectSet {
    type Item = &'a SideEffect;
    type IntoIter = std::slice::Iter<'a, SideEffect>;

    fn into_iter(self) -> Self::IntoIter {
        self.effects.iter()
    }
}
