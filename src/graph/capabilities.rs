//! Capability introspection for graph variants

use serde::{Deserialize, Serialize};

/// What a concrete graph supports. Callers check this before attempting
/// operations that restricted views reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// `add` may succeed
    pub add_allowed: bool,
    /// `delete` may succeed
    pub delete_allowed: bool,
    /// `size` is exact rather than a lower bound
    pub size_accurate: bool,
    /// The graph can ever be empty
    pub can_be_empty: bool,
    /// Literal positions match by value rather than by label
    pub handles_literal_typing: bool,
}

impl Capabilities {
    /// Capabilities of a fully mutable in-memory graph
    pub fn all() -> Self {
        Self {
            add_allowed: true,
            delete_allowed: true,
            size_accurate: true,
            can_be_empty: true,
            handles_literal_typing: true,
        }
    }

    /// Same capabilities with mutation switched off
    pub fn read_only(self) -> Self {
        Self {
            add_allowed: false,
            delete_allowed: false,
            ..self
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}
