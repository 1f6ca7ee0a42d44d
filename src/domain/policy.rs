use minijinja::UndefinedBehavior;
use serde::Deserialize;

/// What happens when a template references a name the environment lacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedPolicy {
    /// Any unbound reference is an error.
    #[default]
    Strict,
    /// Unbound references evaluate to null and print as empty text.
    DefaultEmpty,
}

impl UndefinedPolicy {
    pub fn is_strict(self) -> bool {
        matches!(self, UndefinedPolicy::Strict)
    }

    pub(crate) fn undefined_behavior(self) -> UndefinedBehavior {
        match self {
            UndefinedPolicy::Strict => UndefinedBehavior::Strict,
            UndefinedPolicy::DefaultEmpty => UndefinedBehavior::Chainable,
        }
    }
}
