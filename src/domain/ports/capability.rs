//! Optional capabilities of caller-provided protocols.

/// Answer of an optional hook on a data source or delegate.
///
/// `Unimplemented` means the caller never provided the hook; the gallery then
/// applies the documented fallback. It is distinct from an implemented hook
/// that answers "nothing" (`Implemented(None)`, `Implemented(false)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capability<T> {
    /// The hook is not provided.
    #[default]
    Unimplemented,
    /// The hook is provided and answered.
    Implemented(T),
}

impl<T> Capability<T> {
    /// Returns true when the hook is provided.
    #[must_use]
    pub const fn is_implemented(&self) -> bool {
        matches!(self, Self::Implemented(_))
    }

    /// The answer, if the hook is provided.
    #[must_use]
    pub fn implemented(self) -> Option<T> {
        match self {
            Self::Implemented(value) => Some(value),
            Self::Unimplemented => None,
        }
    }

    /// The answer, or `fallback` for a missing hook.
    #[must_use]
    pub fn unwrap_or(self, fallback: T) -> T {
        self.implemented().unwrap_or(fallback)
    }
}
