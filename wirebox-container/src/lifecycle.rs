//! Entry lifecycle kinds.
//!
//! A lifecycle decides what an invoker does when it is called:
//! - [`Lifecycle::Singleton`]: build once, then hand out the cached instance
//! - [`Lifecycle::PerDependency`]: build a new instance on every call
//! - [`Lifecycle::NotSet`]: fail with `NotRegistered` on every call
use std::fmt;

/// Defines how an entry's invoker produces instances.
///
/// # Examples
/// ```
/// use wirebox_container::lifecycle::Lifecycle;
///
/// assert_eq!(Lifecycle::default_for(false), Lifecycle::PerDependency);
/// assert_eq!(Lifecycle::default_for(true), Lifecycle::NotSet);
/// assert!(!Lifecycle::NotSet.is_set());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// One instance per invoker.
    ///
    /// Built on the first call with that call's arguments; every later call
    /// returns the same instance and its arguments are ignored.
    Singleton,

    /// New instance on every call.
    ///
    /// The default for entries that never declared a lifecycle, unless the
    /// container requires explicit registration.
    PerDependency,

    /// No lifecycle was declared while the container requires one.
    ///
    /// Invoking such an entry always fails with `NotRegistered`.
    NotSet,
}

impl Lifecycle {
    /// Lifecycle given to entries that do not declare one.
    #[inline]
    pub fn default_for(require_registration: bool) -> Self {
        if require_registration {
            Lifecycle::NotSet
        } else {
            Lifecycle::PerDependency
        }
    }

    /// Returns `true` if invokers of this lifecycle can produce anything.
    #[inline]
    pub fn is_set(&self) -> bool {
        !matches!(self, Lifecycle::NotSet)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Singleton => write!(f, "Singleton"),
            Lifecycle::PerDependency => write!(f, "PerDependency"),
            Lifecycle::NotSet => write!(f, "NotSet"),
        }
    }
}
