//! Named construction recipes.
//!
//! An [`Entry`] says how one registry slot of an item is built: its name,
//! its [`Lifecycle`] and the [`Parameter`]s that fill in constructor
//! arguments. Entries are declared fluently inside a registration callback:
//!
//! ```rust,ignore
//! entries
//!     .with_entry()
//!     .named("shouting")
//!     .singleton()
//!     .with_resolve_param("Widgets.Capitalizer")
//!     .with_value_param(Value::new("!"));
//! ```

use crate::key::DEFAULT_ENTRY;
use crate::lifecycle::Lifecycle;
use crate::parameter::{Parameter, WithParams};

/// One named construction recipe for an item.
#[derive(Debug, Clone)]
pub struct Entry {
    name: String,
    lifecycle: Lifecycle,
    parameters: Vec<Parameter>,
}

impl Entry {
    /// An unnamed entry (it targets the default slot) with `lifecycle`.
    pub fn new(lifecycle: Lifecycle) -> Self {
        Self {
            name: DEFAULT_ENTRY.to_string(),
            lifecycle,
            parameters: Vec::new(),
        }
    }

    pub fn named(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Build once, then reuse the first instance.
    pub fn singleton(&mut self) -> &mut Self {
        self.lifecycle = Lifecycle::Singleton;
        self
    }

    /// Build a new instance on every call.
    pub fn per_dependency(&mut self) -> &mut Self {
        self.lifecycle = Lifecycle::PerDependency;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

impl WithParams for Entry {
    fn parameters_mut(&mut self) -> &mut Vec<Parameter> {
        &mut self.parameters
    }
}

/// The entries declared for one item.
///
/// Starts with the automatic default entry; callbacks append to it with
/// [`with_entry`](Entries::with_entry).
#[derive(Debug, Clone)]
pub struct Entries {
    entries: Vec<Entry>,
    default_lifecycle: Lifecycle,
}

impl Entries {
    /// Entries for an item, seeded with its default entry.
    pub(crate) fn seeded(default: Entry, default_lifecycle: Lifecycle) -> Self {
        Self {
            entries: vec![default],
            default_lifecycle,
        }
    }

    /// Appends a new entry and returns it for configuration.
    ///
    /// The entry starts unnamed with the container's default lifecycle:
    /// per-dependency, or not-set when registration is required.
    pub fn with_entry(&mut self) -> &mut Entry {
        self.entries.push(Entry::new(self.default_lifecycle));
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub(crate) fn since(&self, start: usize) -> &[Entry] {
        &self.entries[start.min(self.entries.len())..]
    }
}

impl<'a> IntoIterator for &'a Entries {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn new_entry_targets_default() {
        let entry = Entry::new(Lifecycle::PerDependency);
        assert_eq!(entry.name(), DEFAULT_ENTRY);
        assert!(entry.parameters().is_empty());
    }

    #[test]
    fn fluent_configuration() {
        let mut entry = Entry::new(Lifecycle::NotSet);
        entry
            .named("fancy")
            .singleton()
            .with_value_param(Value::new(1i32))
            .with_resolve_param("Ns.Other")
            .with_array_param(|a| {
                a.with_resolve_param("Ns.A").with_resolve_param("Ns.B");
            });

        assert_eq!(entry.name(), "fancy");
        assert_eq!(entry.lifecycle(), Lifecycle::Singleton);
        assert_eq!(entry.parameters().len(), 3);
        assert!(matches!(entry.parameters()[1], Parameter::Resolve(ref k) if k == "Ns.Other"));
    }

    #[test]
    fn last_lifecycle_call_wins() {
        let mut entry = Entry::new(Lifecycle::NotSet);
        entry.singleton().per_dependency();
        assert_eq!(entry.lifecycle(), Lifecycle::PerDependency);
    }

    #[test]
    fn with_entry_uses_mode_default() {
        let mut entries = Entries::seeded(Entry::new(Lifecycle::NotSet), Lifecycle::NotSet);
        assert_eq!(entries.with_entry().lifecycle(), Lifecycle::NotSet);

        let mut relaxed = Entries::seeded(
            Entry::new(Lifecycle::PerDependency),
            Lifecycle::PerDependency,
        );
        assert_eq!(relaxed.with_entry().lifecycle(), Lifecycle::PerDependency);
    }

    #[test]
    fn since_returns_new_entries() {
        let mut entries = Entries::seeded(
            Entry::new(Lifecycle::PerDependency),
            Lifecycle::PerDependency,
        );
        entries.with_entry().named("a");
        entries.with_entry().named("b");

        let names: Vec<&str> = entries.since(1).iter().map(Entry::name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(entries.since(10).is_empty());
        assert_eq!(entries.len(), 3);
    }
}
