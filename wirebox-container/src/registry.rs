//! Invoker registry, the table behind every lookup.
//!
//! [`InvokerMap`] maps `namespace → item → entry` to an [`Invoker`]. It is
//! populated while a container serves and is only read afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::invoker::Invoker;
use crate::key::{DEFAULT_ENTRY, InvokerKey};

/// Registry shared between the views, the resolver and (weakly) invokers.
pub(crate) type SharedMap = Arc<RwLock<InvokerMap>>;

/// Read access to invokers by key.
///
/// This is what parameters consult when they resolve lazily. Implemented by
/// the container's registry handles; implement it yourself to resolve
/// parameters against anything else.
pub trait Lookup: Send + Sync {
    fn find(&self, key: &InvokerKey) -> Option<Invoker>;
}

type Entries = HashMap<String, Invoker>;

/// Maps `(namespace, item, entry)` to invokers.
///
/// Every item with at least one entry also has a [`DEFAULT_ENTRY`]: the one
/// registered under that name, or else the first entry registered for the
/// item.
///
/// # Examples
/// ```
/// use wirebox_container::invoker::Invoker;
/// use wirebox_container::key::InvokerKey;
/// use wirebox_container::registry::InvokerMap;
/// use wirebox_container::value::Value;
///
/// let mut map = InvokerMap::new();
/// map.map(InvokerKey::with_entry("Ns", "Item", "first"), Invoker::constant(Value::new(1i32)));
/// map.map(InvokerKey::with_entry("Ns", "Item", "second"), Invoker::constant(Value::new(2i32)));
///
/// let default = map.find("Ns", "Item", None).unwrap();
/// assert_eq!(default.invoke(&[]).unwrap().downcast_ref::<i32>(), Some(&1));
/// assert!(map.find("Ns", "Missing", None).is_none());
/// ```
#[derive(Clone, Default)]
pub struct InvokerMap {
    namespaces: HashMap<String, HashMap<String, Entries>>,
}

impl InvokerMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the invoker under `key`.
    ///
    /// The first non-default entry of an item that has no default yet is
    /// also installed as its default. An explicit default always overwrites.
    pub fn map(&mut self, key: InvokerKey, invoker: Invoker) {
        let entries = self
            .namespaces
            .entry(key.namespace().to_string())
            .or_default()
            .entry(key.item().to_string())
            .or_default();

        if !key.is_default() && !entries.contains_key(DEFAULT_ENTRY) {
            trace!(key = %key, "Using first entry as default");
            entries.insert(DEFAULT_ENTRY.to_string(), invoker.clone());
        }

        debug!(key = %key, lifecycle = %invoker.lifecycle(), "Mapped invoker");
        entries.insert(key.entry().to_string(), invoker);
    }

    /// Looks up an invoker; `entry` defaults to [`DEFAULT_ENTRY`].
    pub fn find(&self, namespace: &str, item: &str, entry: Option<&str>) -> Option<&Invoker> {
        self.namespaces
            .get(namespace)?
            .get(item)?
            .get(entry.unwrap_or(DEFAULT_ENTRY))
    }

    /// Looks up an invoker by key.
    pub fn get(&self, key: &InvokerKey) -> Option<&Invoker> {
        self.find(key.namespace(), key.item(), Some(key.entry()))
    }

    /// Returns the number of mapped invokers, default slots included.
    pub fn len(&self) -> usize {
        self.namespaces
            .values()
            .flat_map(HashMap::values)
            .map(HashMap::len)
            .sum()
    }

    /// Returns true if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<InvokerKey> {
        let mut keys: Vec<InvokerKey> = self
            .namespaces
            .iter()
            .flat_map(|(namespace, items)| {
                items.iter().flat_map(move |(item, entries)| {
                    entries
                        .keys()
                        .map(move |entry| InvokerKey::with_entry(namespace, item, entry))
                })
            })
            .collect();
        keys.sort();
        keys
    }

    /// Namespace names, sorted.
    pub fn namespace_names(&self) -> Vec<&str> {
        sorted(self.namespaces.keys())
    }

    /// Item names of a namespace, sorted.
    pub fn item_names(&self, namespace: &str) -> Vec<&str> {
        self.namespaces
            .get(namespace)
            .map(|items| sorted(items.keys()))
            .unwrap_or_default()
    }

    /// Rebinds every invoker to `lookup`, keeping bodies and caches.
    pub fn rebind<L: Lookup + Clone + 'static>(&mut self, lookup: &L) {
        for entries in self.namespaces.values_mut().flat_map(HashMap::values_mut) {
            for invoker in entries.values_mut() {
                *invoker = invoker.rebind(lookup.clone());
            }
        }
    }

    /// Entry names of an item, sorted.
    pub fn entry_names(&self, namespace: &str, item: &str) -> Vec<&str> {
        self.namespaces
            .get(namespace)
            .and_then(|items| items.get(item))
            .map(|entries| sorted(entries.keys()))
            .unwrap_or_default()
    }
}

fn sorted<'a>(names: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut names: Vec<&str> = names.map(String::as_str).collect();
    names.sort_unstable();
    names
}

impl Lookup for InvokerMap {
    fn find(&self, key: &InvokerKey) -> Option<Invoker> {
        self.get(key).cloned()
    }
}

impl std::fmt::Debug for InvokerMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvokerMap")
            .field("namespaces", &self.namespaces.len())
            .field("invokers", &self.len())
            .finish()
    }
}
