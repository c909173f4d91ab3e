//! Output views returned by `serve`.
//!
//! - [`Namespaces`]: the convenience surface. Constants are plain values,
//!   constructible items are their default invoker.
//! - [`Registered`]: the raw registry, every named entry of every item.

use std::collections::HashMap;
use std::fmt;

use wirebox_support::rendering::{ListingEntry, render_listing};

use crate::error::Result;
use crate::invoker::Invoker;
use crate::key::InvokerKey;
use crate::registry::{InvokerMap, Lookup, SharedMap};
use crate::resolver::{Resolver, WeakLookup};
use crate::value::Value;

/// Raw view over the registry: `registered.<ns>.<item>.<entry>`.
///
/// Live: during registration it shows the partially built registry.
#[derive(Clone)]
pub struct Registered {
    map: SharedMap,
}

impl Registered {
    pub(crate) fn new(map: SharedMap) -> Self {
        Self { map }
    }

    /// The invoker of a named entry.
    pub fn entry(&self, namespace: &str, item: &str, entry: &str) -> Option<Invoker> {
        self.map.read().find(namespace, item, Some(entry)).cloned()
    }

    /// The default invoker of an item.
    pub fn default_entry(&self, namespace: &str, item: &str) -> Option<Invoker> {
        self.map.read().find(namespace, item, None).cloned()
    }

    /// Invokes a named entry; `Null` if there is none.
    pub fn call(&self, namespace: &str, item: &str, entry: &str, args: &[Value]) -> Result<Value> {
        match self.entry(namespace, item, entry) {
            Some(invoker) => invoker.invoke_with(&self.resolver(), args),
            None => Ok(Value::Null),
        }
    }

    /// Entry names of an item, sorted.
    pub fn entry_names(&self, namespace: &str, item: &str) -> Vec<String> {
        let map = self.map.read();
        map.entry_names(namespace, item)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// A detached copy of the registry, e.g. to seed another container.
    ///
    /// Invokers are shared with this registry, singleton caches included.
    pub fn snapshot(&self) -> InvokerMap {
        self.map.read().clone()
    }

    /// Number of mapped invokers.
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }

    /// Renders every entry with its lifecycle, one per line.
    pub fn describe(&self) -> String {
        let map = self.map.read();
        let entries: Vec<ListingEntry> = map
            .keys()
            .into_iter()
            .filter_map(|key| {
                map.get(&key).map(|invoker| ListingEntry {
                    key: key.to_string(),
                    lifecycle: invoker.lifecycle().to_string(),
                    implementation: Some(invoker.implementation().to_string()),
                })
            })
            .collect();
        render_listing(&entries)
    }

    pub(crate) fn map_invoker(&self, key: InvokerKey, invoker: Invoker) {
        self.map.write().map(key, invoker);
    }

    pub(crate) fn resolver(&self) -> Resolver {
        Resolver::new(self.map.clone())
    }

    pub(crate) fn shared(&self) -> SharedMap {
        self.map.clone()
    }

    pub(crate) fn weak_lookup(&self) -> WeakLookup {
        self.resolver().downgrade()
    }

    /// Binds every invoker already in the registry to it, e.g. after
    /// seeding from another container. Singleton caches are kept.
    pub(crate) fn rebind_all(&self) {
        let lookup = self.weak_lookup();
        self.map.write().rebind(&lookup);
    }
}

impl fmt::Debug for Registered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registered")
            .field("invokers", &self.len())
            .finish()
    }
}

/// What the convenience view exposes for one item.
#[derive(Debug, Clone)]
pub enum Export {
    /// A constant, passed through as is.
    Constant(Value),
    /// The default invoker of a constructible item.
    Invoker(Invoker),
}

impl Export {
    /// Calls the invoker, or returns the constant unchanged.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        match self {
            Export::Constant(value) => Ok(value.clone()),
            Export::Invoker(invoker) => invoker.invoke(args),
        }
    }

    /// Like [`call`](Export::call), resolving parameters through `lookup`.
    pub fn call_with(&self, lookup: &dyn Lookup, args: &[Value]) -> Result<Value> {
        match self {
            Export::Constant(value) => Ok(value.clone()),
            Export::Invoker(invoker) => invoker.invoke_with(lookup, args),
        }
    }

    pub fn as_constant(&self) -> Option<&Value> {
        match self {
            Export::Constant(value) => Some(value),
            Export::Invoker(_) => None,
        }
    }

    pub fn as_invoker(&self) -> Option<&Invoker> {
        match self {
            Export::Invoker(invoker) => Some(invoker),
            Export::Constant(_) => None,
        }
    }
}

/// Convenience view: `namespaces.<ns>.<item>`.
#[derive(Clone)]
pub struct Namespaces {
    namespaces: HashMap<String, HashMap<String, Export>>,
    // Lazily resolved parameters are looked up here.
    registry: SharedMap,
}

impl Namespaces {
    pub(crate) fn new(namespaces: HashMap<String, HashMap<String, Export>>, registry: SharedMap) -> Self {
        Self {
            namespaces,
            registry,
        }
    }

    /// The export of one item.
    pub fn get(&self, namespace: &str, item: &str) -> Option<&Export> {
        self.namespaces.get(namespace)?.get(item)
    }

    /// Calls an item: constants come back as is, constructible items go
    /// through their default invoker. `Null` if there is no such item.
    pub fn call(&self, namespace: &str, item: &str, args: &[Value]) -> Result<Value> {
        match self.get(namespace, item) {
            Some(export) => export.call_with(&Resolver::new(self.registry.clone()), args),
            None => Ok(Value::Null),
        }
    }

    /// Value of a constant item.
    pub fn constant(&self, namespace: &str, item: &str) -> Option<&Value> {
        self.get(namespace, item)?.as_constant()
    }

    /// Namespace names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.namespaces.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Item names of a namespace, sorted.
    pub fn item_names(&self, namespace: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .namespaces
            .get(namespace)
            .map(|items| items.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Namespaces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespaces")
            .field("names", &self.names())
            .finish()
    }
}

/// Everything `serve` hands back.
#[derive(Debug, Clone)]
pub struct Served {
    pub namespaces: Namespaces,
    pub registered: Registered,
}

impl Served {
    /// String-keyed lookup over the served registry.
    pub fn resolver(&self) -> Resolver {
        self.registered.resolver()
    }

    /// Shorthand for `self.resolver().resolve(key, args)`.
    pub fn resolve(&self, key: &str, args: &[Value]) -> Result<Value> {
        self.resolver().resolve(key, args)
    }
}
