//! Namespace registrar.
//!
//! Two phases feed the registry:
//!
//! 1. **include**: [`Includer`] snapshots the items of every namespace the
//!    caller includes, naming unnamed ones `Namespace1`, `Namespace2`, …
//! 2. **register**: [`Registrations`] gives every item an automatic default
//!    entry (compiled up front, so any item can already be resolved), then
//!    lets the caller append entries item by item. Each item's new entries
//!    are compiled as soon as its callback returns.

use std::collections::HashMap;

use tracing::debug;

use crate::entry::{Entries, Entry};
use crate::error::{Result, WireboxError};
use crate::invoker::Invoker;
use crate::key::InvokerKey;
use crate::lifecycle::Lifecycle;
use crate::namespace::{Item, ItemImpl, Namespace};
use crate::resolver::Resolver;
use crate::views::{Export, Namespaces, Registered};

/// A namespace as captured at include time.
#[derive(Debug, Clone)]
pub(crate) struct IncludedNamespace {
    pub name: String,
    pub items: Vec<Item>,
}

/// Collects the namespaces of one `serve` call.
#[derive(Debug, Default)]
pub struct Includer {
    namespaces: Vec<IncludedNamespace>,
    counter: usize,
}

impl Includer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Includes a namespace under the next generated name
    /// (`Namespace1`, `Namespace2`, …).
    pub fn include<N: Namespace + ?Sized>(&mut self, namespace: &N) -> &mut Self {
        self.counter += 1;
        let name = format!("Namespace{}", self.counter);
        self.include_named(namespace, name)
    }

    /// Includes a namespace under `name`.
    ///
    /// Including the same name twice merges the item lists; a later item
    /// replaces an earlier one of the same name.
    pub fn include_named<N: Namespace + ?Sized>(
        &mut self,
        namespace: &N,
        name: impl Into<String>,
    ) -> &mut Self {
        let name = name.into();
        let items = namespace.items();
        debug!(namespace = %name, items = items.len(), "Including namespace");

        match self.namespaces.iter_mut().find(|ns| ns.name == name) {
            Some(existing) => {
                for item in items {
                    match existing.items.iter_mut().find(|i| i.name() == item.name()) {
                        Some(slot) => *slot = item,
                        None => existing.items.push(item),
                    }
                }
            }
            None => self.namespaces.push(IncludedNamespace { name, items }),
        }
        self
    }

    /// Names included so far, in include order.
    pub fn names(&self) -> Vec<&str> {
        self.namespaces.iter().map(|ns| ns.name.as_str()).collect()
    }

    pub(crate) fn finish(self) -> Vec<IncludedNamespace> {
        self.namespaces
    }
}

/// Registration state of one item.
#[derive(Debug)]
struct ItemRegistration {
    namespace: String,
    name: String,
    implementation: ItemImpl,
    entries: Entries,
    compiled: usize,
}

impl ItemRegistration {
    fn new(namespace: &str, item: Item, require_registration: bool) -> Self {
        let default_lifecycle = Lifecycle::default_for(require_registration);
        // Constants pass through whatever the mode.
        let seed = if item.implementation().is_constructible() {
            Entry::new(default_lifecycle)
        } else {
            Entry::new(Lifecycle::Singleton)
        };

        Self {
            namespace: namespace.to_string(),
            name: item.name().to_string(),
            implementation: item.implementation().clone(),
            entries: Entries::seeded(seed, default_lifecycle),
            compiled: 0,
        }
    }

    /// Compiles the entries added since the last call.
    fn compile_pending(&mut self, registered: &Registered) {
        for entry in self.entries.since(self.compiled) {
            let key = InvokerKey::with_entry(&self.namespace, &self.name, entry.name());
            if self.implementation.is_constructible() && !entry.lifecycle().is_set() {
                debug!(key = %key, "Entry has no lifecycle, invoking it fails");
            }
            let invoker = Invoker::build(&key, entry, &self.implementation, registered.weak_lookup());
            registered.map_invoker(key, invoker);
        }
        self.compiled = self.entries.len();
    }
}

/// The registrations tree handed to the register callback.
///
/// Address items with [`item`](Registrations::item) or register straight
/// away with [`register`](Registrations::register):
///
/// ```rust,ignore
/// registrations.register("Ns1", "ObjDef2", |entries, _registered, _resolver| {
///     entries.with_entry().singleton();
/// })?;
/// ```
pub struct Registrations {
    namespaces: Vec<(String, Vec<ItemRegistration>)>,
    registered: Registered,
    resolver: Resolver,
}

impl Registrations {
    pub(crate) fn new(
        included: Vec<IncludedNamespace>,
        registered: Registered,
        require_registration: bool,
    ) -> Self {
        let namespaces = included
            .into_iter()
            .map(|ns| {
                let items = ns
                    .items
                    .into_iter()
                    .map(|item| ItemRegistration::new(&ns.name, item, require_registration))
                    .collect();
                (ns.name, items)
            })
            .collect();

        Self {
            namespaces,
            resolver: registered.resolver(),
            registered,
        }
    }

    /// Compiles the automatic default entry of every item.
    pub(crate) fn compile_defaults(&mut self) {
        for (_, items) in &mut self.namespaces {
            for item in items {
                item.compile_pending(&self.registered);
            }
        }
    }

    /// The registration hook of one item, if it was included.
    pub fn item(&mut self, namespace: &str, item: &str) -> Option<ItemRegistrar<'_>> {
        let registration = self
            .namespaces
            .iter_mut()
            .find(|(name, _)| name == namespace)?
            .1
            .iter_mut()
            .find(|reg| reg.name == item)?;

        Some(ItemRegistrar {
            registration,
            registered: &self.registered,
            resolver: &self.resolver,
        })
    }

    /// Registers entries for an item.
    ///
    /// # Errors
    /// [`WireboxError::UnknownItem`] if no included namespace has the item.
    pub fn register<F>(&mut self, namespace: &str, item: &str, declare: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Entries, &Registered, &Resolver),
    {
        self.item(namespace, item)
            .ok_or_else(|| WireboxError::UnknownItem {
                namespace: namespace.to_string(),
                item: item.to_string(),
            })?
            .register(declare);
        Ok(self)
    }

    /// Included namespace names, in include order.
    pub fn namespace_names(&self) -> Vec<&str> {
        self.namespaces.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Item names of a namespace, in declaration order.
    pub fn item_names(&self, namespace: &str) -> Vec<&str> {
        self.namespaces
            .iter()
            .find(|(name, _)| name == namespace)
            .map(|(_, items)| items.iter().map(|i| i.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// The partially built registry.
    pub fn registered(&self) -> &Registered {
        &self.registered
    }

    /// Lookup over the partially built registry.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Builds the convenience view from the finished registry.
    pub(crate) fn project(&self) -> Namespaces {
        let mut namespaces: HashMap<String, HashMap<String, Export>> = HashMap::new();

        for (ns_name, items) in &self.namespaces {
            let exports = namespaces.entry(ns_name.clone()).or_default();
            for item in items {
                let export = match &item.implementation {
                    ItemImpl::Constant(value) => Some(Export::Constant(value.clone())),
                    ItemImpl::Constructible(_) => self
                        .registered
                        .default_entry(ns_name, &item.name)
                        .map(Export::Invoker),
                };
                if let Some(export) = export {
                    exports.insert(item.name.clone(), export);
                }
            }
        }

        Namespaces::new(namespaces, self.registered.shared())
    }
}

impl std::fmt::Debug for Registrations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registrations")
            .field("namespaces", &self.namespace_names())
            .finish()
    }
}

/// Registration hook of a single item.
pub struct ItemRegistrar<'a> {
    registration: &'a mut ItemRegistration,
    registered: &'a Registered,
    resolver: &'a Resolver,
}

impl ItemRegistrar<'_> {
    /// Runs `declare` to append entries, then compiles them.
    ///
    /// `declare` receives the item's entries, the partially built registry
    /// and a resolver over it; it may resolve other items to wire them in.
    /// An unnamed entry replaces the automatic default.
    pub fn register<F>(mut self, declare: F)
    where
        F: FnOnce(&mut Entries, &Registered, &Resolver),
    {
        let before = self.registration.entries.len();
        declare(&mut self.registration.entries, self.registered, self.resolver);

        let added = self.registration.entries.since(before);
        debug!(
            namespace = %self.registration.namespace,
            item = %self.registration.name,
            added = added.len(),
            unset = added.iter().filter(|e| !e.lifecycle().is_set()).count(),
            "Registered entries"
        );
        self.registration.compile_pending(self.registered);
    }

    pub fn namespace(&self) -> &str {
        &self.registration.namespace
    }

    pub fn name(&self) -> &str {
        &self.registration.name
    }

    pub fn is_constructible(&self) -> bool {
        self.registration.implementation.is_constructible()
    }
}
