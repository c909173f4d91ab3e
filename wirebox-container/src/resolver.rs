//! String-keyed public lookup.
//!
//! [`Resolver`] answers `"namespace.item[.entry]"` lookups against the live
//! registry. A miss is never an error: it resolves to [`Value::Null`], and
//! is logged at `debug` level together with the closest registered keys.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{debug, enabled, trace, Level};
use wirebox_support::rendering::suggest_similar;

use crate::error::Result;
use crate::invoker::Invoker;
use crate::key::InvokerKey;
use crate::registry::{InvokerMap, Lookup, SharedMap};
use crate::value::Value;

/// Looks invokers up by dotted key and calls them.
///
/// Cloning is cheap; clones see the same registry.
#[derive(Clone)]
pub struct Resolver {
    map: SharedMap,
}

impl Resolver {
    pub(crate) fn new(map: SharedMap) -> Self {
        Self { map }
    }

    /// Resolves `key` and invokes it with `args`.
    ///
    /// `args` go through the same argument override as a direct call:
    /// they shadow the entry's declared parameters position by position.
    /// Returns [`Value::Null`] if nothing is registered under `key`.
    pub fn resolve(&self, key: &str, args: &[Value]) -> Result<Value> {
        match self.find(key) {
            Some(invoker) => {
                trace!(key, args = args.len(), "Resolving");
                invoker.invoke_with(self, args)
            }
            None => Ok(Value::Null),
        }
    }

    /// Finds the invoker registered under a dotted key.
    pub fn find(&self, key: &str) -> Option<Invoker> {
        let Some(parsed) = InvokerKey::parse(key) else {
            debug!(key, "Malformed lookup key");
            return None;
        };
        find_logged(&self.map.read(), &parsed)
    }

    pub(crate) fn downgrade(&self) -> WeakLookup {
        WeakLookup {
            map: Arc::downgrade(&self.map),
        }
    }
}

impl Lookup for Resolver {
    fn find(&self, key: &InvokerKey) -> Option<Invoker> {
        find_logged(&self.map.read(), key)
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("registry", &*self.map.read())
            .finish()
    }
}

/// Registry handle captured by invokers.
///
/// Weak so that the registry, which owns the invokers, is not kept alive by
/// them. Once every strong handle is gone, lookups miss.
#[derive(Clone)]
pub(crate) struct WeakLookup {
    map: Weak<RwLock<InvokerMap>>,
}

impl Lookup for WeakLookup {
    fn find(&self, key: &InvokerKey) -> Option<Invoker> {
        let map = self.map.upgrade()?;
        find_logged(&map.read(), key)
    }
}

// The read guard is released before the invoker runs, so nested lookups
// never hold the lock.
fn find_logged(map: &InvokerMap, key: &InvokerKey) -> Option<Invoker> {
    let found = map.get(key).cloned();
    if found.is_none() && enabled!(Level::DEBUG) {
        let known: Vec<String> = map.keys().iter().map(ToString::to_string).collect();
        let known: Vec<&str> = known.iter().map(String::as_str).collect();
        let suggestions = suggest_similar(&key.to_string(), &known, 3);
        debug!(key = %key, ?suggestions, "Lookup miss, resolving to null");
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Lifecycle;

    fn resolver_with(entries: &[(&str, i32)]) -> Resolver {
        let mut map = InvokerMap::new();
        for &(dotted, value) in entries {
            map.map(
                InvokerKey::parse(dotted).unwrap(),
                Invoker::new(Lifecycle::PerDependency, "Adder", move |args| {
                    let extra = args.first().and_then(|v| v.downcast_ref::<i32>()).copied();
                    Ok(Value::new(value + extra.unwrap_or(0)))
                }),
            );
        }
        Resolver::new(Arc::new(RwLock::new(map)))
    }

    #[test]
    fn resolve_default_and_named() {
        let resolver = resolver_with(&[("Ns.Item", 1), ("Ns.Item.named", 2)]);
        let value = resolver.resolve("Ns.Item", &[]).unwrap();
        assert_eq!(value.downcast_ref::<i32>(), Some(&1));
        let value = resolver.resolve("Ns.Item.named", &[]).unwrap();
        assert_eq!(value.downcast_ref::<i32>(), Some(&2));
    }

    #[test]
    fn resolve_forwards_args() {
        let resolver = resolver_with(&[("Ns.Item", 1)]);
        let value = resolver.resolve("Ns.Item", &[Value::new(41i32)]).unwrap();
        assert_eq!(value.downcast_ref::<i32>(), Some(&42));
    }

    #[test]
    fn miss_is_null_not_error() {
        let resolver = resolver_with(&[("Ns.Item", 1)]);
        assert!(resolver.resolve("Ns.MissingItem", &[]).unwrap().is_null());
        assert!(resolver.resolve("Missing.Item", &[]).unwrap().is_null());
        assert!(resolver.resolve("Ns.Item.missing", &[]).unwrap().is_null());
        assert!(resolver.resolve("bad", &[]).unwrap().is_null());
        assert!(resolver.find("a.b.c.d").is_none());
    }

    #[test]
    fn miss_logging_does_not_panic() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let resolver = resolver_with(&[("Ns.Item", 1)]);
            assert!(resolver.resolve("Ns.Itme", &[]).unwrap().is_null());
        });
    }

    #[test]
    fn weak_lookup_misses_after_drop() {
        let resolver = resolver_with(&[("Ns.Item", 1)]);
        let weak = resolver.downgrade();
        assert!(weak.find(&InvokerKey::new("Ns", "Item")).is_some());

        drop(resolver);
        assert!(weak.find(&InvokerKey::new("Ns", "Item")).is_none());
    }
}
