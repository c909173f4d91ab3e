//! Invokers and the lifecycle builder.
//!
//! An [`Invoker`] is what the registry stores per `(namespace, item, entry)`.
//! [`Invoker::build`] compiles an [`Entry`] of an item into one, choosing the
//! caching behaviour from the entry's [`Lifecycle`].

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use crate::arguments::override_args;
use crate::entry::Entry;
use crate::error::{NotRegisteredError, Result, WireboxError};
use crate::key::InvokerKey;
use crate::lifecycle::Lifecycle;
use crate::namespace::ItemImpl;
use crate::parameter::Parameter;
use crate::registry::Lookup;
use crate::value::Value;

/// Type-erased invoker body.
///
/// Receives the call-time arguments and the registry `Resolve` parameters
/// are looked up in.
pub type InvokeFn = dyn Fn(&[Value], &dyn Lookup) -> Result<Value> + Send + Sync;

/// A callable registry slot.
///
/// Cheap to clone; clones share the body and, for singletons, the cache.
/// Each handle carries the registry [`invoke`](Invoker::invoke) looks
/// parameters up in; [`rebind`](Invoker::rebind) swaps it without touching
/// the body.
#[derive(Clone)]
pub struct Invoker {
    func: Arc<InvokeFn>,
    lifecycle: Lifecycle,
    implementation: Arc<str>,
    lookup: Option<Arc<dyn Lookup>>,
}

impl Invoker {
    /// Wraps a raw invoker body that needs no lookups.
    pub fn new<F>(lifecycle: Lifecycle, implementation: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self::with_lookup(lifecycle, implementation, move |args, _| func(args))
    }

    /// Wraps a raw invoker body that resolves through the lookup it is
    /// handed at call time.
    pub fn with_lookup<F>(lifecycle: Lifecycle, implementation: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&[Value], &dyn Lookup) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            lifecycle,
            implementation: implementation.into(),
            lookup: None,
        }
    }

    /// Invoker that always returns `value`, ignoring arguments.
    pub fn constant(value: Value) -> Self {
        let implementation = value.type_name();
        Self::new(Lifecycle::Singleton, implementation, move |_| Ok(value.clone()))
    }

    /// Calls the invoker with call-time arguments, resolving parameters
    /// through the bound registry. Unbound invokers see every key as a miss.
    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        match &self.lookup {
            Some(lookup) => (self.func)(args, lookup.as_ref()),
            None => (self.func)(args, &Unbound),
        }
    }

    /// Calls the invoker, resolving parameters through `lookup`.
    pub fn invoke_with(&self, lookup: &dyn Lookup, args: &[Value]) -> Result<Value> {
        (self.func)(args, lookup)
    }

    /// A handle sharing this body and cache, bound to `lookup`.
    pub fn rebind<L: Lookup + 'static>(&self, lookup: L) -> Self {
        Self {
            lookup: Some(Arc::new(lookup)),
            ..self.clone()
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    /// Returns `true` if both handles share the same body (and cache).
    pub fn ptr_eq(&self, other: &Invoker) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }

    /// Compiles one entry of an item, bound to `lookup`.
    ///
    /// `lookup` is consulted lazily, every time a `Resolve` parameter is
    /// evaluated, never here.
    pub fn build<L>(key: &InvokerKey, entry: &Entry, implementation: &ItemImpl, lookup: L) -> Self
    where
        L: Lookup + 'static,
    {
        Self::compile(key, entry, implementation).rebind(lookup)
    }

    fn compile(key: &InvokerKey, entry: &Entry, implementation: &ItemImpl) -> Self {
        let factory = match implementation {
            ItemImpl::Constant(value) => return Self::constant(value.clone()),
            ItemImpl::Constructible(factory) => factory.clone(),
        };
        let name: Arc<str> = factory.name().into();
        let params: Arc<[Parameter]> = entry.parameters().into();

        debug!(
            key = %key,
            lifecycle = %entry.lifecycle(),
            params = params.len(),
            "Compiling entry"
        );

        match entry.lifecycle() {
            Lifecycle::PerDependency => Self::with_lookup(
                Lifecycle::PerDependency,
                name,
                move |call_args: &[Value], lookup: &dyn Lookup| {
                    let args = override_args(&params, call_args, lookup)?;
                    factory.construct(&args)
                },
            ),

            Lifecycle::Singleton => {
                let cell: Arc<OnceCell<Value>> = Arc::new(OnceCell::new());
                let key = key.clone();
                Self::with_lookup(
                    Lifecycle::Singleton,
                    name,
                    move |call_args: &[Value], lookup: &dyn Lookup| {
                        cell.get_or_try_init(|| {
                            trace!(key = %key, "Building singleton");
                            let args = override_args(&params, call_args, lookup)?;
                            factory.construct(&args)
                        })
                        .cloned()
                    },
                )
            }

            Lifecycle::NotSet => {
                let error = NotRegisteredError {
                    key: key.clone(),
                    implementation: name.to_string(),
                };
                Self::new(Lifecycle::NotSet, name, move |_: &[Value]| {
                    Err(WireboxError::NotRegistered(error.clone()))
                })
            }
        }
    }
}

struct Unbound;

impl Lookup for Unbound {
    fn find(&self, _key: &InvokerKey) -> Option<Invoker> {
        None
    }
}

impl fmt::Debug for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("lifecycle", &self.lifecycle)
            .field("implementation", &self.implementation)
            .field("bound", &self.lookup.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::Factory;
    use crate::parameter::WithParams;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct NoLookup;

    impl Lookup for NoLookup {
        fn find(&self, _key: &InvokerKey) -> Option<Invoker> {
            None
        }
    }

    #[derive(Debug)]
    struct ObjDef {
        param: i32,
    }

    fn obj_def() -> ItemImpl {
        ItemImpl::Constructible(Factory::new(|args| {
            Ok(ObjDef {
                param: *args.arg::<i32>(0)?,
            })
        }))
    }

    fn param_of(value: &Value) -> i32 {
        value.downcast_ref::<ObjDef>().unwrap().param
    }

    fn key() -> InvokerKey {
        InvokerKey::new("Ns1", "ObjDef")
    }

    #[test]
    fn per_dependency_builds_each_call() {
        let invoker = Invoker::build(&key(), &Entry::new(Lifecycle::PerDependency), &obj_def(), NoLookup);

        let a = invoker.invoke(&[Value::new(1i32)]).unwrap();
        let b = invoker.invoke(&[Value::new(2i32)]).unwrap();
        assert_eq!(param_of(&a), 1);
        assert_eq!(param_of(&b), 2);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn singleton_first_call_wins() {
        let mut entry = Entry::new(Lifecycle::PerDependency);
        entry.singleton();
        let invoker = Invoker::build(&key(), &entry, &obj_def(), NoLookup);

        let a = invoker.invoke(&[Value::new(3i32)]).unwrap();
        let b = invoker.invoke(&[Value::new(4i32)]).unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(param_of(&b), 3);
    }

    #[test]
    fn singleton_factory_called_once() {
        let counter = Arc::new(AtomicU32::new(0));
        let implementation = ItemImpl::Constructible(Factory::new({
            let counter = counter.clone();
            move |_| Ok(counter.fetch_add(1, Ordering::SeqCst))
        }));
        let mut entry = Entry::new(Lifecycle::PerDependency);
        entry.singleton();
        let invoker = Invoker::build(&key(), &entry, &implementation, NoLookup);

        for _ in 0..3 {
            invoker.invoke(&[]).unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_singleton_build_is_retried() {
        let mut entry = Entry::new(Lifecycle::PerDependency);
        entry.singleton();
        let invoker = Invoker::build(&key(), &entry, &obj_def(), NoLookup);

        assert!(invoker.invoke(&[Value::new("wrong")]).is_err());
        let built = invoker.invoke(&[Value::new(5i32)]).unwrap();
        assert_eq!(param_of(&built), 5);
    }

    #[test]
    fn singleton_is_built_once_across_threads() {
        let counter = Arc::new(AtomicU32::new(0));
        let implementation = ItemImpl::Constructible(Factory::new({
            let counter = counter.clone();
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(String::from("shared"))
            }
        }));
        let mut entry = Entry::new(Lifecycle::PerDependency);
        entry.singleton();
        let invoker = Invoker::build(&key(), &entry, &implementation, NoLookup);

        let values: Vec<Value> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| invoker.invoke(&[]).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(values.iter().all(|v| v.ptr_eq(&values[0])));
    }

    #[test]
    fn not_set_always_fails() {
        let invoker = Invoker::build(&key(), &Entry::new(Lifecycle::NotSet), &obj_def(), NoLookup);

        for _ in 0..2 {
            match invoker.invoke(&[Value::new(1i32)]).unwrap_err() {
                WireboxError::NotRegistered(e) => {
                    assert_eq!(e.implementation, "ObjDef");
                    assert_eq!(e.key, key());
                }
                other => panic!("Expected NotRegistered, got: {other:?}"),
            }
        }
    }

    #[test]
    fn declared_params_fill_missing_args() {
        let mut entry = Entry::new(Lifecycle::PerDependency);
        entry.with_value_param(Value::new(10i32));
        let invoker = Invoker::build(&key(), &entry, &obj_def(), NoLookup);

        assert_eq!(param_of(&invoker.invoke(&[]).unwrap()), 10);
        assert_eq!(param_of(&invoker.invoke(&[Value::new(11i32)]).unwrap()), 11);
    }

    #[test]
    fn constants_pass_through() {
        let constant = Value::new("v1");
        let invoker = Invoker::build(
            &key(),
            &Entry::new(Lifecycle::NotSet),
            &ItemImpl::Constant(constant.clone()),
            NoLookup,
        );
        assert!(invoker.invoke(&[Value::new(1i32)]).unwrap().ptr_eq(&constant));
    }

    #[test]
    fn clones_share_cache() {
        let mut entry = Entry::new(Lifecycle::PerDependency);
        entry.singleton();
        let invoker = Invoker::build(&key(), &entry, &obj_def(), NoLookup);
        let clone = invoker.clone();

        let a = invoker.invoke(&[Value::new(1i32)]).unwrap();
        let b = clone.invoke(&[Value::new(2i32)]).unwrap();
        assert!(a.ptr_eq(&b));
        assert!(invoker.ptr_eq(&clone));
    }

    fn resolving_entry() -> Entry {
        let mut entry = Entry::new(Lifecycle::PerDependency);
        entry.with_resolve_param("Ns1.Param");
        entry
    }

    fn param_lookup(value: i32) -> crate::registry::InvokerMap {
        let mut map = crate::registry::InvokerMap::new();
        map.map(InvokerKey::new("Ns1", "Param"), Invoker::constant(Value::new(value)));
        map
    }

    #[test]
    fn invoke_with_uses_given_lookup() {
        let invoker = Invoker::build(&key(), &resolving_entry(), &obj_def(), NoLookup);
        assert!(invoker.invoke(&[]).is_err());

        let built = invoker.invoke_with(&param_lookup(21), &[]).unwrap();
        assert_eq!(param_of(&built), 21);
    }

    #[test]
    fn rebind_keeps_body_and_swaps_lookup() {
        let invoker = Invoker::build(&key(), &resolving_entry(), &obj_def(), param_lookup(1));
        let rebound = invoker.rebind(param_lookup(2));

        assert!(rebound.ptr_eq(&invoker));
        assert_eq!(param_of(&invoker.invoke(&[]).unwrap()), 1);
        assert_eq!(param_of(&rebound.invoke(&[]).unwrap()), 2);
    }

    #[test]
    fn rebound_singleton_keeps_cache() {
        let mut entry = resolving_entry();
        entry.singleton();
        let invoker = Invoker::build(&key(), &entry, &obj_def(), param_lookup(1));
        let first = invoker.invoke(&[]).unwrap();

        let rebound = invoker.rebind(param_lookup(2));
        assert!(rebound.invoke(&[]).unwrap().ptr_eq(&first));
    }

    #[test]
    fn unbound_invoker_misses_every_key() {
        let invoker = Invoker::compile(&key(), &resolving_entry(), &obj_def());
        // The resolve parameter yields null, which is not an i32
        assert!(matches!(
            invoker.invoke(&[]).unwrap_err(),
            WireboxError::InvalidArgument { .. }
        ));
    }
}
