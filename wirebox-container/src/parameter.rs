//! Declarative constructor parameters.
//!
//! A [`Parameter`] describes how one constructor argument is produced when
//! an invoker runs. Nothing is evaluated at registration time: `Resolve`
//! parameters in particular only look their key up when the argument is
//! needed, so items may reference each other in any registration order.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::Result;
use crate::key::InvokerKey;
use crate::registry::Lookup;
use crate::value::Value;

/// Zero-argument producer behind [`Parameter::Func`].
pub type ParamFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// How one constructor argument is produced.
#[derive(Clone)]
pub enum Parameter {
    /// Used verbatim.
    Value(Value),
    /// Called with no arguments each time the argument is needed.
    Func(ParamFn),
    /// Dotted key (`"ns.item[.entry]"`) looked up and invoked lazily.
    Resolve(String),
    /// Nested parameters resolved in order into a [`Value::List`].
    Array(Vec<Parameter>),
}

impl Parameter {
    /// Produces the argument.
    ///
    /// A `Resolve` key that is malformed or not in the registry resolves to
    /// [`Value::Null`]; errors raised by the invoker it finds are returned.
    pub fn resolve(&self, lookup: &dyn Lookup) -> Result<Value> {
        match self {
            Parameter::Value(value) => Ok(value.clone()),
            Parameter::Func(func) => Ok(func()),
            Parameter::Resolve(dotted) => {
                let Some(key) = InvokerKey::parse(dotted) else {
                    debug!(key = %dotted, "Malformed resolve parameter, using null");
                    return Ok(Value::Null);
                };
                match lookup.find(&key) {
                    Some(invoker) => {
                        trace!(key = %key, "Resolving parameter");
                        invoker.invoke_with(lookup, &[])
                    }
                    None => Ok(Value::Null),
                }
            }
            Parameter::Array(items) => items
                .iter()
                .map(|item| item.resolve(lookup))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
        }
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Parameter::Func(_) => write!(f, "Func(..)"),
            Parameter::Resolve(key) => f.debug_tuple("Resolve").field(key).finish(),
            Parameter::Array(items) => f.debug_tuple("Array").field(items).finish(),
        }
    }
}

/// Fluent parameter declarations shared by entries and array parameters.
///
/// ```
/// use wirebox_container::parameter::{ArrayParams, Parameter, WithParams};
/// use wirebox_container::value::Value;
///
/// let mut params = ArrayParams::default();
/// params
///     .with_value_param(Value::new(1i32))
///     .with_resolve_param("Widgets.Prepender")
///     .with_array_param(|nested| {
///         nested.with_param(|| Value::new("late"));
///     });
/// assert_eq!(params.parameters().len(), 3);
/// assert!(matches!(params.parameters()[2], Parameter::Array(ref inner) if inner.len() == 1));
/// ```
pub trait WithParams {
    /// The parameter list being built.
    fn parameters_mut(&mut self) -> &mut Vec<Parameter>;

    fn with_parameter(&mut self, parameter: Parameter) -> &mut Self {
        self.parameters_mut().push(parameter);
        self
    }

    /// Appends a literal argument.
    fn with_value_param(&mut self, value: Value) -> &mut Self {
        self.with_parameter(Parameter::Value(value))
    }

    /// Appends an argument computed by `func` at call time.
    fn with_param<F>(&mut self, func: F) -> &mut Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.with_parameter(Parameter::Func(Arc::new(func)))
    }

    /// Appends an argument looked up by dotted key at call time.
    fn with_resolve_param(&mut self, key: impl Into<String>) -> &mut Self {
        self.with_parameter(Parameter::Resolve(key.into()))
    }

    /// Appends a list argument whose elements `build` declares.
    fn with_array_param<F>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut ArrayParams),
    {
        let mut array = ArrayParams::default();
        build(&mut array);
        self.with_parameter(Parameter::Array(array.params))
    }
}

/// Elements of an array parameter under construction.
#[derive(Debug, Clone, Default)]
pub struct ArrayParams {
    params: Vec<Parameter>,
}

impl ArrayParams {
    pub fn parameters(&self) -> &[Parameter] {
        &self.params
    }
}

impl WithParams for ArrayParams {
    fn parameters_mut(&mut self) -> &mut Vec<Parameter> {
        &mut self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::Invoker;
    use crate::lifecycle::Lifecycle;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    // Lookup backed by a plain map, for testing parameters in isolation
    #[derive(Default)]
    struct MapLookup {
        invokers: HashMap<InvokerKey, Invoker>,
    }

    impl MapLookup {
        fn with(mut self, dotted: &str, value: Value) -> Self {
            let key = InvokerKey::parse(dotted).unwrap();
            self.invokers.insert(
                key,
                Invoker::new(Lifecycle::Singleton, "test", move |_| Ok(value.clone())),
            );
            self
        }
    }

    impl Lookup for MapLookup {
        fn find(&self, key: &InvokerKey) -> Option<Invoker> {
            self.invokers.get(key).cloned()
        }
    }

    #[test]
    fn value_is_verbatim() {
        let v = Value::new(7i32);
        let resolved = Parameter::Value(v.clone()).resolve(&MapLookup::default()).unwrap();
        assert!(resolved.ptr_eq(&v));
    }

    #[test]
    fn func_is_called_each_time() {
        let calls = Arc::new(AtomicU32::new(0));
        let param = Parameter::Func(Arc::new({
            let calls = calls.clone();
            move || Value::new(calls.fetch_add(1, Ordering::SeqCst))
        }));

        let lookup = MapLookup::default();
        assert_eq!(param.resolve(&lookup).unwrap().downcast_ref::<u32>(), Some(&0));
        assert_eq!(param.resolve(&lookup).unwrap().downcast_ref::<u32>(), Some(&1));
    }

    #[test]
    fn resolve_hits_registry() {
        let lookup = MapLookup::default().with("Ns.Item", Value::new("found"));
        let value = Parameter::Resolve("Ns.Item".into()).resolve(&lookup).unwrap();
        assert_eq!(value.downcast_ref::<&str>(), Some(&"found"));
    }

    #[test]
    fn resolve_named_entry() {
        let lookup = MapLookup::default()
            .with("Ns.Item", Value::new(1i32))
            .with("Ns.Item.other", Value::new(2i32));
        let value = Parameter::Resolve("Ns.Item.other".into()).resolve(&lookup).unwrap();
        assert_eq!(value.downcast_ref::<i32>(), Some(&2));
    }

    #[test]
    fn resolve_miss_is_null() {
        let lookup = MapLookup::default();
        assert!(Parameter::Resolve("Ns.Missing".into()).resolve(&lookup).unwrap().is_null());
        assert!(Parameter::Resolve("not-a-key".into()).resolve(&lookup).unwrap().is_null());
    }

    #[test]
    fn array_resolves_in_order_and_nests() {
        let lookup = MapLookup::default().with("Ns.A", Value::new('a'));
        let param = Parameter::Array(vec![
            Parameter::Resolve("Ns.A".into()),
            Parameter::Value(Value::new('b')),
            Parameter::Array(vec![Parameter::Resolve("Ns.Missing".into())]),
        ]);

        let value = param.resolve(&lookup).unwrap();
        let items = value.as_list().unwrap();
        assert_eq!(items[0].downcast_ref::<char>(), Some(&'a'));
        assert_eq!(items[1].downcast_ref::<char>(), Some(&'b'));
        let nested = items[2].as_list().unwrap();
        assert_eq!(nested.len(), 1);
        assert!(nested[0].is_null());
    }

    #[test]
    fn invoker_errors_propagate() {
        use crate::error::{NotRegisteredError, WireboxError};

        let mut lookup = MapLookup::default();
        lookup.invokers.insert(
            InvokerKey::new("Ns", "Broken"),
            Invoker::new(Lifecycle::NotSet, "Broken", |_| {
                Err(WireboxError::NotRegistered(NotRegisteredError {
                    key: InvokerKey::new("Ns", "Broken"),
                    implementation: "Broken".into(),
                }))
            }),
        );

        let err = Parameter::Resolve("Ns.Broken".into()).resolve(&lookup).unwrap_err();
        assert!(matches!(err, WireboxError::NotRegistered(_)));
    }
}
