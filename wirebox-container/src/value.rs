//! Dynamic values flowing through the container.
//!
//! Arguments, parameters, constants and constructed instances are all
//! [`Value`]s. An instance is a shared, type-erased `Arc`, so handing one out
//! twice preserves identity: singletons are observable through
//! [`Value::ptr_eq`].

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// A value produced or consumed by an invoker.
///
/// # Examples
/// ```
/// use wirebox_container::value::Value;
///
/// let v = Value::new(42i32);
/// assert_eq!(v.downcast_ref::<i32>(), Some(&42));
/// assert_eq!(v.type_name(), "i32");
///
/// let copy = v.clone();
/// assert!(v.ptr_eq(&copy));
/// assert!(Value::Null.is_null());
/// ```
#[derive(Clone, Default)]
pub enum Value {
    /// No value; what a lookup miss resolves to.
    #[default]
    Null,
    /// A shared instance of some concrete type.
    Instance(Instance),
    /// An ordered sequence, produced by array parameters.
    List(Vec<Value>),
}

/// A type-erased, shared instance.
#[derive(Clone)]
pub struct Instance {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    /// Wraps a value in a new shared instance.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an existing `Arc` without reallocating.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Value::Instance(Instance {
            inner: value,
            type_name: type_name::<T>(),
        })
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the held type; `"null"` and `"list"` for the other variants.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Instance(instance) => instance.type_name,
            Value::List(_) => "list",
        }
    }

    /// Borrows the instance as `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Instance(instance) => instance.inner.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Returns a shared handle to the instance as `T`, if it is one.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Value::Instance(instance) => instance.inner.clone().downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Borrows the elements of a list value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Identity comparison.
    ///
    /// Instances are equal when they share an allocation; lists when every
    /// element is identical; `Null` equals only `Null`.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Instance(a), Value::Instance(b)) => Arc::ptr_eq(&a.inner, &b.inner),
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.ptr_eq(y))
            }
            _ => false,
        }
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Instance(instance) => write!(f, "Instance({})", instance.type_name),
            Value::List(items) => f.debug_list().entries(items).finish(),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({})", self.type_name)
    }
}
