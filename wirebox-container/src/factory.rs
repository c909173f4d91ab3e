//! Constructible item implementations.
//!
//! A [`Factory`] turns a final argument list into an instance. Two
//! definition styles are supported and produce equivalent instances:
//!
//! - value-returning ([`Factory::new`], [`Factory::from_fn`]): the closure
//!   builds and returns the instance;
//! - receiver-mutating ([`Factory::receiver`]): the container allocates a
//!   `T::default()` receiver, the closure fills it in, and the receiver is
//!   the instance unless the closure hands back a non-null substitute.
//!
//! # Examples
//! ```
//! use wirebox_container::factory::Factory;
//! use wirebox_container::value::Value;
//!
//! #[derive(Default)]
//! struct Counter { start: i32 }
//!
//! let returning = Factory::new(|args| Ok(Counter { start: *args.arg::<i32>(0)? }));
//! let mutating = Factory::receiver(|this: &mut Counter, args| {
//!     this.start = *args.arg::<i32>(0)?;
//!     Ok(None)
//! });
//!
//! for factory in [returning, mutating] {
//!     let instance = factory.construct(&[Value::new(3i32)]).unwrap();
//!     assert_eq!(instance.downcast_ref::<Counter>().unwrap().start, 3);
//! }
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use tracing::trace;
use wirebox_support::rendering::shorten_type_name;

use crate::error::{Result, WireboxError};
use crate::value::Value;

/// Type-erased construction function.
pub type ConstructFn = dyn Fn(Args<'_>) -> Result<Value> + Send + Sync;

/// The callable behind a constructible item.
#[derive(Clone)]
pub struct Factory {
    name: Arc<str>,
    construct: Arc<ConstructFn>,
}

impl Factory {
    /// Value-returning factory for `T`, named after `T`.
    pub fn new<T, F>(construct: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(Args<'_>) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            name: shorten_type_name(type_name::<T>()).into(),
            construct: Arc::new(move |args| construct(args).map(Value::new)),
        }
    }

    /// Factory returning a [`Value`] directly, e.g. to hand out an existing
    /// `Arc` or a list.
    pub fn from_fn<F>(name: impl Into<Arc<str>>, construct: F) -> Self
    where
        F: Fn(Args<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            construct: Arc::new(construct),
        }
    }

    /// Receiver-mutating factory for `T`.
    ///
    /// Each construction starts from `T::default()`. If the closure returns
    /// `Some` non-null value, that value replaces the receiver.
    pub fn receiver<T, F>(init: F) -> Self
    where
        T: Default + Any + Send + Sync,
        F: Fn(&mut T, Args<'_>) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        Self {
            name: shorten_type_name(type_name::<T>()).into(),
            construct: Arc::new(move |args| {
                let mut receiver = T::default();
                match init(&mut receiver, args)? {
                    Some(substitute) if !substitute.is_null() => Ok(substitute),
                    _ => Ok(Value::new(receiver)),
                }
            }),
        }
    }

    /// Renames the factory; the name shows up in errors and listings.
    pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the factory on a final argument list.
    pub fn construct(&self, args: &[Value]) -> Result<Value> {
        trace!(implementation = %self.name, args = args.len(), "Constructing");
        (self.construct)(Args::new(args))
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory").field("name", &self.name).finish()
    }
}

static NULL: Value = Value::Null;

/// Positional arguments handed to a factory.
///
/// Missing positions read as [`Value::Null`].
#[derive(Clone, Copy)]
pub struct Args<'a> {
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub fn new(values: &'a [Value]) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &'a [Value] {
        self.values
    }

    /// Argument at `index`, or `Null` past the end.
    pub fn get(&self, index: usize) -> &'a Value {
        self.values.get(index).unwrap_or(&NULL)
    }

    /// Argument at `index` as a shared `T`.
    ///
    /// # Errors
    /// [`WireboxError::InvalidArgument`] if the argument is not a `T`.
    pub fn arg<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>> {
        let value = self.get(index);
        value.downcast::<T>().ok_or_else(|| WireboxError::InvalidArgument {
            index,
            expected: type_name::<T>(),
            found: value.type_name(),
        })
    }

    /// Argument at `index` cloned out as `T`.
    pub fn cloned<T: Any + Send + Sync + Clone>(&self, index: usize) -> Result<T> {
        self.arg::<T>(index).map(|arc| T::clone(&arc))
    }

    /// Argument at `index` as a list, e.g. from an array parameter.
    pub fn list(&self, index: usize) -> Result<&'a [Value]> {
        let value = self.get(index);
        value.as_list().ok_or_else(|| WireboxError::InvalidArgument {
            index,
            expected: "list",
            found: value.type_name(),
        })
    }

    /// Argument at `index` as `T`, or `None` when it is `Null`.
    pub fn optional<T: Any + Send + Sync>(&self, index: usize) -> Result<Option<Arc<T>>> {
        if self.get(index).is_null() {
            return Ok(None);
        }
        self.arg::<T>(index).map(Some)
    }
}

impl fmt::Debug for Args<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values).finish()
    }
}
