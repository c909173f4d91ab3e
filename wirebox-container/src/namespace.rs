//! Namespaces: named bags of items.
//!
//! A namespace lists its own items once, in declaration order, through the
//! [`Namespace`] trait. The container reads that list during `include` and
//! never touches the namespace again.
//!
//! Two ways to describe one:
//! - a [`NamespaceTable`] built at runtime;
//! - `#[derive(Namespace)]` (from `wirebox-derive`) on a struct whose
//!   fields are the items.
//!
//! # Examples
//! ```
//! use wirebox_container::factory::Factory;
//! use wirebox_container::namespace::{Namespace, NamespaceTable};
//! use wirebox_container::value::Value;
//!
//! struct Greeter { name: String }
//!
//! let table = NamespaceTable::new()
//!     .factory("Greeter", Factory::new(|args| Ok(Greeter { name: args.cloned(0)? })))
//!     .constant("Version", Value::new("1.0"));
//!
//! let items = table.items();
//! assert_eq!(items.len(), 2);
//! assert!(items[0].implementation().is_constructible());
//! assert!(!items[1].implementation().is_constructible());
//! ```

use crate::factory::Factory;
use crate::value::Value;

/// Something that can enumerate its own items.
pub trait Namespace {
    /// The namespace's items, in declaration order.
    fn items(&self) -> Vec<Item>;
}

/// One named member of a namespace.
#[derive(Debug, Clone)]
pub struct Item {
    name: String,
    implementation: ItemImpl,
}

impl Item {
    pub fn new(name: impl Into<String>, implementation: ItemImpl) -> Self {
        Self {
            name: name.into(),
            implementation,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn implementation(&self) -> &ItemImpl {
        &self.implementation
    }
}

/// What an item holds.
#[derive(Debug, Clone)]
pub enum ItemImpl {
    /// Invocable definition; gets invokers that build instances.
    Constructible(Factory),
    /// Plain value, passed through unchanged.
    Constant(Value),
}

impl ItemImpl {
    #[inline]
    pub fn is_constructible(&self) -> bool {
        matches!(self, ItemImpl::Constructible(_))
    }

    /// Implementation name for diagnostics.
    pub fn name(&self) -> &str {
        match self {
            ItemImpl::Constructible(factory) => factory.name(),
            ItemImpl::Constant(value) => value.type_name(),
        }
    }
}

/// Conversion of a namespace field into an item implementation.
///
/// Used by `#[derive(Namespace)]` for fields without `#[namespace(constant)]`.
pub trait IntoItem {
    fn into_item(self) -> ItemImpl;
}

impl IntoItem for ItemImpl {
    fn into_item(self) -> ItemImpl {
        self
    }
}

impl IntoItem for Factory {
    fn into_item(self) -> ItemImpl {
        ItemImpl::Constructible(self)
    }
}

impl IntoItem for Value {
    fn into_item(self) -> ItemImpl {
        ItemImpl::Constant(self)
    }
}

macro_rules! constant_items {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoItem for $ty {
                fn into_item(self) -> ItemImpl {
                    ItemImpl::Constant(Value::new(self))
                }
            }
        )*
    };
}

constant_items!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, &'static str,
);

/// A namespace described as an explicit table.
#[derive(Debug, Clone, Default)]
pub struct NamespaceTable {
    items: Vec<Item>,
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constructible item.
    pub fn factory(mut self, name: impl Into<String>, factory: Factory) -> Self {
        self.items.push(Item::new(name, ItemImpl::Constructible(factory)));
        self
    }

    /// Adds a constant item.
    pub fn constant(mut self, name: impl Into<String>, value: Value) -> Self {
        self.items.push(Item::new(name, ItemImpl::Constant(value)));
        self
    }

    /// Adds any item.
    pub fn item(mut self, name: impl Into<String>, item: impl IntoItem) -> Self {
        self.items.push(Item::new(name, item.into_item()));
        self
    }
}

impl Namespace for NamespaceTable {
    fn items(&self) -> Vec<Item> {
        self.items.clone()
    }
}

impl<N: Namespace + ?Sized> Namespace for &N {
    fn items(&self) -> Vec<Item> {
        (**self).items()
    }
}
