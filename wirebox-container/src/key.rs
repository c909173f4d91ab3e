//! Registry keys.
//!
//! [`InvokerKey`] identifies one invoker in the registry: a namespace, an
//! item inside it, and a named entry of that item. The dotted string form
//! `"namespace.item[.entry]"` is the wire format used by lazy `resolve`
//! parameters and by [`Resolver::resolve`](crate::resolver::Resolver::resolve).

use std::fmt;

/// Name of the entry looked up when no entry name is given.
pub const DEFAULT_ENTRY: &str = "default";

/// Uniquely identifies an invoker in the registry.
///
/// # Examples
/// ```
/// use wirebox_container::key::{InvokerKey, DEFAULT_ENTRY};
///
/// let key = InvokerKey::parse("Widgets.Widget1").unwrap();
/// assert_eq!(key.namespace(), "Widgets");
/// assert_eq!(key.item(), "Widget1");
/// assert_eq!(key.entry(), DEFAULT_ENTRY);
///
/// let named = InvokerKey::parse("Widgets.Widget1.fancy").unwrap();
/// assert_eq!(named.entry(), "fancy");
/// assert_eq!(named.to_string(), "Widgets.Widget1.fancy");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InvokerKey {
    namespace: String,
    item: String,
    entry: String,
}

impl InvokerKey {
    /// Creates a key for the default entry of an item.
    pub fn new(namespace: impl Into<String>, item: impl Into<String>) -> Self {
        Self::with_entry(namespace, item, DEFAULT_ENTRY)
    }

    /// Creates a key for a named entry of an item.
    pub fn with_entry(
        namespace: impl Into<String>,
        item: impl Into<String>,
        entry: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            item: item.into(),
            entry: entry.into(),
        }
    }

    /// Parses a dotted key of exactly two or three tokens.
    ///
    /// Returns `None` for any other shape; callers treat that as a lookup
    /// miss.
    pub fn parse(dotted: &str) -> Option<Self> {
        let mut tokens = dotted.split('.');
        let namespace = tokens.next()?;
        let item = tokens.next()?;
        let entry = tokens.next().unwrap_or(DEFAULT_ENTRY);

        if tokens.next().is_some() {
            return None;
        }
        Some(Self::with_entry(namespace, item, entry))
    }

    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[inline]
    pub fn item(&self) -> &str {
        &self.item
    }

    #[inline]
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Returns `true` if this key addresses the default entry.
    #[inline]
    pub fn is_default(&self) -> bool {
        self.entry == DEFAULT_ENTRY
    }
}

impl fmt::Display for InvokerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.namespace, self.item, self.entry)
    }
}
