//! Derive macros for Wirebox namespaces.

pub use wirebox_macros::Namespace;
