//! Core container implementation for Wirebox.

pub mod arguments;
pub mod container;
pub mod entry;
pub mod error;
pub mod factory;
pub mod invoker;
pub mod key;
pub mod lifecycle;
pub mod namespace;
pub mod parameter;
pub mod registrar;
pub mod registry;
pub mod resolver;
pub mod value;
pub mod views;

pub use container::{prelude, serve, Container, ContainerBuilder, ServeConfig};
pub use error::{NotRegisteredError, Result, WireboxError};
pub use key::{InvokerKey, DEFAULT_ENTRY};
pub use lifecycle::Lifecycle;
