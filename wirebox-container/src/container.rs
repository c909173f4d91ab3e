//! # Container
//!
//! Turns included namespaces into invokers.
//!
//! # Architecture
//! ```text
//! ContainerBuilder ──build()──> Container ──serve(include, register)──> Served
//!                                              │                         ├─ namespaces
//!                                   include → defaults → register        └─ registered
//! ```
//!
//! # Examples
//! ```rust
//! use wirebox_container::prelude::*;
//!
//! struct Greeting { text: String }
//!
//! let greetings = NamespaceTable::new()
//!     .factory("Greeting", Factory::new(|args| {
//!         let name: String = args.cloned(0)?;
//!         Ok(Greeting { text: format!("hello {name}") })
//!     }))
//!     .constant("Version", Value::new("1.0"));
//!
//! let served = Container::builder()
//!     .build()
//!     .serve(
//!         |includer| { includer.include_named(&greetings, "Greetings"); },
//!         |registrations| {
//!             registrations.register("Greetings", "Greeting", |entries, _, _| {
//!                 entries
//!                     .with_entry()
//!                     .named("world")
//!                     .singleton()
//!                     .with_value_param(Value::new(String::from("world")));
//!             })?;
//!             Ok(())
//!         },
//!     )
//!     .expect("Failed to serve container");
//!
//! let greeting = served.resolve("Greetings.Greeting.world", &[]).unwrap();
//! assert_eq!(greeting.downcast_ref::<Greeting>().unwrap().text, "hello world");
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::Result;
use crate::registrar::{Includer, Registrations};
use crate::registry::InvokerMap;
use crate::views::{Registered, Served};

// ============================================================
// ServeConfig
// ============================================================

/// Options recognised by [`Container::serve`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// When true, items that never declared a lifecycle fail with
    /// `NotRegistered` when invoked instead of building per dependency.
    #[serde(alias = "requireReg")]
    pub require_registration: bool,

    /// Existing registry to seed the new one with.
    #[serde(skip)]
    pub invokers: Option<InvokerMap>,
}

// ============================================================
// ContainerBuilder
// ============================================================

/// Builds a [`Container`].
///
/// # Examples
/// ```rust,ignore
/// let container = Container::builder()
///     .require_registration(true)
///     .seed(previous.registered.snapshot())
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    config: ServeConfig,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Fail at call time for items without an explicit lifecycle.
    pub fn require_registration(mut self, require: bool) -> Self {
        self.config.require_registration = require;
        self
    }

    /// Seed the registry with invokers from an earlier container.
    ///
    /// Entries registered while serving overwrite seeded ones.
    pub fn seed(mut self, invokers: InvokerMap) -> Self {
        self.config.invokers = Some(invokers);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ServeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Container {
        Container {
            config: self.config,
        }
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// A configured container, ready to serve namespaces.
///
/// Each [`serve`](Container::serve) call builds an independent registry;
/// generated namespace names start over at `Namespace1`.
#[derive(Default)]
pub struct Container {
    config: ServeConfig,
}

impl Container {
    /// Create a new builder.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// A container with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &ServeConfig {
        &self.config
    }

    /// Runs include → default entries → register, and returns both views.
    ///
    /// `include` adds namespaces; `register` declares entries and may
    /// already resolve items through the partially built registry.
    ///
    /// # Errors
    /// Whatever `register` returns.
    #[instrument(skip_all, name = "container_serve", fields(require_registration = self.config.require_registration))]
    pub fn serve<I, R>(&self, include: I, register: R) -> Result<Served>
    where
        I: FnOnce(&mut Includer),
        R: FnOnce(&mut Registrations) -> Result<()>,
    {
        let seed = self.config.invokers.clone().unwrap_or_default();
        info!(seeded = seed.len(), "Serving container");
        let registered = Registered::new(Arc::new(RwLock::new(seed)));
        // Seeded invokers resolve their parameters against the new registry
        registered.rebind_all();

        let mut includer = Includer::new();
        include(&mut includer);
        let included = includer.finish();

        let mut registrations = Registrations::new(
            included,
            registered.clone(),
            self.config.require_registration,
        );
        registrations.compile_defaults();
        register(&mut registrations)?;

        let namespaces = registrations.project();
        info!(
            namespaces = namespaces.names().len(),
            invokers = registered.len(),
            "Container served ✓"
        );
        Ok(Served {
            namespaces,
            registered,
        })
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("require_registration", &self.config.require_registration)
            .field("seeded", &self.config.invokers.as_ref().map_or(0, InvokerMap::len))
            .finish()
    }
}

/// Serves namespaces with a one-off container configured by `config`.
pub fn serve<I, R>(include: I, register: R, config: ServeConfig) -> Result<Served>
where
    I: FnOnce(&mut Includer),
    R: FnOnce(&mut Registrations) -> Result<()>,
{
    Container::builder().config(config).build().serve(include, register)
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{serve, Container, ContainerBuilder, ServeConfig};
    pub use crate::entry::{Entries, Entry};
    pub use crate::error::{Result, WireboxError};
    pub use crate::factory::{Args, Factory};
    pub use crate::invoker::Invoker;
    pub use crate::key::{InvokerKey, DEFAULT_ENTRY};
    pub use crate::lifecycle::Lifecycle;
    pub use crate::namespace::{IntoItem, Item, ItemImpl, Namespace, NamespaceTable};
    pub use crate::parameter::{Parameter, WithParams};
    pub use crate::registrar::{Includer, Registrations};
    pub use crate::registry::{InvokerMap, Lookup};
    pub use crate::resolver::Resolver;
    pub use crate::value::Value;
    pub use crate::views::{Export, Namespaces, Registered, Served};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
