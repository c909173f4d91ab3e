//! # Wirebox: namespace-based dependency injection for Rust
//!
//! Namespaces list items. Items are either constants or factories. A
//! container turns every item into invokers, with a lifecycle and declared
//! parameters per named entry, and hands back two views of the result.
//!
//! ```rust
//! use wirebox::prelude::*;
//!
//! #[derive(Clone, Namespace)]
//! struct Ns1 {
//!     #[namespace(rename = "ObjDef2")]
//!     obj_def2: Factory,
//!     version: &'static str,
//! }
//!
//! struct ObjDef { param: i32 }
//!
//! let ns = Ns1 {
//!     obj_def2: Factory::new(|args| Ok(ObjDef { param: args.cloned(0)? })),
//!     version: "1.0",
//! };
//!
//! let served = wirebox::serve(
//!     |includer| { includer.include_named(&ns, "Ns1"); },
//!     |registrations| {
//!         registrations.register("Ns1", "ObjDef2", |entries, _, _| {
//!             entries.with_entry().singleton();
//!         })?;
//!         Ok(())
//!     },
//!     ServeConfig::default(),
//! )?;
//!
//! let a = served.namespaces.call("Ns1", "ObjDef2", &[Value::new(1i32)])?;
//! let b = served.resolve("Ns1.ObjDef2", &[Value::new(2i32)])?;
//! assert!(a.ptr_eq(&b));
//! assert_eq!(b.downcast_ref::<ObjDef>().unwrap().param, 1);
//! # Ok::<(), WireboxError>(())
//! ```

pub use wirebox_container::*;
pub use wirebox_derive::*;
pub use wirebox_support::*;

/// Everything needed to declare and serve namespaces.
pub mod prelude {
    pub use wirebox_container::prelude::*;
    pub use wirebox_derive::Namespace;
}
