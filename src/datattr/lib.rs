//! # Datattr
//!
//! Datattr mirrors a key/value [`Binding`] onto an element's `data-*`
//! attributes. It is the engine behind a `v-data`-style directive: the host
//! framework hands over the new binding, the previous one and a set of
//! modifiers, and datattr clears the old attributes and writes the new ones.
//!
//! ```text
//! { foo: true, bar: undefined, baz: [1, "", 2] }
//!                     │  normalize + empty policy
//!                     ▼
//! data-foo="1"  data-baz="1 2"
//! ```
//!
//! ## Layers
//!
//! - [`value`] / [`binding`]: what gets bound
//! - [`sync`]: normalization, [`synchronize`] and [`clear`]
//! - [`directive`]: the bind/unbind lifecycle behind a host-agnostic trait
//! - [`plugin`]: installing the directive on a host
//! - [`options`] / [`config`]: defaults, per-call modifiers, stored config
//! - [`target`]: the attribute sink; [`ElementAttributes`] is the in-memory one
//!
//! Everything is synchronous and single-threaded. Options are plain values:
//! per-call modifiers are merged into a fresh copy and installed defaults
//! never change.
//!
//! ## Example
//!
//! ```
//! use datattr::{
//!     install, Binding, Directive, DirectiveBinding, DirectiveRegistry, ElementAttributes, Value,
//! };
//!
//! let mut host = DirectiveRegistry::new();
//! install(&mut host, "x").unwrap();
//!
//! let binding = Binding::new()
//!     .with("foo", true)
//!     .with("bar", Value::Empty)
//!     .with("baz", vec![Value::from(1), Value::from(""), Value::from(2)]);
//!
//! let mut el = ElementAttributes::new();
//! host.get("x")
//!     .unwrap()
//!     .update(&mut el, &DirectiveBinding::new(binding))
//!     .unwrap();
//!
//! assert_eq!(el.get("x-foo"), Some("1"));
//! assert_eq!(el.get("x-baz"), Some("1 2"));
//! assert!(!el.contains("x-bar"));
//! ```

pub mod binding;
pub mod config;
pub mod directive;
pub mod error;
pub mod options;
pub mod plugin;
pub mod sync;
pub mod target;
pub mod value;

pub use binding::Binding;
pub use directive::{BoundElement, DataDirective, Directive, DirectiveBinding, DirectiveState};
pub use error::{DatattrError, Result};
pub use options::{Modifiers, Options, PluginConfig};
pub use plugin::{install, DirectiveHost, DirectiveRegistry};
pub use sync::{clear, normalize, synchronize, SyncReport};
pub use target::{AttributeTarget, ElementAttributes};
pub use value::Value;
