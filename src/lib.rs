#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub(crate) mod any;
pub(crate) mod arguments;
pub(crate) mod config;
pub(crate) mod context;
pub(crate) mod deferred;
pub(crate) mod dependency;
pub(crate) mod errors;
pub(crate) mod implements;
pub(crate) mod injection;
pub(crate) mod introspect;
pub(crate) mod key;
pub(crate) mod provider;
pub(crate) mod registry;
pub(crate) mod validator;

#[cfg(feature = "std")]
pub(crate) mod guard;

#[doc(hidden)]
pub mod macros_utils;

pub use any::TypeInfo;
pub use arguments::Arguments;
pub use config::Config;
pub use context::{Context, Resolved};
pub use deferred::Deferred;
pub use dependency::{Dependency, WrapperKind};
pub use errors::{BindErrorKind, ComponentErrorKind, InstantiateErrorKind, ResolveErrorKind, ValidateErrorKind};
pub use implements::Implements;
pub use introspect::{Constructor, Field, Introspect, Level, Method, TypeMetadata};
pub use key::{ComponentKey, Qualifier};
pub use registry::Registry;
