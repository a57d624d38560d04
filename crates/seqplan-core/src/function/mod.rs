//! Function metadata and lookup.
//!
//! This module defines the [`FunctionDescriptor`] data a plan step binds
//! to, the [`FunctionResolver`] trait the compiler uses for lookups, and the
//! bundled [`FunctionRegistry`] implementation.
//!
//! ```text
//! PlanCompiler
//!     |
//!     v
//! &dyn FunctionResolver --resolve("Writer", "Tell")--> Option<Arc<FunctionDescriptor>>
//!     ^
//!     |
//! FunctionRegistry (or any Fn(&str, &str) closure)
//! ```

pub mod descriptor;
pub mod registry;
pub mod resolver;

pub use descriptor::{FunctionDescriptor, ParameterDescriptor};
pub use registry::{FunctionRegistry, RegistryError};
pub use resolver::FunctionResolver;
