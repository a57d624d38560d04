//! The `FunctionResolver` trait -- how the compiler looks functions up.
//!
//! The compiler never owns a registry. Callers inject any resolver: the
//! bundled [`super::FunctionRegistry`], their own registry type, or a plain
//! closure.

use std::sync::Arc;

use super::descriptor::FunctionDescriptor;

/// Maps a `(plugin_name, function_name)` pair to a function descriptor.
///
/// An empty `plugin_name` means the reference had no plugin segment and
/// should be resolved against the flat, global namespace.
///
/// Resolvers must be safe to share between concurrent compilations, hence
/// the `Send + Sync` bound.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use seqplan_core::function::{FunctionDescriptor, FunctionResolver};
///
/// let tell = Arc::new(FunctionDescriptor::new("Writer", "Tell"));
/// let resolver = move |plugin: &str, name: &str| {
///     (plugin == "Writer" && name == "Tell").then(|| Arc::clone(&tell))
/// };
/// assert!(resolver.resolve("Writer", "Tell").is_some());
/// assert!(resolver.resolve("", "Tell").is_none());
/// ```
pub trait FunctionResolver: Send + Sync {
    /// Look up a function, returning `None` if it is unknown.
    fn resolve(&self, plugin_name: &str, function_name: &str) -> Option<Arc<FunctionDescriptor>>;
}

impl<F> FunctionResolver for F
where
    F: Fn(&str, &str) -> Option<Arc<FunctionDescriptor>> + Send + Sync,
{
    fn resolve(&self, plugin_name: &str, function_name: &str) -> Option<Arc<FunctionDescriptor>> {
        self(plugin_name, function_name)
    }
}

// Compile-time assertion: the compiler stores resolvers as `&dyn FunctionResolver`.
const _: () = {
    fn _assert_object_safe(_: &dyn FunctionResolver) {}
};
