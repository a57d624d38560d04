//! Plan compilation entry point.
//!
//! Runs the full pipeline over raw model output:
//! fragment extraction -> tree parsing -> step compilation -> assembly.

use thiserror::Error;

use crate::function::FunctionResolver;
use crate::markup::MarkupError;

use super::compile::compile_steps;
use super::extract::extract;
use super::model::Plan;

/// Errors that can occur while compiling model output into a plan.
#[derive(Debug, Error)]
pub enum PlanParseError {
    /// No `plan` element could be located. Well-formed text without one
    /// fails directly; otherwise no fragment was found even after appending
    /// a closing tag, and `source` is the markup error from parsing the
    /// whole text.
    #[error("failed to find a plan in text: {text:?}")]
    NoPlanFound {
        text: String,
        source: Option<MarkupError>,
    },

    /// A `plan` fragment was located but is not well-formed markup.
    #[error("failed to parse plan from text {text:?} or fragment {fragment:?}")]
    MalformedFragment {
        text: String,
        fragment: String,
        source: MarkupError,
    },

    /// A step references a function the resolver does not know, and
    /// missing functions are not allowed.
    #[error("failed to find function {function_name:?} in plugin {plugin_name:?}")]
    FunctionNotFound {
        plugin_name: String,
        function_name: String,
    },
}

/// Compile raw model output into a [`Plan`].
///
/// Unknown functions are an error unless `allow_missing` is set, in which
/// case they become placeholder steps.
pub fn compile_plan(
    raw_text: &str,
    goal: &str,
    resolver: &dyn FunctionResolver,
    allow_missing: bool,
) -> Result<Plan, PlanParseError> {
    let extracted = extract(raw_text)?;
    let compiled = compile_steps(&extracted.document, resolver, allow_missing)?;
    Ok(compiled.into_plan(goal))
}

/// Reusable compiler bound to one resolver.
///
/// # Example
///
/// ```
/// use seqplan_core::function::{FunctionDescriptor, FunctionRegistry};
/// use seqplan_core::plan::PlanCompiler;
///
/// let mut registry = FunctionRegistry::new();
/// registry.register(FunctionDescriptor::new("Writer", "Tell"));
///
/// let plan = PlanCompiler::new(&registry)
///     .allow_missing(true)
///     .compile("<plan><function.Writer.Tell/><function.Email.Send/></plan>", "demo")
///     .unwrap();
/// assert_eq!(plan.steps().len(), 2);
/// ```
#[derive(Clone, Copy)]
pub struct PlanCompiler<'r> {
    resolver: &'r dyn FunctionResolver,
    allow_missing: bool,
}

impl<'r> PlanCompiler<'r> {
    /// Create a compiler that rejects unknown functions.
    pub fn new(resolver: &'r dyn FunctionResolver) -> Self {
        Self {
            resolver,
            allow_missing: false,
        }
    }

    /// Whether unknown functions become placeholder steps instead of errors.
    pub fn allow_missing(mut self, allow_missing: bool) -> Self {
        self.allow_missing = allow_missing;
        self
    }

    /// Compile raw model output into a plan for `goal`.
    pub fn compile(&self, raw_text: &str, goal: &str) -> Result<Plan, PlanParseError> {
        compile_plan(raw_text, goal, self.resolver, self.allow_missing)
    }
}

impl std::fmt::Debug for PlanCompiler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanCompiler")
            .field("allow_missing", &self.allow_missing)
            .finish_non_exhaustive()
    }
}
