//! Compiler from language-model plan markup to sequential plans.
//!
//! Model output such as
//!
//! ```text
//! Here is your plan:
//! <plan>
//!   <function.Writer.Tell input="a dragon" setContextVariable="STORY"/>
//!   <function.Translate input="$STORY" language="French" appendToResult="RESULT"/>
//! </plan>
//! ```
//!
//! is recovered from the surrounding noise, parsed, and each `function.`
//! node is resolved through a [`FunctionResolver`] into a [`Step`] of the
//! resulting [`Plan`]. Nothing is executed.

pub mod function;
pub mod markup;
pub mod plan;
pub mod variables;

pub use function::{FunctionDescriptor, FunctionRegistry, FunctionResolver, ParameterDescriptor};
pub use plan::{Plan, PlanCompiler, PlanParseError, ResolvedStep, Step, compile_plan};
pub use variables::VariableBag;
