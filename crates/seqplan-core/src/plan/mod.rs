//! Plan compilation: fragment extraction, step compilation, assembly.

pub mod compile;
pub mod extract;
pub mod model;
pub mod parser;

pub use compile::{
    APPEND_TO_RESULT_ATTRIBUTE, CompiledSteps, FUNCTION_TAG_PREFIX, FunctionReference,
    SET_CONTEXT_VARIABLE_ATTRIBUTE, SOLUTION_TAG, compile_steps,
};
pub use extract::{ExtractedPlan, extract};
pub use model::{Plan, ResolvedStep, Step};
pub use parser::{PlanCompiler, PlanParseError, compile_plan};
