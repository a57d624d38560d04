//! Compiled plan types.
//!
//! A [`Plan`] is the immutable result of compiling model output: the goal,
//! a flat list of [`Step`]s in document order, and the names of the
//! variables that make up the plan's final result.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::function::FunctionDescriptor;
use crate::variables::VariableBag;

/// A compiled sequential plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    goal: String,
    steps: Vec<Step>,
    outputs: Vec<String>,
    parameters: VariableBag,
}

/// One unit of work in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// A step bound to a function the resolver knew about.
    Resolved(ResolvedStep),
    /// A reference the resolver could not satisfy, kept by name because
    /// missing functions were allowed.
    Placeholder {
        /// The dotted reference as written, e.g. `Writer.Tell`.
        name: String,
    },
}

/// A step bound to a resolved function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStep {
    /// The function this step calls.
    pub function: Arc<FunctionDescriptor>,
    /// Input parameters: descriptor defaults overlaid with the node's
    /// attributes.
    pub inputs: VariableBag,
    /// Variables the step's result is written to, in document order.
    pub output_bindings: Vec<String>,
}

impl Plan {
    /// Assemble a plan from compiled steps and result-output names.
    ///
    /// `parameters` starts empty.
    pub fn assemble(goal: impl Into<String>, steps: Vec<Step>, outputs: Vec<String>) -> Self {
        Self {
            goal: goal.into(),
            steps,
            outputs,
            parameters: VariableBag::new(),
        }
    }

    /// The goal the plan was generated for.
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Variable names whose values make up the plan's final result.
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Plan-level parameter bindings.
    pub fn parameters(&self) -> &VariableBag {
        &self.parameters
    }

    /// Steps bound to a resolved function, skipping placeholders.
    pub fn resolved_steps(&self) -> impl Iterator<Item = &ResolvedStep> {
        self.steps.iter().filter_map(Step::as_resolved)
    }

    /// Return `true` if any step is a placeholder for a missing function.
    pub fn has_placeholders(&self) -> bool {
        self.steps
            .iter()
            .any(|step| matches!(step, Step::Placeholder { .. }))
    }

    /// Render a human-readable listing of the plan.
    ///
    /// ```text
    /// Goal: Tell a story and email it
    /// Steps:
    ///   1. Writer.Tell input='a dragon' => STORY
    ///   2. Email.Send (missing)
    /// Outputs: STORY
    /// ```
    pub fn to_plan_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Goal: {}", self.goal);

        if self.steps.is_empty() {
            out.push_str("Steps: (none)\n");
        } else {
            out.push_str("Steps:\n");
            for (index, step) in self.steps.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", index + 1, step.describe());
            }
        }

        if self.outputs.is_empty() {
            out.push_str("Outputs: (none)\n");
        } else {
            let _ = writeln!(out, "Outputs: {}", self.outputs.join(", "));
        }
        out
    }
}

impl Step {
    /// The resolved step, if this is one.
    pub fn as_resolved(&self) -> Option<&ResolvedStep> {
        match self {
            Step::Resolved(step) => Some(step),
            Step::Placeholder { .. } => None,
        }
    }

    /// Display name: the qualified function name or the placeholder name.
    pub fn name(&self) -> String {
        match self {
            Step::Resolved(step) => step.function.qualified_name(),
            Step::Placeholder { name } => name.clone(),
        }
    }

    /// One-line description used by [`Plan::to_plan_string`].
    fn describe(&self) -> String {
        match self {
            Step::Resolved(step) => {
                let mut line = step.function.qualified_name();
                if !step.inputs.is_empty() {
                    let _ = write!(line, " {}", step.inputs);
                }
                if !step.output_bindings.is_empty() {
                    let _ = write!(line, " => {}", step.output_bindings.join(", "));
                }
                line
            }
            Step::Placeholder { name } => format!("{name} (missing)"),
        }
    }
}
