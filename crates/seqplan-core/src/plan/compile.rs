//! Step compiler: turns `plan` elements into [`Step`]s.
//!
//! Every child of every `plan` element is classified in document order:
//!
//! - text and comments are skipped;
//! - `<function.Plugin.Name .../>` or `<function.Name .../>` becomes a step;
//! - any other element is ignored.
//!
//! On a function node, `setContextVariable` and `appendToResult` route the
//! step's result; every other attribute binds an input parameter.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::function::{FunctionDescriptor, FunctionResolver};
use crate::markup::{Element, Node};
use crate::variables::VariableBag;

use super::model::{Plan, ResolvedStep, Step};
use super::parser::PlanParseError;

/// Element name of a plan (solution) in model output.
pub const SOLUTION_TAG: &str = "plan";

/// Prefix of element names that reference a function.
pub const FUNCTION_TAG_PREFIX: &str = "function.";

/// Attribute naming the variable a step's result is stored in.
pub const SET_CONTEXT_VARIABLE_ATTRIBUTE: &str = "setContextVariable";

/// Attribute naming a variable that is also part of the plan's result.
pub const APPEND_TO_RESULT_ATTRIBUTE: &str = "appendToResult";

/// Steps compiled from a document, plus the plan-level result outputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledSteps {
    pub steps: Vec<Step>,
    pub result_outputs: Vec<String>,
}

impl CompiledSteps {
    /// Assemble the final [`Plan`].
    pub fn into_plan(self, goal: impl Into<String>) -> Plan {
        Plan::assemble(goal, self.steps, self.result_outputs)
    }
}

/// A parsed `function.` element name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionReference<'a> {
    /// Plugin segment, empty when the name had none.
    pub plugin_name: &'a str,
    pub function_name: &'a str,
    /// Everything after the prefix, exactly as written.
    pub dotted_name: &'a str,
}

impl<'a> FunctionReference<'a> {
    /// Parse an element name such as `function.Writer.Tell`.
    ///
    /// The prefix is matched ignoring ASCII case. Returns `None` for names
    /// without the prefix or with an empty function name.
    pub fn parse(tag: &'a str) -> Option<Self> {
        let prefix = tag.get(..FUNCTION_TAG_PREFIX.len())?;
        if !prefix.eq_ignore_ascii_case(FUNCTION_TAG_PREFIX) {
            return None;
        }

        let dotted_name = &tag[FUNCTION_TAG_PREFIX.len()..];
        let (plugin_name, function_name) = dotted_name.split_once('.').unwrap_or(("", dotted_name));
        if function_name.is_empty() {
            return None;
        }

        Some(Self {
            plugin_name,
            function_name,
            dotted_name,
        })
    }
}

/// Compile every `plan` element in `document` into steps.
///
/// Plans are processed in document order, and so are the children of
/// each plan.
pub fn compile_steps(
    document: &Element,
    resolver: &dyn FunctionResolver,
    allow_missing: bool,
) -> Result<CompiledSteps, PlanParseError> {
    document
        .descendants_named(SOLUTION_TAG)
        .into_iter()
        .flat_map(|solution| solution.children.iter())
        .try_fold(CompiledSteps::default(), |mut compiled, node| {
            let Some(element) = step_candidate(node) else {
                return Ok(compiled);
            };
            let Some(reference) = FunctionReference::parse(&element.name) else {
                return Ok(compiled);
            };

            match resolver.resolve(reference.plugin_name, reference.function_name) {
                Some(function) => {
                    debug!(function = %function.qualified_name(), "compiled plan step");
                    let (step, results) = bind_step(element, function);
                    compiled.steps.push(Step::Resolved(step));
                    compiled.result_outputs.extend(results);
                }
                None if allow_missing => {
                    warn!(
                        function = reference.dotted_name,
                        "function not found, adding placeholder step"
                    );
                    compiled.steps.push(Step::Placeholder {
                        name: reference.dotted_name.to_owned(),
                    });
                }
                None => {
                    return Err(PlanParseError::FunctionNotFound {
                        plugin_name: reference.plugin_name.to_owned(),
                        function_name: reference.function_name.to_owned(),
                    });
                }
            }
            Ok(compiled)
        })
}

/// Only elements can become steps.
fn step_candidate(node: &Node) -> Option<&Element> {
    match node {
        Node::Element(element) => Some(element),
        Node::Text(_) | Node::Comment(_) => None,
    }
}

/// Build a resolved step from a function node.
///
/// Returns the step and the `appendToResult` names it contributed.
fn bind_step(
    element: &Element,
    function: Arc<FunctionDescriptor>,
) -> (ResolvedStep, Vec<String>) {
    let mut inputs: VariableBag = function
        .parameters
        .iter()
        .map(|parameter| (parameter.name.as_str(), parameter.default_value.as_str()))
        .collect();
    let mut output_bindings = Vec::new();
    let mut results = Vec::new();

    for attribute in &element.attributes {
        if attribute.name.eq_ignore_ascii_case(SET_CONTEXT_VARIABLE_ATTRIBUTE) {
            output_bindings.push(attribute.value.clone());
        } else if attribute.name.eq_ignore_ascii_case(APPEND_TO_RESULT_ATTRIBUTE) {
            output_bindings.push(attribute.value.clone());
            results.push(attribute.value.clone());
        } else {
            inputs.set(attribute.name.as_str(), attribute.value.as_str());
        }
    }

    let step = ResolvedStep {
        function,
        inputs,
        output_bindings,
    };
    (step, results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::FunctionRegistry;
    use crate::markup::parse_document;

    fn registry() -> FunctionRegistry {
        let mut registry = FunctionRegistry::new();
        registry.register(
            FunctionDescriptor::new("Writer", "Tell")
                .with_parameter("input", "Story seed", "")
                .with_parameter("style", "Narrative style", "fable"),
        );
        registry.register(FunctionDescriptor::new("", "Translate").with_parameter(
            "language",
            "Target language",
            "French",
        ));
        registry
    }

    fn compile(markup: &str, allow_missing: bool) -> Result<CompiledSteps, PlanParseError> {
        let document = parse_document(markup).expect("test markup should parse");
        compile_steps(&document, &registry(), allow_missing)
    }

    #[test]
    fn parse_reference_with_plugin() {
        let reference = FunctionReference::parse("function.Writer.Tell").unwrap();
        assert_eq!(reference.plugin_name, "Writer");
        assert_eq!(reference.function_name, "Tell");
        assert_eq!(reference.dotted_name, "Writer.Tell");
    }

    #[test]
    fn parse_reference_without_plugin() {
        let reference = FunctionReference::parse("function.Translate").unwrap();
        assert_eq!(reference.plugin_name, "");
        assert_eq!(reference.function_name, "Translate");
    }

    #[test]
    fn parse_reference_splits_on_first_dot() {
        let reference = FunctionReference::parse("function.A.B.C").unwrap();
        assert_eq!(reference.plugin_name, "A");
        assert_eq!(reference.function_name, "B.C");
    }

    #[test]
    fn parse_reference_prefix_ignores_case() {
        let reference = FunctionReference::parse("Function.Writer.Tell").unwrap();
        assert_eq!(reference.dotted_name, "Writer.Tell");
    }

    #[test]
    fn parse_reference_rejects_other_names() {
        assert!(FunctionReference::parse("function.").is_none());
        assert!(FunctionReference::parse("function.Writer.").is_none());
        assert!(FunctionReference::parse("functions").is_none());
        assert!(FunctionReference::parse("step").is_none());
        assert!(FunctionReference::parse("fünction.X").is_none());
    }

    #[test]
    fn attributes_override_defaults() {
        let compiled = compile(
            r#"<xml><plan><function.Writer.Tell input="x" extra="y"/></plan></xml>"#,
            false,
        )
        .expect("should compile");

        let step = compiled.steps[0].as_resolved().expect("resolved step");
        let inputs: Vec<(&str, &str)> = step.inputs.iter().collect();
        assert_eq!(
            inputs,
            vec![("input", "x"), ("style", "fable"), ("extra", "y")]
        );
        assert!(step.output_bindings.is_empty());
        assert!(compiled.result_outputs.is_empty());
    }

    #[test]
    fn control_attributes_route_outputs() {
        let compiled = compile(
            r#"<xml><plan><function.Writer.Tell SETCONTEXTVARIABLE="draft" appendToResult="final" setContextVariable="copy"/></plan></xml>"#,
            false,
        )
        .expect("should compile");

        let step = compiled.steps[0].as_resolved().unwrap();
        assert_eq!(step.output_bindings, vec!["draft", "final", "copy"]);
        assert_eq!(compiled.result_outputs, vec!["final"]);
        // Control attributes never become inputs.
        assert!(!step.inputs.contains("setContextVariable"));
        assert!(!step.inputs.contains("appendToResult"));
    }

    #[test]
    fn skips_text_comments_and_unknown_elements() {
        let compiled = compile(
            "<xml><plan>\n  <!-- first, tell -->\n  <function.Writer.Tell/>\n  <note>ignored</note>\n  <function./>\n</plan></xml>",
            false,
        )
        .expect("should compile");
        assert_eq!(compiled.steps.len(), 1);
    }

    #[test]
    fn ignores_function_nodes_outside_plan() {
        let compiled = compile(
            "<xml><function.Writer.Tell/><plan><function.Translate/></plan></xml>",
            false,
        )
        .expect("should compile");
        assert_eq!(compiled.steps.len(), 1);
        assert_eq!(compiled.steps[0].name(), "Translate");
    }

    #[test]
    fn processes_every_plan_in_order() {
        let compiled = compile(
            r#"<xml><plan><function.Translate appendToResult="a"/></plan><plan><function.Writer.Tell appendToResult="b"/></plan></xml>"#,
            false,
        )
        .expect("should compile");
        let names: Vec<String> = compiled.steps.iter().map(Step::name).collect();
        assert_eq!(names, vec!["Translate", "Writer.Tell"]);
        assert_eq!(compiled.result_outputs, vec!["a", "b"]);
    }

    #[test]
    fn missing_function_fails_when_not_allowed() {
        let err = compile("<xml><plan><function.Email.Send/></plan></xml>", false).unwrap_err();
        assert!(
            matches!(
                err,
                PlanParseError::FunctionNotFound { ref plugin_name, ref function_name }
                    if plugin_name == "Email" && function_name == "Send"
            ),
            "expected FunctionNotFound, got: {err}"
        );
    }

    #[test]
    fn missing_function_becomes_placeholder_when_allowed() {
        let compiled = compile(
            r#"<xml><plan><function.Email.Send appendToResult="sent"/><function.Writer.Tell/></plan></xml>"#,
            true,
        )
        .expect("should compile");
        assert_eq!(
            compiled.steps[0],
            Step::Placeholder {
                name: "Email.Send".to_string()
            }
        );
        // Placeholders contribute no result outputs.
        assert!(compiled.result_outputs.is_empty());
        assert_eq!(compiled.steps[1].name(), "Writer.Tell");
    }

    #[test]
    fn resolver_receives_split_names() {
        let seen = std::sync::Mutex::new(Vec::new());
        let resolver = |plugin: &str, name: &str| -> Option<Arc<FunctionDescriptor>> {
            seen.lock().unwrap().push(format!("{plugin}|{name}"));
            None
        };
        let document =
            parse_document("<xml><plan><function.A.B/><function.C/></plan></xml>").unwrap();
        let compiled = compile_steps(&document, &resolver, true).unwrap();

        assert_eq!(compiled.steps.len(), 2);
        assert_eq!(*seen.lock().unwrap(), vec!["A|B", "|C"]);
    }

    #[test]
    fn steps_share_the_resolved_descriptor() {
        let registry = registry();
        let document =
            parse_document("<xml><plan><function.Writer.Tell/></plan></xml>").unwrap();
        let compiled = compile_steps(&document, &registry, false).unwrap();

        let step = compiled.steps[0].as_resolved().unwrap();
        let registered = registry.get("Writer", "Tell").unwrap();
        assert!(Arc::ptr_eq(&step.function, registered));
    }
}
