//! `seqplan compile`: turn captured model output into a plan.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tokio::io::AsyncReadExt;

use seqplan_core::plan::{Plan, PlanCompiler};

use crate::functions_cmd::load_registry;

/// How a compiled plan is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable step listing.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Read model output from a file, or from stdin when `input` is `-`.
async fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("failed to read model output from stdin")?;
        return Ok(buf);
    }
    tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("failed to read model output from {input}"))
}

/// Render a plan in the requested format, always newline-terminated.
pub fn render_plan(plan: &Plan, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(plan.to_plan_string()),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(plan).context("failed to serialize plan")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Run the `compile` command.
pub async fn run_compile(
    input: &str,
    goal: &str,
    registry_path: &Path,
    allow_missing: bool,
    format: OutputFormat,
) -> Result<()> {
    let registry = load_registry(registry_path).await?;
    let raw_text = read_input(input).await?;

    let plan = PlanCompiler::new(&registry)
        .allow_missing(allow_missing)
        .compile(&raw_text, goal)
        .context("failed to compile plan")?;

    if plan.has_placeholders() {
        tracing::warn!("plan contains steps for functions missing from the registry");
    }

    print!("{}", render_plan(&plan, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqplan_core::function::FunctionRegistry;
    use seqplan_test_utils::{REGISTRY_TOML, WELL_FORMED_PLAN};

    fn compiled() -> Plan {
        let registry = FunctionRegistry::from_toml_str(REGISTRY_TOML).unwrap();
        PlanCompiler::new(&registry)
            .compile(WELL_FORMED_PLAN, "write and translate")
            .unwrap()
    }

    #[test]
    fn text_format_uses_plan_string() {
        let plan = compiled();
        let text = render_plan(&plan, OutputFormat::Text).unwrap();
        assert_eq!(text, plan.to_plan_string());
        assert!(text.starts_with("Goal: write and translate\n"), "unexpected output: {text}");
    }

    #[test]
    fn json_format_round_trips() {
        let plan = compiled();
        let json = render_plan(&plan, OutputFormat::Json).unwrap();
        assert!(json.ends_with('\n'));

        let parsed: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, plan);
    }

    #[tokio::test]
    async fn missing_input_file_is_reported() {
        let err = read_input("/definitely/not/here.txt").await.unwrap_err();
        assert!(
            err.to_string().contains("/definitely/not/here.txt"),
            "unexpected error: {err}"
        );
    }
}
