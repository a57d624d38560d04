//! `seqplan functions`: describe every plugin and function in a registry.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use seqplan_core::function::{FunctionDescriptor, FunctionRegistry};

/// Label used for functions outside any plugin.
const GLOBAL_LABEL: &str = "(global)";

/// Read and parse a registry file off the async runtime.
pub async fn load_registry(path: &Path) -> Result<FunctionRegistry> {
    let owned = path.to_path_buf();
    let registry = tokio::task::spawn_blocking(move || FunctionRegistry::load(&owned))
        .await
        .context("registry loader task failed")?
        .with_context(|| format!("failed to load function registry at {}", path.display()))?;
    tracing::debug!(path = %path.display(), functions = registry.len(), "loaded function registry");
    Ok(registry)
}

/// Run the `functions` command.
pub async fn run_functions(registry_path: &Path) -> Result<()> {
    let registry = load_registry(registry_path).await?;
    print!("{}", describe_registry(&registry));
    Ok(())
}

/// Render the registry grouped by plugin, with parameters and defaults.
pub fn describe_registry(registry: &FunctionRegistry) -> String {
    if registry.is_empty() {
        return "No functions registered.\n".to_string();
    }

    let mut out = String::new();
    for (plugin, functions) in registry.plugins() {
        let label = if plugin.is_empty() { GLOBAL_LABEL } else { plugin };
        let _ = writeln!(out, "{label}");
        for function in functions {
            describe_function(&mut out, function);
        }
    }
    out
}

fn describe_function(out: &mut String, function: &FunctionDescriptor) {
    if function.description.is_empty() {
        let _ = writeln!(out, "  {}", function.name);
    } else {
        let _ = writeln!(out, "  {}: {}", function.name, function.description);
    }
    for param in &function.parameters {
        let _ = write!(out, "    {}", param.name);
        if !param.description.is_empty() {
            let _ = write!(out, ": {}", param.description);
        }
        if !param.default_value.is_empty() {
            let _ = write!(out, " (default {:?})", param.default_value);
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_says_so() {
        assert_eq!(
            describe_registry(&FunctionRegistry::new()),
            "No functions registered.\n"
        );
    }

    #[test]
    fn groups_functions_by_plugin() {
        let mut registry = FunctionRegistry::new();
        registry.register(
            FunctionDescriptor::new("Writer", "Tell")
                .with_description("Tell a story")
                .with_parameter("input", "Story seed", "")
                .with_parameter("style", "", "fable"),
        );
        registry.register(FunctionDescriptor::new("", "Translate"));

        let expected = "\
(global)
  Translate
Writer
  Tell: Tell a story
    input: Story seed
    style (default \"fable\")
";
        assert_eq!(describe_registry(&registry), expected);
    }

    #[tokio::test]
    async fn load_registry_reports_path_on_parse_failure() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = seqplan_test_utils::write_file(&tmp, "functions.toml", "[[functions]]\n");

        let err = load_registry(&path).await.unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("failed to load function registry"), "unexpected error: {msg}");
        assert!(msg.contains("TOML parse error"), "unexpected error: {msg}");
    }

    #[tokio::test]
    async fn load_registry_reports_missing_file_once() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("absent.toml");

        let err = load_registry(&path).await.unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("failed to read registry file"), "unexpected error: {msg}");
        assert_eq!(
            msg.matches("No such file").count(),
            1,
            "io error should appear once: {msg}"
        );
    }

    #[tokio::test]
    async fn load_registry_reads_fixture() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = seqplan_test_utils::write_registry(&tmp);

        let registry = load_registry(&path).await.unwrap();
        assert_eq!(registry.len(), 4);
        assert!(registry.get("writer", "tell").is_some());
    }
}
