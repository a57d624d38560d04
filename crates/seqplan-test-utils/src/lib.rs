//! Shared test fixtures for seqplan integration tests.
//!
//! Provides a sample function registry (as TOML, so every crate loads it
//! through the same code path the CLI uses) and a set of realistic model
//! outputs, from clean markup to truncated and noisy text.

use std::path::PathBuf;

use tempfile::TempDir;

/// Registry with two `Writer` functions, an `Email` plugin and a global
/// `Translate` function.
pub const REGISTRY_TOML: &str = r#"
[[functions]]
plugin = "Writer"
name = "Tell"
description = "Tell a short story"

[[functions.parameters]]
name = "input"
description = "Story seed"
default = ""

[[functions.parameters]]
name = "style"
description = "Narrative style"
default = "fable"

[[functions]]
plugin = "Writer"
name = "Summarize"
description = "Summarize a text"

[[functions.parameters]]
name = "input"
description = "Text to summarize"
default = ""

[[functions]]
plugin = "Email"
name = "Send"
description = "Send an email"

[[functions.parameters]]
name = "to"
description = "Recipient address"
default = ""

[[functions.parameters]]
name = "subject"
description = "Subject line"
default = "Plan result"

[[functions]]
name = "Translate"
description = "Translate text"

[[functions.parameters]]
name = "input"
description = "Text to translate"
default = ""

[[functions.parameters]]
name = "language"
description = "Target language"
default = "French"
"#;

/// A clean three-step plan chaining variables through to the result.
pub const WELL_FORMED_PLAN: &str = r#"<plan>
  <!-- Write the story first -->
  <function.Writer.Tell input="a dragon who learns to cook" setContextVariable="STORY"/>
  <function.Writer.Summarize input="$STORY" appendToResult="SUMMARY"/>
  <function.Translate input="$SUMMARY" language="Italian" appendToResult="TRANSLATED"/>
</plan>"#;

/// A plan wrapped in prose containing characters that are not valid markup.
pub const PROSE_WRAPPED_PLAN: &str = r#"Sure! Here's a plan that should work for you & your team:

<plan>
  <function.Writer.Tell input="a dragon who learns to cook" setContextVariable="STORY"/>
  <function.Email.Send input="$STORY" to="team@example.com" appendToResult="RECEIPT"/>
</plan>

Let me know if you'd like any changes <3"#;

/// A plan whose closing tag was cut off by a generation limit.
pub const TRUNCATED_PLAN: &str =
    r#"Here is your plan: <plan><function.Writer.Tell input="short" appendToResult="STORY"/>"#;

/// Model output with no plan at all.
pub const NO_PLAN: &str = "I'm sorry, I can't create a plan for that goal.";

/// Write [`REGISTRY_TOML`] to `functions.toml` inside `dir`.
pub fn write_registry(dir: &TempDir) -> PathBuf {
    write_file(dir, "functions.toml", REGISTRY_TOML)
}

/// Write `content` to `name` inside `dir` and return its path.
pub fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content)
        .unwrap_or_else(|e| panic!("failed to write fixture {}: {e}", path.display()));
    path
}
