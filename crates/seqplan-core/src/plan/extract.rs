//! Fragment extraction: locate a parseable plan inside noisy model output.
//!
//! Model output is often not markup on its own: the plan may be wrapped in
//! prose, contain characters that break the surrounding text, or lose its
//! closing tag to a generation length limit. Extraction runs in two stages:
//!
//! 1. Parse the whole text wrapped in a synthetic root element. If that
//!    works, use it as-is. A well-formed text without a `plan` element
//!    has no plan: markup inside comments and CDATA is never searched.
//! 2. If the text is not well-formed, search for the first
//!    `<plan ...>...</plan>` fragment (retrying with a `</plan>` appended
//!    for truncated output) and parse only that fragment.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::markup::{Element, MarkupError, parse_document};

use super::compile::SOLUTION_TAG;
use super::parser::PlanParseError;

/// Name of the synthetic element every candidate fragment is wrapped in.
const SYNTHETIC_ROOT: &str = "xml";

/// First `plan` element: any attributes, shortest body, body may span lines.
static PLAN_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<plan\b[^>]*>(.*?)</plan>").expect("plan fragment pattern should compile")
});

/// A successfully extracted plan fragment.
#[derive(Debug, Clone)]
pub struct ExtractedPlan<'a> {
    /// The text that parsed: the whole input or the recovered fragment.
    pub fragment: Cow<'a, str>,
    /// The parsed fragment, rooted at the synthetic wrapper element.
    pub document: Element,
    /// `true` if the fragment had to be recovered by pattern search.
    pub recovered: bool,
}

/// Extract a parseable plan fragment from raw model output.
pub fn extract(raw_text: &str) -> Result<ExtractedPlan<'_>, PlanParseError> {
    let direct_error = match parse_wrapped(raw_text) {
        Ok(document) if !document.descendants_named(SOLUTION_TAG).is_empty() => {
            return Ok(ExtractedPlan {
                fragment: Cow::Borrowed(raw_text),
                document,
                recovered: false,
            });
        }
        Ok(_) => {
            debug!("plan text is well-formed but contains no plan element");
            return Err(PlanParseError::NoPlanFound {
                text: raw_text.to_owned(),
                source: None,
            });
        }
        Err(error) => {
            debug!(%error, "plan text is not well-formed, searching for a fragment");
            error
        }
    };

    let Some(fragment) = find_fragment(raw_text) else {
        return Err(PlanParseError::NoPlanFound {
            text: raw_text.to_owned(),
            source: Some(direct_error),
        });
    };

    match parse_wrapped(&fragment) {
        Ok(document) => Ok(ExtractedPlan {
            fragment,
            document,
            recovered: true,
        }),
        Err(source) => Err(PlanParseError::MalformedFragment {
            text: raw_text.to_owned(),
            fragment: fragment.into_owned(),
            source,
        }),
    }
}

/// Find the first plan fragment, retrying with a closing tag appended.
fn find_fragment(raw_text: &str) -> Option<Cow<'_, str>> {
    if let Some(found) = PLAN_FRAGMENT.find(raw_text) {
        return Some(Cow::Borrowed(found.as_str()));
    }

    let terminated = format!("{raw_text}</{SOLUTION_TAG}>");
    let found = PLAN_FRAGMENT.find(&terminated)?;
    debug!("recovered plan fragment by appending a closing tag");
    Some(Cow::Owned(found.as_str().to_owned()))
}

fn parse_wrapped(fragment: &str) -> Result<Element, MarkupError> {
    parse_document(&format!("<{SYNTHETIC_ROOT}>{fragment}</{SYNTHETIC_ROOT}>"))
}
