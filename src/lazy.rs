//! Lazy clause inference.
//!
//! Users of the console often omit clauses the DSL requires. Two rewrites fill
//! them in when it is safe to do so:
//!
//! - **return**: `search grants for "malaria"` gains ` return grants` when no
//!   `return` token is present and `grants` is a known source.
//! - **describe**: a bare `describe` becomes `describe version`.
//!
//! Both rules are identity transforms whenever their precondition does not hold.

use tracing::debug;

use crate::line::{DESCRIBE, DslLine, RETURN};
use crate::vocabulary::Vocabulary;

pub const DEFAULT_DESCRIBE: &str = "describe version";

/// Applies lazy clause rewrites against a read-only vocabulary.
///
/// ```
/// use dslconsole::{LazyRewriter, Vocabulary};
///
/// let vocabulary = Vocabulary::builtin()?;
/// let rewriter = LazyRewriter::new(&vocabulary);
///
/// assert_eq!(
///     rewriter.infer("search publications where year=2020 "),
///     "search publications where year=2020 return publications"
/// );
/// assert_eq!(rewriter.infer("describe"), "describe version");
/// assert_eq!(rewriter.infer("search funders"), "search funders");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LazyRewriter<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> LazyRewriter<'v> {
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &'v Vocabulary {
        self.vocabulary
    }

    /// Append `return <source>` when the line has no return clause.
    pub fn add_lazy_return(&self, text: &str) -> String {
        let line = DslLine::new(text);
        if line.contains(RETURN) {
            return text.to_string();
        }

        match line.search_subject() {
            Some(source) if self.vocabulary.is_source(source) => {
                debug!("inferring return statement for source '{}'", source);
                format!("{} {} {}", text.trim(), RETURN, source)
            }
            _ => text.to_string(),
        }
    }

    /// Default a bare `describe` to `describe version`.
    pub fn add_lazy_describe(&self, line: &str) -> String {
        line_add_lazy_describe(line)
    }

    /// Run every lazy rewrite over the line.
    pub fn infer(&self, line: &str) -> String {
        let rewritten = self.add_lazy_describe(&self.add_lazy_return(line));
        if rewritten != line {
            debug!("lazy inference rewrote '{}' as '{}'", line, rewritten);
        }
        rewritten
    }
}

pub fn line_add_lazy_return(text: &str, vocabulary: &Vocabulary) -> String {
    LazyRewriter::new(vocabulary).add_lazy_return(text)
}

pub fn line_add_lazy_describe(line: &str) -> String {
    let words = DslLine::new(line);
    if words.contains(DESCRIBE) && words.len() == 1 {
        debug!("defaulting bare describe to '{}'", DEFAULT_DESCRIBE);
        return DEFAULT_DESCRIBE.to_string();
    }
    line.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Vocabulary {
        Vocabulary::from_json_str(
            r#"{"sources": {"publications": {}, "grants": {}, "patents": {}}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_lazy_return_appends_known_source() {
        let vocabulary = vocabulary();
        assert_eq!(
            line_add_lazy_return("search grants for \"malaria\"", &vocabulary),
            "search grants for \"malaria\" return grants"
        );
        assert_eq!(
            line_add_lazy_return("  search patents where year=2019  \n", &vocabulary),
            "search patents where year=2019 return patents"
        );
    }

    #[test]
    fn test_lazy_return_identity_when_return_present() {
        let vocabulary = vocabulary();
        for line in [
            "search publications return funders",
            "search publications return",
            "  search grants return grants  ",
        ] {
            assert_eq!(line_add_lazy_return(line, &vocabulary), line);
        }
    }

    #[test]
    fn test_lazy_return_identity_for_unknown_or_missing_source() {
        let vocabulary = vocabulary();
        for line in ["search funders", "search", "describe source publications", ""] {
            assert_eq!(line_add_lazy_return(line, &vocabulary), line);
        }
    }

    #[test]
    fn test_lazy_return_ignores_substring_matches() {
        let vocabulary = vocabulary();
        // "returns" inside a quoted value is not a return clause
        assert_eq!(
            line_add_lazy_return("search publications for \"diminishing returns\"", &vocabulary),
            "search publications for \"diminishing returns\" return publications"
        );
    }

    #[test]
    fn test_lazy_describe() {
        assert_eq!(line_add_lazy_describe("describe"), "describe version");
        assert_eq!(line_add_lazy_describe("  describe \n"), "describe version");
        assert_eq!(line_add_lazy_describe("describe version"), "describe version");
        assert_eq!(
            line_add_lazy_describe("describe publications"),
            "describe publications"
        );
        assert_eq!(line_add_lazy_describe("describes"), "describes");
        assert_eq!(line_add_lazy_describe(""), "");
    }

    #[test]
    fn test_infer_applies_both_rules() {
        let vocabulary = vocabulary();
        let rewriter = LazyRewriter::new(&vocabulary);

        assert_eq!(rewriter.infer("describe"), "describe version");
        assert_eq!(
            rewriter.infer("search grants"),
            "search grants return grants"
        );
        assert_eq!(
            rewriter.infer("search grants return researchers"),
            "search grants return researchers"
        );
        assert!(std::ptr::eq(rewriter.vocabulary(), &vocabulary));
    }

    #[test]
    fn test_rules_commute() {
        let vocabulary = vocabulary();
        let rewriter = LazyRewriter::new(&vocabulary);
        for line in ["describe", "search publications", "describe version", "search x"] {
            let return_first = rewriter.add_lazy_describe(&rewriter.add_lazy_return(line));
            let describe_first = rewriter.add_lazy_return(&rewriter.add_lazy_describe(line));
            assert_eq!(return_first, describe_first, "rules disagree on {line:?}");
        }
    }
}
