//! Positional clause extraction over a single DSL statement.
//!
//! Every extractor scans the whitespace tokens of the line for the first
//! occurrence of a keyword and looks at what follows. A missing keyword or a
//! missing value is `None`, never an error: callers decide on their own fallback.

use crate::words::tokenize;

pub const SEARCH: &str = "search";
pub const RETURN: &str = "return";
pub const AGGREGATE: &str = "aggregate";
pub const DESCRIBE: &str = "describe";

/// A DSL statement split into whitespace-delimited tokens.
///
/// Tokenize once and ask several questions:
///
/// ```
/// use dslconsole::DslLine;
///
/// let line = DslLine::new("search publications return funders aggregate altmetric_median sort by rcr_avg");
/// assert_eq!(line.search_subject(), Some("publications"));
/// assert_eq!(line.search_return(), Some("funders"));
/// assert_eq!(line.search_aggregates(), Some("altmetric_median"));
/// assert_eq!(line.last_two_words(), Some("by rcr_avg".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DslLine<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> DslLine<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            tokens: tokenize(line),
        }
    }

    pub fn tokens(&self) -> &[&'a str] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether `word` appears as a whole token.
    pub fn contains(&self, word: &str) -> bool {
        self.tokens.iter().any(|t| *t == word)
    }

    pub fn last_word(&self) -> Option<&'a str> {
        self.tokens.last().copied()
    }

    /// The last two tokens joined by a single space.
    pub fn last_two_words(&self) -> Option<String> {
        match self.tokens.as_slice() {
            [.., second_last, last] => Some(format!("{second_last} {last}")),
            _ => None,
        }
    }

    /// The source queried by the first `search` clause.
    pub fn search_subject(&self) -> Option<&'a str> {
        if self.tokens.len() < 2 {
            return None;
        }
        self.word_after(SEARCH, 1)
    }

    /// The field named by the first `return` clause.
    // TODO: support multiple return values (`return funders + research_orgs`)
    pub fn search_return(&self) -> Option<&'a str> {
        self.word_after(RETURN, 1)
    }

    /// The field named by the first `aggregate` clause.
    ///
    /// An aggregate is always followed by more syntax (e.g. `sort by`), so two
    /// trailing tokens are required before the first one is returned.
    pub fn search_aggregates(&self) -> Option<&'a str> {
        self.word_after(AGGREGATE, 2)
    }

    /// Token right after the first `keyword`, if at least `min_trailing` tokens follow it.
    fn word_after(&self, keyword: &str, min_trailing: usize) -> Option<&'a str> {
        let index = self.tokens.iter().position(|t| *t == keyword)?;
        if self.tokens.len() - index - 1 < min_trailing {
            return None;
        }
        self.tokens.get(index + 1).copied()
    }
}

pub fn line_last_word(line: &str) -> Option<&str> {
    DslLine::new(line).last_word()
}

pub fn line_last_two_words(line: &str) -> Option<String> {
    DslLine::new(line).last_two_words()
}

/// Get the source one searches for.
///
/// ```
/// use dslconsole::line_search_subject;
///
/// assert_eq!(
///     line_search_subject("search publications where year=2020 return publications"),
///     Some("publications")
/// );
/// assert_eq!(line_search_subject("describe source publications"), None);
/// ```
pub fn line_search_subject(line: &str) -> Option<&str> {
    DslLine::new(line).search_subject()
}

pub fn line_search_return(line: &str) -> Option<&str> {
    DslLine::new(line).search_return()
}

pub fn line_search_aggregates(line: &str) -> Option<&str> {
    DslLine::new(line).search_aggregates()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_word() {
        assert_eq!(line_last_word("search grants return grants"), Some("grants"));
        assert_eq!(line_last_word("describe  "), Some("describe"));
        assert_eq!(line_last_word(""), None);
        assert_eq!(line_last_word(" \t "), None);
    }

    #[test]
    fn test_last_two_words() {
        assert_eq!(
            line_last_two_words("search grants   return grants"),
            Some("return grants".to_string())
        );
        assert_eq!(line_last_two_words("describe"), None);
        assert_eq!(line_last_two_words(""), None);
    }

    #[test]
    fn test_search_subject() {
        assert_eq!(
            line_search_subject("search publications where year=2020 return publications"),
            Some("publications")
        );
        assert_eq!(line_search_subject("search"), None);
        assert_eq!(line_search_subject("search  "), None);
        assert_eq!(line_search_subject("describe version"), None);
        // keyword as the last token
        assert_eq!(line_search_subject("describe search"), None);
    }

    #[test]
    fn test_search_subject_first_match_wins() {
        assert_eq!(
            line_search_subject("search grants for search patents"),
            Some("grants")
        );
    }

    #[test]
    fn test_search_return() {
        assert_eq!(
            line_search_return("search publications return funders"),
            Some("funders")
        );
        assert_eq!(line_search_return("search publications return"), None);
        assert_eq!(line_search_return("search publications"), None);
        assert_eq!(
            line_search_return("search grants return funders return research_orgs"),
            Some("funders")
        );
    }

    #[test]
    fn test_search_return_is_token_based() {
        // "returns" is not the keyword
        assert_eq!(line_search_return("search publications returns funders"), None);
    }

    #[test]
    fn test_search_aggregates() {
        assert_eq!(
            line_search_aggregates(
                "search publications return funders aggregate altmetric_median sort by rcr_avg"
            ),
            Some("altmetric_median")
        );
        assert_eq!(
            line_search_aggregates("search publications return funders aggregate altmetric_median sort"),
            Some("altmetric_median")
        );
    }

    #[test]
    fn test_search_aggregates_needs_two_trailing_tokens() {
        assert_eq!(
            line_search_aggregates("search publications return funders aggregate altmetric_median"),
            None
        );
        assert_eq!(line_search_aggregates("search publications return funders aggregate"), None);
        assert_eq!(line_search_aggregates("search publications return funders"), None);
    }

    #[test]
    fn test_dsl_line_accessors() {
        let line = DslLine::new("  search   grants  ");
        assert_eq!(line.len(), 2);
        assert!(!line.is_empty());
        assert!(line.contains("grants"));
        assert!(!line.contains("gran"));
        assert_eq!(line.tokens(), &["search", "grants"]);
        assert!(DslLine::new("").is_empty());
    }
}
