//! # dslconsole - console helpers for a line-oriented search DSL
//!
//! Statements of the query language look like
//! `search publications where year=2020 return funders aggregate altmetric_median sort by rcr_avg`.
//! This crate does not parse them into a tree: it scans the whitespace tokens of
//! one line for a handful of keyword-anchored clauses and fills in the clauses
//! users tend to leave out.
//!
//! ## Quick Start
//!
//! ```rust
//! use dslconsole::{LazyRewriter, Vocabulary, line_search_return};
//!
//! let vocabulary = Vocabulary::builtin()?;
//! let rewriter = LazyRewriter::new(&vocabulary);
//!
//! let line = rewriter.infer(r#"search grants for "malaria""#);
//! assert_eq!(line, r#"search grants for "malaria" return grants"#);
//! assert_eq!(line_search_return(&line), Some("grants"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Lazy Inference
//!
//! - **return**: appended as `return <source>` when the line has no `return`
//!   token and the `search` subject is a known source
//! - **describe**: a bare `describe` becomes `describe version`
//!
//! Anything else is left untouched.
//!
//! ## Clause Extraction
//!
//! | Function | Input | Result |
//! |---|---|---|
//! | [`line_search_subject`] | `search grants return funders` | `Some("grants")` |
//! | [`line_search_return`] | `search grants return` | `None` |
//! | [`line_search_aggregates`] | `... aggregate funding sort by funding` | `Some("funding")` |
//! | [`line_last_two_words`] | `sort by rcr_avg` | `Some("by rcr_avg")` |
//!
//! Extractors return `None` when a keyword or its value is missing; they never fail.
//!
//! ## Architecture
//!
//! - [`words`]: whitespace tokenizer (Pest) and list helpers
//! - [`line`]: clause extractors over one tokenized line
//! - [`lazy`]: lazy clause rewrites
//! - [`vocabulary`]: controlled vocabulary of sources and object URLs
//! - [`render`], [`opener`], [`config`]: HTML reports, viewers and credentials

pub mod config;
pub mod error;
pub mod lazy;
pub mod line;
pub mod opener;
pub mod render;
pub mod vocabulary;
pub mod words;

pub use config::{ConsoleConfig, Instance, Prompter, TerminalPrompter, init_config_folder};
pub use error::ConsoleError;
pub use lazy::{LazyRewriter, line_add_lazy_describe, line_add_lazy_return};
pub use line::{
    DslLine, line_last_two_words, line_last_word, line_search_aggregates, line_search_return,
    line_search_subject,
};
pub use opener::open_multi_platform;
pub use render::{html_template_highlight, html_template_interactive, save_to_file};
pub use vocabulary::Vocabulary;
pub use words::{is_single_word_quoted, list_flatten, listify_and_unify, split_multi_words};

use serde::Serialize;

/// Every clause the extractors know about, for one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineReport {
    pub search: Option<String>,
    #[serde(rename = "return")]
    pub return_: Option<String>,
    pub aggregate: Option<String>,
    pub last_word: Option<String>,
    pub last_two_words: Option<String>,
}

/// Run every extractor over `line`.
pub fn inspect_line(line: &str) -> LineReport {
    let words = DslLine::new(line);
    LineReport {
        search: words.search_subject().map(str::to_string),
        return_: words.search_return().map(str::to_string),
        aggregate: words.search_aggregates().map(str::to_string),
        last_word: words.last_word().map(str::to_string),
        last_two_words: words.last_two_words(),
    }
}
