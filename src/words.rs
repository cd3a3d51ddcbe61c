//! Word-level helpers shared by the clause extractors and the console glue.
//!
//! Tokenization is plain whitespace splitting driven by a small Pest grammar.
//! Quoted values are never grouped: `"clinical trials"` is two words.

use std::collections::BTreeSet;

use pest::Parser;
use pest_derive::Parser;
use serde_json::Value;
use tracing::trace;

use crate::error::ConsoleError;

#[derive(Parser)]
#[grammar = "pest/line.pest"]
struct LineTokenizer;

/// Split a line into its whitespace-delimited words, in order.
///
/// ```
/// use dslconsole::words::tokenize;
///
/// assert_eq!(tokenize("  search  grants\treturn grants "), vec!["search", "grants", "return", "grants"]);
/// assert!(tokenize("   ").is_empty());
/// ```
pub fn tokenize(line: &str) -> Vec<&str> {
    // `line` accepts any input: every char is either WHITE_SPACE or part of a word
    LineTokenizer::parse(Rule::line, line)
        .into_iter()
        .flat_map(|pairs| pairs.flatten())
        .filter(|pair| pair.as_rule() == Rule::word)
        .map(|pair| pair.as_str())
        .collect()
}

/// Merge lists and mapping keys into one sorted list without duplicates.
///
/// Arrays contribute their (string) elements, objects contribute their keys.
/// Anything else is rejected with [`ConsoleError::TypeUnsupported`].
pub fn listify_and_unify(collections: &[&Value]) -> Result<Vec<String>, ConsoleError> {
    let mut unified = BTreeSet::new();

    for collection in collections {
        match collection {
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::String(s) => {
                            unified.insert(s.clone());
                        }
                        other => {
                            return Err(ConsoleError::TypeUnsupported(format!(
                                "list element of type {}",
                                value_kind(other)
                            )));
                        }
                    }
                }
            }
            Value::Object(map) => {
                unified.extend(map.keys().cloned());
            }
            other => return Err(ConsoleError::TypeUnsupported(value_kind(other).to_string())),
        }
    }

    trace!("unified {} collections into {} terms", collections.len(), unified.len());
    Ok(unified.into_iter().collect())
}

/// Break a list of strings down so that it is made of single words only.
pub fn split_multi_words<S: AsRef<str>>(strings: &[S]) -> Vec<String> {
    let broken = strings.iter().map(|s| {
        tokenize(s.as_ref())
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>()
    });
    list_flatten(broken)
}

pub fn list_flatten<I, J, T>(lists: I) -> Vec<T>
where
    I: IntoIterator<Item = J>,
    J: IntoIterator<Item = T>,
{
    lists.into_iter().flatten().collect()
}

/// Whether a word is wrapped in matching double or single quotes.
///
/// An empty word is rejected with [`ConsoleError::InvalidInput`].
pub fn is_single_word_quoted(word: &str) -> Result<bool, ConsoleError> {
    let (Some(first), Some(last)) = (word.chars().next(), word.chars().next_back()) else {
        return Err(ConsoleError::InvalidInput(
            "cannot check quoting of an empty word".to_string(),
        ));
    };

    Ok((first == '"' && last == '"') || (first == '\'' && last == '\''))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
