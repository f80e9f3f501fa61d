//! FTS5 query construction and document assembly.
//!
//! User text never reaches `MATCH` directly. Terms are quoted as FTS5
//! strings, so operators, column filters and stray quotes in the input are
//! matched literally instead of being parsed.

use crate::traits::{MatchMode, RecipeWrite, SearchDocument};

/// Column weights for `bm25()`, in table column order:
/// recipe_id (unindexed), name, ingredients, steps, categories.
pub const BM25_WEIGHTS: &str = "0.0, 10.0, 5.0, 1.0, 3.0";

/// Quote one term as an FTS5 string.
pub fn quote_term(term: &str) -> String {
    format!("\"{}\"", term.replace('"', "\"\""))
}

/// Build a `MATCH` expression from plain terms.
///
/// Returns `None` when there is nothing to match.
pub fn match_expression(terms: &[String], mode: MatchMode) -> Option<String> {
    let quoted: Vec<String> = terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| quote_term(t))
        .collect();

    if quoted.is_empty() {
        return None;
    }

    let joiner = match mode {
        MatchMode::All => " AND ",
        MatchMode::Any => " OR ",
    };
    Some(quoted.join(joiner))
}

/// Escape `%`, `_` and the escape character itself for `LIKE ... ESCAPE '\'`.
pub fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// The indexed text for an aggregate write.
pub fn document_for(write: &RecipeWrite) -> SearchDocument {
    SearchDocument {
        name: write.record.name.clone(),
        ingredients: write
            .ingredients
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        steps: write
            .steps
            .iter()
            .map(|s| s.instruction.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        categories: write.categories.join(" "),
    }
}
