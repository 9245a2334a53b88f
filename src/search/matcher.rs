//! Query normalization and the AND-of-substrings match test.
//!
//! A candidate matches when every whitespace-delimited token of the
//! normalized query appears somewhere in the candidate's searchable
//! text. No stemming, no typo tolerance, no scoring.

/// Trim, case-fold and tokenize a raw query. Whitespace-only input
/// yields no tokens.
pub fn normalize_query(query: &str) -> Vec<String> {
    query.trim().to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// True when every token occurs as a substring of the haystack. The
/// haystack is case-folded here so callers can pass display text as-is.
pub fn matches_all_tokens(haystack: &str, tokens: &[String]) -> bool {
    let folded = haystack.to_lowercase();
    tokens.iter().all(|token| folded.contains(token.as_str()))
}

/// Concatenate a record's searchable fields into one haystack. `None`
/// fields contribute nothing.
pub fn haystack_of(fields: &[Option<&str>]) -> String {
    let mut out = String::new();
    for field in fields.iter().flatten() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(field);
    }
    out
}
