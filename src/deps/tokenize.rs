// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tokenizer for declared-input strings.
//!
//! Declarations arrive as free-form strings: a bare name, a comma-separated
//! list, or a stringified list with bracket/quote wrapping, with arbitrary
//! whitespace. The parse is deliberately ad hoc and its exact behavior is
//! load-bearing: downstream code and configs rely on it, so the steps below
//! are fixed:
//!
//! 1. replace `'`, `[`, `]` with spaces
//! 2. remove ALL whitespace
//! 3. replace commas with spaces
//! 4. split on whitespace
//!
//! Step 2 runs before step 3, so whitespace inside a name vanishes rather
//! than separating tokens: `"foo bar"` tokenizes to `["foobar"]`. Empty
//! declarations and empty lists (`""`, `"[]"`, `"[ ]"`) tokenize to no
//! tokens at all.
//!
//! ```
//! use conveyor::deps::tokenize_declaration;
//!
//! assert_eq!(tokenize_declaration("a, b").unwrap(), vec!["a", "b"]);
//! assert_eq!(tokenize_declaration("['x', 'y']").unwrap(), vec!["x", "y"]);
//! assert_eq!(tokenize_declaration("foo bar").unwrap(), vec!["foobar"]);
//! assert!(tokenize_declaration("[]").unwrap().is_empty());
//! ```

/// Characters that survive into a token.
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '.' | ':')
}

/// Characters the tokenizer knows how to consume without producing output.
fn is_structural_char(c: char) -> bool {
    matches!(c, '\'' | '[' | ']' | ',') || c.is_whitespace()
}

/// Split one declaration string into product-name tokens.
///
/// Returns `None` when the declaration contains a character that is neither
/// part of a name nor part of the list syntax; such a declaration cannot be
/// tokenized and is a configuration error at the call site.
pub fn tokenize_declaration(raw: &str) -> Option<Vec<String>> {
    if raw.chars().any(|c| !is_token_char(c) && !is_structural_char(c)) {
        return None;
    }

    let stripped: String = raw
        .chars()
        .map(|c| if matches!(c, '\'' | '[' | ']') { ' ' } else { c })
        .filter(|c| !c.is_whitespace())
        .collect();

    Some(
        stripped
            .split(',')
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name() {
        assert_eq!(tokenize_declaration("hits").unwrap(), vec!["hits"]);
    }

    #[test]
    fn comma_separated() {
        assert_eq!(tokenize_declaration("a, b").unwrap(), vec!["a", "b"]);
        assert_eq!(tokenize_declaration("a,b,c").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn bracket_and_quote_wrapping() {
        assert_eq!(
            tokenize_declaration("['x', 'y']").unwrap(),
            vec!["x", "y"]
        );
        assert_eq!(tokenize_declaration("[x, y]").unwrap(), vec!["x", "y"]);
        assert_eq!(tokenize_declaration("'solo'").unwrap(), vec!["solo"]);
    }

    #[test]
    fn embedded_whitespace_vanishes_before_comma_split() {
        // Whitespace removal happens before commas become separators, so a
        // space inside a name joins rather than splits.
        assert_eq!(tokenize_declaration("foo bar").unwrap(), vec!["foobar"]);
        assert_eq!(
            tokenize_declaration(" a b , c ").unwrap(),
            vec!["ab", "c"]
        );
    }

    #[test]
    fn empty_forms() {
        assert!(tokenize_declaration("").unwrap().is_empty());
        assert!(tokenize_declaration("[]").unwrap().is_empty());
        assert!(tokenize_declaration("[ ]").unwrap().is_empty());
        assert!(tokenize_declaration(" , ,, ").unwrap().is_empty());
    }

    #[test]
    fn path_like_names() {
        assert_eq!(
            tokenize_declaration("['/event/hits', '/event/cells']").unwrap(),
            vec!["/event/hits", "/event/cells"]
        );
    }

    #[test]
    fn untokenizable_characters_rejected() {
        assert!(tokenize_declaration("a;b").is_none());
        assert!(tokenize_declaration("{x}").is_none());
        assert!(tokenize_declaration("\"quoted\"").is_none());
    }
}
