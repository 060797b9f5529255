//! Line tokenizer for the VDF text format.

/// Split a single line into tokens.
///
/// Double-quoted runs become one token holding the text between the quotes,
/// taken verbatim (there is no escape syntax, so a quote cannot appear inside a
/// quoted token). Outside quotes, maximal runs of non-whitespace characters are
/// tokens. A quote with no closing partner is not special: it starts a bare
/// token like any other character, so `"b c` yields `"b` and `c`.
///
/// ```
/// use vdf_core::tokenize;
///
/// assert_eq!(tokenize(r#"  "name"  "Example Game" "#), vec!["name", "Example Game"]);
/// assert_eq!(tokenize("bare {"), vec!["bare", "{"]);
/// assert_eq!(tokenize(r#""a" "b c"#), vec!["a", "\"b", "c"]);
/// assert!(tokenize("   ").is_empty());
/// ```
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            let body_start = start + 1;
            if let Some(len) = line[body_start..].find('"') {
                let body_end = body_start + len;
                tokens.push(line[body_start..body_end].to_string());
                while chars.next_if(|&(i, _)| i <= body_end).is_some() {}
                continue;
            }
            // No closing quote: the quote opens an ordinary bare run
            chars.next();
        }

        // Bare token: runs until whitespace or the start of a quoted token
        let mut end = line.len();
        while let Some(&(i, ch)) = chars.peek() {
            if ch.is_whitespace() || ch == '"' {
                end = i;
                break;
            }
            chars.next();
        }
        tokens.push(line[start..end].to_string());
    }

    tokens
}
