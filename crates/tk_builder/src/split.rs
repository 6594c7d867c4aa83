//! Token-aware splitting of `name = value` declaration text.
//!
//! Variable, parameter and enum-member nodes only expose their verbatim
//! text, so the initializer has to be cut off textually. A plain `split('=')`
//! would break on `==`, `=>` or an `=` inside a string literal; these helpers
//! only split at a real assignment token.

/// Split at the first assignment token: `"x = a == b"` → `("x", Some("a == b"))`.
pub fn split_first_assign(text: &str) -> (String, Option<String>) {
    split_at(text, assign_offsets(text).first().copied())
}

/// Split at the last assignment token, used for trailing default values.
pub fn split_last_assign(text: &str) -> (String, Option<String>) {
    split_at(text, assign_offsets(text).last().copied())
}

fn split_at(text: &str, offset: Option<usize>) -> (String, Option<String>) {
    match offset {
        Some(at) => (
            text[..at].trim().to_string(),
            Some(text[at + 1..].trim().to_string()),
        ),
        None => (text.trim().to_string(), None),
    }
}

/// Byte offsets of every `=` that is an assignment token.
fn assign_offsets(text: &str) -> Vec<usize> {
    let chars: Vec<char> = text.chars().collect();
    let mut offsets = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if let Some(skip) = skip_non_code(&chars, i) {
            i = skip;
            continue;
        }

        if chars[i] == '=' {
            let prev = if i > 0 { Some(chars[i - 1]) } else { None };
            let next = chars.get(i + 1).copied();
            // `==`, `=>`, `!=`, `<=`, `>=` and compound assignments.
            let operator_part = matches!(next, Some('=') | Some('>'))
                || matches!(
                    prev,
                    Some('=' | '!' | '<' | '>' | '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '?')
                );
            if !operator_part {
                offsets.push(char_offset_to_byte(&chars, i));
            }
        }

        i += 1;
    }

    offsets
}

/// Skip over comments and string/char literals.
///
/// Returns `Some(new_position)` if `i` is at the start of a non-code region,
/// where `new_position` is the first character after the region.
fn skip_non_code(chars: &[char], i: usize) -> Option<usize> {
    // Single-line comment
    if chars[i] == '/' && chars.get(i + 1) == Some(&'/') {
        let mut j = i + 2;
        while j < chars.len() && chars[j] != '\n' {
            j += 1;
        }
        return Some(j);
    }

    // Multi-line comment
    if chars[i] == '/' && chars.get(i + 1) == Some(&'*') {
        let mut j = i + 2;
        while j + 1 < chars.len() {
            if chars[j] == '*' && chars[j + 1] == '/' {
                return Some(j + 2);
            }
            j += 1;
        }
        return Some(chars.len());
    }

    // Verbatim string: `""` is the only escape.
    if chars[i] == '@' && chars.get(i + 1) == Some(&'"') {
        let mut j = i + 2;
        while j < chars.len() {
            if chars[j] == '"' {
                if chars.get(j + 1) == Some(&'"') {
                    j += 2;
                    continue;
                }
                return Some(j + 1);
            }
            j += 1;
        }
        return Some(chars.len());
    }

    if chars[i] == '"' || chars[i] == '\'' {
        let quote = chars[i];
        let mut j = i + 1;
        while j < chars.len() && chars[j] != quote {
            if chars[j] == '\\' {
                j += 1;
            }
            j += 1;
        }
        return Some(if j < chars.len() { j + 1 } else { chars.len() });
    }

    None
}

fn char_offset_to_byte(chars: &[char], char_idx: usize) -> usize {
    chars[..char_idx].iter().map(|c| c.len_utf8()).sum()
}
