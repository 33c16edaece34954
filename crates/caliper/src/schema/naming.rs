//! Splitting column names into lowercase word tokens.

/// Split a column name on separators and camelCase boundaries.
///
/// `customerEmail_addr` becomes `["customer", "email", "addr"]`.
pub fn name_tokens(name: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for ch in name.chars() {
        if !ch.is_alphanumeric() {
            flush(&mut tokens, &mut current);
            prev = None;
            continue;
        }
        if ch.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            flush(&mut tokens, &mut current);
        }
        current.extend(ch.to_lowercase());
        prev = Some(ch);
    }
    flush(&mut tokens, &mut current);

    tokens
}

fn flush(tokens: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}
