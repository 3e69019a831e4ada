//! Building `LIKE`/`ILIKE` patterns from user input.

/// Wraps `term` in `%…%` after escaping `\`, `%` and `_`.
///
/// The result is meant for `ILIKE $n ESCAPE '\'`.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
