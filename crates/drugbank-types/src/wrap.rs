//! Greedy word wrapping for long free-text fields.

/// Wraps `text` into lines no wider than `max_width` characters.
///
/// Words are packed greedily: a word joins the current line if the line,
/// with a single space before the word, still fits in `max_width`. Words are
/// never split, so a word longer than `max_width` ends up alone on its own
/// line. Width is counted in `char`s. Empty or whitespace-only text yields no
/// lines.
///
/// # Examples
///
/// ```
/// use drugbank_types::wrap_text;
///
/// assert_eq!(wrap_text("alpha beta gamma", 10), vec!["alpha beta", "gamma"]);
/// assert_eq!(wrap_text("alpha beta gamma", 9), vec!["alpha", "beta", "gamma"]);
/// ```
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.chars().count();

        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + 1 + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Wraps `text` and joins the lines with `\n`.
pub fn wrap_joined(text: &str, max_width: usize) -> String {
    wrap_text(text, max_width).join("\n")
}
