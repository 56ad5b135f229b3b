// src/util/text.rs
use regex::Regex;
use std::sync::OnceLock;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Summarize free text as a single display line.
///
/// This function:
/// 1. Takes the first non-blank line
/// 2. Collapses runs of whitespace into one space
/// 3. Truncates to `max_chars` characters, marking the cut with `…`
///
/// # Examples
///
/// ```
/// use noteboard::util::text::summarize;
///
/// assert_eq!(summarize("\n  Buy   milk\nand bread", 40), "Buy milk");
/// assert_eq!(summarize("abcdef", 4), "abc…");
/// ```
pub fn summarize(text: &str, max_chars: usize) -> String {
    let first = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");
    let collapsed = whitespace_re().replace_all(first, " ");

    if collapsed.chars().count() <= max_chars {
        return collapsed.into_owned();
    }
    let keep = max_chars.saturating_sub(1);
    let mut out: String = collapsed.chars().take(keep).collect();
    out.push('…');
    out
}
