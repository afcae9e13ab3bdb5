//! Unicode text helpers for fitting item labels into terminal cells.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Strip control characters that would corrupt terminal output.
///
/// Tabs become single spaces; newlines and all other control characters
/// are dropped, since combo rows are one line tall.
pub fn sanitize(s: &str) -> String {
    s.chars()
        .filter_map(|c| match c {
            '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Display width of a string in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` to at most `max_width` columns, appending `tail` when cut.
///
/// The result, tail included, never exceeds `max_width`. Wide characters are
/// never split.
///
/// ```
/// use checkcombo_widgets::runeutil::truncate;
///
/// assert_eq!(truncate("First, Second", 8, "…"), "First, …");
/// assert_eq!(truncate("First", 8, "…"), "First");
/// ```
pub fn truncate(s: &str, max_width: usize, tail: &str) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }

    let tail_width = display_width(tail);
    if tail_width >= max_width {
        return take_width(tail, max_width);
    }

    let mut result = take_width(s, max_width - tail_width);
    result.push_str(tail);
    result
}

fn take_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0;
    for c in s.chars() {
        let cw = c.width().unwrap_or(0);
        if width + cw > max_width {
            break;
        }
        result.push(c);
        width += cw;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_drops_newlines_and_expands_tabs() {
        assert_eq!(sanitize("a\tb\nc\u{7}"), "a bc");
    }

    #[test]
    fn width_counts_wide_chars() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("世界"), 4);
    }

    #[test]
    fn truncate_no_truncation_needed() {
        assert_eq!(truncate("hello", 10, "…"), "hello");
        assert_eq!(truncate("hello", 5, "…"), "hello");
    }

    #[test]
    fn truncate_basic() {
        assert_eq!(truncate("hello world", 8, "..."), "hello...");
    }

    #[test]
    fn truncate_never_splits_wide_chars() {
        // target width 4: "世界" fits, "a" would not
        assert_eq!(truncate("世界abc", 5, "…"), "世界…");
        assert_eq!(truncate("世界abc", 4, "…"), "世…");
    }

    #[test]
    fn truncate_tail_wider_than_budget() {
        assert_eq!(truncate("hello", 2, "..."), "..");
        assert_eq!(truncate("hello", 0, "..."), "");
    }
}
