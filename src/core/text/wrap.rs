//! Greedy word wrapping at a cell width.

use unicode_segmentation::UnicodeSegmentation;

use super::width::{grapheme_width, visible_width};

/// Wrap `text` into lines no wider than `width` cells.
///
/// Hard newlines always start a new line; a single trailing newline ends the last
/// line instead of opening an empty one. Words wider than `width` are broken at
/// grapheme boundaries. Trailing whitespace is trimmed from every line. Empty input
/// yields no lines.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let width = width.max(1);
    let body = text.strip_suffix('\n').unwrap_or(text);

    let mut result = Vec::new();
    for input_line in body.split('\n') {
        wrap_single_line(input_line, width, &mut result);
    }
    result
}

/// Number of lines `text` occupies at `width`.
pub fn line_count(text: &str, width: usize) -> usize {
    wrap_words(text, width).len()
}

fn wrap_single_line(line: &str, width: usize, out: &mut Vec<String>) {
    if visible_width(line) <= width {
        out.push(line.trim_end().to_string());
        return;
    }

    let mut current_line = String::new();
    let mut current_width = 0;

    for token in split_into_tokens(line) {
        let token_width = visible_width(token);
        let is_whitespace = token.trim().is_empty();

        if is_whitespace {
            // Whitespace never starts a wrapped line.
            if current_width > 0 && current_width + token_width <= width {
                current_line.push_str(token);
                current_width += token_width;
            }
            continue;
        }

        if token_width > width {
            if current_width > 0 {
                out.push(current_line.trim_end().to_string());
                current_line.clear();
                current_width = 0;
            }
            for grapheme in token.graphemes(true) {
                let g_width = grapheme_width(grapheme);
                if current_width + g_width > width && current_width > 0 {
                    out.push(std::mem::take(&mut current_line));
                    current_width = 0;
                }
                current_line.push_str(grapheme);
                current_width += g_width;
            }
            continue;
        }

        if current_width + token_width > width && current_width > 0 {
            out.push(current_line.trim_end().to_string());
            current_line.clear();
            current_width = 0;
        }
        current_line.push_str(token);
        current_width += token_width;
    }

    out.push(current_line.trim_end().to_string());
}

/// Split into alternating runs of whitespace and non-whitespace.
fn split_into_tokens(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_whitespace: Option<bool> = None;

    for (idx, ch) in line.char_indices() {
        let is_ws = ch.is_whitespace();
        match in_whitespace {
            Some(prev) if prev != is_ws => {
                tokens.push(&line[start..idx]);
                start = idx;
            }
            _ => {}
        }
        in_whitespace = Some(is_ws);
    }
    if start < line.len() {
        tokens.push(&line[start..]);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::{line_count, wrap_words};

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_words("hello world", 20), vec!["hello world"]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(
            wrap_words("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn breaks_words_longer_than_width() {
        assert_eq!(wrap_words("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn hard_newlines_start_new_lines() {
        assert_eq!(wrap_words("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn single_trailing_newline_adds_no_line() {
        assert_eq!(wrap_words("a\nb\nc\n", 10), vec!["a", "b", "c"]);
        assert_eq!(line_count("a\n\n", 10), 2);
        assert_eq!(wrap_words("\n", 10), vec![""]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(wrap_words("", 10).is_empty());
        assert_eq!(line_count("", 10), 0);
    }

    #[test]
    fn wrapped_lines_do_not_start_with_whitespace() {
        let lines = wrap_words("aaaa    bbbb", 5);
        assert_eq!(lines, vec!["aaaa", "bbbb"]);
    }
}
