// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Greedy word wrap at a character-column budget.

/// Wrap `text` so that no line exceeds `max_columns` characters.
///
/// Runs of whitespace collapse to single spaces. Words longer than
/// `max_columns` are force-broken. Empty or blank input yields no lines.
pub fn wrap_columns(text: &str, max_columns: usize) -> Vec<String> {
    let max_columns = max_columns.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_columns {
            // Oversized words start on a fresh line; the last chunk stays open.
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            let mut chunks = chars.chunks(max_columns).peekable();
            while let Some(chunk) = chunks.next() {
                if chunks.peek().is_some() {
                    lines.push(chunk.iter().collect());
                } else {
                    current = chunk.iter().collect();
                    current_len = chunk.len();
                }
            }
        } else if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_columns {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_columns("Blue Razz Lemonade Ice", 10),
            vec!["Blue Razz", "Lemonade", "Ice"]
        );
    }

    #[test]
    fn collapses_whitespace_and_ignores_blank_input() {
        assert_eq!(wrap_columns("  a   b  ", 10), vec!["a b"]);
        assert!(wrap_columns("", 10).is_empty());
        assert!(wrap_columns("   ", 10).is_empty());
    }

    #[test]
    fn breaks_words_longer_than_the_budget() {
        assert_eq!(
            wrap_columns("abcdefghij xy", 4),
            vec!["abcd", "efgh", "ij", "xy"]
        );
        assert_eq!(wrap_columns("ab abcdefgh", 4), vec!["ab", "abcd", "efgh"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(wrap_columns("crème brûlée", 6), vec!["crème", "brûlée"]);
    }

    #[test]
    fn no_line_exceeds_the_budget() {
        let text = "the quick brown fox jumps over the lazy dog again and again";
        for columns in 1..20 {
            for line in wrap_columns(text, columns) {
                assert!(line.chars().count() <= columns, "{columns}: {line:?}");
            }
        }
    }
}
