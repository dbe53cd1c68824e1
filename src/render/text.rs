use unicode_width::UnicodeWidthStr;

/// Splits text into lines that fit within a maximum width.
///
/// Width is measured by the given function so the same wrapping applies to terminal columns and to
/// rasterized pixels.
pub(crate) struct WordWrapper<F> {
    max_width: f32,
    measure: F,
}

impl<F> WordWrapper<F>
where
    F: Fn(&str) -> f32,
{
    pub(crate) fn new(max_width: f32, measure: F) -> Self {
        Self { max_width, measure }
    }

    /// Wrap the given text.
    ///
    /// Words are split on whitespace. A word that doesn't fit in a line by itself is split at the
    /// character that overflows.
    pub(crate) fn wrap(&self, text: &str) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        for word in text.split_whitespace() {
            let candidate = if current.is_empty() { word.to_string() } else { format!("{current} {word}") };
            if (self.measure)(&candidate) <= self.max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if (self.measure)(word) <= self.max_width {
                current = word.to_string();
            } else {
                let mut pieces = self.split_word(word);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    fn split_word(&self, word: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut current = String::new();
        for c in word.chars() {
            current.push(c);
            if (self.measure)(&current) > self.max_width && current.chars().count() > 1 {
                current.pop();
                pieces.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
        pieces.push(current);
        pieces
    }
}

/// Wrap text to fit in a number of terminal columns.
pub(crate) fn wrap_columns(text: &str, columns: u16) -> Vec<String> {
    WordWrapper::new(columns as f32, |s: &str| s.width() as f32).wrap(text)
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::fits("hello world", 20, &["hello world"])]
    #[case::exact("hello world", 11, &["hello world"])]
    #[case::split("hello world", 10, &["hello", "world"])]
    #[case::many("the quick brown fox jumps", 10, &["the quick", "brown fox", "jumps"])]
    #[case::long_word("abcdefghij xy", 4, &["abcd", "efgh", "ij", "xy"])]
    #[case::collapsed_whitespace("  a   b  ", 10, &["a b"])]
    #[case::empty("", 10, &[])]
    fn wrapping(#[case] text: &str, #[case] columns: u16, #[case] expected: &[&str]) {
        let lines = wrap_columns(text, columns);
        assert_eq!(lines, expected);
    }

    #[test]
    fn wide_characters() {
        let lines = wrap_columns("🧠🧠🧠", 4);
        assert_eq!(lines, &["🧠🧠", "🧠"]);
    }

    #[test]
    fn custom_measure() {
        let wrapper = WordWrapper::new(10.0, |s: &str| s.len() as f32 * 2.5);
        assert_eq!(wrapper.wrap("ab cd ef"), &["ab", "cd", "ef"]);
    }
}
