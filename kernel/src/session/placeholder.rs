//! Whitespace padding that keeps both buffers line-aligned.

/// Builds filler text for the side of a region that has no real content.
///
/// Every non-whitespace char of the source text becomes the fill char and
/// whitespace (newlines included) is kept, so the filler spans the same
/// lines and the same number of chars as the text on the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    fill: char,
}

impl Placeholder {
    /// Creates a placeholder builder using `fill` for non-whitespace chars.
    #[must_use]
    pub const fn new(fill: char) -> Self {
        Self { fill }
    }

    /// Renders the filler for `text`.
    #[must_use]
    pub fn render(&self, text: &str) -> String {
        text.chars()
            .map(|c| if c.is_whitespace() { c } else { self.fill })
            .collect()
    }

    /// Returns true if `candidate` is exactly the filler for `source`.
    #[must_use]
    pub fn is_filler_for(&self, candidate: &str, source: &str) -> bool {
        candidate.chars().count() == source.chars().count()
            && candidate
                .chars()
                .zip(source.chars())
                .all(|(c, s)| if s.is_whitespace() { c == s } else { c == self.fill })
    }
}

impl Default for Placeholder {
    fn default() -> Self {
        Self::new(' ')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_line_structure() {
        let placeholder = Placeholder::default();
        assert_eq!(placeholder.render("ab c\n\tdé\n"), "    \n\t  \n");
    }

    #[test]
    fn custom_fill_char() {
        let placeholder = Placeholder::new('~');
        assert_eq!(placeholder.render("x y\n"), "~ ~\n");
        assert!(placeholder.is_filler_for("~ ~\n", "x y\n"));
        assert!(!placeholder.is_filler_for("x y\n", "x y\n"));
    }

    #[test]
    fn width_matches_source_in_chars() {
        let source = "日本語\n";
        let filler = Placeholder::default().render(source);
        assert_eq!(filler.chars().count(), source.chars().count());
    }
}
