//! Line-oriented rule file text.

use std::fmt;

/// Compiled content of a `_redirects` or `_headers` file, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFile {
    lines: Vec<String>,
    trailing_newline: bool,
}

impl RuleFile {
    /// A file whose last line is not newline-terminated.
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            trailing_newline: false,
        }
    }

    /// A file where every line, including the last, ends with a newline.
    pub fn terminated(lines: Vec<String>) -> Self {
        Self {
            lines,
            trailing_newline: true,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render the file text.
    pub fn render(&self) -> String {
        let mut text = self.lines.join("\n");
        if self.trailing_newline && !self.lines.is_empty() {
            text.push('\n');
        }
        text
    }
}

impl fmt::Display for RuleFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(RuleFile::new(lines.clone()).render(), "a\nb");
        assert_eq!(RuleFile::terminated(lines).render(), "a\nb\n");
        assert_eq!(RuleFile::terminated(Vec::new()).render(), "");
    }
}
