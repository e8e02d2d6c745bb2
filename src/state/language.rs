// Language filter for the popular repositories view.
// A fixed set of selectors, each mapped to a GitHub search qualifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Language filter driving which result set is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    All,
    JavaScript,
    Ruby,
    Python,
    Java,
    #[serde(rename = "CSS")]
    Css,
}

impl Language {
    /// All selectable languages, in navigation order.
    pub const ALL: [Language; 6] = [
        Language::All,
        Language::JavaScript,
        Language::Ruby,
        Language::Python,
        Language::Java,
        Language::Css,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Language::All => "All",
            Language::JavaScript => "JavaScript",
            Language::Ruby => "Ruby",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::Css => "CSS",
        }
    }

    /// Search qualifier value, or None when no language restriction applies.
    pub fn qualifier(&self) -> Option<&'static str> {
        match self {
            Language::All => None,
            other => Some(other.title()),
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|l| l == self).unwrap_or(0)
    }

    /// Language for a 1-based number key.
    pub fn from_digit(digit: char) -> Option<Self> {
        let n = digit.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(Language::Css.next(), Language::All);
        assert_eq!(Language::All.prev(), Language::Css);
        assert_eq!(Language::Ruby.next(), Language::Python);
    }

    #[test]
    fn test_qualifier() {
        assert_eq!(Language::All.qualifier(), None);
        assert_eq!(Language::Css.qualifier(), Some("CSS"));
        assert_eq!(Language::JavaScript.qualifier(), Some("JavaScript"));
    }

    #[test]
    fn test_from_digit() {
        assert_eq!(Language::from_digit('1'), Some(Language::All));
        assert_eq!(Language::from_digit('6'), Some(Language::Css));
        assert_eq!(Language::from_digit('0'), None);
        assert_eq!(Language::from_digit('7'), None);
        assert_eq!(Language::from_digit('x'), None);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Language::Css).unwrap();
        assert_eq!(json, "\"CSS\"");
        let lang: Language = serde_json::from_str("\"Python\"").unwrap();
        assert_eq!(lang, Language::Python);
    }
}
