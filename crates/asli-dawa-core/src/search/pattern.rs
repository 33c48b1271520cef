//! Escaped search patterns.
//!
//! User text never reaches the regex engine unescaped: the only way to build
//! a [`SearchPattern`] is from a raw query, which is escaped on construction.

/// A case-insensitive literal pattern built from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    escaped: String,
}

impl SearchPattern {
    /// Escape a raw query so every character matches literally.
    pub fn new(raw: &str) -> Self {
        Self {
            escaped: regex::escape(raw),
        }
    }

    /// True when the pattern would match every string.
    pub fn is_empty(&self) -> bool {
        self.escaped.is_empty()
    }

    /// Pattern matching any text that contains the query, ignoring case.
    pub fn contains(&self) -> String {
        format!("(?i){}", self.escaped)
    }

    /// Pattern matching text equal to the query, ignoring case.
    pub fn whole(&self) -> String {
        format!("(?i)^{}$", self.escaped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use regex::Regex;

    #[test]
    fn test_metacharacters_are_literal() {
        let re = Regex::new(&SearchPattern::new("a.b").contains()).unwrap();
        assert!(re.is_match("A.B tablet"));
        assert!(!re.is_match("axb"));

        let re = Regex::new(&SearchPattern::new("(50mg)").contains()).unwrap();
        assert!(re.is_match("Dolo (50mg)"));
        assert!(!re.is_match("Dolo 50mg"));

        for raw in [".*", "(", "$", "[", "a|b", "\\", "+?", "{2}"] {
            assert!(Regex::new(&SearchPattern::new(raw).contains()).is_ok());
        }
    }

    #[test]
    fn test_whole_is_anchored() {
        let re = Regex::new(&SearchPattern::new("dolo 650").whole()).unwrap();
        assert!(re.is_match("Dolo 650"));
        assert!(!re.is_match("Dolo 650 Plus"));
        assert!(!re.is_match("My Dolo 650"));
    }

    #[test]
    fn test_empty() {
        assert!(SearchPattern::new("").is_empty());
        assert!(!SearchPattern::new(" ").is_empty());
    }

    proptest! {
        #[test]
        fn escaped_query_compiles_and_matches_itself(raw in ".{0,24}") {
            let re = Regex::new(&SearchPattern::new(&raw).contains()).unwrap();
            let haystack = format!("x{}y", raw);
            prop_assert!(re.is_match(&haystack));
        }

        #[test]
        fn dot_never_acts_as_wildcard(a in "[a-z]{1,6}", b in "[a-z]{1,6}") {
            let re = Regex::new(&SearchPattern::new(&format!("{a}.{b}")).contains()).unwrap();
            let haystack = format!("{a}x{b}");
            prop_assert!(!re.is_match(&haystack));
        }
    }
}
