use crate::binding::Binding;

/// Splits the argument portion of a search into its arguments.
///
/// Whitespace-delimited bindings split on runs of whitespace. Other bindings
/// split on every occurrence of their delimiter and trim each piece. Empty
/// pieces are dropped either way, so the result may be empty.
pub fn extract(binding: &Binding, remainder: &str) -> Vec<String> {
    if binding.splits_on_whitespace() {
        return remainder.split_whitespace().map(String::from).collect();
    }

    remainder
        .split(binding.effective_delimiter())
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_delimiter_and_trims() {
        let binding = Binding::new("gh", "GitHub", "https://github.com/{0}/{1}");
        assert_eq!(extract(&binding, " rust-lang - rust "), ["rust", "lang", "rust"]);
        assert_eq!(extract(&binding, " torvalds"), ["torvalds"]);
    }

    #[test]
    fn multi_character_delimiter() {
        let binding = Binding::new("jira", "Jira", "https://jira/{0}/{1}").with_delimiter("::");
        assert_eq!(extract(&binding, " PROJ :: 12-3 ::"), ["PROJ", "12-3"]);
    }

    #[test]
    fn whitespace_delimiter_splits_words() {
        let binding = Binding::new("s", "Search", "https://example.com/{0}").with_delimiter(" ");
        assert_eq!(extract(&binding, "  one   two\tthree "), ["one", "two", "three"]);
    }

    #[test]
    fn returns_all_tokens_regardless_of_placeholders() {
        let binding = Binding::new("x", "X", "https://example.com");
        assert_eq!(extract(&binding, "a - b - c").len(), 3);
    }

    #[test]
    fn empty_remainder_yields_nothing() {
        let binding = Binding::new("gh", "GitHub", "https://github.com/{0}");
        assert!(extract(&binding, "").is_empty());
        assert!(extract(&binding, " -  - ").is_empty());
    }
}
