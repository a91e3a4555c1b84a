use crate::binding::Binding;
use crate::matchers::{KeywordMatch, Matcher};

/// Matches the leading keyword of the search text, honouring each binding's delimiter.
///
/// * keywords containing a space must start the search text verbatim
/// * space-delimited bindings compare the first word: equal to the keyword when
///   more words follow, otherwise a prefix of it
/// * other delimiters compare the text before the first delimiter with the
///   keyword. Without a delimiter the whole text must be a prefix of the keyword
///   and there is no argument portion yet. A keyword that itself contains the
///   delimiter (`g-docs` with `-`) is matched as a whole before splitting.
pub struct KeywordMatcher;

impl Matcher for KeywordMatcher {
    fn matches<'a>(&self, search: &'a str, bindings: &'a [Binding]) -> Vec<KeywordMatch<'a>> {
        let search = search.trim();
        if search.is_empty() {
            return Vec::new();
        }

        bindings.iter()
            .filter(|binding| binding.is_valid())
            .flat_map(|binding| {
                match_binding(binding, search)
                    .map(|remainder| KeywordMatch { binding, remainder })
            })
            .collect()
    }
}

fn match_binding<'a>(binding: &Binding, search: &'a str) -> Option<&'a str> {
    let keyword = binding.keyword.trim();

    if keyword.contains(' ') {
        return strip_prefix_ignore_case(search, keyword);
    }

    if binding.splits_on_whitespace() {
        return match search.split_once(char::is_whitespace) {
            Some((token, rest)) => eq_ignore_case(token, keyword).then(|| rest.trim_start()),
            None => starts_with_ignore_case(keyword, search).then_some(""),
        };
    }

    let delimiter = binding.effective_delimiter();

    if let Some(rest) = strip_prefix_ignore_case(search, keyword) {
        let rest = rest.trim_start();
        if rest.is_empty() {
            return Some("");
        }
        if let Some(args) = rest.strip_prefix(delimiter) {
            return Some(args);
        }
    }

    if starts_with_ignore_case(keyword, search) {
        return Some("");
    }

    let pos = search.find(delimiter)?;
    eq_ignore_case(search[..pos].trim(), keyword).then(|| &search[pos + delimiter.len()..])
}

/// Strips `prefix` from `text` comparing characters case-insensitively.
/// The returned slice borrows from `text`, keeping its original case.
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = text.char_indices();

    for expected in prefix.chars() {
        let (_, actual) = chars.next()?;
        if actual != expected && !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }

    let end = chars.next().map(|(idx, _)| idx).unwrap_or(text.len());
    Some(&text[end..])
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    strip_prefix_ignore_case(text, prefix).is_some()
}

fn eq_ignore_case(lhs: &str, rhs: &str) -> bool {
    strip_prefix_ignore_case(lhs, rhs) == Some("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn github() -> Binding {
        Binding::new("gh", "GitHub", "https://github.com/{0}")
    }

    fn remainders<'a>(search: &'a str, bindings: &'a [Binding]) -> Vec<&'a str> {
        KeywordMatcher.matches(search, bindings).into_iter().map(|m| m.remainder).collect()
    }

    #[test]
    fn blank_search_matches_nothing() {
        let bindings = [github()];
        assert!(remainders("", &bindings).is_empty());
        assert!(remainders("   \t", &bindings).is_empty());
    }

    #[test]
    fn delimiter_splits_keyword_from_arguments() {
        let bindings = [github()];
        assert_eq!(remainders("gh - torvalds", &bindings), [" torvalds"]);
        assert_eq!(remainders("GH-Torvalds", &bindings), ["Torvalds"]);
    }

    #[test]
    fn delimiter_requires_exact_keyword() {
        let bindings = [github()];
        assert!(remainders("ghx - torvalds", &bindings).is_empty());
        assert!(remainders("g - torvalds", &bindings).is_empty());
    }

    #[test]
    fn without_delimiter_partial_keyword_matches() {
        let bindings = [github()];
        assert_eq!(remainders("gh", &bindings), [""]);
        assert_eq!(remainders("g", &bindings), [""]);
        assert!(remainders("ghx", &bindings).is_empty());
        assert!(remainders("gh torvalds", &bindings).is_empty());
    }

    #[test]
    fn keyword_containing_delimiter_matches_whole() {
        let bindings = [Binding::new("g-docs", "Docs", "https://docs.google.com/{0}")];
        assert_eq!(remainders("g-docs", &bindings), [""]);
        assert_eq!(remainders("G-Docs - report", &bindings), [" report"]);
        assert_eq!(remainders("g-do", &bindings), [""]);
        assert!(remainders("g-docsx - report", &bindings).is_empty());
        assert!(remainders("g - docs", &bindings).is_empty());

        let found = KeywordMatcher.matches("g-docs - report", &bindings);
        assert_eq!(crate::matchers::extract(found[0].binding, found[0].remainder), ["report"]);
    }

    #[test]
    fn space_delimiter_uses_first_word() {
        let bindings = [github().with_delimiter(" ")];
        assert_eq!(remainders("gh torvalds linux", &bindings), ["torvalds linux"]);
        assert_eq!(remainders("g", &bindings), [""]);
        assert!(remainders("g torvalds", &bindings).is_empty());
        assert!(remainders("ghx", &bindings).is_empty());
    }

    #[test]
    fn empty_delimiter_behaves_like_space() {
        let bindings = [github().with_delimiter("")];
        assert_eq!(remainders("gh torvalds", &bindings), ["torvalds"]);
    }

    #[test]
    fn keyword_with_space_needs_full_prefix() {
        let bindings = [Binding::new("my site", "Site", "https://example.com/{0}")];
        assert_eq!(remainders("My Site - Page", &bindings), [" - Page"]);
        assert!(remainders("my s", &bindings).is_empty());
    }

    #[test]
    fn invalid_bindings_never_match() {
        let bindings = [Binding::new("gh", "GitHub", ""), Binding::new("", "Empty", "https://example.com")];
        assert!(remainders("gh", &bindings).is_empty());
        assert!(remainders("anything", &bindings).is_empty());
    }

    #[test]
    fn unrelated_search_matches_nothing() {
        let bindings = [github(), Binding::new("rs", "Docs", "https://docs.rs/{0}").with_delimiter(" ")];
        for search in ["xyz", "hello world", "zz - top", "docs serde"] {
            assert!(remainders(search, &bindings).is_empty(), "{search} matched");
        }
    }

    #[test]
    fn original_case_is_preserved_in_remainder() {
        assert_eq!(strip_prefix_ignore_case("ÄBC rest", "äbc"), Some(" rest"));
        assert_eq!(strip_prefix_ignore_case("ab", "abc"), None);
    }
}
