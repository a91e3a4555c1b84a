pub use args::extract;
pub use keyword::KeywordMatcher;

use crate::binding::Binding;

mod args;
mod keyword;

/// A binding selected by the search text, with the unparsed argument portion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch<'a> {
    pub binding: &'a Binding,
    pub remainder: &'a str,
}

pub trait Matcher: Send + Sync {
    /// Applies the search text against the bindings and returns every binding
    /// that matches, in binding order.
    fn matches<'a>(&self, search: &'a str, bindings: &'a [Binding]) -> Vec<KeywordMatch<'a>>;
}
