//! Positional `{N}` placeholders in url templates.
//!
//! The distinct placeholder indices of a template are sorted and handed the
//! arguments in that order, so `{3}` and `{7}` in one template consume the
//! first and second argument. Placeholders left without an argument render
//! as the empty string.

use std::collections::BTreeSet;
use std::ops::Range;

use itertools::Itertools;
use url::Url;

use crate::error::LinkError;

/// One `{N}` occurrence: its byte range in the template and its index.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Placeholder {
    span: Range<usize>,
    index: usize,
}

fn scan(template: &str) -> Vec<Placeholder> {
    let bytes = template.as_bytes();
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(offset) = template[pos..].find('{') {
        let start = pos + offset;
        let digits = bytes[start + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
        let end = start + 1 + digits;

        if digits > 0 && bytes.get(end) == Some(&b'}') {
            if let Ok(index) = template[start + 1..end].parse() {
                found.push(Placeholder { span: start..end + 1, index });
                pos = end + 1;
                continue;
            }
        }

        pos = start + 1;
    }

    found
}

/// Distinct placeholder indices in ascending order.
fn distinct_indices(placeholders: &[Placeholder]) -> Vec<usize> {
    placeholders
        .iter()
        .map(|p| p.index)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Number of distinct `{N}` placeholders in `template`.
pub fn count_placeholders(template: &str) -> usize {
    distinct_indices(&scan(template)).len()
}

/// How many placeholders actually receive an argument when rendering with `arg_count` arguments.
pub fn placeholders_used(template: &str, arg_count: usize) -> usize {
    count_placeholders(template).min(arg_count)
}

/// Substitutes `args` into `template` and parses the result as an absolute url.
pub fn try_render(template: &str, args: &[String]) -> Result<Url, LinkError> {
    let placeholders = scan(template);
    let indices = distinct_indices(&placeholders);

    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;

    for placeholder in &placeholders {
        rendered.push_str(&template[last..placeholder.span.start]);

        let slot = indices.iter().position(|&idx| idx == placeholder.index);
        if let Some(arg) = slot.and_then(|slot| args.get(slot)) {
            rendered.push_str(&urlencoding::encode(arg));
        }

        last = placeholder.span.end;
    }

    rendered.push_str(&template[last..]);

    let rendered = rendered.split_whitespace().join(" ");

    Url::parse(&rendered).map_err(|_| LinkError::MalformedTemplate {
        template: template.to_string(),
        rendered,
    })
}

/// Like [`try_render`], but a malformed result is simply `None`.
pub fn render(template: &str, args: &[String]) -> Option<Url> {
    match try_render(template, args) {
        Ok(url) => Some(url),
        Err(err) => {
            log::debug!("{}", err);
            None
        }
    }
}
