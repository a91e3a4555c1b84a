use std::cmp::Reverse;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use itertools::Itertools;
use url::Url;

use crate::binding::{Binding, Bindings};
use crate::bulk::{self, AggregateCandidate};
use crate::config::EngineConfig;
use crate::error::LinkError;
use crate::icons::{IconRef, IconRequest, IconResolver};
use crate::matchers::{self, KeywordMatcher, Matcher};
use crate::opener::{SystemOpener, UrlOpener};
use crate::score::Scorer;
use crate::template;

/// Lets the host abandon a query that has been superseded.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A binding that matched the current search and rendered to a valid url.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub binding: Binding,
    pub args: Vec<String>,
    /// The argument portion of the search, trimmed.
    pub remainder: String,
    pub url: Url,
    pub score: i64,
    pub icon: Option<IconRef>,
}

/// Opens the url(s) behind a result and reports whether that worked.
#[derive(Clone)]
pub struct Action(Arc<dyn Fn() -> bool + Send + Sync>);

impl Action {
    pub fn new(f: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn run(&self) -> bool {
        (self.0)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action")
    }
}

/// What the host renders for one entry of the result list.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub title: String,
    pub subtitle: String,
    pub score: i64,
    pub icon: IconRef,
    /// Every url the action opens.
    pub urls: Vec<Url>,
    pub action: Action,
}

impl QueryResult {
    pub fn is_bulk(&self) -> bool {
        self.urls.len() > 1
    }
}

pub struct QueryEngine {
    bindings: Bindings,
    matcher: Box<dyn Matcher>,
    scorer: Scorer,
    icons: Arc<IconResolver>,
    opener: Arc<dyn UrlOpener>,
    resolve_icons: bool,
}

impl QueryEngine {
    /// An engine probing favicons over http and opening urls with the system handler.
    pub fn new(bindings: Bindings, config: &EngineConfig) -> Result<Self, LinkError> {
        let icons = Arc::new(IconResolver::new(config)?);
        Ok(Self::with_parts(bindings, config, icons, Arc::new(SystemOpener)))
    }

    pub fn with_parts(
        bindings: Bindings,
        config: &EngineConfig,
        icons: Arc<IconResolver>,
        opener: Arc<dyn UrlOpener>,
    ) -> Self {
        Self {
            bindings,
            matcher: Box::new(KeywordMatcher),
            scorer: Scorer::new(config),
            icons,
            opener,
            resolve_icons: true,
        }
    }

    /// Skips favicon lookups; candidates without an icon path get the default icon.
    pub fn without_icons(mut self) -> Self {
        self.resolve_icons = false;
        self
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn query(&self, search: &str) -> Vec<QueryResult> {
        self.query_with_cancel(search, &CancellationToken::new())
    }

    /// Runs a search against the live binding list.
    ///
    /// Results are ordered by descending score. Failures never surface: a
    /// binding that does not render is left out and an icon that cannot be
    /// fetched becomes the default icon. Cancelling before or during icon
    /// resolution yields no results, cancelling afterwards drops the bulk entry.
    pub fn query_with_cancel(&self, search: &str, cancel: &CancellationToken) -> Vec<QueryResult> {
        let search = search.trim();
        if search.is_empty() {
            return Vec::new();
        }

        let mut candidates = self.candidates(search);

        if cancel.is_cancelled() {
            return Vec::new();
        }

        self.attach_icons(&mut candidates, cancel);

        if cancel.is_cancelled() {
            log::debug!("query {:?} cancelled during icon resolution", search);
            return Vec::new();
        }

        self.assemble(search, &candidates, cancel)
    }

    /// Turns candidates with resolved icons into ordered results, adding the
    /// bulk entry unless the query was cancelled by now.
    fn assemble(&self, search: &str, candidates: &[MatchCandidate], cancel: &CancellationToken) -> Vec<QueryResult> {
        let mut results = candidates.iter().map(|candidate| self.result_for(candidate)).collect_vec();

        if cancel.is_cancelled() {
            log::debug!("query {:?} cancelled, skipping bulk entry", search);
        } else if let Some(aggregate) = bulk::aggregate(candidates, search, &self.scorer) {
            results.push(self.bulk_result(aggregate));
        }

        results.sort_by_key(|result| Reverse(result.score));
        results
    }

    /// Matches, extracts, renders and scores, without touching the network.
    pub fn candidates(&self, search: &str) -> Vec<MatchCandidate> {
        self.bindings.read(|bindings| {
            self.matcher
                .matches(search, bindings)
                .into_iter()
                .filter_map(|found| {
                    let binding = found.binding;
                    let args = matchers::extract(binding, found.remainder);
                    let url = template::render(&binding.url_template, &args)?;
                    let score = self.scorer.score(&binding.url_template, &args, &binding.title, found.remainder);

                    Some(MatchCandidate {
                        binding: binding.clone(),
                        args,
                        remainder: found.remainder.trim().to_string(),
                        url,
                        score,
                        icon: None,
                    })
                })
                .collect()
        })
    }

    fn attach_icons(&self, candidates: &mut [MatchCandidate], cancel: &CancellationToken) {
        if !self.resolve_icons {
            for candidate in candidates.iter_mut() {
                candidate.icon = Some(match candidate.binding.icon_path.as_str() {
                    "" => self.icons.default_icon(),
                    path => IconRef::Local(path.to_string()),
                });
            }
            return;
        }

        let requests = candidates
            .iter()
            .map(|candidate| IconRequest {
                icon_path: &candidate.binding.icon_path,
                url: &candidate.url,
            })
            .collect_vec();

        let icons = self.icons.resolve_all(&requests, cancel);

        for (candidate, icon) in candidates.iter_mut().zip(icons) {
            candidate.icon = icon;
        }
    }

    fn result_for(&self, candidate: &MatchCandidate) -> QueryResult {
        let opener = Arc::clone(&self.opener);
        let url = candidate.url.clone();

        let action = Action::new(move || match opener.open(&url) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("{}", err);
                false
            }
        });

        QueryResult {
            title: candidate.binding.title.clone(),
            subtitle: candidate.url.to_string(),
            score: candidate.score,
            icon: candidate.icon.clone().unwrap_or_else(|| self.icons.default_icon()),
            urls: vec![candidate.url.clone()],
            action,
        }
    }

    fn bulk_result(&self, aggregate: AggregateCandidate) -> QueryResult {
        let opener = Arc::clone(&self.opener);
        let aggregate = Arc::new(aggregate);

        QueryResult {
            title: aggregate.title.clone(),
            subtitle: aggregate.subtitle.clone(),
            score: aggregate.score,
            icon: self.icons.default_icon(),
            urls: aggregate.members.iter().map(|member| member.url.clone()).collect(),
            action: Action::new({
                let aggregate = Arc::clone(&aggregate);
                move || aggregate.open_all(opener.as_ref())
            }),
        }
    }
}
