//! Icon resolution for candidates.
//!
//! A binding's own icon path always wins. Otherwise the candidate's host is
//! looked up in a cache shared by all queries, and only on a miss is the
//! favicon service probed. Failed probes are cached as the default icon, so
//! every host touches the network at most once per resolver.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use rayon::prelude::*;
use url::Url;

pub use probe::{FaviconProbe, HttpProbe};

use crate::config::EngineConfig;
use crate::engine::CancellationToken;
use crate::error::LinkError;

mod probe;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconRef {
    /// Icon file configured on the binding.
    Local(String),
    /// Favicon url that answered the probe.
    Remote(String),
    Default(String),
}

impl IconRef {
    pub fn as_str(&self) -> &str {
        match self {
            IconRef::Local(path) | IconRef::Remote(path) | IconRef::Default(path) => path,
        }
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One icon to resolve: the binding's icon path and the rendered url.
#[derive(Debug, Clone, Copy)]
pub struct IconRequest<'a> {
    pub icon_path: &'a str,
    pub url: &'a Url,
}

pub struct IconResolver {
    probe: Arc<dyn FaviconProbe>,
    // one cell per host, initialised by exactly one probe
    cache: Mutex<HashMap<String, Arc<OnceLock<IconRef>>>>,
    pool: rayon::ThreadPool,
    config: EngineConfig,
}

impl IconResolver {
    /// A resolver probing over http with the configured timeout.
    pub fn new(config: &EngineConfig) -> Result<Self, LinkError> {
        Self::with_probe(config, Arc::new(HttpProbe::new(config.probe_timeout())))
    }

    pub fn with_probe(config: &EngineConfig, probe: Arc<dyn FaviconProbe>) -> Result<Self, LinkError> {
        // the pool size is the bound on probes in flight, across all queries
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.max_concurrent_probes.max(1))
            .thread_name(|idx| format!("favicon-probe-{idx}"))
            .build()
            .map_err(|err| LinkError::ThreadPool(err.to_string()))?;

        Ok(Self {
            probe,
            cache: Mutex::new(HashMap::new()),
            pool,
            config: config.clone(),
        })
    }

    pub fn default_icon(&self) -> IconRef {
        IconRef::Default(self.config.default_icon.clone())
    }

    /// Resolves a single icon, probing the network on a cache miss.
    pub fn resolve(&self, request: IconRequest<'_>) -> IconRef {
        if !request.icon_path.is_empty() {
            return IconRef::Local(request.icon_path.to_string());
        }

        let Some(host) = request.url.host_str() else {
            return self.default_icon();
        };

        let cell = Arc::clone(self.cache.lock().entry(host.to_string()).or_default());
        cell.get_or_init(|| self.lookup(host)).clone()
    }

    /// Resolves all icons concurrently on the probe pool.
    ///
    /// The result has one entry per request, in request order. Requests that
    /// were not started before `cancel` fired are `None`.
    pub fn resolve_all(&self, requests: &[IconRequest<'_>], cancel: &CancellationToken) -> Vec<Option<IconRef>> {
        self.pool.install(|| {
            requests
                .par_iter()
                .map(|request| {
                    if cancel.is_cancelled() {
                        return None;
                    }

                    Some(self.resolve(*request))
                })
                .collect()
        })
    }

    /// The cached icon for `host`, if it was resolved before.
    pub fn cached(&self, host: &str) -> Option<IconRef> {
        self.cache.lock().get(host).and_then(|cell| cell.get().cloned())
    }

    fn lookup(&self, host: &str) -> IconRef {
        let favicon = self.config.favicon_url(host);

        match self.probe.probe(&favicon) {
            Ok(()) => IconRef::Remote(favicon),
            Err(err) if err.is_recoverable() => {
                log::debug!("using default icon for {}: {}", host, err);
                self.default_icon()
            }
            Err(err) => {
                log::warn!("favicon lookup for {} failed: {}", host, err);
                self.default_icon()
            }
        }
    }
}
