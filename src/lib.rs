//! Keyword driven url launcher.
//!
//! Users bind keywords to url templates such as `gh` → `https://github.com/{0}`.
//! Typing `gh - torvalds` then offers `https://github.com/torvalds`. When several
//! bulk-enabled bindings match, an extra "open all" result is offered as well.
//!
//! ```no_run
//! use linkopener::{Binding, Bindings, EngineConfig, QueryEngine};
//!
//! let bindings = Bindings::new(vec![
//!     Binding::new("gh", "GitHub", "https://github.com/{0}"),
//! ]);
//!
//! let engine = QueryEngine::new(bindings, &EngineConfig::default()).unwrap();
//! for result in engine.query("gh - torvalds") {
//!     println!("{} {} ({})", result.title, result.subtitle, result.score);
//! }
//! ```

pub mod binding;
pub mod bulk;
pub mod config;
pub mod engine;
pub mod error;
pub mod icons;
pub mod matchers;
pub mod opener;
pub mod score;
pub mod store;
pub mod template;

pub use binding::{Binding, Bindings};
pub use bulk::{AggregateCandidate, BulkMember};
pub use config::EngineConfig;
pub use engine::{Action, CancellationToken, MatchCandidate, QueryEngine, QueryResult};
pub use error::LinkError;
pub use icons::{FaviconProbe, HttpProbe, IconRef, IconResolver};
pub use matchers::{KeywordMatch, KeywordMatcher, Matcher};
pub use opener::{SystemOpener, UrlOpener};
pub use score::Scorer;
pub use store::BindingStore;
