use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkError {
    // Query path
    #[error("template {template:?} rendered to {rendered:?}, which is not an absolute url")]
    MalformedTemplate { template: String, rendered: String },

    #[error("favicon probe against {url} failed: {reason}")]
    NetworkUnavailable { url: String, reason: String },

    #[error("invalid binding: {0}")]
    InvalidBinding(String),

    // Persistence
    #[error("could not persist bindings to {path}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize bindings")]
    Serialize(#[from] serde_json::Error),

    // Runtime
    #[error("thread pool failure: {0}")]
    ThreadPool(String),

    #[error("could not launch {url}")]
    Launch {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl LinkError {
    /// Whether a query can carry on after this error.
    ///
    /// Template, network and binding failures only cost a single candidate or
    /// an icon. Everything else belongs to the host and is reported there.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedTemplate { .. } | Self::NetworkUnavailable { .. } | Self::InvalidBinding(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_path_errors_are_recoverable() {
        let err = LinkError::MalformedTemplate {
            template: "not a url {0}".into(),
            rendered: "not a url".into(),
        };
        assert!(err.is_recoverable());

        let err = LinkError::ThreadPool("boom".into());
        assert!(!err.is_recoverable());
    }
}
