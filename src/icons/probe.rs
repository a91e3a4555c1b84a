use std::time::Duration;

use crate::error::LinkError;

pub trait FaviconProbe: Send + Sync {
    /// Checks whether the favicon at `url` can be fetched. The body is ignored.
    fn probe(&self, url: &str) -> Result<(), LinkError>;
}

/// Probes favicons with a plain GET. Error statuses and timeouts count as failure.
pub struct HttpProbe {
    agent: ureq::Agent,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl FaviconProbe for HttpProbe {
    fn probe(&self, url: &str) -> Result<(), LinkError> {
        let response = self.agent.get(url).call().map_err(|err| LinkError::NetworkUnavailable {
            url: url.to_string(),
            reason: err.to_string(),
        })?;

        log::debug!("favicon probe {} answered {}", url, response.status());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_host_fails_quickly() {
        let probe = HttpProbe::new(Duration::from_millis(500));
        let result = probe.probe("http://127.0.0.1:9/favicon.ico");
        assert!(matches!(result, Err(LinkError::NetworkUnavailable { .. })));
    }
}
