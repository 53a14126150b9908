use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};
use tracing::debug;

const PROBE_TIMEOUT_SECS: u64 = 3;

/// Network reachability signal.
#[async_trait]
pub trait Connectivity: Send + Sync + Debug {
    async fn is_online(&self) -> bool;
}

/// Probes a URL; any HTTP response at all counts as online.
#[derive(Debug, Clone)]
pub struct HttpConnectivity {
    probe_url: String,
    http: Client,
}

impl HttpConnectivity {
    pub fn new(probe_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            probe_url: probe_url.into(),
            http,
        })
    }
}

#[async_trait]
impl Connectivity for HttpConnectivity {
    async fn is_online(&self) -> bool {
        match self.http.head(&self.probe_url).send().await {
            Ok(res) => {
                debug!(status = %res.status(), "connectivity probe answered");
                true
            }
            Err(e) => {
                debug!("connectivity probe failed: {e}");
                false
            }
        }
    }
}

/// Reports a fixed state, e.g. when the user forces offline mode.
#[derive(Debug, Clone, Copy)]
pub struct FixedConnectivity(pub bool);

#[async_trait]
impl Connectivity for FixedConnectivity {
    async fn is_online(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

    #[tokio::test]
    async fn any_response_means_online() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let probe = HttpConnectivity::new(server.uri()).unwrap();
        assert!(probe.is_online().await);
    }

    #[tokio::test]
    async fn unreachable_host_means_offline() {
        // Port 9 (discard) on localhost is closed on test machines.
        let probe = HttpConnectivity::new("http://127.0.0.1:9/").unwrap();
        assert!(!probe.is_online().await);
    }

    #[tokio::test]
    async fn fixed_connectivity() {
        assert!(!FixedConnectivity(false).is_online().await);
        assert!(FixedConnectivity(true).is_online().await);
    }
}
