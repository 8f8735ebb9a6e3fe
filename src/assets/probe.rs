use std::time::Duration;

use reqwest::StatusCode;

use crate::error::AssetError;

/// Classifies a single asset URL as reachable or not.
///
/// Probes with HEAD first. Hosts that refuse HEAD with 405 get a GET before
/// the URL is judged. Any status below 400 counts as reachable.
#[derive(Debug, Clone)]
pub struct ReachabilityChecker {
    client: reqwest::Client,
}

impl ReachabilityChecker {
    pub fn new(timeout: Duration) -> Result<Self, AssetError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AssetError::Client)?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn check(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(resp) if resp.status() == StatusCode::METHOD_NOT_ALLOWED => {
                tracing::debug!(url, "HEAD not allowed, retrying with GET");
            }
            Ok(resp) => return is_reachable(resp.status()),
            Err(err) => {
                tracing::debug!(url, "HEAD failed: {err}");
                return false;
            }
        }

        match self.client.get(url).send().await {
            Ok(resp) => is_reachable(resp.status()),
            Err(err) => {
                tracing::debug!(url, "GET failed: {err}");
                false
            }
        }
    }
}

fn is_reachable(status: StatusCode) -> bool {
    status.as_u16() < 400
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Route, StubServer, refused_url};

    fn checker() -> ReachabilityChecker {
        ReachabilityChecker::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn ok_head_is_reachable_without_get() {
        let server = StubServer::start(vec![Route::any("/a.png", 200)]);

        assert!(checker().check(&server.url("/a.png")).await);
        assert_eq!(server.hits("HEAD", "/a.png"), 1);
        assert_eq!(server.hits("GET", "/a.png"), 0);
    }

    #[tokio::test]
    async fn method_not_allowed_falls_through_to_get() {
        let server = StubServer::start(vec![
            Route::new("HEAD", "/b.png", 405),
            Route::new("GET", "/b.png", 200),
        ]);

        assert!(checker().check(&server.url("/b.png")).await);
        assert_eq!(server.hits("HEAD", "/b.png"), 1);
        assert_eq!(server.hits("GET", "/b.png"), 1);
    }

    #[tokio::test]
    async fn method_not_allowed_then_failing_get_is_unreachable() {
        let server = StubServer::start(vec![
            Route::new("HEAD", "/c.png", 405),
            Route::new("GET", "/c.png", 500),
        ]);

        assert!(!checker().check(&server.url("/c.png")).await);
    }

    #[tokio::test]
    async fn other_error_status_is_unreachable_without_get() {
        let server = StubServer::start(vec![Route::any("/gone.png", 404)]);

        assert!(!checker().check(&server.url("/gone.png")).await);
        assert_eq!(server.hits("HEAD", "/gone.png"), 1);
        assert_eq!(server.hits("GET", "/gone.png"), 0);
    }

    #[tokio::test]
    async fn connection_failure_is_unreachable() {
        assert!(!checker().check(&refused_url("/x.png")).await);
    }

    #[test]
    fn status_threshold() {
        assert!(is_reachable(StatusCode::OK));
        assert!(is_reachable(StatusCode::NOT_MODIFIED));
        assert!(!is_reachable(StatusCode::BAD_REQUEST));
        assert!(!is_reachable(StatusCode::FORBIDDEN));
    }
}
