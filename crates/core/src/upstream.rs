//! Remote-call boundary: a single authenticated GET returning a JSON payload.

use crate::config::LolbyteConfig;
use crate::error::{LolError, LolResult};
use reqwest::{header, Client};
use serde_json::Value;
use tracing::{debug, warn};

/// Header carrying the Riot API key.
pub const RIOT_TOKEN_HEADER: &str = "X-Riot-Token";

/// Performs one outbound request. The fetch pipeline is the only caller.
#[async_trait::async_trait]
pub trait Upstream: Send + Sync {
    async fn get(&self, url: &str) -> LolResult<Value>;
}

/// reqwest-backed upstream that injects the API key on every request.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
}

impl HttpUpstream {
    pub fn new(config: &LolbyteConfig) -> LolResult<Self> {
        let mut headers = header::HeaderMap::new();

        let mut token = header::HeaderValue::from_str(&config.api_key)
            .map_err(|_| LolError::Config("Invalid API key format".to_string()))?;
        token.set_sensitive(true);
        headers.insert(header::HeaderName::from_static("x-riot-token"), token);

        let client = Client::builder()
            .user_agent(concat!("lolbyte-mcp/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| LolError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Upstream for HttpUpstream {
    async fn get(&self, url: &str) -> LolResult<Value> {
        debug!(url = %url, "GET request");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Request failed");
            LolError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), "Riot API returned an error");
            return Err(LolError::from_response(status.as_u16(), &body));
        }

        let body = response.json().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_upstream(api_key: &str) -> HttpUpstream {
        HttpUpstream::new(&LolbyteConfig::new(api_key)).unwrap()
    }

    #[tokio::test]
    async fn test_get_sends_riot_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/lol/match/v5/matches/NA1_1"))
            .and(header(RIOT_TOKEN_HEADER, "RGAPI-test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"metadata": {"matchId": "NA1_1"}})))
            .expect(1)
            .mount(&server)
            .await;

        let upstream = create_upstream("RGAPI-test-key");
        let result = upstream
            .get(&format!("{}/lol/match/v5/matches/NA1_1", server.uri()))
            .await
            .unwrap();

        assert_eq!(result["metadata"]["matchId"], "NA1_1");
    }

    #[tokio::test]
    async fn test_error_status_carries_riot_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/riot/account/v1/accounts/by-riot-id/Nobody/000"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status": {"message": "Data not found", "status_code": 404}
            })))
            .mount(&server)
            .await;

        let upstream = create_upstream("RGAPI-test-key");
        let result = upstream
            .get(&format!("{}/riot/account/v1/accounts/by-riot-id/Nobody/000", server.uri()))
            .await;

        match result {
            Err(LolError::Upstream { status, message }) => {
                assert_eq!(status, Some(404));
                assert_eq!(message, "Data not found");
            }
            other => panic!("Expected Upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rate_limited_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string(""))
            .mount(&server)
            .await;

        let upstream = create_upstream("RGAPI-test-key");
        let err = upstream.get(&server.uri()).await.unwrap_err();

        assert!(err.is_upstream());
        assert_eq!(err.status(), Some(429));
    }

    #[tokio::test]
    async fn test_timeout_is_upstream_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let mut config = LolbyteConfig::new("RGAPI-test-key");
        config.http.timeout_secs = 1;
        let upstream = HttpUpstream::new(&config).unwrap();

        let err = upstream.get(&server.uri()).await.unwrap_err();
        assert!(err.is_upstream());
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_connection_refused_is_upstream_failure() {
        let upstream = create_upstream("RGAPI-test-key");
        let err = upstream.get("http://127.0.0.1:9/unreachable").await.unwrap_err();

        assert!(err.is_upstream());
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let result = HttpUpstream::new(&LolbyteConfig::new("bad\nkey"));
        assert!(matches!(result, Err(LolError::Config(_))));
    }
}
