use async_trait::async_trait;
use chlmon_core::error::{ChlmonError, Result};
use chlmon_core::ports::{ApiRequest, SessionStore, Transport};
use std::sync::Arc;
use std::time::Duration;

/// reqwest-backed client for the analysis API
pub struct ApiClient {
    /// Base URL without trailing slash (e.g., "http://localhost:8000")
    base_url: String,

    /// Durable session storage, read on every request
    sessions: Arc<dyn SessionStore>,

    /// HTTP client
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client with no request timeout
    pub fn new(base_url: impl Into<String>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            sessions,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client that gives up on requests after `timeout`
    pub fn with_timeout(
        base_url: impl Into<String>,
        sessions: Arc<dyn SessionStore>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChlmonError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            sessions,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the HTTP request for an API call.
    ///
    /// The bearer token is read from session storage at build time and
    /// attached only when one is stored.
    pub fn build_request(&self, request: &ApiRequest) -> Result<reqwest::Request> {
        let mut url = reqwest::Url::parse(&format!("{}{}", self.base_url, request.path)).map_err(
            |e| ChlmonError::ConfigInvalid {
                key: "api_base".to_string(),
                reason: format!("Cannot build URL for {}: {}", request.path, e),
            },
        )?;

        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }

        let mut builder = self.client.post(url).json(&request.body);

        if request.authenticated {
            if let Some(session) = self.sessions.load()? {
                builder = builder.bearer_auth(&session.token);
            }
        }

        builder
            .build()
            .map_err(|e| ChlmonError::Network(format!("Failed to build request: {}", e)))
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn post(&self, request: &ApiRequest) -> Result<serde_json::Value> {
        let http_request = self.build_request(request)?;

        tracing::debug!(url = %http_request.url(), "POST");

        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(|e| ChlmonError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChlmonError::Api { status: status.as_u16(), body });
        }

        response.json().await.map_err(|e| ChlmonError::Decode {
            path: request.display_path(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chlmon_core::models::Session;
    use chlmon_core::state::MemorySessionStore;
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
    use serde_json::json;

    fn client_with(store: MemorySessionStore) -> ApiClient {
        ApiClient::new("http://localhost:8000/", Arc::new(store))
    }

    #[test]
    fn test_bearer_attached_when_token_stored() {
        let client = client_with(MemorySessionStore::with_session(Session::new("abc123", "a@b.c")));
        let request = client.build_request(&ApiRequest::post("/tiles/ndvi", json!({}))).unwrap();

        assert_eq!(request.headers().get(AUTHORIZATION).unwrap().to_str().unwrap(), "Bearer abc123");
    }

    #[test]
    fn test_no_authorization_without_token() {
        let client = client_with(MemorySessionStore::new());
        let request = client.build_request(&ApiRequest::post("/tiles/ndvi", json!({}))).unwrap();

        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_anonymous_request_skips_token() {
        let client = client_with(MemorySessionStore::with_session(Session::new("abc123", "a@b.c")));
        let request = client
            .build_request(&ApiRequest::post("/auth/google", json!({})).anonymous())
            .unwrap();

        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_token_read_on_every_build() {
        let store = Arc::new(MemorySessionStore::new());
        let client = ApiClient::new("http://localhost:8000", store.clone());
        let call = ApiRequest::post("/tiles/ndvi", json!({}));

        assert!(client.build_request(&call).unwrap().headers().get(AUTHORIZATION).is_none());
        store.save(&Session::new("late", "a@b.c")).unwrap();
        assert!(client.build_request(&call).unwrap().headers().get(AUTHORIZATION).is_some());
    }

    #[test]
    fn test_json_post_with_repeated_query() {
        let client = client_with(MemorySessionStore::new());
        let request = client
            .build_request(
                &ApiRequest::post("/stats/ci_histogram_by_date", json!({"ci_type": "green"}))
                    .with_query("bins", "20")
                    .with_query("bins", "30"),
            )
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8000/stats/ci_histogram_by_date?bins=20&bins=30"
        );
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap(),
            "application/json"
        );
    }

    mod wire {
        use super::*;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::{TcpListener, TcpStream};

        /// Read one request: headers, then `Content-Length` bytes of body
        async fn read_request(socket: &mut TcpStream) -> String {
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);

                let text = String::from_utf8_lossy(&buf);
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            String::from_utf8_lossy(&buf).into_owned()
        }

        /// Serve a single canned response and hand back the request that was read
        async fn serve_once(
            status: &'static str,
            body: &'static str,
        ) -> (String, tokio::task::JoinHandle<String>) {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base = format!("http://{}", listener.local_addr().unwrap());

            let handle = tokio::spawn(async move {
                let (mut socket, _) = listener.accept().await.unwrap();
                let request = read_request(&mut socket).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
                request
            });

            (base, handle)
        }

        #[tokio::test]
        async fn test_error_status_surfaces_body_verbatim() {
            let (base, server) =
                serve_once("500 Internal Server Error", "Earth Engine quota exceeded").await;
            let client = ApiClient::new(base, Arc::new(MemorySessionStore::new()));

            let err = client.post(&ApiRequest::post("/tiles/ndvi", json!({}))).await.unwrap_err();

            match &err {
                ChlmonError::Api { status, body } => {
                    assert_eq!(*status, 500);
                    assert_eq!(body, "Earth Engine quota exceeded");
                }
                other => panic!("expected Api error, got {:?}", other),
            }
            assert_eq!(err.to_string(), "Earth Engine quota exceeded");
            server.await.unwrap();
        }

        #[tokio::test]
        async fn test_success_decodes_json_and_sends_bearer() {
            let (base, server) = serve_once("200 OK", r#"{"tileUrl":"https://tiles/{z}/{x}/{y}"}"#).await;
            let store = MemorySessionStore::with_session(Session::new("abc123", "a@b.c"));
            let client = ApiClient::new(base, Arc::new(store));

            let value = client
                .post(&ApiRequest::post("/tiles/ndvi", json!({"sensor": "COPERNICUS/S2_SR"})))
                .await
                .unwrap();

            assert_eq!(value, json!({"tileUrl": "https://tiles/{z}/{x}/{y}"}));
            let request = server.await.unwrap();
            assert!(request.starts_with("POST /tiles/ndvi HTTP/1.1"));
            assert!(request.to_ascii_lowercase().contains("authorization: bearer abc123"));
            assert!(request.contains("COPERNICUS/S2_SR"));
        }

        #[tokio::test]
        async fn test_non_json_success_is_decode_error() {
            let (base, server) = serve_once("200 OK", "<html>proxy</html>").await;
            let client = ApiClient::new(base, Arc::new(MemorySessionStore::new()));

            let err = client.post(&ApiRequest::post("/tiles/ndvi", json!({}))).await.unwrap_err();

            assert!(matches!(err, ChlmonError::Decode { .. }));
            server.await.unwrap();
        }

        #[tokio::test]
        async fn test_timeout_is_network_error() {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base = format!("http://{}", listener.local_addr().unwrap());
            let server = tokio::spawn(async move {
                let (_socket, _) = listener.accept().await.unwrap();
                tokio::time::sleep(Duration::from_secs(5)).await;
            });

            let client = ApiClient::with_timeout(
                base,
                Arc::new(MemorySessionStore::new()),
                Duration::from_millis(200),
            )
            .unwrap();
            let err = client.post(&ApiRequest::post("/tiles/ndvi", json!({}))).await.unwrap_err();

            assert!(matches!(err, ChlmonError::Network(_)));
            server.abort();
        }

        #[tokio::test]
        async fn test_refused_connection_is_network_error() {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base = format!("http://{}", listener.local_addr().unwrap());
            drop(listener);
            let client = ApiClient::new(base, Arc::new(MemorySessionStore::new()));

            let err = client.post(&ApiRequest::post("/tiles/ndvi", json!({}))).await.unwrap_err();

            assert!(matches!(err, ChlmonError::Network(_)));
        }
    }

    proptest::proptest! {
        #[test]
        fn bins_survive_url_encoding(bins in proptest::collection::vec(-100i32..200, 0..12)) {
            let client = client_with(MemorySessionStore::new());
            let call = ApiRequest::post("/stats/ci_histogram_by_date", json!({}))
                .with_query_pairs(chlmon_core::models::HistogramBins(bins.clone()).query_pairs());
            let request = client.build_request(&call).unwrap();

            let sent: Vec<i32> = request
                .url()
                .query_pairs()
                .filter(|(k, _)| k == "bins")
                .map(|(_, v)| v.parse().unwrap())
                .collect();
            proptest::prop_assert_eq!(sent, bins);
        }
    }
}
