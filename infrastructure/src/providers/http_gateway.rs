//! HTTP implementation of the [`LlmGateway`] port.

use super::{DEFAULT_ANTHROPIC_VERSION, ProviderKind, ProviderRegistry, ResolvedOptions};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use worldtale_application::ports::credentials::CredentialProvider;
use worldtale_application::ports::llm_gateway::{GatewayError, GenerationOptions, LlmGateway};
use worldtale_domain::ChatTurn;

/// Which provider to call and how.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub provider_id: String,
    /// Fallbacks for options the caller leaves unset.
    pub defaults: ResolvedOptions,
    /// Endpoint overrides keyed by provider id.
    pub endpoints: HashMap<String, String>,
    pub timeout: Duration,
    pub anthropic_version: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            provider_id: ProviderKind::OpenAi.id().to_string(),
            defaults: ResolvedOptions::default(),
            endpoints: HashMap::new(),
            timeout: Duration::from_secs(60),
            anthropic_version: DEFAULT_ANTHROPIC_VERSION.to_string(),
        }
    }
}

impl ProviderSettings {
    pub fn with_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = provider_id.into();
        self
    }

    pub fn with_endpoint(mut self, provider_id: impl Into<String>, url: impl Into<String>) -> Self {
        self.endpoints.insert(provider_id.into(), url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configured endpoint for `kind`, or its default.
    pub fn endpoint(&self, kind: ProviderKind) -> &str {
        self.endpoints
            .get(kind.id())
            .map(String::as_str)
            .unwrap_or(kind.default_endpoint())
    }
}

/// Gateway that POSTs one request per call to the configured provider.
///
/// No retries, no streaming. Credentials are looked up per request.
pub struct HttpLlmGateway {
    client: reqwest::Client,
    registry: ProviderRegistry,
    settings: ProviderSettings,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpLlmGateway {
    pub fn new(
        settings: ProviderSettings,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::with_client(client, settings, credentials))
    }

    /// Use a preconfigured client. Its own timeout applies.
    pub fn with_client(
        client: reqwest::Client,
        settings: ProviderSettings,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        let registry = ProviderRegistry::builtin(settings.anthropic_version.clone());
        Self {
            client,
            registry,
            settings,
            credentials,
        }
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    fn resolve_options(&self, options: &GenerationOptions) -> ResolvedOptions {
        let defaults = &self.settings.defaults;
        ResolvedOptions {
            model: options
                .model
                .clone()
                .unwrap_or_else(|| defaults.model.clone()),
            temperature: options.temperature.unwrap_or(defaults.temperature),
            max_tokens: options.max_tokens.unwrap_or(defaults.max_tokens),
        }
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::ConnectionError(e.to_string())
    }
}

#[async_trait]
impl LlmGateway for HttpLlmGateway {
    async fn send(
        &self,
        turns: &[ChatTurn],
        options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        let provider_id = self.settings.provider_id.as_str();
        let adapter = self.registry.resolve(provider_id)?;
        let kind = adapter.kind();
        let resolved = self.resolve_options(options);
        let endpoint = self.settings.endpoint(kind);

        let body = adapter.build_request(turns, &resolved);
        let mut request = self.client.post(endpoint).json(&body);

        match self.credentials.credential(provider_id) {
            Some(key) => {
                for (name, value) in adapter.auth_headers(&key) {
                    request = request.header(name, value);
                }
            }
            None => debug!(provider = %kind, "No credential configured, sending unauthenticated"),
        }
        for (name, value) in adapter.extra_headers() {
            request = request.header(name, value);
        }

        info!(
            provider = %kind,
            model = %resolved.model,
            turns = turns.len(),
            "Sending generation request"
        );

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        let extracted = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|value| adapter.extract_text(&value));
        match extracted {
            Some(reply) => {
                debug!(provider = %kind, bytes = reply.len(), "Received reply");
                Ok(reply)
            }
            None => Err(GatewayError::Upstream {
                status: status.as_u16(),
                body: text,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;
    use worldtale_application::ports::credentials::NoCredentials;

    struct StaticKey(&'static str);

    impl CredentialProvider for StaticKey {
        fn credential(&self, _provider_id: &str) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    /// Read one HTTP request (headers plus `content-length` bytes of body).
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.trim()
                            .eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Serve exactly one response and hand back the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
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
            let _ = socket.shutdown().await;
            request
        });
        (format!("http://{}/v1/chat", addr), handle)
    }

    fn gateway(
        provider: &str,
        endpoint: &str,
        credentials: Arc<dyn CredentialProvider>,
    ) -> HttpLlmGateway {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let settings = ProviderSettings::default()
            .with_provider(provider)
            .with_endpoint(provider, endpoint);
        HttpLlmGateway::with_client(client, settings, credentials)
    }

    fn turns() -> Vec<ChatTurn> {
        vec![ChatTurn::system("You are Aria."), ChatTurn::user("Hello")]
    }

    #[test]
    fn test_settings_endpoint_fallback() {
        let settings = ProviderSettings::default().with_endpoint("local", "http://box:9000/v1");
        assert_eq!(settings.endpoint(ProviderKind::Local), "http://box:9000/v1");
        assert_eq!(
            settings.endpoint(ProviderKind::OpenAi),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(settings.timeout, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_openai_round_trip() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"Welcome aboard."}}]}"#,
        )
        .await;
        let gateway = gateway("openai", &url, Arc::new(StaticKey("sk-test")));

        let reply = gateway
            .send(&turns(), &GenerationOptions::new().with_max_tokens(42))
            .await
            .unwrap();
        assert_eq!(reply, "Welcome aboard.");

        let request = server.await.unwrap();
        let lower = request.to_lowercase();
        assert!(request.starts_with("POST /v1/chat "));
        assert!(lower.contains("authorization: bearer sk-test"));
        assert!(request.contains("\"max_tokens\":42"));
        assert!(request.contains("\"model\":\"gpt-3.5-turbo\""));
        assert!(request.contains("\"top_p\":1"));
    }

    #[tokio::test]
    async fn test_claude_headers() {
        let (url, server) =
            serve_once("200 OK", r#"{"content":[{"type":"text","text":"Aye."}]}"#).await;
        let gateway = gateway("claude", &url, Arc::new(StaticKey("ak-test")));

        let reply = gateway
            .send(&turns(), &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(reply, "Aye.");

        let lower = server.await.unwrap().to_lowercase();
        assert!(lower.contains("x-api-key: ak-test"));
        assert!(lower.contains("anthropic-version: 2023-06-01"));
    }

    #[tokio::test]
    async fn test_missing_credential_sends_unauthenticated() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"content":"local reply"}}]}"#,
        )
        .await;
        let gateway = gateway("local", &url, Arc::new(NoCredentials));

        let reply = gateway
            .send(&turns(), &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(reply, "local reply");
        assert!(!server.await.unwrap().to_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_with_body() {
        let (url, _server) =
            serve_once("429 Too Many Requests", r#"{"error":"rate limited"}"#).await;
        let gateway = gateway("deepseek", &url, Arc::new(StaticKey("k")));

        let err = gateway
            .send(&turns(), &GenerationOptions::default())
            .await
            .unwrap_err();
        match err {
            GatewayError::Upstream { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("rate limited"));
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_text_path_is_upstream() {
        let (url, _server) = serve_once("200 OK", r#"{"candidates":[]}"#).await;
        let gateway = gateway("gemini", &url, Arc::new(NoCredentials));

        let err = gateway
            .send(&turns(), &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Upstream { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_non_json_body_is_upstream() {
        let (url, _server) = serve_once("200 OK", "<html>oops</html>").await;
        let gateway = gateway("openai", &url, Arc::new(NoCredentials));

        let err = gateway
            .send(&turns(), &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_unknown_provider_fails_before_network() {
        let gateway = gateway("mistral", "http://127.0.0.1:9/never", Arc::new(NoCredentials));
        let err = gateway
            .send(&turns(), &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::UnsupportedProvider(id) if id == "mistral"));
    }

    #[tokio::test]
    async fn test_refused_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = gateway(
            "openai",
            &format!("http://{}/v1/chat", addr),
            Arc::new(NoCredentials),
        );
        let err = gateway
            .send(&turns(), &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ConnectionError(_)));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let gateway = HttpLlmGateway::with_client(
            client,
            ProviderSettings::default().with_endpoint("openai", format!("http://{}/", addr)),
            Arc::new(NoCredentials),
        );

        let err = gateway
            .send(&turns(), &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Timeout));
    }
}
