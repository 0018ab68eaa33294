//! HTTP client for the rendering service.
//!
//! Both endpoints take the same JSON body. Preview answers with `{html, css}`,
//! export with the raw PDF bytes; failures of either carry `{error?}`.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderName, HeaderValue};

use crate::app::domain::{ErrorBody, PreviewRequest, PreviewResponse};
use crate::app::infrastructure::error::{AppError, RenderError};
use crate::app::settings::ClientSettings;

#[async_trait]
pub trait RenderService: Send + Sync {
    async fn preview(&self, request: &PreviewRequest) -> Result<PreviewResponse, RenderError>;
    async fn export(&self, request: &PreviewRequest) -> Result<Vec<u8>, RenderError>;
}

/// Source of the anti-forgery token. Consulted on every request, never cached.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

pub struct NoToken;

impl TokenSource for NoToken {
    fn token(&self) -> Option<String> {
        None
    }
}

pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Token kept in a file that may be rotated while the session runs.
pub struct FileToken(pub PathBuf);

impl TokenSource for FileToken {
    fn token(&self) -> Option<String> {
        match fs::read_to_string(&self.0) {
            Ok(contents) => Some(contents.trim().to_string()).filter(|t| !t.is_empty()),
            Err(e) => {
                log::warn!("Failed to read CSRF token from {}: {}", self.0.display(), e);
                None
            }
        }
    }
}

pub struct HttpRenderClient {
    client: Client,
    preview_url: String,
    export_url: String,
    csrf_header: HeaderName,
    token: Arc<dyn TokenSource>,
}

impl HttpRenderClient {
    pub fn new(settings: &ClientSettings, token: Arc<dyn TokenSource>) -> Result<Self, AppError> {
        let csrf_header = HeaderName::from_bytes(settings.csrf_header.as_bytes())
            .map_err(|e| AppError::Settings(format!("invalid CSRF header name: {}", e)))?;

        let client = Client::builder()
            .user_agent("markdown-styler")
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            client,
            preview_url: settings.preview_url(),
            export_url: settings.export_url(),
            csrf_header,
            token,
        })
    }

    async fn post(
        &self,
        url: &str,
        request: &PreviewRequest,
        action: &str,
    ) -> Result<reqwest::Response, RenderError> {
        let mut builder = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.token.token() {
            match HeaderValue::from_str(&token) {
                Ok(value) => builder = builder.header(self.csrf_header.clone(), value),
                Err(_) => log::warn!("CSRF token is not a valid header value; sending without it"),
            }
        }

        let response = builder
            .json(request)
            .send()
            .await
            .map_err(|e| RenderError::Network(format!("{} failed: {}", action, e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = ErrorBody::parse(&body)
            .message_or(|| format!("{} failed (HTTP {})", action, status.as_u16()));
        Err(RenderError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl RenderService for HttpRenderClient {
    async fn preview(&self, request: &PreviewRequest) -> Result<PreviewResponse, RenderError> {
        let response = self.post(&self.preview_url, request, "Preview").await?;
        response
            .json::<PreviewResponse>()
            .await
            .map_err(|e| RenderError::MalformedResponse(e.to_string()))
    }

    async fn export(&self, request: &PreviewRequest) -> Result<Vec<u8>, RenderError> {
        let response = self.post(&self.export_url, request, "PDF export").await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RenderError::Network(format!("PDF export failed: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use crate::app::testing::sample_theme;

    #[test]
    fn test_file_token_read_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("csrf");
        let source = FileToken(path.clone());
        assert_eq!(source.token(), None);

        fs::write(&path, "first\n").unwrap();
        assert_eq!(source.token().as_deref(), Some("first"));
        fs::write(&path, "second").unwrap();
        assert_eq!(source.token().as_deref(), Some("second"));
        fs::write(&path, "  ").unwrap();
        assert_eq!(source.token(), None);
    }

    #[test]
    fn test_static_and_no_token() {
        assert_eq!(StaticToken("abc".into()).token().as_deref(), Some("abc"));
        assert_eq!(NoToken.token(), None);
    }

    #[test]
    fn test_client_rejects_bad_header_name() {
        let settings = ClientSettings {
            csrf_header: "bad header".to_string(),
            ..Default::default()
        };
        let err = HttpRenderClient::new(&settings, Arc::new(NoToken)).err().unwrap();
        assert!(matches!(err, AppError::Settings(_)));
    }

    #[test]
    fn test_client_uses_configured_endpoints() {
        let settings = ClientSettings {
            server_url: "http://render.local:9000/".to_string(),
            ..Default::default()
        };
        let client = HttpRenderClient::new(&settings, Arc::new(NoToken)).unwrap();
        assert_eq!(client.preview_url, "http://render.local:9000/preview/");
        assert_eq!(client.export_url, "http://render.local:9000/pdf/");
        assert_eq!(client.csrf_header.as_str(), "x-csrftoken");
    }

    /// Answer exactly one HTTP request with a canned response. The handle
    /// resolves to the raw request (head and body).
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(split) = text.find("\r\n\r\n") {
                    let length = text[..split]
                        .lines()
                        .find_map(|l| l.to_ascii_lowercase().strip_prefix("content-length:").map(|v| v.trim().to_string()))
                        .and_then(|v| v.parse::<usize>().ok())
                        .unwrap_or(0);
                    if raw.len() >= split + 4 + length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            String::from_utf8_lossy(&raw).to_string()
        });
        (base, handle)
    }

    fn client_for(base: &str, token: Arc<dyn TokenSource>) -> HttpRenderClient {
        let settings = ClientSettings {
            server_url: base.to_string(),
            ..Default::default()
        };
        HttpRenderClient::new(&settings, token).unwrap()
    }

    fn request() -> PreviewRequest {
        PreviewRequest::new("# Heading", sample_theme("Report"))
    }

    #[tokio::test]
    async fn test_preview_posts_json_with_csrf_header() {
        let (base, server) = serve_once("200 OK", r#"{"html": "<h1>Heading</h1>", "css": "h1 {}"}"#).await;
        let client = client_for(&base, Arc::new(StaticToken("tok123".into())));

        let response = client.preview(&request()).await.unwrap();
        assert_eq!(response.html, "<h1>Heading</h1>");
        assert_eq!(response.css, "h1 {}");

        let raw = server.await.unwrap();
        let lower = raw.to_ascii_lowercase();
        assert!(lower.starts_with("post /preview/ http/1.1"));
        assert!(lower.contains("x-csrftoken: tok123"));
        assert!(lower.contains("content-type: application/json"));
        assert!(raw.contains(r##""markdown":"# Heading""##));
        assert!(raw.contains(r#""title":"Report""#));
        assert!(raw.contains(r#""customOrderedBase":10"#));
    }

    #[tokio::test]
    async fn test_no_token_sends_no_csrf_header() {
        let (base, server) = serve_once("200 OK", r#"{"html": "", "css": ""}"#).await;
        let client = client_for(&base, Arc::new(NoToken));
        client.preview(&request()).await.unwrap();
        let raw = server.await.unwrap();
        assert!(!raw.to_ascii_lowercase().contains("x-csrftoken"));
    }

    #[tokio::test]
    async fn test_export_error_message_from_body() {
        let (base, server) = serve_once("500 Internal Server Error", r#"{"error": "render failed"}"#).await;
        let client = client_for(&base, Arc::new(NoToken));

        let err = client.export(&request()).await.unwrap_err();
        assert_eq!(
            err,
            RenderError::Server {
                status: 500,
                message: "render failed".into()
            }
        );
        assert!(server.await.unwrap().to_ascii_lowercase().starts_with("post /pdf/"));
    }

    #[tokio::test]
    async fn test_unparsable_error_body_uses_generic_message() {
        let (base, _server) = serve_once("502 Bad Gateway", "<html>upstream down</html>").await;
        let client = client_for(&base, Arc::new(NoToken));
        let err = client.preview(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), "Preview failed (HTTP 502)");
        assert_eq!(err.status(), Some(502));
    }

    #[tokio::test]
    async fn test_malformed_preview_body() {
        let (base, _server) = serve_once("200 OK", r#"{"html": 5}"#).await;
        let client = client_for(&base, Arc::new(NoToken));
        let err = client.preview(&request()).await.unwrap_err();
        assert!(matches!(err, RenderError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = client_for(&base, Arc::new(NoToken));
        let err = client.export(&request()).await.unwrap_err();
        let RenderError::Network(message) = err else {
            panic!("expected a network error");
        };
        assert!(message.starts_with("PDF export failed: "));
    }
}
