//! ConstruSys REST client.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, multipart::Form};
use serde::{Serialize, de::DeserializeOwned};

use crate::config::ApiConfig;
use crate::error::{AppError, GENERIC_ERROR_MESSAGE, Result};

/// HTTP client for the ConstruSys backend.
///
/// Cheap to clone; clones share the connection pool. The bearer token is
/// fixed per instance, use [`ApiClient::with_token`] after logging in.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new client instance.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("construsys-desktop/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Copy of this client that authenticates with `token`.
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{base}/{path}", base = self.base_url, path = path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!("{} {}", method, path);
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = send(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    pub async fn get_query<T: DeserializeOwned, Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> Result<T> {
        let response = send(self.request(Method::GET, path).query(query)).await?;
        decode(response).await
    }

    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let response = send(self.request(Method::GET, path)).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = send(self.request(Method::POST, path).json(body)).await?;
        decode(response).await
    }

    /// POST without a body, ignoring the response content.
    pub async fn post_empty(&self, path: &str) -> Result<()> {
        send(self.request(Method::POST, path)).await?;
        Ok(())
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        let response = send(self.request(Method::POST, path).multipart(form)).await?;
        decode(response).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = send(self.request(Method::PUT, path).json(body)).await?;
        decode(response).await
    }

    /// PATCH without a body.
    pub async fn patch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = send(self.request(Method::PATCH, path)).await?;
        decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// Check that the backend answers the health endpoint with a success status.
    pub async fn test_connection(&self) -> Result<()> {
        send(self.client.get(self.url("health"))).await?;
        Ok(())
    }
}

/// Send a request and turn non-success statuses into [`AppError`].
async fn send(builder: RequestBuilder) -> Result<Response> {
    let response = builder.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

/// Map a non-success status and its body to an [`AppError`].
fn status_error(status: StatusCode, body: &str) -> AppError {
    if status == StatusCode::UNAUTHORIZED {
        return AppError::Unauthorized;
    }
    if status == StatusCode::NOT_FOUND {
        return AppError::not_found(error_message(body).unwrap_or_else(|| "Registro não encontrado".to_string()));
    }

    let message = error_message(body).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
    tracing::debug!("API error {}: {}", status, message);
    AppError::Api {
        status: status.as_u16(),
        message,
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    decode_body(&bytes)
}

/// Decode a JSON body, accepting both bare payloads and `{"data": ...}` envelopes.
///
/// An empty body decodes as JSON `null`, so `Option<T>` and `()` targets work
/// for 204 responses.
pub(crate) fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let value: serde_json::Value = if bytes.iter().all(u8::is_ascii_whitespace) {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(bytes)?
    };

    match serde_json::from_value::<T>(value.clone()) {
        Ok(decoded) => Ok(decoded),
        Err(err) => match value {
            serde_json::Value::Object(mut map) if map.contains_key("data") => {
                let data = map.remove("data").unwrap_or_default();
                Ok(serde_json::from_value(data)?)
            }
            _ => Err(AppError::Json(err)),
        },
    }
}

/// Pull the human-readable message out of an error body.
///
/// Prefers `message`, then `error`; a short plain-text body is used as-is.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => ["message", "error"]
            .iter()
            .find_map(|key| {
                map.get(*key)
                    .and_then(|v| v.as_str())
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
            })
            .map(str::to_string),
        Ok(_) => None,
        Err(_) if body.len() <= 200 && !body.starts_with('<') => Some(body.to_string()),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
    }

    #[test]
    fn test_error_message_prefers_message() {
        let body = r#"{"message": "Contrato não encontrado", "error": "NotFound"}"#;
        assert_eq!(error_message(body).as_deref(), Some("Contrato não encontrado"));
    }

    #[test]
    fn test_error_message_falls_back_to_error_field() {
        assert_eq!(error_message(r#"{"error": "Token inválido"}"#).as_deref(), Some("Token inválido"));
        assert_eq!(error_message(r#"{"message": "", "error": "x"}"#).as_deref(), Some("x"));
    }

    #[test]
    fn test_error_message_none_for_unhelpful_bodies() {
        assert_eq!(error_message(""), None);
        assert_eq!(error_message(r#"{"status": 500}"#), None);
        assert_eq!(error_message("<html><body>Bad Gateway</body></html>"), None);
        assert_eq!(error_message("Service Unavailable").as_deref(), Some("Service Unavailable"));
    }

    #[test]
    fn test_decode_bare_and_enveloped() {
        let bare: Vec<Item> = decode_body(br#"[{"id": 1}, {"id": 2}]"#).unwrap();
        assert_eq!(bare.len(), 2);

        let wrapped: Vec<Item> = decode_body(br#"{"data": [{"id": 3}]}"#).unwrap();
        assert_eq!(wrapped, vec![Item { id: 3 }]);
    }

    #[test]
    fn test_decode_empty_body() {
        assert!(decode_body::<()>(b"").is_ok());
        let none: Option<Item> = decode_body(b"  ").unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_decode_mismatch_is_json_error() {
        let result: Result<Item> = decode_body(br#"{"name": "x"}"#);
        assert!(matches!(result, Err(AppError::Json(_))));
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(status_error(StatusCode::UNAUTHORIZED, ""), AppError::Unauthorized));

        match status_error(StatusCode::NOT_FOUND, "") {
            AppError::NotFound(msg) => assert_eq!(msg, "Registro não encontrado"),
            other => panic!("unexpected {other:?}"),
        }

        match status_error(StatusCode::INTERNAL_SERVER_ERROR, r#"{"message": "Falha interna"}"#) {
            AppError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Falha interna");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    /// Serve one canned HTTP response on a local port and return the base URL.
    async fn serve_once(status_line: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = format!("HTTP/1.1 {status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
            let _ = socket.write_all(response.as_bytes()).await;
        });
        format!("http://{addr}")
    }

    fn client_for(base_url: String) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_connection_ok_on_success_status() {
        let client = client_for(serve_once("200 OK").await);
        assert!(client.test_connection().await.is_ok());
    }

    #[tokio::test]
    async fn test_connection_fails_on_error_status() {
        let client = client_for(serve_once("404 Not Found").await);
        assert!(matches!(client.test_connection().await, Err(AppError::NotFound(_))));

        let client = client_for(serve_once("500 Internal Server Error").await);
        assert!(matches!(
            client.test_connection().await,
            Err(AppError::Api { status: 500, .. })
        ));
    }

    #[test]
    fn test_url_joining() {
        let config = ApiConfig {
            base_url: "http://localhost:3001/api/".to_string(),
            ..Default::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/contracts/1"), "http://localhost:3001/api/contracts/1");
        assert_eq!(client.url("roles"), "http://localhost:3001/api/roles");
        assert!(!client.has_token());
        assert!(client.with_token(Some("t".to_string())).has_token());
    }
}
