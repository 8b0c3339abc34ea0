//! Binance REST API client for signed requests.
//!
//! Every authenticated call goes through
//! [`send_signed_request`](BinanceRestClient::send_signed_request): the
//! payload is URL-encoded, `timestamp` is appended, the string is signed with
//! HMAC-SHA256 and sent once with the `X-MBX-APIKEY` header. Nothing is
//! retried.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use ob_core::types::OrderRecord;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::signing::{canonical_query, SignedQuery};

/// Header carrying the API key on authenticated requests.
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";
/// Content type sent with every signed request.
pub const CONTENT_TYPE: &str = "application/json;charset=utf-8";
/// Order placement endpoint.
pub const ORDER_PATH: &str = "/api/v3/order";

/// HTTP verbs accepted by the signed dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
}

/// An HTTP verb outside [`HttpMethod`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported HTTP method: {0}")]
pub struct UnsupportedMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Self::Get),
            "PUT" => Ok(Self::Put),
            "POST" => Ok(Self::Post),
            "DELETE" => Ok(Self::Delete),
            other => Err(UnsupportedMethod(other.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Binance API error response.
#[derive(Debug, serde::Deserialize)]
pub struct BinanceApiError {
    /// Numeric error code.
    pub code: i64,
    /// Human-readable error message.
    pub msg: String,
}

/// Binance REST API client.
///
/// Reuses a single `reqwest::Client` for connection pooling across requests.
pub struct BinanceRestClient {
    base_url: String,
    api_key: String,
    api_secret: String,
    client: Client,
}

impl BinanceRestClient {
    /// Create a new Binance REST client.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            client: Client::new(),
        }
    }

    /// Build the full signed URL for `path` and `payload` at `timestamp_ms`:
    /// `base + path + "?" + query + "&signature=" + hex`.
    pub fn signed_url<P: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &P,
        timestamp_ms: u64,
    ) -> Result<String> {
        let query = canonical_query(payload).context("failed to URL-encode request payload")?;
        let signed = SignedQuery::new(&self.api_secret, &query, timestamp_ms);
        Ok(format!(
            "{}{}?{}",
            self.base_url.trim_end_matches('/'),
            path,
            signed.to_url_query()
        ))
    }

    /// Sign `payload`, send it with `method` to `path` and parse the JSON
    /// response.
    ///
    /// The body is parsed whatever the HTTP status: Binance reports request
    /// errors as `{"code": ..., "msg": ...}` with a 4xx status, and callers
    /// decide what a `code` means. Transport failures and non-JSON bodies are
    /// errors.
    pub async fn send_signed_request<P: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &P,
    ) -> Result<serde_json::Value> {
        let url = self.signed_url(path, payload, current_timestamp_ms())?;

        debug!(%method, path, "Binance signed request");

        let resp = self
            .client
            .request(method.into(), &url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .send()
            .await
            .with_context(|| format!("Binance {} {} request failed", method, path))?;

        let status = resp.status();
        let body = resp.text().await.context("failed to read response body")?;

        debug!(%method, path, status = status.as_u16(), "Binance response received");

        serde_json::from_str(&body).with_context(|| {
            format!(
                "Binance {} {} returned non-JSON body (HTTP {}): {}",
                method, path, status, body
            )
        })
    }

    /// Place a limit order.
    ///
    /// POST `/api/v3/order` with the signed order parameters.
    pub async fn place_order(&self, order: &OrderRecord) -> Result<serde_json::Value> {
        self.send_signed_request(HttpMethod::Post, ORDER_PATH, order).await
    }
}

/// Current epoch time in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ob_core::types::{Side, Symbol};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response on 127.0.0.1 and hand back the raw
    /// request head that was received.
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });
        (base_url, handle)
    }

    fn sample_order() -> OrderRecord {
        OrderRecord::limit(Symbol::new("BTCUSDT"), Side::Buy, 0.024, 20500)
    }

    #[tokio::test]
    async fn test_place_order_sends_signed_post_with_headers() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"symbol":"BTCUSDT","orderId":28,"price":"20500.00000000","status":"NEW"}"#,
        )
        .await;
        let client = BinanceRestClient::new(base_url, "my-api-key", "secret");

        let resp = client.place_order(&sample_order()).await.expect("response");
        assert_eq!(resp["orderId"], 28);

        let request = server.await.unwrap();
        let head = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /api/v3/order?symbol=BTCUSDT&side=BUY&type=LIMIT"));
        assert!(request.contains("&timestamp="));
        assert!(request.contains("&signature="));
        assert!(head.contains("x-mbx-apikey: my-api-key\r\n"));
        assert!(head.contains("content-type: application/json;charset=utf-8\r\n"));
    }

    #[tokio::test]
    async fn test_error_payload_with_4xx_is_returned_not_fatal() {
        let (base_url, server) = serve_once(
            "400 Bad Request",
            r#"{"code":-2010,"msg":"Account has insufficient balance for requested action."}"#,
        )
        .await;
        let client = BinanceRestClient::new(base_url, "key", "secret");

        let resp = client.place_order(&sample_order()).await.expect("error payload is JSON");
        assert_eq!(resp["code"], -2010);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_non_json_body_is_fatal() {
        let (base_url, server) = serve_once("502 Bad Gateway", "<html>bad gateway</html>").await;
        let client = BinanceRestClient::new(base_url, "key", "secret");

        let err = client
            .send_signed_request(HttpMethod::Get, "/api/v3/account", &sample_order())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("non-JSON body"));
        assert!(err.to_string().contains("502"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_fatal() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let client = BinanceRestClient::new(base_url, "key", "secret");

        let err = client.place_order(&sample_order()).await.unwrap_err();
        assert!(err.to_string().contains("request failed"));
    }

    #[test]
    fn test_http_method_parse() {
        assert_eq!("GET".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("PUT".parse::<HttpMethod>().unwrap(), HttpMethod::Put);
        assert_eq!("POST".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!("DELETE".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
    }

    #[test]
    fn test_unknown_method_fails_fast() {
        let err = "PATCH".parse::<HttpMethod>().unwrap_err();
        assert_eq!(err, UnsupportedMethod("PATCH".to_string()));
        assert_eq!(err.to_string(), "unsupported HTTP method: PATCH");
        assert!("get".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_method_display_roundtrips() {
        for m in [HttpMethod::Get, HttpMethod::Put, HttpMethod::Post, HttpMethod::Delete] {
            assert_eq!(m.to_string().parse::<HttpMethod>().unwrap(), m);
        }
        assert_eq!(reqwest::Method::from(HttpMethod::Post), reqwest::Method::POST);
    }

    #[test]
    fn test_signed_order_url() {
        let client = BinanceRestClient::new("https://testnet.binance.vision", "key", "secret");
        let order = OrderRecord::limit(Symbol::new("BTCUSDT"), Side::Sell, 0.0243, 20750);

        let url = client.signed_url(ORDER_PATH, &order, 1706000000000).unwrap();
        let expected_query = "symbol=BTCUSDT&side=SELL&type=LIMIT&timeInForce=GTC\
                              &quantity=0.024&price=20750&timestamp=1706000000000";
        let expected_sig = crate::signing::sign_binance_request("secret", expected_query);
        let expected_url = format!(
            "https://testnet.binance.vision/api/v3/order?{expected_query}&signature={expected_sig}"
        );
        assert_eq!(url, expected_url);
    }

    #[test]
    fn test_signed_url_empty_payload() {
        let client = BinanceRestClient::new("https://testnet.binance.vision/", "key", "secret");
        let empty: [(&str, &str); 0] = [];
        let url = client.signed_url("/api/v3/account", &empty[..], 42).unwrap();
        let prefix = "https://testnet.binance.vision/api/v3/account?timestamp=42&signature=";
        assert!(url.starts_with(prefix));
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "code": -1021,
            "msg": "Timestamp for this request was 1000ms ahead of the server's time."
        }"#;
        let err: BinanceApiError = serde_json::from_str(json).unwrap();
        assert_eq!(err.code, -1021);
        assert!(err.msg.contains("Timestamp"));
    }

    #[test]
    fn test_client_construction() {
        let client =
            BinanceRestClient::new("https://testnet.binance.vision", "test_key", "test_secret");
        assert_eq!(client.base_url, "https://testnet.binance.vision");
        assert_eq!(client.api_key, "test_key");
    }

    #[test]
    fn test_current_timestamp_is_epoch_millis() {
        // 2020-09-13T12:26:40Z
        assert!(current_timestamp_ms() > 1_600_000_000_000);
    }
}
