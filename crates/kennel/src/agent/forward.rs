//! Request forwarding to the agent process

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Method, Response},
};
use futures::TryStreamExt;
use url::Url;

use super::error::AgentError;

/// Hop-by-hop headers that should not be forwarded in either direction
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "host",
    "connection",
    "keep-alive",
    "transfer-encoding",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "upgrade",
];

/// Copy end-to-end headers, dropping hop-by-hop ones
pub fn end_to_end_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::new();
    for (name, value) in headers.iter() {
        if !HOP_BY_HOP_HEADERS.contains(&name.as_str()) {
            forwarded.append(name.clone(), value.clone());
        }
    }
    forwarded
}

/// Forward a request to the agent and relay its response
///
/// The request body is buffered and sent once. The response body is streamed
/// back as it arrives so server-sent events reach the client unbuffered.
/// There are no retries.
pub async fn forward(
    client: &reqwest::Client,
    target_url: &Url,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> Result<Response<Body>, AgentError> {
    let mut forwarded_headers = end_to_end_headers(&headers);
    // Re-computed by the client from the buffered body
    forwarded_headers.remove("content-length");

    if let Some(host) = target_url.host_str() {
        let host_value = match target_url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        if let Ok(header_value) = HeaderValue::from_str(&host_value) {
            forwarded_headers.insert("host", header_value);
        }
    }

    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| AgentError::Request(format!("Failed to read request body: {e}")))?;

    let response = client
        .request(method, target_url.clone())
        .headers(forwarded_headers)
        .body(body_bytes)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                AgentError::Unreachable(format!("Request timed out: {e}"))
            } else if e.is_connect() {
                AgentError::Unreachable(format!("Failed to connect to agent: {e}"))
            } else {
                AgentError::Unreachable(format!("Request failed: {e}"))
            }
        })?;

    let status = response.status();
    let response_headers = end_to_end_headers(response.headers());

    let stream = response
        .bytes_stream()
        .inspect_err(|e| tracing::warn!(error = %e, "Agent response stream interrupted"));

    let mut builder = Response::builder().status(status);
    for (name, value) in response_headers.iter() {
        builder = builder.header(name, value);
    }

    builder
        .body(Body::from_stream(stream))
        .map_err(|e| AgentError::Response(format!("Failed to build response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_headers_drops_hop_by_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("localhost:8787"));
        headers.insert("connection", HeaderValue::from_static("keep-alive"));
        headers.insert("upgrade", HeaderValue::from_static("websocket"));
        headers.insert("proxy-authorization", HeaderValue::from_static("Basic eHg6eXk="));
        headers.insert("trailer", HeaderValue::from_static("expires"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.insert("authorization", HeaderValue::from_static("Bearer abc"));

        let forwarded = end_to_end_headers(&headers);

        assert!(forwarded.get("host").is_none());
        assert!(forwarded.get("connection").is_none());
        assert!(forwarded.get("upgrade").is_none());
        assert!(forwarded.get("proxy-authorization").is_none());
        assert!(forwarded.get("trailer").is_none());
        assert_eq!(forwarded.get("content-type").unwrap(), "application/json");
        assert_eq!(forwarded.get("authorization").unwrap(), "Bearer abc");
    }

    #[test]
    fn test_end_to_end_headers_keeps_repeated_values() {
        let mut headers = HeaderMap::new();
        headers.append("accept", HeaderValue::from_static("text/event-stream"));
        headers.append("accept", HeaderValue::from_static("application/json"));

        let forwarded = end_to_end_headers(&headers);
        assert_eq!(forwarded.get_all("accept").iter().count(), 2);
    }

    #[tokio::test]
    async fn test_forward_unreachable() {
        let client = reqwest::Client::new();
        let url = Url::parse("http://127.0.0.1:1/").unwrap();

        let err = forward(&client, &url, Method::POST, HeaderMap::new(), Body::empty())
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::Unreachable(_)));
    }
}
