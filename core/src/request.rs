//! Request construction: identity headers, JSON payloads, query strings.

use serde::Serialize;

use crate::config::Credentials;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};

pub const ACCESS_TOKEN_HEADER: &str = "X-Access-Token";
pub const CLIENT_ID_HEADER: &str = "X-Client-ID";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

fn identity_headers(credentials: &Credentials) -> Vec<(String, String)> {
    vec![
        (ACCESS_TOKEN_HEADER.to_string(), credentials.access_token().to_string()),
        (CLIENT_ID_HEADER.to_string(), credentials.client_id().to_string()),
    ]
}

/// Build a request without a body. Only the identity headers are attached.
pub fn build_request(
    credentials: &Credentials,
    method: HttpMethod,
    url: String,
    query: Vec<(String, String)>,
) -> HttpRequest {
    HttpRequest {
        method,
        url,
        query,
        headers: identity_headers(credentials),
        body: None,
    }
}

/// Build a request carrying `payload` serialized as JSON.
pub fn build_json_request<P: Serialize + ?Sized>(
    credentials: &Credentials,
    method: HttpMethod,
    url: String,
    query: Vec<(String, String)>,
    payload: &P,
) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(payload).map_err(ApiError::SerializationError)?;
    let mut headers = identity_headers(credentials);
    headers.push((CONTENT_TYPE_HEADER.to_string(), JSON_CONTENT_TYPE.to_string()));
    Ok(HttpRequest {
        method,
        url,
        query,
        headers,
        body: Some(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn creds() -> Credentials {
        Credentials::new("token-1", "client-1")
    }

    #[test]
    fn plain_request_has_identity_headers_only() {
        let req = build_request(&creds(), HttpMethod::Get, "https://x.test/lists".to_string(), Vec::new());
        assert_eq!(
            req.headers,
            vec![
                ("X-Access-Token".to_string(), "token-1".to_string()),
                ("X-Client-ID".to_string(), "client-1".to_string()),
            ]
        );
        assert!(req.body.is_none());
        assert!(req.header("content-type").is_none());
    }

    #[test]
    fn json_request_marks_content_type_and_serializes_payload() {
        let req = build_json_request(
            &creds(),
            HttpMethod::Post,
            "https://x.test/lists".to_string(),
            Vec::new(),
            &json!({"title": "Groceries"}),
        )
        .unwrap();
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.header("X-Access-Token"), Some("token-1"));
        assert_eq!(req.header("X-Client-ID"), Some("client-1"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"title": "Groceries"}));
    }

    #[test]
    fn query_is_kept_separate_from_url() {
        let req = build_request(
            &creds(),
            HttpMethod::Delete,
            "https://x.test/lists/3".to_string(),
            vec![("revision".to_string(), "4".to_string())],
        );
        assert_eq!(req.url, "https://x.test/lists/3");
        assert_eq!(req.query_param("revision"), Some("4"));
    }
}
