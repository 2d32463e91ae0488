//! The API client: request plumbing shared by every resource operation, plus
//! the account endpoints.
//!
//! # Design
//! `WunderClient` holds the immutable `Credentials`, the base URL and a
//! `Transport`. Nothing else is kept between calls: every read goes to the
//! network. Each operation builds one or more `HttpRequest` values, hands them
//! to the transport in sequence and runs the response validator on the result.
//! Resource groups live in sibling modules as further `impl` blocks.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::{Credentials, DEFAULT_BASE_URL};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::request::{build_json_request, build_request};
use crate::response;
use crate::types::{Revised, User};

/// Client for one authenticated Wunderlist user.
///
/// Create one client per user; the credentials cannot be changed afterwards.
#[derive(Debug, Clone)]
pub struct WunderClient<T = UreqTransport> {
    credentials: Credentials,
    base_url: String,
    transport: T,
}

impl WunderClient<UreqTransport> {
    /// Client on the default blocking transport and the public API URL.
    pub fn new(access_token: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self::with_transport(Credentials::new(access_token, client_id), UreqTransport::new())
    }

    /// Like `new`, with credentials read from the environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::with_transport(Credentials::from_env()?, UreqTransport::new()))
    }
}

impl<T: Transport> WunderClient<T> {
    pub fn with_transport(credentials: Credentials, transport: T) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            transport,
        }
    }

    /// Point the client at another deployment of the API. A trailing slash
    /// is ignored.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub fn build_get(&self, path: &str, query: Vec<(String, String)>) -> HttpRequest {
        build_request(&self.credentials, HttpMethod::Get, self.url(path), query)
    }

    pub fn build_post<P: Serialize + ?Sized>(&self, path: &str, payload: &P) -> Result<HttpRequest, ApiError> {
        build_json_request(&self.credentials, HttpMethod::Post, self.url(path), Vec::new(), payload)
    }

    pub fn build_patch<U: Serialize>(&self, path: &str, revision: u64, fields: &U) -> Result<HttpRequest, ApiError> {
        let payload = Revised { revision, fields };
        build_json_request(&self.credentials, HttpMethod::Patch, self.url(path), Vec::new(), &payload)
    }

    pub fn build_delete(&self, path: &str, revision: u64) -> HttpRequest {
        build_request(
            &self.credentials,
            HttpMethod::Delete,
            self.url(path),
            vec![("revision".to_string(), revision.to_string())],
        )
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.execute(request).map_err(ApiError::TransportError)?;
        debug!(status = response.status, url = %request.url, "received response");
        Ok(response)
    }

    pub(crate) fn get<R: DeserializeOwned>(&self, path: &str, query: Vec<(String, String)>) -> Result<R, ApiError> {
        let response = self.send(&self.build_get(path, query))?;
        response::parse(&response)
    }

    pub(crate) fn post<P: Serialize + ?Sized, R: DeserializeOwned>(&self, path: &str, payload: &P) -> Result<R, ApiError> {
        let response = self.send(&self.build_post(path, payload)?)?;
        response::parse(&response)
    }

    pub(crate) fn patch<U: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        revision: u64,
        fields: &U,
    ) -> Result<R, ApiError> {
        let response = self.send(&self.build_patch(path, revision, fields)?)?;
        response::parse(&response)
    }

    pub(crate) fn delete(&self, path: &str, revision: u64) -> Result<bool, ApiError> {
        let response = self.send(&self.build_delete(path, revision))?;
        response::validate_delete(&response)
    }

    /// The user the access token belongs to.
    pub fn get_user(&self) -> Result<User, ApiError> {
        self.get("user", Vec::new())
    }

    /// Every user the current user can see, optionally limited to those with
    /// access to `list_id`.
    pub fn get_users(&self, list_id: Option<u64>) -> Result<Vec<User>, ApiError> {
        let query = list_id
            .map(|id| vec![("list_id".to_string(), id.to_string())])
            .unwrap_or_default();
        self.get("users", query)
    }
}
