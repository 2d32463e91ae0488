//! Client configuration: credentials and the API base URL.

use std::fmt;

use crate::error::ApiError;

/// Base URL of the Wunderlist v1 API. Every call uses the secure scheme.
pub const DEFAULT_BASE_URL: &str = "https://a.wunderlist.com/api/v1";

pub const ACCESS_TOKEN_ENV: &str = "WUNDERLIST_ACCESS_TOKEN";
pub const CLIENT_ID_ENV: &str = "WUNDERLIST_CLIENT_ID";

/// The two identity values attached to every request.
///
/// Neither value is validated; bad credentials surface as an authorization
/// error on the first real call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_token: String,
    client_id: String,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            client_id: client_id.into(),
        }
    }

    /// Read credentials from `WUNDERLIST_ACCESS_TOKEN` and `WUNDERLIST_CLIENT_ID`.
    pub fn from_env() -> Result<Self, ApiError> {
        let access_token = std::env::var(ACCESS_TOKEN_ENV).map_err(|_| ApiError::MissingCredential {
            var: ACCESS_TOKEN_ENV,
        })?;
        let client_id = std::env::var(CLIENT_ID_ENV).map_err(|_| ApiError::MissingCredential {
            var: CLIENT_ID_ENV,
        })?;
        Ok(Self::new(access_token, client_id))
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("client_id", &self.client_id)
            .finish()
    }
}
