//! List endpoints.

use serde_json::json;

use crate::client::WunderClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{check_title, List, ListUpdate};

impl<T: Transport> WunderClient<T> {
    pub fn get_lists(&self) -> Result<Vec<List>, ApiError> {
        self.get("lists", Vec::new())
    }

    pub fn get_list(&self, list_id: u64) -> Result<List, ApiError> {
        self.get(&format!("lists/{list_id}"), Vec::new())
    }

    pub fn create_list(&self, title: &str) -> Result<List, ApiError> {
        check_title(title)?;
        self.post("lists", &json!({ "title": title }))
    }

    /// Apply `update` to a list.
    ///
    /// Without `revision` the current one is fetched first, which costs an
    /// extra round trip.
    pub fn update_list(&self, list_id: u64, update: &ListUpdate, revision: Option<u64>) -> Result<List, ApiError> {
        if let Some(title) = &update.title {
            check_title(title)?;
        }
        let revision = match revision {
            Some(revision) => revision,
            None => self.list_revision(list_id)?,
        };
        self.patch(&format!("lists/{list_id}"), revision, update)
    }

    /// Mark a list public. Returns the `public` flag the server reports back.
    pub fn make_list_public(&self, list_id: u64, revision: Option<u64>) -> Result<bool, ApiError> {
        let update = ListUpdate {
            public: Some(true),
            ..Default::default()
        };
        let list = self.update_list(list_id, &update, revision)?;
        Ok(list.public)
    }

    pub fn delete_list(&self, list_id: u64, revision: Option<u64>) -> Result<bool, ApiError> {
        let revision = match revision {
            Some(revision) => revision,
            None => self.list_revision(list_id)?,
        };
        self.delete(&format!("lists/{list_id}"), revision)
    }
}
