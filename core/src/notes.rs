//! Note endpoints.
//!
//! A task has at most one note today, but the API still answers collection
//! queries with an array.

use serde_json::json;

use crate::client::WunderClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{Note, Scope};

impl<T: Transport> WunderClient<T> {
    /// Notes of a list or of a task. Exactly one of `list_id` and `task_id`
    /// must be given.
    pub fn get_notes(&self, list_id: Option<u64>, task_id: Option<u64>) -> Result<Vec<Note>, ApiError> {
        let scope = Scope::exactly_one(list_id, task_id)?;
        self.get("notes", vec![scope.query()])
    }

    pub fn get_note(&self, note_id: u64) -> Result<Note, ApiError> {
        self.get(&format!("notes/{note_id}"), Vec::new())
    }

    pub fn create_note(&self, task_id: u64, content: &str) -> Result<Note, ApiError> {
        self.post("notes", &json!({ "task_id": task_id, "content": content }))
    }

    pub fn update_note(&self, note_id: u64, content: &str, revision: Option<u64>) -> Result<Note, ApiError> {
        let revision = match revision {
            Some(revision) => revision,
            None => self.get_note(note_id)?.revision,
        };
        self.patch(&format!("notes/{note_id}"), revision, &json!({ "content": content }))
    }

    pub fn delete_note(&self, note_id: u64, revision: Option<u64>) -> Result<bool, ApiError> {
        let revision = match revision {
            Some(revision) => revision,
            None => self.get_note(note_id)?.revision,
        };
        self.delete(&format!("notes/{note_id}"), revision)
    }
}
