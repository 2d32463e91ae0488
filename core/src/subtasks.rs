//! Subtask endpoints.

use serde_json::json;

use crate::client::WunderClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{check_title, Scope, Subtask, SubtaskUpdate};

impl<T: Transport> WunderClient<T> {
    /// Subtasks of a list or of a task. Exactly one of `list_id` and
    /// `task_id` must be given. With `completed`, only completed subtasks
    /// are returned.
    pub fn get_subtasks(
        &self,
        list_id: Option<u64>,
        task_id: Option<u64>,
        completed: bool,
    ) -> Result<Vec<Subtask>, ApiError> {
        let scope = Scope::exactly_one(list_id, task_id)?;
        let mut query = vec![scope.query()];
        if completed {
            query.push(("completed".to_string(), "true".to_string()));
        }
        self.get("subtasks", query)
    }

    pub fn get_subtask(&self, subtask_id: u64) -> Result<Subtask, ApiError> {
        self.get(&format!("subtasks/{subtask_id}"), Vec::new())
    }

    pub fn create_subtask(&self, task_id: u64, title: &str, completed: bool) -> Result<Subtask, ApiError> {
        check_title(title)?;
        let payload = if completed {
            json!({ "task_id": task_id, "title": title, "completed": true })
        } else {
            json!({ "task_id": task_id, "title": title })
        };
        self.post("subtasks", &payload)
    }

    pub fn update_subtask(
        &self,
        subtask_id: u64,
        update: &SubtaskUpdate,
        revision: Option<u64>,
    ) -> Result<Subtask, ApiError> {
        if let Some(title) = &update.title {
            check_title(title)?;
        }
        let revision = match revision {
            Some(revision) => revision,
            None => self.get_subtask(subtask_id)?.revision,
        };
        self.patch(&format!("subtasks/{subtask_id}"), revision, update)
    }

    pub fn delete_subtask(&self, subtask_id: u64, revision: Option<u64>) -> Result<bool, ApiError> {
        let revision = match revision {
            Some(revision) => revision,
            None => self.get_subtask(subtask_id)?.revision,
        };
        self.delete(&format!("subtasks/{subtask_id}"), revision)
    }
}
