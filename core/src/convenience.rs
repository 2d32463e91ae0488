//! Helpers that chain several requests: title lookups, revision reads,
//! additive folder membership and task-to-note resolution.
//!
//! None of these are transactional. A concurrent change between the read and
//! the write shows up as `ApiError::StaleRevision` on the write; retrying the
//! whole call is always safe.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::client::WunderClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{Folder, FolderUpdate};

impl<T: Transport> WunderClient<T> {
    /// Map every list title to its id. Titles are not unique; when two lists
    /// share one, the later list in the server's response wins.
    pub fn list_ids(&self) -> Result<HashMap<String, u64>, ApiError> {
        Ok(self
            .get_lists()?
            .into_iter()
            .map(|list| (list.title, list.id))
            .collect())
    }

    /// Id of the list titled `title`.
    pub fn list_id(&self, title: &str) -> Result<u64, ApiError> {
        self.list_ids()?
            .remove(title)
            .ok_or_else(|| ApiError::NotFound(format!("no list titled {title:?}")))
    }

    /// Map every folder title to its id, last one wins.
    pub fn folder_ids(&self) -> Result<HashMap<String, u64>, ApiError> {
        Ok(self
            .get_folders()?
            .into_iter()
            .map(|folder| (folder.title, folder.id))
            .collect())
    }

    /// Id of the folder titled `title`.
    pub fn folder_id(&self, title: &str) -> Result<u64, ApiError> {
        self.folder_ids()?
            .remove(title)
            .ok_or_else(|| ApiError::NotFound(format!("no folder titled {title:?}")))
    }

    /// Current revision of a list.
    pub fn list_revision(&self, list_id: u64) -> Result<u64, ApiError> {
        Ok(self.get_list(list_id)?.revision)
    }

    /// Current revision of a folder.
    pub fn folder_revision(&self, folder_id: u64) -> Result<u64, ApiError> {
        Ok(self.get_folder(folder_id)?.revision)
    }

    /// Add a list to a folder, keeping the lists already in it.
    ///
    /// Idempotent: if the list is already a member the membership is written
    /// back unchanged. Always two round trips.
    #[instrument(skip(self))]
    pub fn add_to_folder(&self, list_id: u64, folder_id: u64) -> Result<Folder, ApiError> {
        let folder = self.get_folder(folder_id)?;
        let mut list_ids = folder.list_ids;
        if list_ids.contains(&list_id) {
            debug!("list already in folder");
        } else {
            list_ids.push(list_id);
        }
        let update = FolderUpdate {
            list_ids: Some(list_ids),
            ..Default::default()
        };
        self.update_folder(folder_id, &update, Some(folder.revision))
    }

    /// Id of the note attached to `task_id`.
    ///
    /// Reads the task to find its list, then scans that list's notes.
    /// A task without a note yields `NotFound`.
    #[instrument(skip(self))]
    pub fn get_note_id(&self, task_id: u64) -> Result<u64, ApiError> {
        let task = self.get_task(task_id)?;
        self.get_notes(Some(task.list_id), None)?
            .into_iter()
            .find(|note| note.task_id == task_id)
            .map(|note| note.id)
            .ok_or_else(|| ApiError::NotFound(format!("no note for task {task_id}")))
    }
}
