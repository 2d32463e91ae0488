//! Folder endpoints.

use serde_json::json;

use crate::client::WunderClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{check_title, Folder, FolderUpdate, RevisionStamp};

impl<T: Transport> WunderClient<T> {
    pub fn get_folders(&self) -> Result<Vec<Folder>, ApiError> {
        self.get("folders", Vec::new())
    }

    pub fn get_folder(&self, folder_id: u64) -> Result<Folder, ApiError> {
        self.get(&format!("folders/{folder_id}"), Vec::new())
    }

    /// Create a folder holding `list_ids`.
    pub fn create_folder(&self, title: &str, list_ids: &[u64]) -> Result<Folder, ApiError> {
        check_title(title)?;
        self.post("folders", &json!({ "title": title, "list_ids": list_ids }))
    }

    /// Id and revision of every folder.
    pub fn get_folder_revisions(&self) -> Result<Vec<RevisionStamp>, ApiError> {
        self.get("folder_revisions", Vec::new())
    }

    /// Change a folder's title or membership. `list_ids` replaces the whole
    /// set; use `add_to_folder` to add a single list.
    pub fn update_folder(
        &self,
        folder_id: u64,
        update: &FolderUpdate,
        revision: Option<u64>,
    ) -> Result<Folder, ApiError> {
        if let Some(title) = &update.title {
            check_title(title)?;
        }
        let revision = match revision {
            Some(revision) => revision,
            None => self.folder_revision(folder_id)?,
        };
        self.patch(&format!("folders/{folder_id}"), revision, update)
    }

    /// Delete a folder. The lists inside it are kept.
    pub fn delete_folder(&self, folder_id: u64, revision: Option<u64>) -> Result<bool, ApiError> {
        let revision = match revision {
            Some(revision) => revision,
            None => self.folder_revision(folder_id)?,
        };
        self.delete(&format!("folders/{folder_id}"), revision)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::client::testing::{body, client, RecordingTransport};
    use crate::error::ApiError;
    use crate::http::HttpMethod;
    use crate::types::FolderUpdate;

    #[test]
    fn create_folder_posts_title_and_members() {
        let transport = RecordingTransport::new();
        transport.respond(
            201,
            json!({"id": 5, "title": "Work", "list_ids": [1, 2], "revision": 1, "type": "folder"}),
        );
        let folder = client(&transport).create_folder("Work", &[1, 2]).unwrap();
        assert_eq!(folder.list_ids, vec![1, 2]);
        assert_eq!(
            body(&transport.requests()[0]),
            json!({"title": "Work", "list_ids": [1, 2]})
        );
    }

    #[test]
    fn create_folder_rejects_long_title() {
        let transport = RecordingTransport::new();
        let err = client(&transport).create_folder(&"f".repeat(300), &[]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn folder_revisions_are_parsed() {
        let transport = RecordingTransport::new();
        transport.ok(json!([
            {"id": 1, "revision": 6, "type": "folder_revision"},
            {"id": 2, "revision": 9, "type": "folder_revision"}
        ]));
        let stamps = client(&transport).get_folder_revisions().unwrap();
        assert_eq!(stamps.len(), 2);
        assert_eq!(stamps[1].revision, 9);
        assert_eq!(transport.requests()[0].url, "https://api.test/v1/folder_revisions");
    }

    #[test]
    fn update_membership_replaces_set() {
        let transport = RecordingTransport::new();
        transport.ok(json!({"id": 5, "title": "Work", "list_ids": [3], "revision": 4, "type": "folder"}));
        let update = FolderUpdate {
            list_ids: Some(vec![3]),
            ..Default::default()
        };
        client(&transport).update_folder(5, &update, Some(3)).unwrap();
        let req = &transport.requests()[0];
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(body(req), json!({"revision": 3, "list_ids": [3]}));
    }

    #[test]
    fn delete_without_revision_reads_first() {
        let transport = RecordingTransport::new();
        transport
            .ok(json!({"id": 5, "title": "Work", "list_ids": [], "revision": 8, "type": "folder"}))
            .no_content();
        assert!(client(&transport).delete_folder(5, None).unwrap());
        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[1].query_param("revision"), Some("8"));
    }
}
