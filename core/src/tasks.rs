//! Task endpoints.

use crate::client::WunderClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{check_title, NewTask, Task, TaskUpdate};

impl<T: Transport> WunderClient<T> {
    /// Tasks in a list. `completed` selects completed tasks instead of open ones.
    pub fn get_tasks(&self, list_id: u64, completed: bool) -> Result<Vec<Task>, ApiError> {
        let query = vec![
            ("list_id".to_string(), list_id.to_string()),
            ("completed".to_string(), completed.to_string()),
        ];
        self.get("tasks", query)
    }

    pub fn get_task(&self, task_id: u64) -> Result<Task, ApiError> {
        self.get(&format!("tasks/{task_id}"), Vec::new())
    }

    pub fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        check_title(&task.title)?;
        if let Some(recurrence) = &task.recurrence {
            recurrence.check()?;
        }
        self.post("tasks", task)
    }

    pub fn update_task(&self, task_id: u64, update: &TaskUpdate, revision: Option<u64>) -> Result<Task, ApiError> {
        if let Some(title) = &update.title {
            check_title(title)?;
        }
        if let Some(recurrence) = &update.recurrence {
            recurrence.check()?;
        }
        let revision = match revision {
            Some(revision) => revision,
            None => self.get_task(task_id)?.revision,
        };
        self.patch(&format!("tasks/{task_id}"), revision, update)
    }

    pub fn delete_task(&self, task_id: u64, revision: Option<u64>) -> Result<bool, ApiError> {
        let revision = match revision {
            Some(revision) => revision,
            None => self.get_task(task_id)?.revision,
        };
        self.delete(&format!("tasks/{task_id}"), revision)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::client::testing::{body, client, RecordingTransport};
    use crate::error::ApiError;
    use crate::http::HttpMethod;
    use crate::types::{NewTask, Recurrence, RecurrenceKind, TaskField, TaskUpdate};

    fn task_json(id: u64, revision: u64) -> serde_json::Value {
        json!({"id": id, "list_id": 7, "title": "Call mom", "revision": revision,
               "completed": false, "starred": false, "type": "task"})
    }

    #[test]
    fn get_tasks_always_sends_completed() {
        let transport = RecordingTransport::new();
        transport.ok(json!([task_json(1, 1)]));
        let tasks = client(&transport).get_tasks(7, false).unwrap();
        assert_eq!(tasks.len(), 1);
        let req = &transport.requests()[0];
        assert_eq!(req.query_param("list_id"), Some("7"));
        assert_eq!(req.query_param("completed"), Some("false"));
    }

    #[test]
    fn create_task_sends_only_given_fields() {
        let transport = RecordingTransport::new();
        transport.respond(201, task_json(1, 1));
        let mut task = NewTask::new(7, "Call mom");
        task.starred = Some(true);
        task.due_date = Some("2016-02-14".to_string());
        client(&transport).create_task(&task).unwrap();
        assert_eq!(
            body(&transport.requests()[0]),
            json!({"list_id": 7, "title": "Call mom", "starred": true, "due_date": "2016-02-14"})
        );
    }

    #[test]
    fn create_task_rejects_zero_recurrence() {
        let transport = RecordingTransport::new();
        let mut task = NewTask::new(7, "Stretch");
        task.recurrence = Some(Recurrence::new(RecurrenceKind::Day, 0));
        let err = client(&transport).create_task(&task).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn create_task_rejects_long_title() {
        let transport = RecordingTransport::new();
        let err = client(&transport)
            .create_task(&NewTask::new(7, "t".repeat(256)))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn update_task_with_removal() {
        let transport = RecordingTransport::new();
        transport.ok(task_json(1, 5));
        let update = TaskUpdate {
            completed: Some(true),
            remove: vec![TaskField::DueDate],
            ..Default::default()
        };
        client(&transport).update_task(1, &update, Some(4)).unwrap();
        let req = &transport.requests()[0];
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.url, "https://api.test/v1/tasks/1");
        assert_eq!(
            body(req),
            json!({"revision": 4, "completed": true, "remove": ["due_date"]})
        );
    }

    #[test]
    fn update_task_without_revision_reads_task() {
        let transport = RecordingTransport::new();
        transport.ok(task_json(1, 11)).ok(task_json(1, 12));
        let update = TaskUpdate {
            title: Some("Call dad".to_string()),
            ..Default::default()
        };
        client(&transport).update_task(1, &update, None).unwrap();
        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url, "https://api.test/v1/tasks/1");
        assert_eq!(body(&requests[1])["revision"], 11);
    }

    #[test]
    fn update_task_title_checked_before_revision_lookup() {
        let transport = RecordingTransport::new();
        let update = TaskUpdate {
            title: Some("t".repeat(1000)),
            ..Default::default()
        };
        assert!(client(&transport).update_task(1, &update, None).is_err());
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn delete_task_explicit_revision() {
        let transport = RecordingTransport::new();
        transport.no_content();
        assert!(client(&transport).delete_task(1, Some(3)).unwrap());
        assert_eq!(transport.request_count(), 1);
    }
}
