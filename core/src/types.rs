//! Records returned by the API and payloads sent to it.
//!
//! # Design
//! Records name the fields the client relies on and keep everything else the
//! server sends in `extra`, so a record read here can be inspected in full.
//! Write payloads are explicit structs: a `None` field is omitted from the
//! wire, and clearing a task attribute goes through `TaskUpdate::remove`
//! rather than a null value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Longest title the API accepts, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// Reject titles the server would refuse, before any request is made.
pub fn check_title(title: &str) -> Result<(), ApiError> {
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ApiError::InvalidArgument(format!(
            "title is too long ({len} characters, {MAX_TITLE_LEN} max)"
        )));
    }
    Ok(())
}

/// The authenticated user, or a user sharing one of its lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub revision: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct List {
    pub id: u64,
    pub title: String,
    pub revision: u64,
    #[serde(default)]
    pub public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A folder groups lists. `list_ids` is replaced wholesale on update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Folder {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub list_ids: Vec<u64>,
    pub revision: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Id and current revision of a record, as returned by `/folder_revisions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevisionStamp {
    pub id: u64,
    pub revision: u64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: u64,
    pub list_id: u64,
    pub title: String,
    pub revision: u64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub starred: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_type: Option<RecurrenceKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subtask {
    pub id: u64,
    pub task_id: u64,
    pub title: String,
    pub revision: u64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A note attached to a task. The API currently allows one per task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: u64,
    pub task_id: u64,
    #[serde(default)]
    pub content: String,
    pub revision: u64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    Day,
    Week,
    Month,
    Year,
}

/// A repeat rule. Serialized as `recurrence_type` plus `recurrence_count`,
/// so one is never sent without the other.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Recurrence {
    #[serde(rename = "recurrence_type")]
    pub kind: RecurrenceKind,
    #[serde(rename = "recurrence_count")]
    pub count: u32,
}

impl Recurrence {
    pub fn new(kind: RecurrenceKind, count: u32) -> Self {
        Self { kind, count }
    }

    pub(crate) fn check(&self) -> Result<(), ApiError> {
        if self.count == 0 {
            return Err(ApiError::InvalidArgument(
                "recurrence count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Task attributes that can be cleared with `TaskUpdate::remove`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskField {
    AssigneeId,
    DueDate,
    RecurrenceType,
    RecurrenceCount,
}

/// Payload for creating a task.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewTask {
    pub list_id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(flatten)]
    pub recurrence: Option<Recurrence>,
    /// ISO 8601 date, e.g. `2016-02-14`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
}

impl NewTask {
    pub fn new(list_id: u64, title: impl Into<String>) -> Self {
        Self {
            list_id,
            title: title.into(),
            assignee_id: None,
            completed: None,
            recurrence: None,
            due_date: None,
            starred: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ListUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FolderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replaces the folder's full membership.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_ids: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(flatten)]
    pub recurrence: Option<Recurrence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<TaskField>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SubtaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Wire body of a PATCH: the observed revision next to the changed fields.
#[derive(Debug, Serialize)]
pub(crate) struct Revised<'a, U: Serialize> {
    pub revision: u64,
    #[serde(flatten)]
    pub fields: &'a U,
}

/// Which collection a subtask or note query is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    List(u64),
    Task(u64),
}

impl Scope {
    /// Resolve a pair of optional ids; exactly one must be present.
    pub fn exactly_one(list_id: Option<u64>, task_id: Option<u64>) -> Result<Self, ApiError> {
        match (list_id, task_id) {
            (Some(id), None) => Ok(Scope::List(id)),
            (None, Some(id)) => Ok(Scope::Task(id)),
            _ => Err(ApiError::InvalidArgument(
                "exactly one of list_id or task_id is required".to_string(),
            )),
        }
    }

    pub(crate) fn query(&self) -> (String, String) {
        match self {
            Scope::List(id) => ("list_id".to_string(), id.to_string()),
            Scope::Task(id) => ("task_id".to_string(), id.to_string()),
        }
    }
}
