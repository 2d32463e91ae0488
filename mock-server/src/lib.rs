//! In-memory stand-in for the Wunderlist v1 API.
//!
//! Records are stored as JSON objects keyed by kind and id. The five record
//! kinds share one set of handlers; per-kind rules (required fields, defaults,
//! collection filters) live on `Kind`. Writes enforce revisions the way the
//! real service does, and errors use its `{"error": {...}}` body shape.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::debug;

pub const API_PREFIX: &str = "/api/v1";
pub const MAX_TITLE_LEN: usize = 255;

pub type Record = Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Kind {
    List,
    Folder,
    Task,
    Subtask,
    Note,
}

impl Kind {
    fn from_segment(segment: &str) -> Result<Self, ApiFailure> {
        match segment {
            "lists" => Ok(Kind::List),
            "folders" => Ok(Kind::Folder),
            "tasks" => Ok(Kind::Task),
            "subtasks" => Ok(Kind::Subtask),
            "notes" => Ok(Kind::Note),
            other => Err(ApiFailure::not_found(format!("unknown resource {other:?}"))),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Kind::List => "list",
            Kind::Folder => "folder",
            Kind::Task => "task",
            Kind::Subtask => "subtask",
            Kind::Note => "note",
        }
    }

    fn required(&self) -> &'static [&'static str] {
        match self {
            Kind::List => &["title"],
            Kind::Folder => &["title", "list_ids"],
            Kind::Task => &["list_id", "title"],
            Kind::Subtask => &["task_id", "title"],
            Kind::Note => &["task_id", "content"],
        }
    }

    fn defaults(&self) -> Record {
        let defaults = match self {
            Kind::List => json!({"public": false, "list_type": "list"}),
            Kind::Folder => json!({"list_ids": []}),
            Kind::Task => json!({"completed": false, "starred": false}),
            Kind::Subtask => json!({"completed": false}),
            Kind::Note => json!({}),
        };
        match defaults {
            Value::Object(map) => map,
            _ => Record::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: u64,
    records: BTreeMap<Kind, BTreeMap<u64, Record>>,
}

impl Store {
    fn table(&self, kind: Kind) -> impl Iterator<Item = &Record> {
        self.records.get(&kind).into_iter().flat_map(|t| t.values())
    }

    fn get(&self, kind: Kind, id: u64) -> Option<&Record> {
        self.records.get(&kind).and_then(|t| t.get(&id))
    }

    fn exists(&self, kind: Kind, id: u64) -> bool {
        self.get(kind, id).is_some()
    }

    fn ids_where(&self, kind: Kind, field: &str, value: u64) -> BTreeSet<u64> {
        self.table(kind)
            .filter(|r| u64_field(r, field) == Some(value))
            .filter_map(|r| u64_field(r, "id"))
            .collect()
    }

    fn remove(&mut self, kind: Kind, id: u64) {
        if let Some(table) = self.records.get_mut(&kind) {
            table.remove(&id);
        }
        let children: Vec<(Kind, u64)> = match kind {
            Kind::List => self
                .ids_where(Kind::Task, "list_id", id)
                .into_iter()
                .map(|task| (Kind::Task, task))
                .collect(),
            Kind::Task => [Kind::Subtask, Kind::Note]
                .into_iter()
                .flat_map(|k| self.ids_where(k, "task_id", id).into_iter().map(move |c| (k, c)))
                .collect(),
            _ => Vec::new(),
        };
        for (kind, id) in children {
            self.remove(kind, id);
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

fn u64_field(record: &Record, field: &str) -> Option<u64> {
    record.get(field).and_then(Value::as_u64)
}

/// An error rendered in the API's error body shape.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    kind: &'static str,
    message: String,
    revision_conflict: bool,
}

impl ApiFailure {
    fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
            revision_conflict: false,
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "unprocessable_entity", message)
    }

    fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", "You are not authorized.")
    }

    fn conflict() -> Self {
        Self {
            revision_conflict: true,
            ..Self::new(
                StatusCode::CONFLICT,
                "conflict",
                "There is a conflict with the given data. The revision does not match.",
            )
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let mut error = json!({
            "type": self.kind,
            "translation_key": format!("api_error_{}", self.kind),
            "message": self.message,
        });
        if self.revision_conflict {
            error["revision_conflict"] = Value::Bool(true);
        }
        (self.status, Json(json!({ "error": error }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Filter {
    pub list_id: Option<u64>,
    pub task_id: Option<u64>,
    pub completed: Option<bool>,
    pub revision: Option<u64>,
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/user", get(get_user))
        .route("/users", get(get_users))
        .route("/folder_revisions", get(folder_revisions))
        .route("/{kind}", get(list_records).post(create_record))
        .route(
            "/{kind}/{id}",
            get(get_record).patch(update_record).delete(delete_record),
        )
        .layer(middleware::from_fn(require_auth))
        .with_state(db);
    Router::new()
        .nest(API_PREFIX, api)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_auth(request: Request, next: Next) -> Response {
    let headers = request.headers();
    if !headers.contains_key("x-access-token") || !headers.contains_key("x-client-id") {
        return ApiFailure::unauthorized().into_response();
    }
    next.run(request).await
}

fn current_user() -> Value {
    json!({
        "id": 1,
        "name": "Mock User",
        "email": "mock@example.com",
        "created_at": "2016-01-01T00:00:00.000Z",
        "revision": 1,
        "type": "user"
    })
}

async fn get_user() -> Json<Value> {
    Json(current_user())
}

async fn get_users(
    State(db): State<Db>,
    Query(filter): Query<Filter>,
) -> Result<Json<Vec<Value>>, ApiFailure> {
    if let Some(list_id) = filter.list_id {
        if !db.read().await.exists(Kind::List, list_id) {
            return Err(ApiFailure::not_found("list not found"));
        }
    }
    Ok(Json(vec![current_user()]))
}

async fn folder_revisions(State(db): State<Db>) -> Json<Vec<Value>> {
    let store = db.read().await;
    let stamps = store
        .table(Kind::Folder)
        .map(|r| json!({"id": r["id"], "revision": r["revision"], "type": "folder_revision"}))
        .collect();
    Json(stamps)
}

async fn list_records(
    State(db): State<Db>,
    Path(segment): Path<String>,
    Query(filter): Query<Filter>,
) -> Result<Json<Vec<Record>>, ApiFailure> {
    let kind = Kind::from_segment(&segment)?;
    let store = db.read().await;

    let records: Vec<Record> = match kind {
        Kind::List | Kind::Folder => store.table(kind).cloned().collect(),
        Kind::Task => {
            let list_id = filter
                .list_id
                .ok_or_else(|| ApiFailure::bad_request("list_id is required"))?;
            let completed = filter.completed.unwrap_or(false);
            store
                .table(kind)
                .filter(|r| u64_field(r, "list_id") == Some(list_id))
                .filter(|r| r.get("completed").and_then(Value::as_bool) == Some(completed))
                .cloned()
                .collect()
        }
        Kind::Subtask | Kind::Note => {
            let task_ids = match (filter.list_id, filter.task_id) {
                (Some(list_id), None) => store.ids_where(Kind::Task, "list_id", list_id),
                (None, Some(task_id)) => BTreeSet::from([task_id]),
                _ => {
                    return Err(ApiFailure::bad_request(
                        "exactly one of list_id or task_id is required",
                    ))
                }
            };
            let only_completed = kind == Kind::Subtask && filter.completed == Some(true);
            store
                .table(kind)
                .filter(|r| u64_field(r, "task_id").is_some_and(|id| task_ids.contains(&id)))
                .filter(|r| !only_completed || r.get("completed").and_then(Value::as_bool) == Some(true))
                .cloned()
                .collect()
        }
    };
    Ok(Json(records))
}

fn check_title(body: &Record) -> Result<(), ApiFailure> {
    if let Some(title) = body.get("title") {
        let title = title
            .as_str()
            .ok_or_else(|| ApiFailure::unprocessable("title must be a string"))?;
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(ApiFailure::unprocessable("title is too long"));
        }
    }
    Ok(())
}

async fn create_record(
    State(db): State<Db>,
    Path(segment): Path<String>,
    Json(body): Json<Record>,
) -> Result<(StatusCode, Json<Record>), ApiFailure> {
    let kind = Kind::from_segment(&segment)?;
    for field in kind.required() {
        if !body.contains_key(*field) {
            return Err(ApiFailure::unprocessable(format!("{field} is required")));
        }
    }
    check_title(&body)?;

    let mut store = db.write().await;
    match kind {
        Kind::Task => {
            let list_id = u64_field(&body, "list_id").unwrap_or_default();
            if !store.exists(Kind::List, list_id) {
                return Err(ApiFailure::unprocessable("list does not exist"));
            }
        }
        Kind::Subtask | Kind::Note => {
            let task_id = u64_field(&body, "task_id").unwrap_or_default();
            if !store.exists(Kind::Task, task_id) {
                return Err(ApiFailure::unprocessable("task does not exist"));
            }
            if kind == Kind::Note && !store.ids_where(Kind::Note, "task_id", task_id).is_empty() {
                return Err(ApiFailure::unprocessable("task already has a note"));
            }
        }
        Kind::List | Kind::Folder => {}
    }

    store.next_id += 1;
    let id = store.next_id;
    let mut record = kind.defaults();
    for (key, value) in body {
        if !matches!(key.as_str(), "id" | "revision" | "type") {
            record.insert(key, value);
        }
    }
    record.insert("id".to_string(), json!(id));
    record.insert("revision".to_string(), json!(1));
    record.insert("type".to_string(), json!(kind.tag()));

    store
        .records
        .entry(kind)
        .or_default()
        .insert(id, record.clone());
    debug!(kind = kind.tag(), id, "created record");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record(
    State(db): State<Db>,
    Path((segment, id)): Path<(String, u64)>,
) -> Result<Json<Record>, ApiFailure> {
    let kind = Kind::from_segment(&segment)?;
    let store = db.read().await;
    store
        .get(kind, id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found("The resource you requested could not be found."))
}

fn check_revision(record: &Record, submitted: Option<u64>) -> Result<(), ApiFailure> {
    let submitted = submitted.ok_or_else(|| ApiFailure::bad_request("revision is required"))?;
    if u64_field(record, "revision") != Some(submitted) {
        return Err(ApiFailure::conflict());
    }
    Ok(())
}

async fn update_record(
    State(db): State<Db>,
    Path((segment, id)): Path<(String, u64)>,
    Json(body): Json<Record>,
) -> Result<Json<Record>, ApiFailure> {
    let kind = Kind::from_segment(&segment)?;
    let mut store = db.write().await;
    let record = store
        .records
        .get_mut(&kind)
        .and_then(|t| t.get_mut(&id))
        .ok_or_else(|| ApiFailure::not_found("The resource you requested could not be found."))?;

    check_revision(record, u64_field(&body, "revision"))?;
    check_title(&body)?;

    for (key, value) in body {
        match key.as_str() {
            "id" | "revision" | "type" => {}
            "remove" => {
                for field in value.as_array().into_iter().flatten().filter_map(Value::as_str) {
                    record.remove(field);
                }
            }
            _ => {
                record.insert(key, value);
            }
        }
    }
    let revision = u64_field(record, "revision").unwrap_or_default() + 1;
    record.insert("revision".to_string(), json!(revision));
    debug!(kind = kind.tag(), id, revision, "updated record");
    Ok(Json(record.clone()))
}

async fn delete_record(
    State(db): State<Db>,
    Path((segment, id)): Path<(String, u64)>,
    Query(filter): Query<Filter>,
) -> Result<StatusCode, ApiFailure> {
    let kind = Kind::from_segment(&segment)?;
    let mut store = db.write().await;
    let record = store
        .get(kind, id)
        .ok_or_else(|| ApiFailure::not_found("The resource you requested could not be found."))?;
    check_revision(record, filter.revision)?;
    store.remove(kind, id);
    debug!(kind = kind.tag(), id, "deleted record");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_body_has_api_error_shape() {
        let failure = ApiFailure::not_found("gone");
        assert_eq!(failure.status, StatusCode::NOT_FOUND);
        assert_eq!(failure.kind, "not_found");
        assert!(!failure.revision_conflict);
    }

    #[test]
    fn conflict_is_flagged() {
        let failure = ApiFailure::conflict();
        assert_eq!(failure.status, StatusCode::CONFLICT);
        assert!(failure.revision_conflict);
    }

    #[test]
    fn kind_segments() {
        assert_eq!(Kind::from_segment("lists").unwrap(), Kind::List);
        assert_eq!(Kind::from_segment("notes").unwrap().tag(), "note");
        assert!(Kind::from_segment("reminders").is_err());
    }

    #[test]
    fn removing_a_list_removes_its_tasks_and_their_children() {
        let mut store = Store::default();
        let rec = |v: Value| match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        store.records.entry(Kind::List).or_default().insert(1, rec(json!({"id": 1})));
        store
            .records
            .entry(Kind::Task)
            .or_default()
            .insert(2, rec(json!({"id": 2, "list_id": 1})));
        store
            .records
            .entry(Kind::Note)
            .or_default()
            .insert(3, rec(json!({"id": 3, "task_id": 2})));

        store.remove(Kind::List, 1);
        assert!(!store.exists(Kind::Task, 2));
        assert!(!store.exists(Kind::Note, 3));
    }

    #[test]
    fn title_limit_counts_characters() {
        let ok = rec_with_title(&"é".repeat(255));
        assert!(check_title(&ok).is_ok());
        let long = rec_with_title(&"a".repeat(256));
        assert!(check_title(&long).is_err());
    }

    fn rec_with_title(title: &str) -> Record {
        let mut r = Record::new();
        r.insert("title".to_string(), json!(title));
        r
    }
}
