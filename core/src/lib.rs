//! Synchronous client for the Wunderlist v1 REST API.
//!
//! # Overview
//! `WunderClient` turns method calls into HTTP requests for one authenticated
//! user and validates every response before handing back typed records.
//! Lists, folders, tasks, subtasks, notes and the user account each get a
//! group of operations; a few helpers chain requests, e.g. looking a list up
//! by title or fetching the current revision before a write.
//!
//! # Design
//! - Requests and responses are plain data (`HttpRequest`, `HttpResponse`).
//!   A `Transport` performs the round-trip; `UreqTransport` is the default.
//! - The client caches nothing. Every read is a fresh request.
//! - Writes carry the record's revision. When the caller omits it, the client
//!   reads the record first. Conflicts come back as `ApiError::StaleRevision`.
//! - Title length is checked before any request is made.

pub mod client;
pub mod config;
mod convenience;
pub mod error;
mod folders;
pub mod http;
mod lists;
mod notes;
pub mod request;
pub mod response;
mod subtasks;
mod tasks;
pub mod types;

pub use client::WunderClient;
pub use config::Credentials;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{
    Folder, FolderUpdate, List, ListUpdate, NewTask, Note, Recurrence, RecurrenceKind, RevisionStamp, Scope,
    Subtask, SubtaskUpdate, Task, TaskField, TaskUpdate, User,
};
