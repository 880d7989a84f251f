//! Request bodies for the session API.

use serde::Serialize;

/// Body of `POST /api/sessions`.
///
/// `title` is omitted when absent so the server picks its default.
#[derive(Debug, Serialize)]
pub struct CreateSessionBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
}

/// Body of `PUT /api/sessions/{id}/title`.
#[derive(Debug, Serialize)]
pub struct UpdateTitleBody<'a> {
    pub title: &'a str,
}
