//! SessionApi trait definition.
//!
//! The remote chat backend as the cache sees it: list, create, fetch, rename
//! and delete sessions, and list a session's messages. Transport details
//! (HTTP framing, auth) live in the implementation.

use parley_types::error::ApiError;
use parley_types::message::RawMessage;
use parley_types::session::Session;

/// Port for the remote session API.
///
/// Implementations live in parley-infra (e.g., `HttpSessionApi`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait SessionApi: Send + Sync {
    /// `GET /api/sessions`
    fn list_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Session>, ApiError>> + Send;

    /// `POST /api/sessions` with an optional title.
    fn create_session(
        &self,
        title: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Session, ApiError>> + Send;

    /// `GET /api/sessions/{id}`
    fn get_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Session, ApiError>> + Send;

    /// `GET /api/sessions/{id}/messages`, oldest first.
    fn list_messages(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<RawMessage>, ApiError>> + Send;

    /// `PUT /api/sessions/{id}/title`, returning the server's updated session.
    fn update_title(
        &self,
        session_id: &str,
        title: &str,
    ) -> impl std::future::Future<Output = Result<Session, ApiError>> + Send;

    /// `DELETE /api/sessions/{id}`
    fn delete_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;
}
