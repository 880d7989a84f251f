//! HttpSessionApi -- concrete [`SessionApi`] implementation over HTTP.
//!
//! Talks JSON to the chat backend's `/api/sessions` routes. Any non-2xx
//! status becomes [`ApiError::Server`], connection failures and timeouts
//! become [`ApiError::Transport`], and bodies of the wrong shape become
//! [`ApiError::Decode`].

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use parley_core::chat::api::SessionApi;
use parley_types::config::ClientConfig;
use parley_types::error::ApiError;
use parley_types::message::RawMessage;
use parley_types::session::Session;

use super::types::{CreateSessionBody, UpdateTitleBody};
use crate::config::resolve_request_timeout;

/// Session API client for a single backend.
#[derive(Debug, Clone)]
pub struct HttpSessionApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSessionApi {
    /// Build a client from configuration.
    ///
    /// Fails if `base_url` is not an absolute http(s) URL or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("base_url '{}': {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "base_url '{}' cannot carry a path",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(resolve_request_timeout(config))
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// The backend this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base_url}/api/sessions/{segments...}`, each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Config(format!("base_url '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "sessions"])
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let url = self.url(segments)?;
        tracing::debug!(%method, %url, "Session API request");
        Ok(self.client.request(method, url))
    }
}

/// Send a request and reject non-success statuses.
async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Transport(format!("HTTP request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Send a request and decode its JSON body.
async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    send(request)
        .await?
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(format!("failed to parse response: {e}")))
}

impl SessionApi for HttpSessionApi {
    async fn list_sessions(&self) -> Result<Vec<Session>, ApiError> {
        send_json(self.request(Method::GET, &[])?).await
    }

    async fn create_session(&self, title: Option<&str>) -> Result<Session, ApiError> {
        let request = self
            .request(Method::POST, &[])?
            .json(&CreateSessionBody { title });
        send_json(request).await
    }

    async fn get_session(&self, session_id: &str) -> Result<Session, ApiError> {
        send_json(self.request(Method::GET, &[session_id])?).await
    }

    async fn list_messages(&self, session_id: &str) -> Result<Vec<RawMessage>, ApiError> {
        send_json(self.request(Method::GET, &[session_id, "messages"])?).await
    }

    async fn update_title(&self, session_id: &str, title: &str) -> Result<Session, ApiError> {
        let request = self
            .request(Method::PUT, &[session_id, "title"])?
            .json(&UpdateTitleBody { title });
        send_json(request).await
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), ApiError> {
        send(self.request(Method::DELETE, &[session_id])?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use parley_core::chat::cache::SessionCache;
    use parley_types::message::MessageRole;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(server: &MockServer) -> HttpSessionApi {
        HttpSessionApi::new(&ClientConfig {
            base_url: server.uri(),
            request_timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let err = HttpSessionApi::new(&ClientConfig {
            base_url: "not a url".to_string(),
            request_timeout_secs: 5,
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_url_encodes_segments_and_keeps_prefix() {
        let api = HttpSessionApi::new(&ClientConfig {
            base_url: "http://localhost:8000/chat/".to_string(),
            request_timeout_secs: 5,
        })
        .unwrap();
        let url = api.url(&["a/b c", "messages"]).unwrap();
        assert_eq!(url.path(), "/chat/api/sessions/a%2Fb%20c/messages");
    }

    #[tokio::test]
    async fn test_list_sessions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1", "title": "First", "user_id": null, "created_at": "2024-01-02T00:00:00"},
                {"id": "2", "title": "Second", "user_id": null, "created_at": null},
                {"id": "3", "title": null, "user_id": null, "created_at": null}
            ])))
            .mount(&server)
            .await;

        let sessions = api_for(&server).list_sessions().await.unwrap();
        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0].title, "First");
        assert!(sessions[1].created_at.is_none());
        assert_eq!(sessions[2].title, "");
    }

    #[tokio::test]
    async fn test_create_session_sends_title() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/sessions"))
            .and(body_json(json!({"title": "New"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(
                {"id": "2", "title": "New", "created_at": "2024-01-03T00:00:00"}
            )))
            .expect(1)
            .mount(&server)
            .await;

        let session = api_for(&server).create_session(Some("New")).await.unwrap();
        assert_eq!(session.id, "2");
    }

    #[tokio::test]
    async fn test_create_session_without_title_sends_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/sessions"))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(
                {"id": "3", "title": "新对话"}
            )))
            .expect(1)
            .mount(&server)
            .await;

        let session = api_for(&server).create_session(None).await.unwrap();
        assert_eq!(session.title, "新对话");
    }

    #[tokio::test]
    async fn test_update_title_puts_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/sessions/s1/title"))
            .and(body_json(json!({"title": "Renamed"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(
                {"id": "s1", "title": "Renamed"}
            )))
            .mount(&server)
            .await;

        let session = api_for(&server).update_title("s1", "Renamed").await.unwrap();
        assert_eq!(session.title, "Renamed");
    }

    #[tokio::test]
    async fn test_get_session_not_found_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/sessions/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Session not found"))
            .mount(&server)
            .await;

        let err = api_for(&server).get_session("missing").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("Session not found"));
    }

    #[tokio::test]
    async fn test_delete_session_accepts_any_2xx() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/sessions/s1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        api_for(&server).delete_session("s1").await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = api_for(&server).list_sessions().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let api = HttpSessionApi::new(&ClientConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_secs: 5,
        })
        .unwrap();
        let err = api.list_sessions().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn test_cache_over_http_switch_and_delete() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "s0", "title": "Older", "created_at": "2024-01-01T00:00:00"},
                {"id": "s1", "title": "Newer", "created_at": "2024-01-02T00:00:00"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/sessions/s1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "m1", "role": "user", "content": "hi", "metadata": null, "created_at": "t0"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/sessions/s1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
            .mount(&server)
            .await;

        let cache = SessionCache::new(api_for(&server));
        cache.load_sessions().await;
        assert_eq!(cache.sessions()[0].id, "s1");

        cache.switch_session("s1").await;
        let messages = cache.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].timestamp.as_deref(), Some("t0"));

        assert!(!cache.delete_session("s1").await);
        assert_eq!(cache.sessions().len(), 2);
        assert_eq!(cache.active_session_id().as_deref(), Some("s1"));
    }
}
