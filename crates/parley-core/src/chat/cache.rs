//! Session/message cache.
//!
//! `SessionCache` is the single source of truth for the session list, the
//! active session id, and the active session's message history. Every remote
//! read or write goes through it; the UI only reads.
//!
//! State lives in a `tokio::sync::watch` channel so renderers can subscribe to
//! snapshots, and every applied change is also published on an [`EventBus`].
//! Mutations are synchronous point updates made after a response arrives; no
//! lock is held across an `.await`.
//!
//! Remote operations come in pairs: `try_*` returns the [`ApiError`] so the
//! caller can react, the plain form logs it and leaves the cache untouched.

use std::sync::atomic::{AtomicU64, Ordering};

use parley_types::error::{ApiError, CacheError};
use parley_types::event::CacheEvent;
use parley_types::message::Message;
use parley_types::route::Route;
use parley_types::session::{Session, SessionPatch, sort_newest_first};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::chat::api::SessionApi;
use crate::event::bus::{CacheEvents, EventBus};

/// Point-in-time copy of the cache state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    /// Newest first by `created_at`; missing timestamps sort last.
    pub sessions: Vec<Session>,
    /// `None` is the blank "new conversation" state.
    pub active_session_id: Option<String>,
    /// History of `active_session_id`, oldest first.
    pub messages: Vec<Message>,
}

impl CacheSnapshot {
    /// Look up a cached session by id.
    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }
}

/// What happened to a message fetch once its response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The history replaced `messages`.
    Applied,
    /// The active session changed, or a newer fetch was issued, while this one
    /// was in flight. `messages` was left alone.
    Discarded,
}

/// Cache of sessions and the active conversation, backed by a [`SessionApi`].
///
/// Owned by the application's composition root and shared by reference.
pub struct SessionCache<A: SessionApi> {
    api: A,
    state: watch::Sender<CacheSnapshot>,
    events: EventBus,
    /// Token of the most recently issued message fetch.
    message_requests: AtomicU64,
}

impl<A: SessionApi> SessionCache<A> {
    /// Create an empty cache over the given API.
    pub fn new(api: A) -> Self {
        Self::with_event_bus(api, EventBus::default())
    }

    /// Create an empty cache that publishes on an existing bus.
    pub fn with_event_bus(api: A, events: EventBus) -> Self {
        let (state, _) = watch::channel(CacheSnapshot::default());
        Self {
            api,
            state,
            events,
            message_requests: AtomicU64::new(0),
        }
    }

    /// Access the underlying API.
    pub fn api(&self) -> &A {
        &self.api
    }

    // --- Observation ---

    /// Clone of the current state.
    pub fn snapshot(&self) -> CacheSnapshot {
        self.state.borrow().clone()
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.state.borrow().sessions.clone()
    }

    pub fn active_session_id(&self) -> Option<String> {
        self.state.borrow().active_session_id.clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.borrow().messages.clone()
    }

    /// Receiver that is notified whenever the state changes.
    pub fn subscribe(&self) -> watch::Receiver<CacheSnapshot> {
        self.state.subscribe()
    }

    /// Receiver for fine-grained change events.
    pub fn events(&self) -> CacheEvents {
        self.events.subscribe()
    }

    // --- Session list ---

    /// Replace `sessions` with the server's list, newest first.
    pub async fn try_load_sessions(&self) -> Result<(), ApiError> {
        let mut sessions = dedup_by_id(self.api.list_sessions().await?);
        sort_newest_first(&mut sessions);

        let count = sessions.len();
        self.state.send_modify(|state| state.sessions = sessions);
        self.events.publish(CacheEvent::SessionsLoaded { count });
        debug!(count, "Sessions loaded");
        Ok(())
    }

    /// [`try_load_sessions`](Self::try_load_sessions), logging any failure.
    pub async fn load_sessions(&self) {
        if let Err(e) = self.try_load_sessions().await {
            warn!(error = %e, "Failed to load sessions");
        }
    }

    /// Create a session remotely and insert it at the front of the list.
    pub async fn create_session(&self, title: Option<&str>) -> Result<Session, CacheError> {
        let session = match self.api.create_session(title).await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Failed to create session");
                return Err(CacheError::CreationFailed(e));
            }
        };

        let created = session.clone();
        self.state.send_modify(|state| {
            state.sessions.retain(|s| s.id != created.id);
            state.sessions.insert(0, created);
        });
        self.events.publish(CacheEvent::SessionCreated {
            session_id: session.id.clone(),
        });
        info!(session_id = %session.id, "Session created");
        Ok(session)
    }

    /// Fetch one session and replace (or insert) its cached entry.
    ///
    /// An entry that is not cached yet is inserted where its `created_at`
    /// places it, so the list stays newest first.
    pub async fn try_refresh_session(&self, session_id: &str) -> Result<Session, ApiError> {
        let session = self.api.get_session(session_id).await?;

        let fresh = session.clone();
        self.state.send_modify(|state| {
            if let Some(slot) = state.sessions.iter_mut().find(|s| s.id == session_id) {
                *slot = fresh;
            } else {
                let weight = fresh.sort_weight();
                let index = state
                    .sessions
                    .iter()
                    .position(|s| s.sort_weight() < weight)
                    .unwrap_or(state.sessions.len());
                state.sessions.insert(index, fresh);
            }
        });
        self.events.publish(CacheEvent::SessionUpdated {
            session_id: session_id.to_string(),
        });
        debug!(session_id = %session_id, "Session refreshed");
        Ok(session)
    }

    /// [`try_refresh_session`](Self::try_refresh_session), logging any failure.
    pub async fn refresh_session(&self, session_id: &str) {
        if let Err(e) = self.try_refresh_session(session_id).await {
            warn!(session_id = %session_id, error = %e, "Failed to refresh session");
        }
    }

    /// Rename a session remotely.
    ///
    /// On success the cached entry is replaced wholesale with the server's
    /// representation. A session that is not cached is left uncached.
    pub async fn try_update_session_title(
        &self,
        session_id: &str,
        title: &str,
    ) -> Result<Session, ApiError> {
        let updated = self.api.update_title(session_id, title).await?;

        let replacement = updated.clone();
        let replaced = self.state.send_if_modified(|state| {
            match state.sessions.iter_mut().find(|s| s.id == session_id) {
                Some(slot) => {
                    *slot = replacement;
                    true
                }
                None => false,
            }
        });

        if replaced {
            self.events.publish(CacheEvent::SessionUpdated {
                session_id: session_id.to_string(),
            });
            info!(session_id = %session_id, "Session title updated");
        } else {
            debug!(session_id = %session_id, "Renamed session is not cached");
        }
        Ok(updated)
    }

    /// [`try_update_session_title`](Self::try_update_session_title), logging any failure.
    pub async fn update_session_title(&self, session_id: &str, title: &str) {
        if let Err(e) = self.try_update_session_title(session_id, title).await {
            warn!(session_id = %session_id, error = %e, "Failed to update session title");
        }
    }

    /// Shallow-merge `patch` into the cached session. Local only.
    ///
    /// Returns `false` (and changes nothing) when the id is not cached.
    pub fn update_session(&self, session_id: &str, patch: &SessionPatch) -> bool {
        let found = self.state.send_if_modified(|state| {
            match state.sessions.iter_mut().find(|s| s.id == session_id) {
                Some(session) => {
                    patch.apply_to(session);
                    true
                }
                None => false,
            }
        });

        if found {
            self.events.publish(CacheEvent::SessionUpdated {
                session_id: session_id.to_string(),
            });
        }
        found
    }

    /// Delete a session remotely, then drop it from the cache.
    ///
    /// Deleting the active session also resets to the blank conversation.
    pub async fn try_delete_session(&self, session_id: &str) -> Result<(), ApiError> {
        self.api.delete_session(session_id).await?;

        let mut was_active = false;
        self.state.send_modify(|state| {
            state.sessions.retain(|s| s.id != session_id);
            if state.active_session_id.as_deref() == Some(session_id) {
                state.active_session_id = None;
                state.messages.clear();
                was_active = true;
            }
        });

        self.events.publish(CacheEvent::SessionDeleted {
            session_id: session_id.to_string(),
        });
        if was_active {
            self.events
                .publish(CacheEvent::ActiveSessionChanged { session_id: None });
            self.events.publish(CacheEvent::MessagesCleared);
        }
        info!(session_id = %session_id, was_active, "Session deleted");
        Ok(())
    }

    /// [`try_delete_session`](Self::try_delete_session) reduced to a success flag.
    ///
    /// Never errors; callers must check the result.
    pub async fn delete_session(&self, session_id: &str) -> bool {
        match self.try_delete_session(session_id).await {
            Ok(()) => true,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Failed to delete session");
                false
            }
        }
    }

    // --- Active session and messages ---

    /// Make `session_id` active and load its messages.
    ///
    /// The id is not checked against the cached list.
    pub async fn try_switch_session(&self, session_id: &str) -> Result<LoadOutcome, ApiError> {
        self.set_active(Some(session_id.to_string()));
        self.try_load_messages(session_id).await
    }

    /// [`try_switch_session`](Self::try_switch_session), logging any failure.
    pub async fn switch_session(&self, session_id: &str) {
        self.set_active(Some(session_id.to_string()));
        self.load_messages(session_id).await;
    }

    /// Fetch the history of `session_id` and replace `messages` with it.
    ///
    /// The response is applied only if this is still the latest message fetch
    /// and `session_id` is still the active session when it arrives.
    /// Otherwise it is dropped and [`LoadOutcome::Discarded`] is returned.
    pub async fn try_load_messages(&self, session_id: &str) -> Result<LoadOutcome, ApiError> {
        let token = self.message_requests.fetch_add(1, Ordering::SeqCst) + 1;

        let messages: Vec<Message> = self
            .api
            .list_messages(session_id)
            .await?
            .into_iter()
            .map(Message::from)
            .collect();
        let count = messages.len();

        let applied = self.state.send_if_modified(|state| {
            let latest = self.message_requests.load(Ordering::SeqCst) == token;
            if !latest || state.active_session_id.as_deref() != Some(session_id) {
                return false;
            }
            state.messages = messages;
            true
        });

        if applied {
            self.events.publish(CacheEvent::MessagesLoaded {
                session_id: session_id.to_string(),
                count,
            });
            debug!(session_id = %session_id, count, "Messages loaded");
            Ok(LoadOutcome::Applied)
        } else {
            self.events.publish(CacheEvent::StaleMessagesDiscarded {
                session_id: session_id.to_string(),
            });
            debug!(session_id = %session_id, "Discarded stale message response");
            Ok(LoadOutcome::Discarded)
        }
    }

    /// [`try_load_messages`](Self::try_load_messages), logging any failure.
    pub async fn load_messages(&self, session_id: &str) {
        if let Err(e) = self.try_load_messages(session_id).await {
            warn!(session_id = %session_id, error = %e, "Failed to load messages");
        }
    }

    /// Append a message locally, e.g. the user's input or a streamed reply.
    pub fn add_message(&self, message: Message) {
        let message_id = message.id.clone();
        self.state.send_modify(|state| state.messages.push(message));
        self.events.publish(CacheEvent::MessageAdded { message_id });
    }

    /// Empty `messages`. Local only and idempotent.
    pub fn clear_messages(&self) {
        let cleared = self.state.send_if_modified(|state| {
            if state.messages.is_empty() {
                return false;
            }
            state.messages.clear();
            true
        });
        if cleared {
            self.events.publish(CacheEvent::MessagesCleared);
        }
    }

    /// Bring the cache in line with a route change.
    ///
    /// `/` resets to the blank conversation. `/{id}` switches to `id` unless
    /// it is already active.
    pub async fn navigate(&self, route: &Route) {
        match route {
            Route::NewChat => {
                self.set_active(None);
                self.clear_messages();
            }
            Route::Chat(session_id) => {
                if self.active_session_id().as_deref() != Some(session_id.as_str()) {
                    self.switch_session(session_id).await;
                }
            }
        }
    }

    fn set_active(&self, session_id: Option<String>) {
        let changed = self.state.send_if_modified(|state| {
            if state.active_session_id == session_id {
                return false;
            }
            state.active_session_id = session_id.clone();
            true
        });
        if changed {
            self.events
                .publish(CacheEvent::ActiveSessionChanged { session_id });
        }
    }
}

/// Keep the first occurrence of every id, preserving order.
fn dedup_by_id(sessions: Vec<Session>) -> Vec<Session> {
    let mut seen = std::collections::HashSet::new();
    sessions
        .into_iter()
        .filter(|s| seen.insert(s.id.clone()))
        .collect()
}
