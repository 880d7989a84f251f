//! Application routes.
//!
//! The UI has two views: `/` starts a new conversation and `/{session_id}`
//! shows an existing one. The cache only cares about the session id segment.

use std::fmt;
use std::str::FromStr;

use crate::error::RouteError;

/// A parsed application path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: blank conversation, no active session.
    NewChat,
    /// `/{session_id}`
    Chat(String),
}

impl Route {
    /// Parse a path such as `/`, `/abc` or `abc/`.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let trimmed = path.trim();
        let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

        if trimmed.is_empty() {
            return Ok(Route::NewChat);
        }
        if trimmed.contains('/') {
            return Err(RouteError::TooManySegments(path.to_string()));
        }
        Ok(Route::Chat(trimmed.to_string()))
    }

    /// The session id carried by this route, if any.
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Route::NewChat => None,
            Route::Chat(id) => Some(id),
        }
    }

    /// Render the route back into a path.
    pub fn path(&self) -> String {
        match self {
            Route::NewChat => "/".to_string(),
            Route::Chat(id) => format!("/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}
