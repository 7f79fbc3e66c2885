//! Session verification collaborator.

use std::collections::HashMap;

use axum::http::{header, HeaderMap};
use grow_defence_core::ContentError;

use crate::config::SessionEntry;

/// Authenticated caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserId(String);

impl UserId {
    /// Wraps a user name.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Underlying user name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Looks up the user behind a bearer token.
pub trait SessionVerifier: Send + Sync {
    /// Returns the user for `token`, or `None` when the session is not valid.
    fn verify(&self, token: &str) -> Option<UserId>;
}

/// Verifier backed by the static token table from the configuration file.
#[derive(Clone, Debug, Default)]
pub struct StaticSessions {
    tokens: HashMap<String, UserId>,
}

impl StaticSessions {
    /// Builds the verifier from configured session entries.
    #[must_use]
    pub fn new(entries: &[SessionEntry]) -> Self {
        let tokens = entries
            .iter()
            .map(|entry| (entry.token.clone(), UserId::new(entry.user.clone())))
            .collect();
        Self { tokens }
    }
}

impl SessionVerifier for StaticSessions {
    fn verify(&self, token: &str) -> Option<UserId> {
        self.tokens.get(token).cloned()
    }
}

/// Resolves the caller from an `Authorization: Bearer` header.
pub(crate) fn authenticate(
    verifier: &dyn SessionVerifier,
    headers: &HeaderMap,
) -> Result<UserId, ContentError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .and_then(|token| verifier.verify(token))
        .ok_or(ContentError::Unauthorized)
}
