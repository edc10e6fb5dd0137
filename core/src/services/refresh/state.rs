//! Token pair held by a refresh orchestrator

use chrono::{DateTime, Utc};

use crate::domain::entities::mask_token;

/// Current credentials of one orchestrator instance
///
/// Only the orchestrator mutates this; callers receive copies.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshState {
    pub current_access: Option<String>,
    pub current_refresh: Option<String>,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

impl RefreshState {
    /// State seeded from tokens supplied at startup
    pub fn bootstrap(access: Option<String>, refresh: Option<String>) -> Self {
        Self {
            current_access: access.filter(|t| !t.is_empty()),
            current_refresh: refresh.filter(|t| !t.is_empty()),
            last_refreshed_at: None,
        }
    }

    pub(crate) fn apply(&mut self, access: String, refresh: Option<String>, at: DateTime<Utc>) {
        self.current_access = Some(access);
        if let Some(refresh) = refresh.filter(|t| !t.is_empty()) {
            self.current_refresh = Some(refresh);
        }
        self.last_refreshed_at = Some(at);
    }
}

impl std::fmt::Debug for RefreshState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshState")
            .field("current_access", &self.current_access.as_deref().map(mask_token))
            .field("current_refresh", &self.current_refresh.as_deref().map(mask_token))
            .field("last_refreshed_at", &self.last_refreshed_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_ignores_empty_tokens() {
        let state = RefreshState::bootstrap(Some(String::new()), Some("refresh-token".to_string()));
        assert!(state.current_access.is_none());
        assert_eq!(state.current_refresh.as_deref(), Some("refresh-token"));
        assert!(state.last_refreshed_at.is_none());
    }

    #[test]
    fn test_apply_keeps_refresh_when_not_rotated() {
        let mut state = RefreshState::bootstrap(None, Some("refresh-1".to_string()));
        let now = Utc::now();

        state.apply("access-1".to_string(), None, now);
        assert_eq!(state.current_access.as_deref(), Some("access-1"));
        assert_eq!(state.current_refresh.as_deref(), Some("refresh-1"));
        assert_eq!(state.last_refreshed_at, Some(now));

        state.apply("access-2".to_string(), Some("refresh-2".to_string()), now);
        assert_eq!(state.current_refresh.as_deref(), Some("refresh-2"));
    }

    #[test]
    fn test_debug_masks_tokens() {
        let state = RefreshState::bootstrap(
            Some("eyJhbGciOiJIUzI1NiJ9.secret-payload".to_string()),
            Some("eyJhbGciOiJIUzI1NiJ9.refresh-payload".to_string()),
        );
        let debug = format!("{:?}", state);
        assert!(!debug.contains("secret-payload"));
        assert!(!debug.contains("refresh-payload"));
    }
}
