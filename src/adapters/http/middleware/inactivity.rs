//! Idle-session force logout.
//!
//! Sessions are keyed by the SHA-256 digest of the bearer token so raw tokens
//! never sit in memory longer than the request. A session idle past the
//! policy timeout is rejected once with `SESSION_EXPIRED` and then forgotten.
//! The sweeper moves idle sessions aside so the rejection still happens after
//! eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::adapters::http::error::ApiError;
use crate::domain::account::InactivityPolicy;
use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp};

/// How long an evicted session is remembered as expired.
fn expired_marker_ttl() -> chrono::Duration {
    chrono::Duration::hours(24)
}

/// Digest of a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey([u8; 32]);

impl SessionKey {
    pub fn from_token(token: &str) -> Self {
        let digest = Sha256::digest(token.as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }
}

#[derive(Debug, Default)]
struct Sessions {
    active: HashMap<SessionKey, Timestamp>,
    /// Evicted by the sweeper; value is the eviction time.
    expired: HashMap<SessionKey, Timestamp>,
}

#[derive(Debug)]
pub struct InactivityTracker {
    policy: Option<InactivityPolicy>,
    sessions: RwLock<Sessions>,
}

impl InactivityTracker {
    /// `None` disables the policy; every request passes.
    pub fn new(policy: Option<InactivityPolicy>) -> Self {
        Self {
            policy,
            sessions: RwLock::new(Sessions::default()),
        }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Builds the tracker from a timeout in minutes; 0 disables it.
    pub fn from_minutes(minutes: u64) -> Self {
        Self::new((minutes > 0).then(|| InactivityPolicy::from_minutes(minutes as i64)))
    }

    pub fn is_enabled(&self) -> bool {
        self.policy.is_some()
    }

    /// Records activity, or reports that the session idled out.
    pub async fn touch(&self, key: SessionKey, now: Timestamp) -> Result<(), AuthError> {
        let Some(policy) = self.policy else {
            return Ok(());
        };
        let mut sessions = self.sessions.write().await;
        if sessions.expired.remove(&key).is_some() {
            return Err(AuthError::SessionExpired);
        }
        if let Some(last) = sessions.active.get(&key) {
            if policy.is_expired(*last, now) {
                sessions.active.remove(&key);
                return Err(AuthError::SessionExpired);
            }
        }
        sessions.active.insert(key, now);
        Ok(())
    }

    /// Drops a session on sign-out.
    pub async fn forget(&self, key: &SessionKey) {
        let mut sessions = self.sessions.write().await;
        sessions.active.remove(key);
        sessions.expired.remove(key);
    }

    /// Moves idle sessions to the expired set and drops stale markers.
    /// Returns how many sessions were evicted.
    pub async fn sweep(&self, now: Timestamp) -> usize {
        let Some(policy) = self.policy else {
            return 0;
        };
        let mut sessions = self.sessions.write().await;
        let idle: Vec<SessionKey> = sessions
            .active
            .iter()
            .filter(|(_, last)| policy.is_expired(**last, now))
            .map(|(key, _)| *key)
            .collect();
        for key in &idle {
            sessions.active.remove(key);
            sessions.expired.insert(*key, now);
        }
        let ttl = expired_marker_ttl();
        sessions
            .expired
            .retain(|_, evicted_at| now.duration_since(evicted_at) <= ttl);
        idle.len()
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.active.len()
    }
}

/// Periodically evicts idle sessions.
pub fn spawn_inactivity_sweeper(tracker: Arc<InactivityTracker>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let evicted = tracker.sweep(Timestamp::now()).await;
            if evicted > 0 {
                tracing::info!(evicted, "Evicted idle sessions");
            }
        }
    })
}

/// Rejects requests from sessions idle past the timeout.
///
/// Runs after `auth_middleware`; anonymous requests and the admin API token
/// are not tracked.
pub async fn inactivity_middleware(
    State(tracker): State<Arc<InactivityTracker>>,
    request: Request,
    next: Next,
) -> Response {
    let tracked = request
        .extensions()
        .get::<AuthenticatedUser>()
        .is_some_and(|user| !user.is_service_admin);
    let key = request.extensions().get::<SessionKey>().copied();

    if let (true, Some(key)) = (tracked, key) {
        if let Err(e) = tracker.touch(key, Timestamp::now()).await {
            tracing::info!("Rejecting request from idle session");
            return ApiError::from(e).into_response();
        }
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(n: i64) -> chrono::Duration {
        chrono::Duration::minutes(n)
    }

    #[test]
    fn digest_is_stable_and_token_specific() {
        assert_eq!(SessionKey::from_token("abc"), SessionKey::from_token("abc"));
        assert_ne!(SessionKey::from_token("abc"), SessionKey::from_token("abd"));
    }

    #[tokio::test]
    async fn idle_session_is_rejected_once_then_forgotten() {
        let tracker = InactivityTracker::from_minutes(30);
        let key = SessionKey::from_token("token");
        let start = Timestamp::now();

        tracker.touch(key, start).await.unwrap();
        tracker.touch(key, start.plus(minutes(29))).await.unwrap();
        assert_eq!(
            tracker.touch(key, start.plus(minutes(60))).await,
            Err(AuthError::SessionExpired)
        );
        assert_eq!(tracker.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn swept_session_still_gets_expired_response() {
        let tracker = InactivityTracker::from_minutes(30);
        let key = SessionKey::from_token("token");
        let start = Timestamp::now();
        tracker.touch(key, start).await.unwrap();

        assert_eq!(tracker.sweep(start.plus(minutes(31))).await, 1);
        assert_eq!(
            tracker.touch(key, start.plus(minutes(32))).await,
            Err(AuthError::SessionExpired)
        );
        tracker.touch(key, start.plus(minutes(33))).await.unwrap();
    }

    #[tokio::test]
    async fn zero_minutes_disables_policy() {
        let tracker = InactivityTracker::from_minutes(0);
        let key = SessionKey::from_token("token");
        let start = Timestamp::now();
        tracker.touch(key, start).await.unwrap();
        tracker.touch(key, start.plus(minutes(600))).await.unwrap();
        assert!(!tracker.is_enabled());
    }

    #[tokio::test]
    async fn sign_out_forgets_session() {
        let tracker = InactivityTracker::from_minutes(30);
        let key = SessionKey::from_token("token");
        let start = Timestamp::now();
        tracker.touch(key, start).await.unwrap();
        tracker.forget(&key).await;
        tracker.touch(key, start.plus(minutes(90))).await.unwrap();
    }
}
