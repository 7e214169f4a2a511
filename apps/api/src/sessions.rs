use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::form::{FormSession, SubmitAction, Validator};

/// In-memory form sessions, one per open page. Nothing survives a restart.
///
/// Pages that close without deleting their session are dropped once idle
/// for longer than `idle_ttl`.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, FormSession>>>,
    validator: Validator,
    submit_action: Arc<dyn SubmitAction>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(
        validator: Validator,
        submit_action: Arc<dyn SubmitAction>,
        max_sessions: usize,
        idle_ttl: Duration,
    ) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            validator,
            submit_action,
            max_sessions,
            idle_ttl,
        }
    }

    pub fn create(&self) -> Result<Uuid, AppError> {
        self.create_at(Utc::now())
    }

    fn create_at(&self, now: DateTime<Utc>) -> Result<Uuid, AppError> {
        let mut sessions = self.lock()?;
        let before = sessions.len();
        sessions.retain(|_, session| !self.is_expired(session, now));
        if sessions.len() < before {
            info!("Expired {} idle form session(s)", before - sessions.len());
        }

        if sessions.len() >= self.max_sessions {
            return Err(AppError::SessionLimit(self.max_sessions));
        }
        let id = Uuid::new_v4();
        sessions.insert(
            id,
            FormSession::opened_at(self.validator.clone(), self.submit_action.clone(), now),
        );
        info!("Form session {id} opened ({} active)", sessions.len());
        Ok(id)
    }

    /// Runs `f` against the session while holding the store lock.
    pub fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut FormSession) -> T,
    ) -> Result<T, AppError> {
        self.with_session_at(id, Utc::now(), f)
    }

    fn with_session_at<T>(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        f: impl FnOnce(&mut FormSession) -> T,
    ) -> Result<T, AppError> {
        let mut sessions = self.lock()?;
        if sessions
            .get(&id)
            .is_some_and(|session| self.is_expired(session, now))
        {
            sessions.remove(&id);
            info!("Form session {id} expired");
        }
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Form session {id} not found")))?;
        session.touch(now);
        Ok(f(session))
    }

    pub fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let mut sessions = self.lock()?;
        sessions
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Form session {id} not found")))?;
        info!("Form session {id} closed ({} active)", sessions.len());
        Ok(())
    }

    pub fn active_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    fn is_expired(&self, session: &FormSession, now: DateTime<Utc>) -> bool {
        now - session.last_active() > self.idle_ttl
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, FormSession>>, AppError> {
        self.sessions
            .lock()
            .map_err(|_| AppError::Internal(anyhow!("session store lock poisoned")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FormEvent, LogSubmitAction};

    fn store(max: usize) -> SessionStore {
        SessionStore::new(
            Validator::new(500),
            Arc::new(LogSubmitAction),
            max,
            Duration::minutes(30),
        )
    }

    #[test]
    fn test_create_and_dispatch() {
        let store = store(4);
        let id = store.create().unwrap();
        store
            .with_session(id, |s| {
                s.dispatch(FormEvent::AddTag {
                    raw: "Rust".to_string(),
                })
            })
            .unwrap();
        let skills = store.with_session(id, |s| s.view().skills).unwrap();
        assert_eq!(skills, vec!["Rust".to_string()]);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = store(4);
        let a = store.create().unwrap();
        let b = store.create().unwrap();
        store
            .with_session(a, |s| {
                s.dispatch(FormEvent::AddTag {
                    raw: "Rust".to_string(),
                })
            })
            .unwrap();
        assert!(store.with_session(b, |s| s.view().skills).unwrap().is_empty());
    }

    #[test]
    fn test_limit_enforced() {
        let store = store(1);
        store.create().unwrap();
        assert!(matches!(store.create(), Err(AppError::SessionLimit(1))));
    }

    #[test]
    fn test_unknown_session_is_not_found() {
        let store = store(1);
        assert!(matches!(
            store.with_session(Uuid::new_v4(), |_| ()),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.remove(Uuid::new_v4()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_idle_sessions_expire_before_cap_check() {
        let store = store(3);
        let opened = Utc::now();
        for _ in 0..3 {
            store.create_at(opened).unwrap();
        }
        assert!(matches!(
            store.create_at(opened + Duration::minutes(10)),
            Err(AppError::SessionLimit(3))
        ));

        let later = opened + Duration::minutes(31);
        assert!(store.create_at(later).is_ok());
        assert_eq!(store.active_count(), 1);
    }

    #[test]
    fn test_activity_keeps_session_alive() {
        let store = store(2);
        let opened = Utc::now();
        let kept = store.create_at(opened).unwrap();
        let idle = store.create_at(opened).unwrap();

        store
            .with_session_at(kept, opened + Duration::minutes(20), |_| ())
            .unwrap();
        store.create_at(opened + Duration::minutes(40)).unwrap();

        let later = opened + Duration::minutes(41);
        assert!(store.with_session_at(kept, later, |_| ()).is_ok());
        assert!(matches!(
            store.with_session_at(idle, later, |_| ()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_expired_session_is_not_found() {
        let store = store(1);
        let opened = Utc::now();
        let id = store.create_at(opened).unwrap();
        assert!(matches!(
            store.with_session_at(id, opened + Duration::minutes(31), |_| ()),
            Err(AppError::NotFound(_))
        ));
        assert_eq!(store.active_count(), 0);
    }

    #[test]
    fn test_remove_frees_slot() {
        let store = store(1);
        let id = store.create().unwrap();
        store.remove(id).unwrap();
        assert_eq!(store.active_count(), 0);
        assert!(store.create().is_ok());
    }
}
