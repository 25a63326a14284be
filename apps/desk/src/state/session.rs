//! # Session State
//!
//! The logged-in session and the store it owns.
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<Mutex<T>>` because:
//! 1. Every command reads or writes it
//! 2. Composite writes (ticket + customer debt) must not interleave
//! 3. Commands can run concurrently
//!
//! The lock is never held across an `.await`: commands take what they need
//! out of the closure, then talk to the mirror.

use std::sync::{Arc, Mutex};

use servicepro_store::{SeedData, Session, ShopStore};

#[derive(Debug, Clone)]
pub struct SessionState {
    session: Arc<Mutex<Session>>,
}

impl SessionState {
    /// Starts a session on a fresh store built from `seed`.
    pub fn new(seed: SeedData) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(Session::new(ShopStore::new(seed)))),
        }
    }

    /// Executes a function with read access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let views = session_state.with_session(|s| s.visible_views());
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.session.lock().expect("Session mutex poisoned");
        f(&session)
    }

    /// Executes a function with write access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// session_state.with_session_mut(|s| s.login("tech", "123"))?;
    /// ```
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut session = self.session.lock().expect("Session mutex poisoned");
        f(&mut session)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(SeedData::demo())
    }
}
