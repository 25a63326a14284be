//! # Actor Session
//!
//! Who is at the desk, and the store they are working on.
//!
//! ```text
//! Session::new(store)
//!     │
//!     ├── login("tech", "123") ──► actor = emp2, lands on REPAIR_TICKETS
//!     │
//!     ├── require(Action::MarkFinished) ──► Ok(&emp2)
//!     ├── require(Action::Checkout)     ──► Forbidden
//!     │
//!     └── logout() ──► actor = None, records untouched
//! ```

use tracing::{info, warn};

use servicepro_core::access::{can_act, landing_view, visible_views, Action, View};
use servicepro_core::{CoreError, Employee};

use crate::error::{StoreError, StoreResult};
use crate::store::ShopStore;

/// Password accepted for every demo account.
pub const DEMO_PASSWORD: &str = "123";

#[derive(Debug, Clone)]
pub struct Session {
    store: ShopStore,
    actor: Option<Employee>,
}

impl Session {
    pub fn new(store: ShopStore) -> Self {
        Session { store, actor: None }
    }

    /// Signs an employee in by username and returns their landing view.
    pub fn login(&mut self, username: &str, password: &str) -> StoreResult<View> {
        let username = username.trim();
        let employee = self
            .store
            .employees()
            .iter()
            .find(|e| e.username == username)
            .filter(|_| password == DEMO_PASSWORD)
            .cloned();

        let Some(employee) = employee else {
            warn!(username = %username, "Login rejected");
            return Err(StoreError::InvalidCredentials);
        };

        info!(id = %employee.id, role = ?employee.role, "Logged in");
        let view = landing_view(employee.role);
        self.actor = Some(employee);
        Ok(view)
    }

    /// Clears the actor. Records stay as they are.
    pub fn logout(&mut self) {
        if let Some(actor) = self.actor.take() {
            info!(id = %actor.id, "Logged out");
        }
    }

    pub fn actor(&self) -> StoreResult<&Employee> {
        self.actor.as_ref().ok_or(StoreError::Core(CoreError::NotAuthenticated))
    }

    /// The actor, if their role grants `action`.
    pub fn require(&self, action: Action) -> StoreResult<&Employee> {
        let actor = self.actor()?;
        if !can_act(actor.role, action) {
            warn!(id = %actor.id, role = ?actor.role, action = ?action, "Action denied");
            return Err(CoreError::Forbidden {
                role: actor.role,
                action,
            }
            .into());
        }
        Ok(actor)
    }

    /// Menu for the current actor; empty when nobody is logged in.
    pub fn visible_views(&self) -> Vec<View> {
        self.actor
            .as_ref()
            .map(|a| visible_views(a.role))
            .unwrap_or_default()
    }

    pub fn store(&self) -> &ShopStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ShopStore {
        &mut self.store
    }

    /// Ends the session and hands back the store.
    pub fn end(self) -> ShopStore {
        self.store
    }
}
