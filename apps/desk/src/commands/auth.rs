//! # Auth Commands
//!
//! Login screen and menu.

use serde::{Deserialize, Serialize};
use tracing::debug;

use servicepro_core::access::View;
use servicepro_core::Employee;

use crate::error::ApiError;
use crate::state::SessionState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub employee: Employee,
    /// Where the app navigates right after login.
    pub landing_view: View,
    /// Menu entries, in order.
    pub views: Vec<View>,
}

/// Signs an employee in.
///
/// ## Returns
/// The employee, their landing view and menu, or `INVALID_CREDENTIALS`.
pub fn login(session: &SessionState, username: String, password: String) -> Result<LoginResponse, ApiError> {
    debug!(username = %username, "login command");

    session.with_session_mut(|s| -> Result<LoginResponse, ApiError> {
        let landing_view = s.login(&username, &password)?;
        let employee = s.actor()?.clone();
        Ok(LoginResponse {
            employee,
            landing_view,
            views: s.visible_views(),
        })
    })
}

/// Clears the active user. Records are kept.
pub fn logout(session: &SessionState) {
    debug!("logout command");
    session.with_session_mut(|s| s.logout());
}

pub fn current_user(session: &SessionState) -> Result<Employee, ApiError> {
    session.with_session(|s| -> Result<Employee, ApiError> { Ok(s.actor()?.clone()) })
}

pub fn visible_views(session: &SessionState) -> Vec<View> {
    session.with_session(|s| s.visible_views())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use servicepro_store::DEMO_PASSWORD;

    #[test]
    fn test_login_and_logout() {
        let session = SessionState::default();

        let response = login(&session, "tech".to_string(), DEMO_PASSWORD.to_string()).unwrap();
        assert_eq!(response.landing_view, View::RepairTickets);
        assert_eq!(response.views, vec![View::RepairTickets, View::Inventory]);
        assert_eq!(current_user(&session).unwrap().id, "emp2");

        logout(&session);
        assert!(visible_views(&session).is_empty());
        assert_eq!(current_user(&session).unwrap_err().code, ErrorCode::NotAuthenticated);
    }

    #[test]
    fn test_wrong_password() {
        let session = SessionState::default();
        let err = login(&session, "admin".to_string(), "1234".to_string()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
    }
}
