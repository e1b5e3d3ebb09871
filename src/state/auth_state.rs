// ============================================================================
// AUTH STATE - Token de identidad opaco del proveedor de auth
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

/// Una sesión autenticada. `session_id` es nuevo en cada inicio de sesión.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthSession {
    pub session_id: u64,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthState {
    pub session: Rc<RefCell<Option<AuthSession>>>,
    session_counter: Rc<RefCell<u64>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self {
            session: Rc::new(RefCell::new(None)),
            session_counter: Rc::new(RefCell::new(0)),
        }
    }

    /// Reemplazar la sesión actual por una nueva para `token`
    pub fn sign_in(&self, token: String) -> AuthSession {
        let session_id = {
            let mut counter = self.session_counter.borrow_mut();
            *counter += 1;
            *counter
        };
        let session = AuthSession { session_id, token };
        *self.session.borrow_mut() = Some(session.clone());
        log::info!("🔐 Sesión iniciada (sesión {})", session_id);
        session
    }

    pub fn sign_out(&self) {
        if let Some(previous) = self.session.borrow_mut().take() {
            log::info!("👋 Sesión cerrada (sesión {})", previous.session_id);
        }
    }

    pub fn current_session(&self) -> Option<AuthSession> {
        self.session.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.borrow().is_some()
    }

    pub fn is_current_session(&self, session_id: u64) -> bool {
        self.session
            .borrow()
            .as_ref()
            .map(|s| s.session_id == session_id)
            .unwrap_or(false)
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sign_in_gets_a_new_session_id() {
        let auth = AuthState::new();
        let first = auth.sign_in("a".to_string());
        let second = auth.sign_in("b".to_string());
        assert_ne!(first.session_id, second.session_id);
        assert!(!auth.is_current_session(first.session_id));
        assert!(auth.is_current_session(second.session_id));
    }

    #[test]
    fn sign_out_clears_session() {
        let auth = AuthState::new();
        let session = auth.sign_in("token".to_string());
        auth.sign_out();
        assert!(!auth.is_signed_in());
        assert!(!auth.is_current_session(session.session_id));
        assert_eq!(auth.current_session(), None);
    }
}
