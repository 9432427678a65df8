//! services/client/src/app/auth.rs
//!
//! Session lifecycle flows: resolve, login, register, logout.

use crate::app::state::AppState;
use portfolio_core::domain::Credentials;
use tracing::{error, info};

impl AppState {
    /// Resolves the session cookie against `/api/current-user`.
    /// Any failure leaves the client unauthenticated.
    pub async fn refresh_session(&self) -> bool {
        let user = match self.auth.current_user().await {
            Ok(user) => user,
            Err(e) => {
                error!("Auth check failed: {}", e);
                None
            }
        };
        let signed_in = user.is_some();
        *self.session.write().await = user;
        signed_in
    }

    pub async fn login(&self, credentials: &Credentials) -> bool {
        match self.auth.login(credentials).await {
            Ok(()) => {
                info!("Logged in as {}", credentials.email);
                self.refresh_session().await
            }
            Err(e) => {
                error!("Login failed: {}", e);
                false
            }
        }
    }

    /// Registers and, on success, logs straight in with the same credentials.
    pub async fn register(&self, credentials: &Credentials) -> bool {
        match self.auth.register(credentials).await {
            Ok(()) => self.login(credentials).await,
            Err(e) => {
                error!("Registration failed: {}", e);
                false
            }
        }
    }

    /// Ends the session. The local session is cleared even if the call fails.
    pub async fn logout(&self) {
        if let Err(e) = self.auth.logout().await {
            error!("Logout failed: {}", e);
        }
        *self.session.write().await = None;
    }
}
