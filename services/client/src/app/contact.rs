//! services/client/src/app/contact.rs
//!
//! The contact section's submit flow.

use crate::app::state::AppState;
use portfolio_core::domain::ContactForm;
use portfolio_core::ports::{ContactService, PortError};
use tracing::{error, info, warn};

impl AppState {
    /// Sends the contact form. See [`send_contact`].
    pub async fn submit_contact(&self, form: &mut ContactForm) -> bool {
        send_contact(self.contact.as_ref(), form, self.config.mock_fallback).await
    }
}

/// Posts `form` and clears it once the visitor is told it was sent.
///
/// A rejected request (non-OK status) keeps the form and returns `false`. When the
/// backend cannot be reached and `mock_success` is set, the failure is logged and
/// the visitor still sees a success.
pub async fn send_contact(
    service: &dyn ContactService,
    form: &mut ContactForm,
    mock_success: bool,
) -> bool {
    match service.send_contact(form).await {
        Ok(()) => {
            info!("Contact message from {} sent", form.email);
            *form = ContactForm::default();
            true
        }
        Err(PortError::Transport(e)) if mock_success => {
            error!("Failed to send message: {}", e);
            warn!("Reporting the contact message as sent");
            *form = ContactForm::default();
            true
        }
        Err(e) => {
            error!("Failed to send message: {}", e);
            false
        }
    }
}
