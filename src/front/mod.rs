pub mod auth;
pub mod dashboard;
pub mod errors;
pub mod forms;
pub mod health;
pub mod hotel;
pub mod matcher;
pub mod middleware;
pub mod pet;
pub mod routes;
pub mod server;
pub mod session;
pub mod templates;
pub mod utils;

use crate::{repo, services};
use csrf::AesGcmCsrfProtection;

pub struct AppState {
    pub csrf_protec: AesGcmCsrfProtection,
    pub repo: repo::ImplAppRepo,
    pub auth_service: services::ImplAuthService,
}

impl AppState {
    /// Repository acting with the signed in user's access token
    pub fn user_repo(&self, web_session: &session::WebAppSession) -> repo::ImplAppRepo {
        self.repo.with_access_token(&web_session.auth.access_token)
    }
}
