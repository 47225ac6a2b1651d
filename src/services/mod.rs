pub mod local_auth;
pub mod supabase_auth;

use crate::models;
use async_trait::async_trait;

/// Session-based authentication held by the data backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> anyhow::Result<models::user_app::AuthSession>;

    async fn sign_up(&self, account: &models::user_app::SignUp) -> anyhow::Result<()>;

    /// User owning `access_token`, `None` when the backend no longer accepts it
    async fn get_user(
        &self,
        access_token: &str,
    ) -> anyhow::Result<Option<models::user_app::UserProfile>>;
}

pub type ImplAuthService = Box<dyn AuthService>;
