use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Account as the auth backend describes it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }
}

/// Signed-in session issued by the auth backend
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub user: UserProfile,
}

/// Attributes stored with a new account
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub birth_date: NaiveDate,
    /// Brazilian CPF, formatted or not
    pub national_id: String,
}
