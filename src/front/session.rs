use crate::models;

/// Identity cookie data stored (encrypt) on user side
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct WebAppSession {
    pub auth: models::user_app::AuthSession,
}

impl WebAppSession {
    pub fn display_name(&self) -> &str {
        self.auth.user.display_name()
    }
}
