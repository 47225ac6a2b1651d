//! GoTrue-style auth endpoints of the hosted backend (`/auth/v1/...`).

use anyhow::{Context, bail};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::AuthService;
use crate::models;

const AUTH_PATH: &str = "auth/v1";

#[derive(Clone)]
pub struct SupabaseAuthHandler {
    pub client: reqwest::Client,
    pub base_url: String,
    pub api_key: String,
}

#[derive(Deserialize, Default)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<UserMetadata>,
}

impl From<AuthUser> for models::user_app::UserProfile {
    fn from(user: AuthUser) -> Self {
        Self {
            id: user.id,
            email: user.email.unwrap_or_default(),
            full_name: user
                .user_metadata
                .and_then(|m| m.full_name)
                .filter(|name| !name.trim().is_empty()),
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

/// GoTrue error bodies use either `msg`, `error_description` or `message`
#[derive(Deserialize, Default)]
struct AuthErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn error_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<AuthErrorBody>(body).unwrap_or_default();

    parsed
        .msg
        .or(parsed.error_description)
        .or(parsed.message)
        .unwrap_or_else(|| format!("auth backend returned error status {status}"))
}

fn sign_up_body(account: &models::user_app::SignUp) -> serde_json::Value {
    json!({
        "email": account.email,
        "password": account.password,
        "data": {
            "full_name": account.full_name,
            "birth_date": account.birth_date.format("%Y-%m-%d").to_string(),
            "cpf": account.national_id,
        }
    })
}

impl SupabaseAuthHandler {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/{AUTH_PATH}/{endpoint}", self.base_url)
    }

    async fn fail_with_body(response: reqwest::Response) -> anyhow::Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::anyhow!(error_message(status, &body))
    }
}

#[async_trait]
impl AuthService for SupabaseAuthHandler {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> anyhow::Result<models::user_app::AuthSession> {
        let response = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .context("failed to reach the auth backend")?;

        if !response.status().is_success() {
            return Err(Self::fail_with_body(response).await);
        }

        let token = response
            .json::<TokenResponse>()
            .await
            .context("failed to parse the auth token response")?;

        Ok(models::user_app::AuthSession {
            access_token: token.access_token,
            user: token.user.into(),
        })
    }

    async fn sign_up(&self, account: &models::user_app::SignUp) -> anyhow::Result<()> {
        let response = self
            .client
            .post(self.auth_url("signup"))
            .header("apikey", &self.api_key)
            .json(&sign_up_body(account))
            .send()
            .await
            .context("failed to reach the auth backend")?;

        if !response.status().is_success() {
            return Err(Self::fail_with_body(response).await);
        }

        Ok(())
    }

    async fn get_user(
        &self,
        access_token: &str,
    ) -> anyhow::Result<Option<models::user_app::UserProfile>> {
        let response = self
            .client
            .get(self.auth_url("user"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .context("failed to reach the auth backend")?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => Ok(Some(
                response
                    .json::<AuthUser>()
                    .await
                    .context("failed to parse the auth user")?
                    .into(),
            )),
            status => bail!(error_message(
                status,
                &response.text().await.unwrap_or_default()
            )),
        }
    }
}
