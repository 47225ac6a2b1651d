//! Accounts kept in the local SQLite database, for development without the hosted backend.
//!
//! The issued access token is the user id.

use anyhow::{anyhow, bail};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::AuthService;
use crate::{models, repo::sqlite_queries};

#[derive(Clone)]
pub struct LocalAuthHandler {
    pub db_pool: SqlitePool,
}

struct Credentials {
    profile: models::user_app::UserProfile,
    password_hash: String,
}

impl FromRow<'_, SqliteRow> for models::user_app::UserProfile {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for Credentials {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            profile: models::user_app::UserProfile::from_row(row)?,
            password_hash: row.try_get("password_hash")?,
        })
    }
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| anyhow!("password salt couldn't be created: {e}"))?;

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password couldn't be hashed: {e}"))?
        .to_string())
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok()
        })
        .unwrap_or(false)
}

#[async_trait]
impl AuthService for LocalAuthHandler {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> anyhow::Result<models::user_app::AuthSession> {
        let credentials = sqlx::query_as::<_, Credentials>(
            sqlite_queries::QUERY_GET_USER_APP_CREDENTIALS_BY_EMAIL,
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.db_pool)
        .await?;

        match credentials {
            Some(credentials) if verify_password(password, &credentials.password_hash) => {
                Ok(models::user_app::AuthSession {
                    access_token: credentials.profile.id.clone(),
                    user: credentials.profile,
                })
            }
            _ => bail!("Invalid login credentials"),
        }
    }

    async fn sign_up(&self, account: &models::user_app::SignUp) -> anyhow::Result<()> {
        let inserted = sqlx::query(sqlite_queries::QUERY_INSERT_USER_APP)
            .bind(Uuid::new_v4().to_string())
            .bind(account.email.trim().to_lowercase())
            .bind(hash_password(&account.password)?)
            .bind(&account.full_name)
            .bind(account.birth_date)
            .bind(&account.national_id)
            .bind(Utc::now())
            .execute(&self.db_pool)
            .await;

        match inserted {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                bail!("User already registered")
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user(
        &self,
        access_token: &str,
    ) -> anyhow::Result<Option<models::user_app::UserProfile>> {
        Ok(
            sqlx::query_as::<_, models::user_app::UserProfile>(
                sqlite_queries::QUERY_GET_USER_APP_BY_ID,
            )
            .bind(access_token)
            .fetch_optional(&self.db_pool)
            .await?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::sqlite::SqlxSqliteRepo;
    use chrono::NaiveDate;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_handler() -> LocalAuthHandler {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        SqlxSqliteRepo {
            db_pool: db_pool.clone(),
        }
        .run_migrations()
        .await
        .unwrap();

        LocalAuthHandler { db_pool }
    }

    fn account() -> models::user_app::SignUp {
        models::user_app::SignUp {
            email: "Ana@PetGlow.com".into(),
            password: "secret123".into(),
            full_name: "Ana Souza".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 7, 2).unwrap(),
            national_id: "123.456.789-09".into(),
        }
    }

    #[test]
    fn test_password_hash_verifies() {
        let hash = hash_password("secret123").unwrap();

        assert!(verify_password("secret123", &hash));
        assert!(!verify_password("secret124", &hash));
        assert!(!verify_password("secret123", "not a phc string"));
    }

    #[ntex::test]
    async fn test_sign_up_then_sign_in() {
        let handler = memory_handler().await;
        handler.sign_up(&account()).await.unwrap();

        let session = handler
            .sign_in_with_password("ana@petglow.com", "secret123")
            .await
            .unwrap();

        assert_eq!(session.user.email, "ana@petglow.com");
        assert_eq!(session.user.display_name(), "Ana Souza");

        let user = handler.get_user(&session.access_token).await.unwrap();
        assert_eq!(user, Some(session.user));
    }

    #[ntex::test]
    async fn test_wrong_password_is_rejected() {
        let handler = memory_handler().await;
        handler.sign_up(&account()).await.unwrap();

        let err = handler
            .sign_in_with_password("ana@petglow.com", "nope")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[ntex::test]
    async fn test_duplicated_email_is_rejected() {
        let handler = memory_handler().await;
        handler.sign_up(&account()).await.unwrap();

        let err = handler.sign_up(&account()).await.unwrap_err();

        assert_eq!(err.to_string(), "User already registered");
    }

    #[ntex::test]
    async fn test_unknown_token_has_no_user() {
        let handler = memory_handler().await;

        assert_eq!(handler.get_user("missing").await.unwrap(), None);
    }
}
