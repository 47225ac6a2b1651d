//! # User API Module
//!
//! Sign in, account creation and session lookup against the auth backend.

use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};

use super::{InputError, required};
use crate::{consts, metric, models, services};

/// Sign-up form values as typed by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub birth_date: String,
    pub national_id: String,
}

impl SignUpRequest {
    /// Every field is required; the national id holds at most 14 characters
    /// (`000.000.000-00`).
    pub fn into_sign_up(self) -> Result<models::user_app::SignUp, InputError> {
        let national_id = required(&self.national_id, "CPF")?;
        if national_id.chars().count() > consts::MAX_NATIONAL_ID_LEN {
            return Err(InputError::InvalidField("CPF"));
        }

        let birth_date = NaiveDate::parse_from_str(
            &required(&self.birth_date, "birth date")?,
            "%Y-%m-%d",
        )
        .map_err(|_| InputError::InvalidField("birth date"))?;

        let email = required(&self.email, "email")?;
        if self.password.is_empty() {
            return Err(InputError::MissingField("password"));
        }

        Ok(models::user_app::SignUp {
            email,
            password: self.password,
            full_name: required(&self.full_name, "full name")?,
            birth_date,
            national_id,
        })
    }
}

pub async fn sign_in(
    email: &str,
    password: &str,
    auth_service: &services::ImplAuthService,
) -> anyhow::Result<models::user_app::AuthSession> {
    let _span = logfire::span!("sign_in").entered();

    let session = auth_service
        .sign_in_with_password(email.trim(), password)
        .await?;

    info!("auth state changed: signed in user {}", session.user.id);
    metric::incr_user_action_statds("sign_in");

    Ok(session)
}

/// Creates the account and signs in right away.
///
/// # Arguments
/// * `request` - Sign-up form values
/// * `auth_service` - Auth backend
///
/// # Errors
/// Returns the [InputError] when the form is invalid (nothing is sent to the
/// backend), otherwise the backend message of the failing step.
pub async fn sign_up_and_sign_in(
    request: SignUpRequest,
    auth_service: &services::ImplAuthService,
) -> anyhow::Result<models::user_app::AuthSession> {
    let _span = logfire::span!("sign_up").entered();

    let account = request.into_sign_up()?;
    auth_service.sign_up(&account).await?;
    metric::incr_user_action_statds("sign_up");

    sign_in(&account.email, &account.password, auth_service).await
}

/// User owning the stored session, `None` when the backend rejects it
pub async fn lookup_session(
    session: &models::user_app::AuthSession,
    auth_service: &services::ImplAuthService,
) -> anyhow::Result<Option<models::user_app::UserProfile>> {
    let user = auth_service.get_user(&session.access_token).await?;

    if user.is_none() {
        info!("auth state changed: session of user {} expired", session.user.id);
    }

    Ok(user)
}

pub fn sign_out(session: &models::user_app::AuthSession) {
    info!("auth state changed: signed out user {}", session.user.id);
    metric::incr_user_action_statds("sign_out");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockAuthService;
    use mockall::predicate::eq;

    fn request() -> SignUpRequest {
        SignUpRequest {
            email: "ana@petglow.com".into(),
            password: "secret123".into(),
            full_name: "Ana Souza".into(),
            birth_date: "1990-07-02".into(),
            national_id: "123.456.789-09".into(),
        }
    }

    fn auth_session() -> models::user_app::AuthSession {
        models::user_app::AuthSession {
            access_token: "token".into(),
            user: models::user_app::UserProfile {
                id: "u1".into(),
                email: "ana@petglow.com".into(),
                full_name: Some("Ana Souza".into()),
            },
        }
    }

    #[test]
    fn test_sign_up_validation() {
        assert!(request().into_sign_up().is_ok());
        assert_eq!(
            SignUpRequest {
                national_id: "123.456.789-099".into(),
                ..request()
            }
            .into_sign_up(),
            Err(InputError::InvalidField("CPF"))
        );
        assert_eq!(
            SignUpRequest {
                birth_date: "02/07/1990".into(),
                ..request()
            }
            .into_sign_up(),
            Err(InputError::InvalidField("birth date"))
        );
        assert_eq!(
            SignUpRequest {
                password: "".into(),
                ..request()
            }
            .into_sign_up(),
            Err(InputError::MissingField("password"))
        );
    }

    #[ntex::test]
    async fn test_sign_up_then_sign_in() {
        let mut mock_auth = MockAuthService::new();
        mock_auth
            .expect_sign_up()
            .withf(|account: &models::user_app::SignUp| {
                account.email == "ana@petglow.com" && account.national_id == "123.456.789-09"
            })
            .times(1)
            .returning(|_| Ok(()));
        mock_auth
            .expect_sign_in_with_password()
            .with(eq("ana@petglow.com"), eq("secret123"))
            .times(1)
            .returning(|_, _| Ok(auth_session()));

        let mock_auth: services::ImplAuthService = Box::new(mock_auth);
        let session = sign_up_and_sign_in(request(), &mock_auth).await.unwrap();

        assert_eq!(session.user.display_name(), "Ana Souza");
    }

    #[ntex::test]
    async fn test_failed_sign_up_skips_sign_in() {
        let mut mock_auth = MockAuthService::new();
        mock_auth
            .expect_sign_up()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("User already registered")));
        mock_auth.expect_sign_in_with_password().times(0);

        let mock_auth: services::ImplAuthService = Box::new(mock_auth);
        let result = sign_up_and_sign_in(request(), &mock_auth).await;

        assert!(result.is_err_and(|e| e.to_string() == "User already registered"));
    }

    #[ntex::test]
    async fn test_invalid_sign_up_issues_nothing() {
        let mut mock_auth = MockAuthService::new();
        mock_auth.expect_sign_up().times(0);

        let mock_auth: services::ImplAuthService = Box::new(mock_auth);
        let result = sign_up_and_sign_in(
            SignUpRequest {
                email: " ".into(),
                ..request()
            },
            &mock_auth,
        )
        .await;

        assert!(result.is_err_and(|e| e.to_string() == "email is required"));
    }

    #[ntex::test]
    async fn test_sign_in_trims_email() {
        let mut mock_auth = MockAuthService::new();
        mock_auth
            .expect_sign_in_with_password()
            .with(eq("ana@petglow.com"), eq("secret123"))
            .times(1)
            .returning(|_, _| Ok(auth_session()));

        let mock_auth: services::ImplAuthService = Box::new(mock_auth);
        let session = sign_in(" ana@petglow.com ", "secret123", &mock_auth)
            .await
            .unwrap();

        assert_eq!(session.access_token, "token");
    }

    #[ntex::test]
    async fn test_lookup_expired_session() {
        let mut mock_auth = MockAuthService::new();
        mock_auth
            .expect_get_user()
            .with(eq("token"))
            .times(1)
            .returning(|_| Ok(None));

        let mock_auth: services::ImplAuthService = Box::new(mock_auth);
        let user = lookup_session(&auth_session(), &mock_auth).await.unwrap();

        assert_eq!(user, None);
    }
}
