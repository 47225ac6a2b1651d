use ntex::{
    http::Payload,
    web::{Error, FromRequest, HttpRequest},
};
use ntex_identity::RequestIdentity;

use crate::front::{errors, session};

fn deserialize_session(str: &str) -> serde_json::Result<session::WebAppSession> {
    serde_json::from_str::<session::WebAppSession>(str)
}

/// Extracts the [WebAppSession](session::WebAppSession) from the identity cookie
fn get_logged_session(auth_cookie: Option<String>) -> Result<session::WebAppSession, Error> {
    if let Ok(session) = deserialize_session(&auth_cookie.unwrap_or_default()) {
        return Ok(session);
    }

    Err(errors::UserError::Unauthorized.into())
}

impl<Err> FromRequest<Err> for session::WebAppSession {
    type Error = Error;

    fn from_request(
        req: &HttpRequest,
        _: &mut Payload,
    ) -> impl std::future::Future<Output = Result<Self, Self::Error>> {
        let identity_cookie = req.get_identity();
        futures::future::ready(get_logged_session(identity_cookie))
    }
}
