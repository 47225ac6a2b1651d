use base64::{Engine, prelude::BASE64_STANDARD};
use csrf::{AesGcmCsrfProtection, CsrfProtection};
use ntex::{http::Payload, web};
use ntex_session::UserSession;

use crate::{
    consts,
    front::{AppState, errors},
};

/// Header htmx sends on every request, see `hx-headers` in `base.html`
pub const CSRF_HEADER_NAME: &str = "X-CSRF-Token";

/// Token pair issued at sign in and kept in the cookie session.
///
/// The token half is rendered into pages; mutating requests send it back in
/// [CSRF_HEADER_NAME] and it must verify against the stored cookie half.
#[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
pub struct CsrfToken {
    pub token_base64: String,
    pub cookie_base64: String,
}

impl CsrfToken {
    pub fn from_session(session: &ntex_session::Session) -> Option<Self> {
        session
            .get::<CsrfToken>(consts::CSRF_TOKEN_COOKIE_NAME)
            .ok()
            .flatten()
    }
}

fn verify_pair(protec: &AesGcmCsrfProtection, token_base64: &str, cookie_base64: &str) -> bool {
    let token = BASE64_STANDARD
        .decode(token_base64.as_bytes())
        .map(|token| protec.parse_token(&token));
    let cookie = BASE64_STANDARD
        .decode(cookie_base64.as_bytes())
        .map(|cookie| protec.parse_cookie(&cookie));

    if let (Ok(Ok(token)), Ok(Ok(cookie))) = (token, cookie) {
        return protec.verify_token_pair(&token, &cookie).is_ok();
    }

    false
}

fn is_csrf_valid(req: &web::HttpRequest) -> bool {
    let sent_token = req
        .headers()
        .get(CSRF_HEADER_NAME)
        .and_then(|value| value.to_str().ok());

    match (
        sent_token,
        CsrfToken::from_session(&req.get_session()),
        req.app_state::<AppState>(),
    ) {
        (Some(sent_token), Some(stored), Some(app_state)) => {
            verify_pair(&app_state.csrf_protec, sent_token, &stored.cookie_base64)
        }
        _ => false,
    }
}

impl<Err> web::FromRequest<Err> for CsrfToken {
    type Error = web::Error;

    fn from_request(
        req: &web::HttpRequest,
        _: &mut Payload,
    ) -> impl std::future::Future<Output = Result<Self, Self::Error>> {
        if !is_csrf_valid(req) {
            return std::future::ready(Err(errors::ServerError::InvalidCsrfToken.into()));
        }

        std::future::ready(Ok(Self::default()))
    }
}
