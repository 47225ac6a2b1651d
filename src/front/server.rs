//! Handlers not linked to a specific url

use log::error;
use ntex::web;
use ntex_files::NamedFile;
use ntex_identity::Identity;

use crate::{
    api,
    front::{AppState, errors, session, utils},
};

/// Serve `favicon.ico`
#[web::get("/favicon.ico")]
async fn serve_favicon() -> Result<impl web::Responder, web::Error> {
    Ok(NamedFile::open("web/static/images/favicon.ico")?)
}

/// Return a [UrlNotFound](errors::UserError::UrlNotFound) error for urls not defined
pub async fn serve_not_found() -> Result<web::HttpResponse, web::Error> {
    Err(errors::UserError::UrlNotFound.into())
}

/// Looks the stored session up against the auth backend before routing
#[web::get("/")]
async fn index(
    identity: Identity,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let Some(stored) = identity
        .identity()
        .and_then(|raw| serde_json::from_str::<session::WebAppSession>(&raw).ok())
    else {
        return utils::redirect_to("/login");
    };

    match api::user::lookup_session(&stored.auth, &app_state.auth_service).await {
        Ok(Some(_)) => utils::redirect_to("/dashboard"),
        Ok(None) => {
            identity.forget();
            utils::redirect_to("/login")
        }
        Err(e) => {
            error!("session lookup failed: {e}");
            utils::redirect_to("/login")
        }
    }
}
