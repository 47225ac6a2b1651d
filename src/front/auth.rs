use ntex::web;
use ntex_identity::Identity;

use crate::{
    api,
    front::{AppState, errors, forms, middleware, session, utils},
};

fn render_login(error_msg: Option<&str>, sign_up: bool) -> Result<web::HttpResponse, web::Error> {
    let mut context = tera::Context::new();
    context.insert("error_msg", &error_msg);
    context.insert("sign_up", &sign_up);

    utils::render_page("login.html", &context)
}

/// Keeps the signed in session and hands out a fresh CSRF pair
fn start_web_session(
    auth: crate::models::user_app::AuthSession,
    identity: &Identity,
    cookie: &ntex_session::Session,
    app_state: &AppState,
) -> Result<web::HttpResponse, web::Error> {
    identity.remember(
        serde_json::to_string(&session::WebAppSession { auth }).map_err(|e| {
            errors::ServerError::InternalServerError(format!("session couldnt be stored: {e}"))
        })?,
    );
    utils::set_csrf_token(cookie, app_state)?;

    utils::redirect_to("/dashboard")
}

#[web::get("/login")]
async fn get_login_view() -> Result<impl web::Responder, web::Error> {
    render_login(None, false)
}

#[web::post("/login")]
async fn login(
    form: web::types::Form<forms::user::LoginForm>,
    app_state: web::types::State<AppState>,
    identity: Identity,
    cookie: ntex_session::Session,
) -> Result<impl web::Responder, web::Error> {
    let form = form.into_inner();

    match api::user::sign_in(&form.email, &form.password, &app_state.auth_service).await {
        Ok(auth) => start_web_session(auth, &identity, &cookie, &app_state),
        Err(e) => render_login(Some(&e.to_string()), false),
    }
}

#[web::post("/signup")]
async fn signup(
    form: web::types::Form<forms::user::SignUpForm>,
    app_state: web::types::State<AppState>,
    identity: Identity,
    cookie: ntex_session::Session,
) -> Result<impl web::Responder, web::Error> {
    match api::user::sign_up_and_sign_in(form.into_inner().into(), &app_state.auth_service).await
    {
        Ok(auth) => start_web_session(auth, &identity, &cookie, &app_state),
        Err(e) => render_login(Some(&e.to_string()), true),
    }
}

/// Closes the session, htmx follows `HX-Redirect` to the login page
#[web::post("/logout")]
async fn logout(
    _: middleware::csrf_token::CsrfToken,
    web_session: session::WebAppSession,
    identity: Identity,
    cookie: ntex_session::Session,
) -> Result<impl web::Responder, web::Error> {
    api::user::sign_out(&web_session.auth);

    identity.forget();
    cookie.clear();

    Ok(web::HttpResponse::Ok()
        .set_header("HX-Redirect", "/login")
        .finish())
}
