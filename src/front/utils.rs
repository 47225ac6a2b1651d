use csrf::CsrfProtection;
use ntex::web;

use crate::{
    consts,
    front::{AppState, errors, middleware, session, templates},
};

/// [ntext responder](ntex::web::HttpResponse) to redirect to `url`
pub fn redirect_to(url: &str) -> Result<web::HttpResponse, web::Error> {
    Ok(web::HttpResponse::Found()
        .header("location", url)
        .finish())
}

/// Renders a full page
pub fn render_page(
    template_name: &str,
    context: &tera::Context,
) -> Result<web::HttpResponse, web::Error> {
    let content = templates::WEB_TEMPLATES
        .render(template_name, context)
        .map_err(|e| {
            errors::ServerError::TemplateError(format!(
                "template {template_name} couldnt be rendered: {e}"
            ))
        })?;

    Ok(web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(content))
}

/// Renders an htmx fragment
pub fn render_widget(template_name: &str, context: &tera::Context) -> Result<String, web::Error> {
    Ok(templates::WEB_TEMPLATES
        .render(template_name, context)
        .map_err(|e| {
            errors::ServerError::WidgetTemplateError(format!(
                "widget {template_name} couldnt be rendered: {e}"
            ))
        })?)
}

/// `HX-Trigger` value raising the error event with `msg`.
///
/// Header values must be ASCII, so every other char is escaped as `\uXXXX`.
pub fn hx_error_trigger(msg: &str) -> String {
    let mut event = serde_json::Map::new();
    event.insert(consts::HX_ERROR_EVENT.into(), msg.into());

    serde_json::Value::Object(event)
        .to_string()
        .encode_utf16()
        .fold(String::new(), |mut escaped, unit| {
            if unit < 0x80 {
                escaped.push(char::from(unit as u8));
            } else {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
            escaped
        })
}

/// Empty htmx response that only shows `msg` to the user
pub fn hx_error_response(msg: &str) -> web::HttpResponse {
    web::HttpResponse::Ok()
        .set_header("HX-Trigger", hx_error_trigger(msg))
        .set_header("HX-Reswap", "none")
        .body("")
}

/// Base page context: active sidebar link, signed in user and the CSRF
/// token htmx sends back
pub fn page_context(
    active: &str,
    web_session: &session::WebAppSession,
    cookie: &ntex_session::Session,
) -> tera::Context {
    let mut context = tera::Context::new();
    context.insert("active", active);
    context.insert("user_name", web_session.display_name());
    context.insert(
        "csrf_token",
        &middleware::csrf_token::CsrfToken::from_session(cookie)
            .map(|csrf| csrf.token_base64)
            .unwrap_or_default(),
    );
    context
}

/// Stores a fresh CSRF token pair in the cookie session
pub fn set_csrf_token(
    cookie: &ntex_session::Session,
    app_state: &AppState,
) -> Result<(), web::Error> {
    let (csrf_token, csrf_cookie) = app_state
        .csrf_protec
        .generate_token_pair(None, consts::MAX_AGE_COOKIES)
        .map_err(|e| {
            errors::ServerError::InternalServerError(format!("cant set token csrf protection: {e}"))
        })?;

    cookie.set(
        consts::CSRF_TOKEN_COOKIE_NAME,
        middleware::csrf_token::CsrfToken {
            token_base64: csrf_token.b64_string(),
            cookie_base64: csrf_cookie.b64_string(),
        },
    )?;

    Ok(())
}
