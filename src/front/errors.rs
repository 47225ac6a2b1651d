//! Errors rendered as html pages by ntex.
//!
//! Mutations called by htmx report failures through
//! [hx_error_response](super::utils::hx_error_response) instead; these
//! cover pages, extractors and broken widgets.

use super::templates;
use derive_more::{Display, Error};
use log::{error, warn};
use ntex::{http, web};

fn error_page(
    status: http::StatusCode,
    template_name: &str,
    context: &tera::Context,
    fallback: String,
) -> web::HttpResponse {
    web::HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(
            templates::WEB_TEMPLATES
                .render(template_name, context)
                .unwrap_or(fallback),
        )
}

#[derive(Debug, Display, Error)]
pub enum UserError {
    #[display("page not found")]
    UrlNotFound,
    #[display("please sign in")]
    Unauthorized,
    #[display("invalid form values: {_0}")]
    FormInputValueError(#[error(not(source))] String),
}

impl UserError {
    fn template_name(&self) -> &'static str {
        match self {
            UserError::UrlNotFound => "errors/url_not_found.html",
            UserError::Unauthorized => "errors/need_login.html",
            UserError::FormInputValueError(_) => "errors/invalid_input_values.html",
        }
    }
}

impl web::error::WebResponseError for UserError {
    fn error_response(&self, req: &web::HttpRequest) -> web::HttpResponse {
        warn!("{} {}: {self}", req.method(), req.path());

        let mut context = tera::Context::new();
        context.insert("msg_details", &self.to_string());

        error_page(
            self.status_code(),
            self.template_name(),
            &context,
            self.to_string(),
        )
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            UserError::UrlNotFound => http::StatusCode::NOT_FOUND,
            UserError::Unauthorized => http::StatusCode::UNAUTHORIZED,
            UserError::FormInputValueError(_) => http::StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Display, Error)]
pub enum ServerError {
    #[display("[TemplateError] {_0}")]
    TemplateError(#[error(not(source))] String),
    #[display("[WidgetTemplateError] {_0}")]
    WidgetTemplateError(#[error(not(source))] String),
    #[display("[ExternalServiceError] {_0}")]
    ExternalServiceError(#[error(not(source))] String),
    #[display("[InternalServerError] {_0}")]
    InternalServerError(#[error(not(source))] String),
    #[display("[InvalidCsrfToken]")]
    InvalidCsrfToken,
}

impl web::error::WebResponseError for ServerError {
    fn error_response(&self, req: &web::HttpRequest) -> web::HttpResponse {
        error!("{} {}: {self}", req.method(), req.path());

        let template_name = match self {
            ServerError::WidgetTemplateError(_) => "errors/widget_page_err.html",
            ServerError::ExternalServiceError(_) => "errors/backend_unavailable.html",
            _ => "errors/internal_error.html",
        };

        // internal details stay in the logs
        error_page(
            self.status_code(),
            template_name,
            &tera::Context::new(),
            "PetGlow is not available right now".into(),
        )
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            // htmx only swaps 2xx responses
            ServerError::WidgetTemplateError(_) => http::StatusCode::ACCEPTED,
            ServerError::ExternalServiceError(_) => http::StatusCode::BAD_GATEWAY,
            ServerError::InvalidCsrfToken => http::StatusCode::FORBIDDEN,
            _ => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
