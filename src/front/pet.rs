use log::error;
use ntex::web;

use crate::{
    api,
    front::{AppState, forms, middleware, session, utils},
};

async fn passport_cards(
    app_state: &AppState,
    web_session: &session::WebAppSession,
) -> Vec<api::pet::PassportCard> {
    api::pet::get_passport_cards(&app_state.user_repo(web_session))
        .await
        .unwrap_or_else(|e| {
            error!("function get_passport_cards raised an error: {e}");
            vec![]
        })
}

#[web::get("")]
async fn get_pets_view(
    web_session: session::WebAppSession,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
) -> Result<impl web::Responder, web::Error> {
    let mut context = utils::page_context("pets", &web_session, &cookie);
    context.insert("pets", &passport_cards(&app_state, &web_session).await);

    utils::render_page("pets.html", &context)
}

#[web::get("/list")]
async fn get_passport_grid(
    web_session: session::WebAppSession,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let mut context = tera::Context::new();
    context.insert("pets", &passport_cards(&app_state, &web_session).await);

    Ok(web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(utils::render_widget("widgets/passport_grid.html", &context)?))
}

#[web::post("")]
async fn register_pet(
    web_session: session::WebAppSession,
    _: middleware::csrf_token::CsrfToken,
    app_state: web::types::State<AppState>,
    form: web::types::Form<forms::pet::RegisterPetForm>,
) -> Result<impl web::Responder, web::Error> {
    let request = match api::pet::RegisterPetRequest::try_from(form.into_inner()) {
        Ok(request) => request,
        Err(e) => return Ok(utils::hx_error_response(&e.to_string())),
    };

    if let Err(e) = api::pet::register_pet(request, &app_state.user_repo(&web_session)).await {
        error!("pet couldnt be registered: {e}");
        return Ok(utils::hx_error_response(&format!("Error adding pet: {e}")));
    }

    Ok(web::HttpResponse::Ok()
        .set_header("HX-Trigger", "petRecordUpdated")
        .body(""))
}
