use log::error;
use ntex::web;

use crate::{
    api,
    front::{AppState, forms, middleware, session, utils},
};

#[web::get("")]
async fn get_health_view(
    web_session: session::WebAppSession,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    query: web::types::Query<forms::health::HealthQuery>,
) -> Result<impl web::Responder, web::Error> {
    let timeline = api::health::get_timeline(query.pet_id, &app_state.user_repo(&web_session))
        .await
        .unwrap_or_else(|e| {
            error!("health timeline couldnt be loaded: {e}");
            api::health::HealthTimeline::default()
        });

    let mut context = utils::page_context("health", &web_session, &cookie);
    context.insert("pets", &timeline.pets);
    context.insert("selected", &timeline.selected);
    context.insert("records", &timeline.records);

    utils::render_page("health.html", &context)
}

#[web::get("/{pet_id}/records")]
async fn get_pet_records(
    web_session: session::WebAppSession,
    app_state: web::types::State<AppState>,
    path: web::types::Path<(i64,)>,
) -> Result<impl web::Responder, web::Error> {
    let (pet_id,) = path.into_inner();

    let records = api::health::get_pet_records(pet_id, &app_state.user_repo(&web_session))
        .await
        .unwrap_or_else(|e| {
            error!("health records of pet {pet_id} couldnt be loaded: {e}");
            vec![]
        });

    let mut context = tera::Context::new();
    context.insert("pet_id", &pet_id);
    context.insert("records", &records);

    Ok(web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(utils::render_widget("widgets/health_records.html", &context)?))
}

#[web::post("/{pet_id}/records")]
async fn add_health_record(
    web_session: session::WebAppSession,
    _: middleware::csrf_token::CsrfToken,
    app_state: web::types::State<AppState>,
    path: web::types::Path<(i64,)>,
    form: web::types::Form<forms::health::HealthRecordForm>,
) -> Result<impl web::Responder, web::Error> {
    let (pet_id,) = path.into_inner();

    let repo = app_state.user_repo(&web_session);

    if let Err(e) = api::health::add_health_record(pet_id, form.into_inner().into(), &repo).await {
        error!("health record for pet {pet_id} couldnt be added: {e}");
        return Ok(utils::hx_error_response(&format!(
            "Error adding health record: {e}"
        )));
    }

    Ok(web::HttpResponse::Ok()
        .set_header("HX-Trigger", "healthRecordUpdated")
        .body(""))
}
