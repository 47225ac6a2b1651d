use log::error;
use ntex::web;

use crate::{
    api,
    front::{AppState, session, utils},
};

#[web::get("/dashboard")]
async fn get_dashboard_view(
    web_session: session::WebAppSession,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
) -> Result<impl web::Responder, web::Error> {
    let dashboard = api::dashboard::get_dashboard(&app_state.user_repo(&web_session))
        .await
        .unwrap_or_else(|e| {
            error!("dashboard couldnt be loaded: {e}");
            api::dashboard::Dashboard::default()
        });

    let mut context = utils::page_context("dashboard", &web_session, &cookie);
    context.insert("stats", &dashboard.stats);
    context.insert("recent_pets", &dashboard.recent_pets);

    utils::render_page("dashboard.html", &context)
}
