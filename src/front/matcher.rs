use log::error;
use ntex::web;

use crate::{
    api::{self, matcher::MatchDeck},
    consts,
    front::{AppState, errors, forms, middleware, session, utils},
};

fn load_deck(cookie: &ntex_session::Session) -> MatchDeck {
    cookie
        .get::<MatchDeck>(consts::MATCH_DECK_COOKIE_NAME)
        .ok()
        .flatten()
        .unwrap_or_default()
}

fn store_deck(cookie: &ntex_session::Session, deck: &MatchDeck) -> Result<(), web::Error> {
    cookie
        .set(consts::MATCH_DECK_COOKIE_NAME, deck)
        .map_err(|e| {
            errors::ServerError::InternalServerError(format!("match deck couldnt be stored: {e}"))
                .into()
        })
}

fn render_deck(view: &api::matcher::MatchView) -> Result<web::HttpResponse, web::Error> {
    let mut context = tera::Context::new();
    context.insert("deck", view);

    Ok(web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(utils::render_widget("widgets/match_deck.html", &context)?))
}

/// Opening the page deals a fresh deck
#[web::get("")]
async fn get_match_view(
    web_session: session::WebAppSession,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
) -> Result<impl web::Responder, web::Error> {
    let deck = MatchDeck::default();
    store_deck(&cookie, &deck)?;

    let view = api::matcher::get_match_view(&deck, &app_state.user_repo(&web_session))
        .await
        .unwrap_or_else(|e| {
            error!("match deck couldnt be loaded: {e}");
            api::matcher::MatchView::default()
        });

    let mut context = utils::page_context("match", &web_session, &cookie);
    context.insert("deck", &view);

    utils::render_page("match.html", &context)
}

#[web::post("/swipe")]
async fn swipe(
    web_session: session::WebAppSession,
    _: middleware::csrf_token::CsrfToken,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    form: web::types::Form<forms::matcher::SwipeForm>,
) -> Result<impl web::Responder, web::Error> {
    let direction = form
        .direction
        .parse::<api::matcher::Swipe>()
        .map_err(|e| errors::UserError::FormInputValueError(e.to_string()))?;

    let mut deck = load_deck(&cookie);

    match api::matcher::swipe(&mut deck, direction, &app_state.user_repo(&web_session)).await {
        Ok(view) => {
            store_deck(&cookie, &deck)?;
            render_deck(&view)
        }
        Err(e) => {
            error!("swipe couldnt be applied: {e}");
            Ok(utils::hx_error_response(&format!("Error loading pets: {e}")))
        }
    }
}

#[web::post("/reset")]
async fn reset(
    web_session: session::WebAppSession,
    _: middleware::csrf_token::CsrfToken,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
) -> Result<impl web::Responder, web::Error> {
    let mut deck = load_deck(&cookie);
    deck.reset();
    store_deck(&cookie, &deck)?;

    match api::matcher::get_match_view(&deck, &app_state.user_repo(&web_session)).await {
        Ok(view) => render_deck(&view),
        Err(e) => {
            error!("match deck couldnt be loaded: {e}");
            Ok(utils::hx_error_response(&format!("Error loading pets: {e}")))
        }
    }
}
