//! Pet hotel board: drag gestures span two requests, the held card is kept
//! in the cookie session between them.

use log::{error, warn};
use ntex::web;

use crate::{
    api::{
        self,
        board::StatusBoard,
        drag::{DragController, DragError},
    },
    consts,
    front::{AppState, errors, forms, middleware, session, utils},
    models::booking::BookingStatus,
};

fn load_controller(cookie: &ntex_session::Session) -> DragController {
    cookie
        .get::<DragController>(consts::DRAG_STATE_COOKIE_NAME)
        .ok()
        .flatten()
        .unwrap_or_default()
}

fn store_controller(
    cookie: &ntex_session::Session,
    controller: &DragController,
) -> Result<(), web::Error> {
    cookie
        .set(consts::DRAG_STATE_COOKIE_NAME, controller)
        .map_err(|e| {
            errors::ServerError::InternalServerError(format!("drag state couldnt be stored: {e}"))
                .into()
        })
}

fn board_widget(board: &StatusBoard) -> Result<String, web::Error> {
    let mut context = tera::Context::new();
    context.insert("board", board);
    context.insert("total_cards", &board.total_cards());

    utils::render_widget("widgets/board.html", &context)
}

async fn fetch_board(app_state: &AppState, web_session: &session::WebAppSession) -> StatusBoard {
    api::board::load_board(&app_state.user_repo(web_session))
        .await
        .unwrap_or_else(|e| {
            error!("board couldnt be loaded: {e}");
            StatusBoard::default()
        })
}

/// Board page, loading it drops any gesture a lost cancel left held
#[web::get("")]
async fn get_hotel_view(
    web_session: session::WebAppSession,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
) -> Result<impl web::Responder, web::Error> {
    store_controller(&cookie, &DragController::default())?;

    let board = fetch_board(&app_state, &web_session).await;

    let mut context = utils::page_context("hotel", &web_session, &cookie);
    context.insert("board", &board);
    context.insert("total_cards", &board.total_cards());

    utils::render_page("hotel.html", &context)
}

/// Board widget, reloaded on `bookingUpdated` and by the refresh button
#[web::get("/board")]
async fn get_board(
    web_session: session::WebAppSession,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    Ok(web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(board_widget(&fetch_board(&app_state, &web_session).await)?))
}

#[web::post("/drag/start")]
async fn start_drag(
    _: session::WebAppSession,
    _: middleware::csrf_token::CsrfToken,
    cookie: ntex_session::Session,
    form: web::types::Form<forms::hotel::DragStartForm>,
) -> Result<impl web::Responder, web::Error> {
    let origin = form
        .origin()
        .map_err(|e| errors::UserError::FormInputValueError(e.to_string()))?;

    let mut controller = load_controller(&cookie);
    if let Err(e) = controller.begin_drag(form.card(), origin) {
        warn!("drag of {} rejected: {e}", form.id);
        return Ok(utils::hx_error_response(&e.to_string()));
    }
    store_controller(&cookie, &controller)?;

    Ok(web::HttpResponse::NoContent().finish())
}

#[web::post("/drag/cancel")]
async fn cancel_drag(
    _: session::WebAppSession,
    _: middleware::csrf_token::CsrfToken,
    cookie: ntex_session::Session,
) -> Result<impl web::Responder, web::Error> {
    let mut controller = load_controller(&cookie);
    controller.cancel();
    store_controller(&cookie, &controller)?;

    Ok(web::HttpResponse::NoContent().finish())
}

/// Resolves the held card on the `status` column and answers with the
/// refetched board
#[web::post("/drop/{status}")]
async fn drop_on_column(
    web_session: session::WebAppSession,
    _: middleware::csrf_token::CsrfToken,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    path: web::types::Path<(String,)>,
) -> Result<impl web::Responder, web::Error> {
    let target = path
        .0
        .parse::<BookingStatus>()
        .map_err(|e| errors::UserError::FormInputValueError(e.to_string()))?;

    let mut controller = load_controller(&cookie);
    let repo = app_state.user_repo(&web_session);
    let settled = api::drag::drop_and_refetch(&mut controller, target, &repo).await;
    store_controller(&cookie, &controller)?;

    let mut response = web::HttpResponse::Ok();
    response.content_type("text/html; charset=utf-8");

    match &settled.outcome {
        Ok(_) => {}
        Err(DragError::NotDragging) => warn!("drop on {target} without a held card"),
        Err(e) => {
            response.set_header("HX-Trigger", utils::hx_error_trigger(&e.to_string()));
        }
    }

    Ok(response.body(board_widget(&settled.board)?))
}

/// Deletion is confirmed on the client before this is called
#[web::delete("/booking/{booking_id}")]
async fn delete_booking(
    web_session: session::WebAppSession,
    _: middleware::csrf_token::CsrfToken,
    app_state: web::types::State<AppState>,
    path: web::types::Path<(i64,)>,
) -> Result<impl web::Responder, web::Error> {
    let (booking_id,) = path.into_inner();

    if let Err(e) = api::board::delete_booking(booking_id, &app_state.user_repo(&web_session)).await {
        error!("booking {booking_id} couldnt be deleted: {e}");
        return Ok(utils::hx_error_response(&format!(
            "Error deleting booking: {e}"
        )));
    }

    Ok(web::HttpResponse::Ok()
        .set_header("HX-Trigger", "bookingUpdated")
        .body(""))
}
