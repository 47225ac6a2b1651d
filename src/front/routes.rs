//! Frontend route configuration.
//!
//! Routes are grouped by page into scopes; every page needs a signed in
//! session and every mutating route a valid CSRF token.

use super::{auth, dashboard, health, hotel, matcher, pet};
use ntex::web;

/// - `GET /login`, `POST /login`, `POST /signup`, `POST /logout`
pub fn auth(cfg: &mut web::ServiceConfig) {
    cfg.service((auth::get_login_view, auth::login, auth::signup, auth::logout));
}

pub fn dashboard(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard::get_dashboard_view);
}

/// Pet registry.
///
/// # Routes
/// - `GET /pets` - Passport grid page
/// - `GET /pets/list` - Passport grid widget
/// - `POST /pets` - Register a pet
pub fn pets(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/pets").service((
        pet::get_pets_view,
        pet::get_passport_grid,
        pet::register_pet,
    )));
}

/// Pet hotel status board.
///
/// # Routes
/// - `GET /hotel` - Board page
/// - `GET /hotel/board` - Board widget
/// - `POST /hotel/drag/start` - Pick up a card or an available pet
/// - `POST /hotel/drag/cancel` - Release it without dropping
/// - `POST /hotel/drop/{status}` - Drop on a column
/// - `DELETE /hotel/booking/{booking_id}` - Delete a booking
pub fn hotel(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/hotel").service((
        hotel::get_hotel_view,
        hotel::get_board,
        hotel::start_drag,
        hotel::cancel_drag,
        hotel::drop_on_column,
        hotel::delete_booking,
    )));
}

/// Health timeline.
///
/// # Routes
/// - `GET /health?pet_id=` - Timeline page
/// - `GET /health/{pet_id}/records` - Records widget
/// - `POST /health/{pet_id}/records` - Add a record
pub fn health(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").service((
        health::get_health_view,
        health::get_pet_records,
        health::add_health_record,
    )));
}

/// - `GET /match`, `POST /match/swipe`, `POST /match/reset`
pub fn matcher(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/match").service((
        matcher::get_match_view,
        matcher::swipe,
        matcher::reset,
    )));
}
