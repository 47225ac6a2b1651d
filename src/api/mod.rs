//! # API Module
//!
//! Business logic of the dashboard. Handlers in `front` call into these
//! functions, which talk to the backend only through [crate::repo::AppRepo]
//! and [crate::services::AuthService].
//!
//! ## Modules
//!
//! - [`board`] - Booking status board projection and deletion
//! - [`dashboard`] - Counters and recent pets
//! - [`drag`] - Drag gesture state machine for the board
//! - [`health`] - Health timeline per pet
//! - [`matcher`] - Pet match swiper deck
//! - [`pet`] - Pet passport registry
//! - [`user`] - Sign in, sign up and session lookup

pub mod board;
pub mod dashboard;
pub mod drag;
pub mod health;
pub mod matcher;
pub mod pet;
pub mod user;

use derive_more::{Display, Error};

/// Form values rejected before reaching the backend
#[derive(Debug, Display, Error, PartialEq)]
pub enum InputError {
    #[display("{_0} is required")]
    MissingField(#[error(not(source))] &'static str),
    #[display("{_0} is not valid")]
    InvalidField(#[error(not(source))] &'static str),
}

/// Trimmed value, `None` when blank
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub(crate) fn required(value: &str, field: &'static str) -> Result<String, InputError> {
    non_blank(value).ok_or(InputError::MissingField(field))
}
