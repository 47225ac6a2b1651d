use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::null_as_default;

/// The five board columns, in board order.
///
/// The wire keys are the ones stored in `bookings.status`.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum BookingStatus {
    #[display("checkIn")]
    #[serde(rename = "checkIn")]
    CheckIn,
    #[display("playtime")]
    #[serde(rename = "playtime")]
    Playtime,
    #[display("napTime")]
    #[serde(rename = "napTime")]
    NapTime,
    #[display("grooming")]
    #[serde(rename = "grooming")]
    Grooming,
    #[display("ready")]
    #[serde(rename = "ready")]
    Ready,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::CheckIn,
        BookingStatus::Playtime,
        BookingStatus::NapTime,
        BookingStatus::Grooming,
        BookingStatus::Ready,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            BookingStatus::CheckIn => "checkIn",
            BookingStatus::Playtime => "playtime",
            BookingStatus::NapTime => "napTime",
            BookingStatus::Grooming => "grooming",
            BookingStatus::Ready => "ready",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            BookingStatus::CheckIn => "Check-In 🏨",
            BookingStatus::Playtime => "Playtime 🎾",
            BookingStatus::NapTime => "Nap Time 😴",
            BookingStatus::Grooming => "Spa & Grooming 🛁",
            BookingStatus::Ready => "Ready for Pickup 🏠",
        }
    }

    /// Position of the column on the board
    pub fn index(&self) -> usize {
        match self {
            BookingStatus::CheckIn => 0,
            BookingStatus::Playtime => 1,
            BookingStatus::NapTime => 2,
            BookingStatus::Grooming => 3,
            BookingStatus::Ready => 4,
        }
    }
}

#[derive(Debug, Display, PartialEq, Eq, derive_more::Error)]
#[display("unknown booking status `{_0}`")]
pub struct UnknownStatus(#[error(not(source))] pub String);

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.key() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A booking row as the backend returns it.
///
/// `status` is kept raw: rows written by other clients may hold
/// values outside [BookingStatus].
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq)]
pub struct Booking {
    pub id: i64,
    #[serde(default)]
    pub pet_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pet_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub task_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn known_status(&self) -> Option<BookingStatus> {
        self.status.parse().ok()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewBooking {
    pub pet_id: Option<i64>,
    pub pet_name: String,
    pub service_type: String,
    pub task_description: String,
    pub status: BookingStatus,
}
