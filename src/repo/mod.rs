pub mod rest;
pub mod sqlite;
pub mod sqlite_queries;

use crate::models;
use async_trait::async_trait;

/// Table operations over `pets`, `bookings` and `health_records`.
///
/// The backend is the single source of truth: implementations do not cache.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppRepo {
    /// Repository acting on behalf of the user owning `access_token`
    fn with_access_token(&self, access_token: &str) -> ImplAppRepo;

    async fn get_pets(&self, order: models::pet::PetOrder)
    -> anyhow::Result<Vec<models::pet::Pet>>;

    async fn insert_pet(&self, pet: &models::pet::NewPet) -> anyhow::Result<models::pet::Pet>;

    async fn get_bookings(&self) -> anyhow::Result<Vec<models::booking::Booking>>;

    async fn insert_booking(
        &self,
        booking: &models::booking::NewBooking,
    ) -> anyhow::Result<models::booking::Booking>;

    async fn update_booking_status(
        &self,
        booking_id: i64,
        status: models::booking::BookingStatus,
    ) -> anyhow::Result<()>;

    async fn delete_booking(&self, booking_id: i64) -> anyhow::Result<()>;

    /// Records of one pet, most recent `date` first
    async fn get_pet_health_records(
        &self,
        pet_id: i64,
    ) -> anyhow::Result<Vec<models::health::HealthRecord>>;

    async fn insert_health_record(
        &self,
        record: &models::health::NewHealthRecord,
    ) -> anyhow::Result<models::health::HealthRecord>;
}

pub type ImplAppRepo = Box<dyn AppRepo>;
