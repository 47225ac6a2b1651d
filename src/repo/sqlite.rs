use crate::models;
use anyhow::bail;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, Row, SqlitePool, sqlite::SqliteRow};

use super::{AppRepo, sqlite_queries};

/// Local development backend holding the same tables as the hosted one
#[derive(Clone)]
pub struct SqlxSqliteRepo {
    pub db_pool: SqlitePool,
}

impl SqlxSqliteRepo {
    /// Creates the tables if they are missing
    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::raw_sql(sqlite_queries::MIGRATION_INIT)
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }
}

impl FromRow<'_, SqliteRow> for models::pet::Pet {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let badges: String = row.try_get("badges")?;
        let cuteness_level: i64 = row.try_get("cuteness_level")?;

        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            breed: row.try_get("breed")?,
            age: row.try_get("age")?,
            photo_url: row.try_get("photo_url")?,
            cuteness_level: models::pet::clamp_cuteness(cuteness_level as f64),
            badges: serde_json::from_str(&badges).unwrap_or_default(),
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::booking::Booking {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            pet_id: row.try_get("pet_id")?,
            pet_name: row.try_get("pet_name")?,
            service_type: row.try_get("service_type")?,
            task_description: row.try_get("task_description")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::health::HealthRecord {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            pet_id: row.try_get("pet_id")?,
            record_type: serde_json::from_str::<models::health::HealthRecordType>(&format!(
                "\"{}\"",
                row.try_get::<String, &str>("type")?
            ))
            .unwrap_or(models::health::HealthRecordType::Other),
            title: row.try_get("title")?,
            date: row.try_get("date")?,
            next_date: row.try_get("next_date")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl AppRepo for SqlxSqliteRepo {
    /// Local tables are not scoped per user
    fn with_access_token(&self, _: &str) -> super::ImplAppRepo {
        Box::new(self.clone())
    }

    async fn get_pets(
        &self,
        order: models::pet::PetOrder,
    ) -> anyhow::Result<Vec<models::pet::Pet>> {
        let query = match order {
            models::pet::PetOrder::IdAsc => sqlite_queries::QUERY_GET_PETS_BY_ID,
            models::pet::PetOrder::NameAsc => sqlite_queries::QUERY_GET_PETS_BY_NAME,
            models::pet::PetOrder::CreatedAtDesc => sqlite_queries::QUERY_GET_PETS_RECENT_FIRST,
        };

        Ok(sqlx::query_as::<_, models::pet::Pet>(query)
            .fetch_all(&self.db_pool)
            .await?)
    }

    async fn insert_pet(&self, pet: &models::pet::NewPet) -> anyhow::Result<models::pet::Pet> {
        Ok(
            sqlx::query_as::<_, models::pet::Pet>(sqlite_queries::QUERY_INSERT_PET)
                .bind(&pet.name)
                .bind(&pet.breed)
                .bind(&pet.age)
                .bind(&pet.photo_url)
                .bind(i64::from(pet.cuteness_level))
                .bind(serde_json::to_string(&pet.badges)?)
                .bind(&pet.status)
                .bind(Utc::now())
                .fetch_one(&self.db_pool)
                .await?,
        )
    }

    async fn get_bookings(&self) -> anyhow::Result<Vec<models::booking::Booking>> {
        Ok(
            sqlx::query_as::<_, models::booking::Booking>(sqlite_queries::QUERY_GET_BOOKINGS)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn insert_booking(
        &self,
        booking: &models::booking::NewBooking,
    ) -> anyhow::Result<models::booking::Booking> {
        Ok(
            sqlx::query_as::<_, models::booking::Booking>(sqlite_queries::QUERY_INSERT_BOOKING)
                .bind(booking.pet_id)
                .bind(&booking.pet_name)
                .bind(&booking.service_type)
                .bind(&booking.task_description)
                .bind(booking.status.key())
                .bind(Utc::now())
                .fetch_one(&self.db_pool)
                .await?,
        )
    }

    async fn update_booking_status(
        &self,
        booking_id: i64,
        status: models::booking::BookingStatus,
    ) -> anyhow::Result<()> {
        let updated = sqlx::query(sqlite_queries::QUERY_UPDATE_BOOKING_STATUS)
            .bind(booking_id)
            .bind(status.key())
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        if updated == 0 {
            bail!("booking {booking_id} does not exist")
        }

        Ok(())
    }

    async fn delete_booking(&self, booking_id: i64) -> anyhow::Result<()> {
        Ok(sqlx::query(sqlite_queries::QUERY_DELETE_BOOKING)
            .bind(booking_id)
            .execute(&self.db_pool)
            .await
            .map(|_| ())?)
    }

    async fn get_pet_health_records(
        &self,
        pet_id: i64,
    ) -> anyhow::Result<Vec<models::health::HealthRecord>> {
        Ok(sqlx::query_as::<_, models::health::HealthRecord>(
            sqlite_queries::QUERY_GET_PET_HEALTH_RECORDS,
        )
        .bind(pet_id)
        .fetch_all(&self.db_pool)
        .await?)
    }

    async fn insert_health_record(
        &self,
        record: &models::health::NewHealthRecord,
    ) -> anyhow::Result<models::health::HealthRecord> {
        Ok(sqlx::query_as::<_, models::health::HealthRecord>(
            sqlite_queries::QUERY_INSERT_HEALTH_RECORD,
        )
        .bind(record.pet_id)
        .bind(record.record_type.to_string())
        .bind(&record.title)
        .bind(record.date)
        .bind(record.next_date)
        .bind(&record.notes)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?)
    }
}
