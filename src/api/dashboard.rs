//! Dashboard counters and the most recently registered pets.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use super::board::pet_booking_status;
use crate::{
    consts,
    models::{
        booking::Booking,
        pet::{Pet, PetOrder},
    },
    repo,
};

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DashboardStats {
    pub total_pets: usize,
    /// Pets without any booking
    pub active_pets: usize,
    pub checked_in_pets: usize,
    pub total_bookings: usize,
    pub today_bookings: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecentPet {
    pub id: i64,
    pub name: String,
    pub breed: String,
    pub photo_url: String,
    pub status_label: &'static str,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_pets: Vec<RecentPet>,
}

impl Dashboard {
    /// `pets` must come most recent first; `today` is compared with the UTC
    /// calendar day of each booking's `created_at`.
    pub fn summarize(pets: &[Pet], bookings: &[Booking], today: NaiveDate) -> Self {
        let booked_pets = pet_booking_status(bookings);

        let stats = DashboardStats {
            total_pets: pets.len(),
            active_pets: pets
                .iter()
                .filter(|pet| !booked_pets.contains_key(&pet.id))
                .count(),
            checked_in_pets: bookings.len(),
            total_bookings: bookings.len(),
            today_bookings: bookings
                .iter()
                .filter(|booking| {
                    booking
                        .created_at
                        .is_some_and(|created_at| created_at.date_naive() == today)
                })
                .count(),
        };

        let recent_pets = pets
            .iter()
            .take(consts::RECENT_PETS_LIMIT)
            .map(|pet| RecentPet {
                id: pet.id,
                name: pet.name.clone(),
                breed: pet.breed.clone(),
                photo_url: pet
                    .photo_url
                    .clone()
                    .unwrap_or_else(|| consts::PLACEHOLDER_PET_PHOTO_URL.into()),
                status_label: if booked_pets.contains_key(&pet.id) {
                    consts::CHECKED_IN_LABEL
                } else {
                    consts::DEFAULT_PET_STATUS
                },
            })
            .collect();

        Self { stats, recent_pets }
    }
}

pub async fn get_dashboard(repo: &repo::ImplAppRepo) -> anyhow::Result<Dashboard> {
    let _span = logfire::span!("get_dashboard").entered();

    let (pets, bookings) = futures::try_join!(
        repo.get_pets(PetOrder::CreatedAtDesc),
        repo.get_bookings()
    )?;

    Ok(Dashboard::summarize(
        &pets,
        &bookings,
        Utc::now().date_naive(),
    ))
}
