//! # Pet API Module
//!
//! Pet passport registry: the passport cards grid and pet registration.

use serde::{Deserialize, Serialize};

use super::{InputError, non_blank, required};
use crate::{
    consts, metric,
    models::pet::{NewPet, Pet, PetOrder},
    repo,
};

/// Registration form values as typed by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterPetRequest {
    pub name: String,
    pub breed: String,
    pub age: String,
    pub photo_url: String,
    pub cuteness_level: Option<i64>,
    /// Comma separated labels
    pub badges: String,
}

/// `value` as typed, once it parses as an http(s) url
fn web_url(value: String) -> Result<String, InputError> {
    match reqwest::Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(value),
        _ => Err(InputError::InvalidField("photo url")),
    }
}

impl RegisterPetRequest {
    /// Validates the required fields and fills the registration defaults.
    ///
    /// # Defaults
    /// - `photo_url`: stock photo when blank
    /// - `cuteness_level`: 100 when missing
    /// - `badges`: `["🐾 New Pet"]` when no label is given
    /// - `status`: `Active`
    ///
    /// # Errors
    /// [InputError::MissingField] for a blank name, breed or age and
    /// [InputError::InvalidField] for a cuteness level outside `0..=100` or a
    /// photo url that is not http(s).
    pub fn into_new_pet(self) -> Result<NewPet, InputError> {
        let cuteness_level = match self.cuteness_level {
            None => consts::DEFAULT_CUTENESS_LEVEL,
            Some(level) => u8::try_from(level)
                .ok()
                .filter(|level| *level <= 100)
                .ok_or(InputError::InvalidField("cuteness level"))?,
        };

        let badges = self
            .badges
            .split(',')
            .filter_map(non_blank)
            .collect::<Vec<String>>();

        Ok(NewPet {
            name: required(&self.name, "name")?,
            breed: required(&self.breed, "breed")?,
            age: required(&self.age, "age")?,
            photo_url: match non_blank(&self.photo_url) {
                Some(url) => web_url(url)?,
                None => consts::DEFAULT_PET_PHOTO_URL.into(),
            },
            cuteness_level,
            badges: if badges.is_empty() {
                vec![consts::DEFAULT_PET_BADGE.into()]
            } else {
                badges
            },
            status: consts::DEFAULT_PET_STATUS.into(),
        })
    }
}

/// Pet as rendered on its passport card
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PassportCard {
    pub id: i64,
    /// `#001` style id
    pub passport_id: String,
    pub name: String,
    pub breed: String,
    pub age: String,
    pub photo_url: String,
    pub cuteness_level: u8,
    pub badges: Vec<String>,
    pub status: String,
    pub is_checked_in: bool,
}

impl From<Pet> for PassportCard {
    fn from(pet: Pet) -> Self {
        Self {
            passport_id: format!("#{:03}", pet.id),
            is_checked_in: pet.status == consts::CHECKED_IN_LABEL,
            photo_url: pet
                .photo_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| consts::PLACEHOLDER_PET_PHOTO_URL.into()),
            id: pet.id,
            name: pet.name,
            breed: pet.breed,
            age: pet.age,
            cuteness_level: pet.cuteness_level.min(100),
            badges: pet.badges,
            status: pet.status,
        }
    }
}

/// Every pet ordered by id, ready for the passport grid
pub async fn get_passport_cards(repo: &repo::ImplAppRepo) -> anyhow::Result<Vec<PassportCard>> {
    Ok(repo
        .get_pets(PetOrder::IdAsc)
        .await?
        .into_iter()
        .map(PassportCard::from)
        .collect())
}

/// Registers a pet and returns the row the backend stored.
///
/// # Arguments
/// * `request` - Registration form values
/// * `repo` - Repository instance for backend operations
///
/// # Errors
/// Returns the [InputError] when the form is invalid, no request is issued
/// in that case, or the backend error when the insert fails.
pub async fn register_pet(
    request: RegisterPetRequest,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<Pet> {
    let _span = logfire::span!("register_pet").entered();

    let pet = repo.insert_pet(&request.into_new_pet()?).await?;
    metric::incr_user_action_statds("register_pet");

    Ok(pet)
}
