//! Health tracker: a timeline of records for one selected pet.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{InputError, non_blank, required};
use crate::{
    metric,
    models::{
        health::{HealthRecord, HealthRecordType, NewHealthRecord},
        pet::{Pet, PetOrder},
    },
    repo,
};

const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PetOption {
    pub id: i64,
    pub name: String,
    pub breed: String,
    pub photo_url: Option<String>,
}

impl From<&Pet> for PetOption {
    fn from(pet: &Pet) -> Self {
        Self {
            id: pet.id,
            name: pet.name.clone(),
            breed: pet.breed.clone(),
            photo_url: pet.photo_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimelineEntry {
    pub id: i64,
    pub record_type: HealthRecordType,
    pub icon: &'static str,
    pub title: String,
    pub date: NaiveDate,
    pub next_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl From<HealthRecord> for TimelineEntry {
    fn from(record: HealthRecord) -> Self {
        Self {
            id: record.id,
            icon: record.record_type.icon(),
            record_type: record.record_type,
            title: record.title,
            date: record.date,
            next_date: record.next_date,
            notes: record.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct HealthTimeline {
    pub pets: Vec<PetOption>,
    pub selected: Option<PetOption>,
    pub records: Vec<TimelineEntry>,
}

/// The requested pet when it exists, the first pet otherwise
fn select_pet(pets: &[Pet], requested: Option<i64>) -> Option<&Pet> {
    requested
        .and_then(|id| pets.iter().find(|pet| pet.id == id))
        .or_else(|| pets.first())
}

/// Records of `pet_id`, most recent first
pub async fn get_pet_records(
    pet_id: i64,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<Vec<TimelineEntry>> {
    Ok(repo
        .get_pet_health_records(pet_id)
        .await?
        .into_iter()
        .map(TimelineEntry::from)
        .collect())
}

/// Pets ordered by name and the timeline of the selected one
pub async fn get_timeline(
    requested_pet_id: Option<i64>,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<HealthTimeline> {
    let _span = logfire::span!("get_health_timeline").entered();

    let pets = repo.get_pets(PetOrder::NameAsc).await?;
    let selected = select_pet(&pets, requested_pet_id).map(PetOption::from);

    let records = match &selected {
        Some(pet) => get_pet_records(pet.id, repo).await?,
        None => vec![],
    };

    Ok(HealthTimeline {
        pets: pets.iter().map(PetOption::from).collect(),
        selected,
        records,
    })
}

/// Add-record form values as typed by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddHealthRecordRequest {
    pub record_type: String,
    pub title: String,
    pub date: String,
    pub next_date: String,
    pub notes: String,
}

fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(value.trim(), FORM_DATE_FORMAT)
        .map_err(|_| InputError::InvalidField(field))
}

impl AddHealthRecordRequest {
    /// Type, title and date are required; a blank next date or notes is stored as null
    pub fn into_new_record(self, pet_id: i64) -> Result<NewHealthRecord, InputError> {
        let record_type = required(&self.record_type, "type")?
            .parse::<HealthRecordType>()
            .map_err(|_| InputError::InvalidField("type"))?;

        let next_date = match non_blank(&self.next_date) {
            Some(value) => Some(parse_date(&value, "next date")?),
            None => None,
        };

        Ok(NewHealthRecord {
            pet_id,
            record_type,
            title: required(&self.title, "title")?,
            date: parse_date(&required(&self.date, "date")?, "date")?,
            next_date,
            notes: non_blank(&self.notes),
        })
    }
}

/// Stores a record for `pet_id`.
///
/// # Errors
/// Returns the [InputError] when the form is invalid, or the backend error.
pub async fn add_health_record(
    pet_id: i64,
    request: AddHealthRecordRequest,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<HealthRecord> {
    let _span = logfire::span!("add_health_record for pet {pet_id}", pet_id = pet_id).entered();

    let record = repo
        .insert_health_record(&request.into_new_record(pet_id)?)
        .await?;
    metric::incr_user_action_statds("add_health_record");

    Ok(record)
}
