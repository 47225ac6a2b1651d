use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::null_as_default;

#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq)]
pub struct Pet {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub breed: String,
    /// Free text, e.g. "2 years"
    #[serde(default, deserialize_with = "null_as_default")]
    pub age: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default, deserialize_with = "cuteness_from_number")]
    pub cuteness_level: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub badges: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Cuteness level stored outside `0..=100` is shown at the nearest bound
pub(crate) fn clamp_cuteness(level: f64) -> u8 {
    level.clamp(0.0, 100.0).round() as u8
}

fn cuteness_from_number<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?
        .map(clamp_cuteness)
        .unwrap_or_default())
}

/// Row sent to the backend when a pet is registered
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewPet {
    pub name: String,
    pub breed: String,
    pub age: String,
    pub photo_url: String,
    pub cuteness_level: u8,
    pub badges: Vec<String>,
    pub status: String,
}

/// Sort orders the views request pets in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetOrder {
    IdAsc,
    NameAsc,
    CreatedAtDesc,
}
