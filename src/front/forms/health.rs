use serde::Deserialize;

use super::trimmed;
use crate::api;

#[derive(Debug, Deserialize)]
pub struct HealthRecordForm {
    #[serde(rename = "type")]
    pub record_type: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub next_date: String,
    #[serde(default)]
    pub notes: String,
}

impl From<HealthRecordForm> for api::health::AddHealthRecordRequest {
    fn from(form: HealthRecordForm) -> Self {
        Self {
            record_type: trimmed(&form.record_type),
            title: trimmed(&form.title),
            date: trimmed(&form.date),
            next_date: trimmed(&form.next_date),
            notes: trimmed(&form.notes),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HealthQuery {
    pub pet_id: Option<i64>,
}
