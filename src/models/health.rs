use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::null_as_default;

#[derive(Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum HealthRecordType {
    #[default]
    #[display("vaccine")]
    #[serde(rename = "vaccine")]
    Vaccine,
    #[display("checkup")]
    #[serde(rename = "checkup")]
    Checkup,
    #[display("medication")]
    #[serde(rename = "medication")]
    Medication,
    #[display("surgery")]
    #[serde(rename = "surgery")]
    Surgery,
    /// Any type written by another client
    #[display("other")]
    #[serde(rename = "other", other)]
    Other,
}

impl HealthRecordType {
    pub fn icon(&self) -> &'static str {
        match self {
            HealthRecordType::Vaccine => "💉",
            HealthRecordType::Checkup => "🩺",
            HealthRecordType::Medication => "💊",
            HealthRecordType::Surgery => "🏥",
            HealthRecordType::Other => "📋",
        }
    }
}

impl FromStr for HealthRecordType {
    type Err = anyhow::Error;

    /// Only the four types a user can pick are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vaccine" => Ok(HealthRecordType::Vaccine),
            "checkup" => Ok(HealthRecordType::Checkup),
            "medication" => Ok(HealthRecordType::Medication),
            "surgery" => Ok(HealthRecordType::Surgery),
            other => anyhow::bail!("unknown health record type `{other}`"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct HealthRecord {
    pub id: i64,
    pub pet_id: i64,
    #[serde(rename = "type")]
    pub record_type: HealthRecordType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub next_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewHealthRecord {
    pub pet_id: i64,
    #[serde(rename = "type")]
    pub record_type: HealthRecordType,
    pub title: String,
    pub date: NaiveDate,
    pub next_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_stored_type_reads_as_other() {
        let record: HealthRecord = serde_json::from_str(
            r#"{"id":1,"pet_id":5,"type":"grooming","title":"Nails",
                "date":"2025-02-10","next_date":null,"notes":null}"#,
        )
        .unwrap();

        assert_eq!(record.record_type, HealthRecordType::Other);
        assert_eq!(record.record_type.icon(), "📋");
        assert_eq!(record.next_date, None);
    }

    #[test]
    fn test_form_type_parsing() {
        assert_eq!(
            "medication".parse::<HealthRecordType>().unwrap(),
            HealthRecordType::Medication
        );
        assert!("other".parse::<HealthRecordType>().is_err());
    }
}
