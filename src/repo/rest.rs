//! Hosted backend reached over its PostgREST-style REST interface.
//!
//! Every table operation is one HTTP request against `{base_url}/rest/v1/{table}`;
//! filters travel as `column=eq.value` query params. Requests carry the
//! signed in user's access token once [AppRepo::with_access_token] scoped
//! the repo, so row level policies apply to that user.

use crate::models;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};

use super::AppRepo;

const REST_PATH: &str = "rest/v1";

#[derive(Clone)]
pub struct SupabaseRepo {
    pub client: reqwest::Client,
    pub base_url: String,
    pub api_key: String,
    /// User JWT sent as bearer, the anon key is used until it is set
    pub access_token: Option<String>,
}

/// Read of a single table with equality filters and an optional order
#[derive(Debug, Clone, PartialEq)]
pub struct TableRead {
    table: &'static str,
    filters: Vec<(&'static str, String)>,
    order: Option<(&'static str, bool)>,
}

impl TableRead {
    pub fn from(table: &'static str) -> Self {
        Self {
            table,
            filters: vec![],
            order: None,
        }
    }

    pub fn eq(mut self, column: &'static str, value: impl ToString) -> Self {
        self.filters.push((column, value.to_string()));
        self
    }

    pub fn order(mut self, column: &'static str, ascending: bool) -> Self {
        self.order = Some((column, ascending));
        self
    }

    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];

        params.extend(
            self.filters
                .iter()
                .map(|(column, value)| (column.to_string(), format!("eq.{value}"))),
        );

        if let Some((column, ascending)) = self.order {
            let direction = if ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{column}.{direction}")));
        }

        params
    }
}

#[derive(Serialize)]
struct StatusPatch {
    status: models::booking::BookingStatus,
}

/// PostgREST answers 2xx to a PATCH matching no row: an empty
/// representation means nothing was updated
fn ensure_row_updated(rows: &[serde_json::Value], table: &str, id: i64) -> anyhow::Result<()> {
    if rows.is_empty() {
        anyhow::bail!("row {id} of table {table} does not exist");
    }

    Ok(())
}

/// Fails with the backend message when the status is not 2xx
async fn check_status(response: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read response body".to_string());

    anyhow::bail!("backend returned error status {status}: {body}")
}

impl SupabaseRepo {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: None,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{REST_PATH}/{table}", self.base_url)
    }

    fn request(&self, method: Method, table: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(self.access_token.as_deref().unwrap_or(&self.api_key))
    }

    async fn read<T: DeserializeOwned>(&self, read: &TableRead) -> anyhow::Result<Vec<T>> {
        let response = self
            .request(Method::GET, read.table)
            .query(&read.query_params())
            .send()
            .await
            .with_context(|| format!("failed to read table {}", read.table))?;

        check_status(response)
            .await?
            .json::<Vec<T>>()
            .await
            .with_context(|| format!("failed to parse rows of table {}", read.table))
    }

    async fn insert_one<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        row: &B,
    ) -> anyhow::Result<T> {
        let response = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await
            .with_context(|| format!("failed to insert into table {table}"))?;

        check_status(response)
            .await?
            .json::<Vec<T>>()
            .await
            .with_context(|| format!("failed to parse inserted row of table {table}"))?
            .into_iter()
            .next()
            .with_context(|| format!("backend returned no inserted row for table {table}"))
    }

    async fn update_by_id<B: Serialize>(
        &self,
        table: &str,
        id: i64,
        fields: &B,
    ) -> anyhow::Result<()> {
        let response = self
            .request(Method::PATCH, table)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(fields)
            .send()
            .await
            .with_context(|| format!("failed to update row {id} of table {table}"))?;

        let rows = check_status(response)
            .await?
            .json::<Vec<serde_json::Value>>()
            .await
            .with_context(|| format!("failed to parse updated row of table {table}"))?;

        ensure_row_updated(&rows, table, id)
    }

    async fn delete_by_id(&self, table: &str, id: i64) -> anyhow::Result<()> {
        let response = self
            .request(Method::DELETE, table)
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .with_context(|| format!("failed to delete row {id} of table {table}"))?;

        check_status(response).await.map(|_| ())
    }
}

fn pets_read(order: models::pet::PetOrder) -> TableRead {
    let read = TableRead::from("pets");
    match order {
        models::pet::PetOrder::IdAsc => read.order("id", true),
        models::pet::PetOrder::NameAsc => read.order("name", true),
        models::pet::PetOrder::CreatedAtDesc => read.order("created_at", false),
    }
}

fn health_records_read(pet_id: i64) -> TableRead {
    TableRead::from("health_records")
        .eq("pet_id", pet_id)
        .order("date", false)
}

#[async_trait]
impl AppRepo for SupabaseRepo {
    fn with_access_token(&self, access_token: &str) -> super::ImplAppRepo {
        Box::new(Self {
            access_token: Some(access_token.to_string()),
            ..self.clone()
        })
    }

    async fn get_pets(
        &self,
        order: models::pet::PetOrder,
    ) -> anyhow::Result<Vec<models::pet::Pet>> {
        self.read(&pets_read(order)).await
    }

    async fn insert_pet(&self, pet: &models::pet::NewPet) -> anyhow::Result<models::pet::Pet> {
        self.insert_one("pets", pet).await
    }

    async fn get_bookings(&self) -> anyhow::Result<Vec<models::booking::Booking>> {
        self.read(&TableRead::from("bookings")).await
    }

    async fn insert_booking(
        &self,
        booking: &models::booking::NewBooking,
    ) -> anyhow::Result<models::booking::Booking> {
        self.insert_one("bookings", booking).await
    }

    async fn update_booking_status(
        &self,
        booking_id: i64,
        status: models::booking::BookingStatus,
    ) -> anyhow::Result<()> {
        self.update_by_id("bookings", booking_id, &StatusPatch { status })
            .await
    }

    async fn delete_booking(&self, booking_id: i64) -> anyhow::Result<()> {
        self.delete_by_id("bookings", booking_id).await
    }

    async fn get_pet_health_records(
        &self,
        pet_id: i64,
    ) -> anyhow::Result<Vec<models::health::HealthRecord>> {
        self.read(&health_records_read(pet_id)).await
    }

    async fn insert_health_record(
        &self,
        record: &models::health::NewHealthRecord,
    ) -> anyhow::Result<models::health::HealthRecord> {
        self.insert_one("health_records", record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_plain_read_selects_everything() {
        assert_eq!(
            TableRead::from("bookings").query_params(),
            pairs(&[("select", "*")])
        );
    }

    #[test]
    fn test_health_records_filter_by_pet_and_date_desc() {
        assert_eq!(
            health_records_read(5).query_params(),
            pairs(&[("select", "*"), ("pet_id", "eq.5"), ("order", "date.desc")])
        );
    }

    #[test]
    fn test_pet_orders() {
        assert_eq!(
            pets_read(models::pet::PetOrder::NameAsc).query_params(),
            pairs(&[("select", "*"), ("order", "name.asc")])
        );
        assert_eq!(
            pets_read(models::pet::PetOrder::CreatedAtDesc).query_params(),
            pairs(&[("select", "*"), ("order", "created_at.desc")])
        );
    }

    #[test]
    fn test_table_url_ignores_trailing_slash() {
        let repo = SupabaseRepo::new(reqwest::Client::new(), "https://xyz.supabase.co/", "key");

        assert_eq!(
            repo.table_url("pets"),
            "https://xyz.supabase.co/rest/v1/pets"
        );
    }

    fn bearer_of(repo: &SupabaseRepo) -> String {
        repo.request(Method::GET, "pets")
            .build()
            .unwrap()
            .headers()
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_requests_carry_the_user_token_once_scoped() {
        let repo = SupabaseRepo::new(reqwest::Client::new(), "https://xyz.supabase.co", "anon");
        assert_eq!(bearer_of(&repo), "Bearer anon");

        let user_repo = SupabaseRepo {
            access_token: Some("user-jwt".into()),
            ..repo.clone()
        };
        assert_eq!(bearer_of(&user_repo), "Bearer user-jwt");

        let request = user_repo.request(Method::GET, "pets").build().unwrap();
        assert_eq!(
            request.headers().get("apikey").and_then(|v| v.to_str().ok()),
            Some("anon")
        );
    }

    #[test]
    fn test_update_matching_no_row_fails() {
        let updated: Vec<serde_json::Value> =
            serde_json::from_str(r#"[{"id":10,"status":"ready"}]"#).unwrap();
        assert!(ensure_row_updated(&updated, "bookings", 10).is_ok());

        let none: Vec<serde_json::Value> = serde_json::from_str("[]").unwrap();
        let err = ensure_row_updated(&none, "bookings", 10).unwrap_err();
        assert_eq!(err.to_string(), "row 10 of table bookings does not exist");
    }

    #[test]
    fn test_status_patch_body() {
        let body = serde_json::to_string(&StatusPatch {
            status: models::booking::BookingStatus::Ready,
        })
        .unwrap();

        assert_eq!(body, r#"{"status":"ready"}"#);
    }

    #[test]
    fn test_pet_rows_from_backend() {
        let pets: Vec<models::pet::Pet> = serde_json::from_str(
            r#"[{"id":1,"name":"Luna","breed":"Golden Retriever","age":"2 years",
                 "photo_url":null,"cuteness_level":97,"badges":null,"status":"Active",
                 "created_at":"2025-01-05T12:00:00.123456+00:00"},
                {"id":2,"name":"Thor","breed":"Pug","age":"4 years",
                 "cuteness_level":100,"badges":["Good boy"],"status":"Active"}]"#,
        )
        .unwrap();

        assert_eq!(pets.len(), 2);
        assert!(pets[0].badges.is_empty());
        assert_eq!(pets[0].photo_url, None);
        assert_eq!(pets[1].badges, vec!["Good boy".to_string()]);
        assert_eq!(pets[1].created_at, None);
    }
}
