//! PostgREST client for the hosted tables.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tracing::debug;

use super::{
    changes, ChangeChannel, RemoteChange, RemoteConfig, RemoteStore, CHEMICALS_TABLE, LOGS_TABLE,
};
use crate::error::{ChemventoryError, Result};
use crate::model::{AuditEntry, ChemicalRecord};

const REST_PREFIX: &str = "rest/v1";
const RETURN_REPRESENTATION: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=representation";
const RETURN_MINIMAL: &str = "return=minimal";

/// HTTP client for `<url>/rest/v1/<table>`.
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    base_url: String,
    anon_key: String,
    poll_interval: Duration,
    client: reqwest::Client,
}

impl PostgrestClient {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            poll_interval: config.poll_interval,
            client,
        })
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PREFIX, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    /// Every row of `table`, untouched.
    pub async fn select_raw(&self, table: &str) -> Result<Vec<serde_json::Value>> {
        let response = self
            .request(Method::GET, table)
            .query(&[("select", "*")])
            .send()
            .await?;
        read_json(response, "select").await
    }
}

async fn check(response: Response, op: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ChemventoryError::Remote(format!(
        "{} failed with status {}: {}",
        op,
        status,
        body.trim()
    )))
}

async fn read_json<T: DeserializeOwned>(response: Response, op: &str) -> Result<T> {
    let response = check(response, op).await?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|err| {
        ChemventoryError::Remote(format!("{} returned an unreadable body: {}", op, err))
    })
}

/// Exactly one row, or an error naming the operation.
fn single<T>(rows: Vec<T>, op: &str) -> Result<T> {
    let count = rows.len();
    let mut rows = rows.into_iter();
    match (rows.next(), count) {
        (Some(row), 1) => Ok(row),
        (None, _) => Err(ChemventoryError::Remote(format!("{} returned no rows", op))),
        (Some(_), n) => Err(ChemventoryError::Remote(format!(
            "{} returned {} rows, expected one",
            op, n
        ))),
    }
}

#[async_trait]
impl RemoteStore for PostgrestClient {
    async fn select_all(&self) -> Result<Vec<ChemicalRecord>> {
        debug!(table = CHEMICALS_TABLE, "remote select");
        let rows = self.select_raw(CHEMICALS_TABLE).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(ChemventoryError::from))
            .collect()
    }

    async fn insert(&self, record: &ChemicalRecord) -> Result<ChemicalRecord> {
        debug!(table = CHEMICALS_TABLE, id = %record.id, "remote insert");
        let response = self
            .request(Method::POST, CHEMICALS_TABLE)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(record)
            .send()
            .await?;
        single(read_json(response, "insert").await?, "insert")
    }

    async fn upsert(&self, records: &[ChemicalRecord]) -> Result<Vec<ChemicalRecord>> {
        debug!(table = CHEMICALS_TABLE, count = records.len(), "remote upsert");
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let response = self
            .request(Method::POST, CHEMICALS_TABLE)
            .query(&[("on_conflict", "id")])
            .header("Prefer", MERGE_DUPLICATES)
            .json(records)
            .send()
            .await?;
        read_json(response, "upsert").await
    }

    async fn delete(&self, id: &str) -> Result<ChemicalRecord> {
        debug!(table = CHEMICALS_TABLE, id = %id, "remote delete");
        let response = self
            .request(Method::DELETE, CHEMICALS_TABLE)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", RETURN_REPRESENTATION)
            .send()
            .await?;
        let rows: Vec<ChemicalRecord> = read_json(response, "delete").await?;
        single(rows, "delete").map_err(|_| {
            ChemventoryError::NotFound(format!("No remote chemical with id {}", id))
        })
    }

    async fn append_log(&self, entry: &AuditEntry) -> Result<()> {
        let response = self
            .request(Method::POST, LOGS_TABLE)
            .header("Prefer", RETURN_MINIMAL)
            .json(entry)
            .send()
            .await?;
        check(response, "log insert").await?;
        Ok(())
    }

    fn open_channel(&self, sink: mpsc::UnboundedSender<RemoteChange>) -> Result<ChangeChannel> {
        changes::spawn_poll_feed(self.clone(), CHEMICALS_TABLE, self.poll_interval, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PostgrestClient {
        let config = RemoteConfig::from_parts(
            Some("https://lab.supabase.co/".to_string()),
            Some("anon-key".to_string()),
        )
        .unwrap();
        PostgrestClient::new(&config).unwrap()
    }

    #[test]
    fn test_table_url() {
        assert_eq!(
            client().table_url("chemicals"),
            "https://lab.supabase.co/rest/v1/chemicals"
        );
    }

    #[test]
    fn test_requests_carry_key_headers() {
        let request = client()
            .request(Method::DELETE, CHEMICALS_TABLE)
            .query(&[("id", "eq.42")])
            .build()
            .unwrap();

        assert_eq!(request.headers()["apikey"], "anon-key");
        assert_eq!(request.headers()["authorization"], "Bearer anon-key");
        assert_eq!(request.url().query(), Some("id=eq.42"));
    }

    #[test]
    fn test_single_requires_exactly_one_row() {
        assert_eq!(single(vec![1], "op").unwrap(), 1);
        assert!(single(Vec::<i32>::new(), "op").is_err());
        assert!(single(vec![1, 2], "op").is_err());
    }
}
