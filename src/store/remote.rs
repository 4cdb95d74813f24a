//! Remote record store
//!
//! The hosted backend exposes a PostgREST-style REST API: one table per
//! record kind, `apikey` plus bearer authentication, upserts through
//! `Prefer: resolution=merge-duplicates`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

use super::error::{Result, StoreError};
use crate::content::{Post, SocialDraft};

/// A record kind that lives in its own remote table
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: &'static str;

    fn record_id(&self) -> Uuid;

    /// Time of the last write, compared when local and remote copies differ
    fn updated_at(&self) -> DateTime<Utc>;
}

impl Record for Post {
    const TABLE: &'static str = "posts";

    fn record_id(&self) -> Uuid {
        self.id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated.unwrap_or(self.date)
    }
}

impl Record for SocialDraft {
    const TABLE: &'static str = "social_drafts";

    fn record_id(&self) -> Uuid {
        self.id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Table-level operations against the remote store
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch every row of `table`
    async fn fetch_all(&self, table: &str) -> Result<Vec<Value>>;

    /// Insert or replace one row
    async fn upsert(&self, table: &str, record: Value) -> Result<()>;

    /// Delete the row with `id`
    async fn delete(&self, table: &str, id: Uuid) -> Result<()>;
}

/// REST client for the hosted backend
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    async fn fetch_all(&self, table: &str) -> Result<Vec<Value>> {
        let url = self.table_url(table);
        let rows = self
            .request(reqwest::Method::GET, &url)
            .query(&[("select", "*")])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Value>>()
            .await?;
        tracing::debug!("Fetched {} rows from {}", rows.len(), table);
        Ok(rows)
    }

    async fn upsert(&self, table: &str, record: Value) -> Result<()> {
        let url = self.table_url(table);
        self.request(reqwest::Method::POST, &url)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&record)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete(&self, table: &str, id: Uuid) -> Result<()> {
        let url = self.table_url(table);
        self.request(reqwest::Method::DELETE, &url)
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Decode rows, skipping (and logging) the ones that do not match `T`
pub fn decode_rows<T: Record>(rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<T>(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping malformed {} row: {}", T::TABLE, e);
                None
            }
        })
        .collect()
}

/// Merge local records into the remote set
///
/// Local records the remote lacks, or newer local copies, win. Returns the
/// merged set and the local records the remote still needs.
pub fn reconcile<T: Record>(remote: Vec<T>, local: Vec<T>) -> (Vec<T>, Vec<T>) {
    let mut merged = remote;
    let index: HashMap<Uuid, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, record)| (record.record_id(), i))
        .collect();

    let mut missing = Vec::new();
    for record in local {
        match index.get(&record.record_id()) {
            Some(&i) if merged[i].updated_at() >= record.updated_at() => {}
            Some(&i) => {
                merged[i] = record.clone();
                missing.push(record);
            }
            None => missing.push(record),
        }
    }
    merged.extend(missing.iter().filter(|r| !index.contains_key(&r.record_id())).cloned());

    (merged, missing)
}

/// Encode a record as a row
pub fn encode_row<T: Record>(record: &T) -> Result<Value> {
    serde_json::to_value(record).map_err(StoreError::from)
}
