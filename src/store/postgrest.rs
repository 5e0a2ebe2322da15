use crate::config::StoreConfig;
use crate::error::{AppError, Result};
use crate::normalize::RawRecord;
use crate::store::MeterStore;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// [`MeterStore`] backed by a PostgREST endpoint (Supabase `/rest/v1`)
#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    base_url: String,
    api_key: String,
    readings_table: String,
    predictions_table: String,
}

impl PostgrestStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            readings_table: config.readings_table.clone(),
            predictions_table: config.predictions_table.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn select(&self, table: &str, query: &[(&str, &str)]) -> Result<Vec<RawRecord>> {
        let url = self.table_url(table);
        debug!(table = %table, ?query, "querying store");

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Store {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        into_records(body)
    }
}

#[async_trait]
impl MeterStore for PostgrestStore {
    async fn latest_reading(&self) -> Result<Option<RawRecord>> {
        let rows = self
            .select(
                &self.readings_table,
                &[("select", "*"), ("order", "time.desc"), ("limit", "1")],
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    async fn predictions(&self) -> Result<Vec<RawRecord>> {
        self.select(
            &self.predictions_table,
            &[("select", "*"), ("order", "created_at.asc")],
        )
        .await
    }
}

/// PostgREST answers a table select with a JSON array of row objects
fn into_records(body: Value) -> Result<Vec<RawRecord>> {
    let Value::Array(rows) = body else {
        return Err(AppError::UnexpectedPayload(
            "expected a JSON array of rows".to_string(),
        ));
    };

    rows.into_iter()
        .map(|row| match row {
            Value::Object(map) => Ok(map),
            other => Err(AppError::UnexpectedPayload(format!(
                "expected a row object, got {}",
                other
            ))),
        })
        .collect()
}
