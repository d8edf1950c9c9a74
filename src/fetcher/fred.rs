use async_trait::async_trait;
use crate::models::{normalize, Observation};
use super::{proxy, DateRange, DataSource};
use anyhow::{Result, anyhow};
use reqwest::{Client, Url};
use serde_json::Value;
use chrono::{NaiveDate, Utc};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};

pub const FRED_API_BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const EARLIEST_START: &str = "1900-01-01";

/// Values FRED uses for gaps in a series.
const MISSING_SENTINELS: [&str; 3] = [".", "N/A", ""];

pub struct FredFetcher {
    api_key: String,
    client: Client,
    proxy_url: Option<String>,
}

impl FredFetcher {
    pub fn new(api_key: String, proxy_url: Option<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("DebtCycleAnalyzer/1.0"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            client,
            proxy_url,
        }
    }

    fn request_url(&self, series_id: &str, range: DateRange) -> Result<String> {
        let start = range
            .from
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| EARLIEST_START.to_string());
        let end = range
            .to
            .unwrap_or_else(|| Utc::now().date_naive())
            .format("%Y-%m-%d")
            .to_string();

        let url = Url::parse_with_params(
            FRED_API_BASE_URL,
            &[
                ("series_id", series_id),
                ("api_key", self.api_key.trim()),
                ("file_type", "json"),
                ("observation_start", start.as_str()),
                ("observation_end", end.as_str()),
            ],
        )?;

        Ok(proxy::apply_proxy(url.as_str(), self.proxy_url.as_deref()))
    }
}

#[async_trait]
impl DataSource for FredFetcher {
    fn name(&self) -> &str {
        "fred"
    }

    async fn fetch_data(&self, series_id: &str, range: DateRange) -> Result<Vec<Observation>> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow!("FRED API Key is empty or missing!"));
        }

        let url = self.request_url(series_id, range)?;
        tracing::debug!(series_id, "requesting FRED observations");

        // reqwest errors carry the request URL, and with it the API key.
        let resp = self.client.get(&url).send().await.map_err(|e| e.without_url())?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("FRED API Error: {} - Body: {}", status, error_text));
        }

        let json: Value = resp.json().await.map_err(|e| e.without_url())?;
        Self::parse_observations(&json)
    }
}

impl FredFetcher {
    /// Keeps every entry with a parseable date and a finite numeric value.
    pub fn parse_observations(json: &Value) -> Result<Vec<Observation>> {
        let observations = json["observations"]
            .as_array()
            .ok_or_else(|| anyhow!("No observations found in FRED response"))?;

        let mut data_points = Vec::with_capacity(observations.len());

        for obs in observations {
            // "date": "2023-01-01", "value": "123.45"
            let (Some(date_str), Some(value_str)) = (obs["date"].as_str(), obs["value"].as_str()) else {
                continue;
            };

            let value_str = value_str.trim();
            if MISSING_SENTINELS.contains(&value_str) {
                continue;
            }

            let Ok(value) = value_str.parse::<f64>() else {
                continue;
            };
            if !value.is_finite() {
                continue;
            }

            let Ok(date) = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d") else {
                continue;
            };

            data_points.push(Observation { date, value });
        }

        Ok(normalize(data_points))
    }
}
