//! US Census client
//!
//! County lookup goes through the FCC Area API; block-group enumeration and
//! statistics come from the ACS 5-year endpoint, which answers with a JSON
//! array of rows whose first row is the header.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use centerline_core::domain::{BlockGroupId, BlockGroupStats, CensusArea};
use centerline_core::error::DomainError;
use centerline_core::repositories::{CensusAreaResolver, CensusUnitSource};

use super::variables;

#[derive(Debug, Deserialize)]
struct AreaResponse {
    #[serde(default)]
    results: Vec<AreaResult>,
}

#[derive(Debug, Deserialize)]
struct AreaResult {
    state_fips: String,
    county_fips: String,
}

#[derive(Clone)]
pub struct CensusClient {
    client: Client,
    acs_base_url: String,
    area_base_url: String,
    api_key: Option<String>,
}

impl CensusClient {
    pub fn new(
        acs_base_url: String,
        area_base_url: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            acs_base_url,
            area_base_url,
            api_key,
        }
    }

    async fn area_internal(&self, latitude: f64, longitude: f64) -> Result<CensusArea> {
        let url = Url::parse_with_params(
            &self.area_base_url,
            &[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("format", "json".to_string()),
            ],
        )
        .context("Invalid census area base URL")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to connect to census area service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Census area API error ({}): {}", status, body);
        }

        let body: AreaResponse = response
            .json()
            .await
            .context("Failed to parse census area response")?;

        let first = body
            .results
            .into_iter()
            .next()
            .context("No county found for coordinates")?;

        let county = first
            .county_fips
            .get(first.county_fips.len().saturating_sub(3)..)
            .filter(|c| c.len() == 3)
            .with_context(|| format!("Malformed county FIPS '{}'", first.county_fips))?
            .to_string();

        Ok(CensusArea {
            state: first.state_fips,
            county,
        })
    }

    /// Runs an ACS query. `None` when the API has no rows (HTTP 204).
    async fn acs_rows(&self, get: &str, for_clause: &str, in_clause: &str) -> Result<Option<Vec<Vec<Value>>>> {
        let mut params = vec![("get", get), ("for", for_clause), ("in", in_clause)];
        if let Some(key) = &self.api_key {
            params.push(("key", key.as_str()));
        }
        let url = Url::parse_with_params(&self.acs_base_url, &params)
            .context("Invalid ACS base URL")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to connect to ACS service")?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("ACS API error ({}): {}", status, body);
        }

        let rows: Vec<Vec<Value>> = response
            .json()
            .await
            .context("Failed to parse ACS response")?;
        Ok(Some(rows))
    }

    async fn block_groups_internal(&self, area: &CensusArea) -> Result<Vec<BlockGroupId>> {
        let in_clause = format!("state:{} county:{} tract:*", area.state, area.county);
        let Some(rows) = self.acs_rows("NAME", "block group:*", &in_clause).await? else {
            return Ok(Vec::new());
        };

        let (header, data) = split_header(&rows)?;
        let tract = column(&header, "tract")?;
        let block_group = column(&header, "block group")?;

        let units = data
            .iter()
            .filter_map(|row| {
                Some(BlockGroupId {
                    state: area.state.clone(),
                    county: area.county.clone(),
                    tract: row.get(tract)?.as_str()?.to_string(),
                    block_group: row.get(block_group)?.as_str()?.to_string(),
                })
            })
            .collect::<Vec<_>>();

        debug!(
            "Found {} block groups in state {} county {}",
            units.len(),
            area.state,
            area.county
        );
        Ok(units)
    }

    async fn block_group_internal(&self, unit: &BlockGroupId) -> Result<Option<BlockGroupStats>> {
        let get = variables::all().join(",");
        let for_clause = format!("block group:{}", unit.block_group);
        let in_clause = format!(
            "state:{} county:{} tract:{}",
            unit.state, unit.county, unit.tract
        );

        let Some(rows) = self.acs_rows(&get, &for_clause, &in_clause).await? else {
            return Ok(None);
        };
        let (header, data) = split_header(&rows)?;
        let Some(row) = data.first() else {
            return Ok(None);
        };

        let values: HashMap<String, f64> = header
            .iter()
            .zip(row.iter())
            .filter_map(|(name, value)| Some((name.clone(), numeric(value)?)))
            .collect();

        Ok(Some(variables::to_stats(&values)))
    }
}

fn split_header(rows: &[Vec<Value>]) -> Result<(Vec<String>, &[Vec<Value>])> {
    let (first, rest) = rows.split_first().context("ACS response has no header row")?;
    let header = first
        .iter()
        .map(|v| v.as_str().unwrap_or_default().to_string())
        .collect();
    Ok((header, rest))
}

fn column(header: &[String], name: &str) -> Result<usize> {
    header
        .iter()
        .position(|h| h == name)
        .with_context(|| format!("ACS response is missing column '{}'", name))
}

/// ACS values arrive as strings; some proxies return bare numbers.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

#[async_trait]
impl CensusAreaResolver for CensusClient {
    async fn resolve_area(&self, latitude: f64, longitude: f64) -> Result<CensusArea, DomainError> {
        self.area_internal(latitude, longitude)
            .await
            .map_err(|e| DomainError::Enrichment(format!("{:#}", e)))
    }
}

#[async_trait]
impl CensusUnitSource for CensusClient {
    async fn list_block_groups(&self, area: &CensusArea) -> Result<Vec<BlockGroupId>, DomainError> {
        self.block_groups_internal(area)
            .await
            .map_err(|e| DomainError::Enrichment(format!("{:#}", e)))
    }

    async fn fetch_block_group(&self, unit: &BlockGroupId) -> Result<Option<BlockGroupStats>, DomainError> {
        self.block_group_internal(unit)
            .await
            .map_err(|e| DomainError::Enrichment(format!("{:#}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_accepts_strings_and_numbers() {
        assert_eq!(numeric(&json!("1234")), Some(1234.0));
        assert_eq!(numeric(&json!(56)), Some(56.0));
        assert_eq!(numeric(&json!("-666666666")), Some(-666_666_666.0));
        assert_eq!(numeric(&json!(null)), None);
        assert_eq!(numeric(&json!("n/a")), None);
    }

    #[test]
    fn test_split_header_requires_a_header() {
        assert!(split_header(&[]).is_err());
        let rows = vec![vec![json!("NAME"), json!("tract")], vec![json!("x"), json!("000100")]];
        let (header, data) = split_header(&rows).unwrap();
        assert_eq!(header, vec!["NAME", "tract"]);
        assert_eq!(data.len(), 1);
        assert_eq!(column(&header, "tract").unwrap(), 1);
        assert!(column(&header, "block group").is_err());
    }
}
