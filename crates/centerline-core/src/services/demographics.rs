//! Demographics aggregator
//!
//! Resolves the county around a point, pulls block-group statistics
//! concurrently and reduces them into weighted percentages.
//!
//! Block groups are not filtered by distance. The candidate list is the
//! county's block groups capped at `max_block_groups`, so `radius` bounds
//! nothing geometrically; it is echoed back to the caller unchanged.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::domain::{BlockGroupId, BlockGroupStats, DemographicsSummary};
use crate::error::DomainError;
use crate::repositories::{CensusAreaResolver, CensusUnitSource};

#[derive(Debug, Clone)]
pub struct DemographicsOptions {
    pub max_block_groups: usize,
    pub fetch_concurrency: usize,
}

impl Default for DemographicsOptions {
    fn default() -> Self {
        Self {
            max_block_groups: 50,
            fetch_concurrency: 8,
        }
    }
}

pub struct DemographicsAggregator {
    resolver: Arc<dyn CensusAreaResolver>,
    units: Arc<dyn CensusUnitSource>,
    options: DemographicsOptions,
}

impl DemographicsAggregator {
    pub fn new(
        resolver: Arc<dyn CensusAreaResolver>,
        units: Arc<dyn CensusUnitSource>,
        options: DemographicsOptions,
    ) -> Self {
        Self {
            resolver,
            units,
            options,
        }
    }

    /// Never fails: lookup problems and areas without usable block groups
    /// degrade to an all-zero summary with `block_groups_analyzed == 0`.
    pub async fn summarize(&self, latitude: f64, longitude: f64, radius: f64) -> DemographicsSummary {
        match self.try_summarize(latitude, longitude, radius).await {
            Ok(summary) => summary,
            Err(DomainError::PartialData(reason)) => {
                warn!("{}", reason);
                DemographicsSummary::empty(radius)
            }
            Err(e) => {
                warn!("Demographics lookup failed for ({}, {}): {}", latitude, longitude, e);
                DemographicsSummary::empty(radius)
            }
        }
    }

    async fn try_summarize(
        &self,
        latitude: f64,
        longitude: f64,
        radius: f64,
    ) -> Result<DemographicsSummary, DomainError> {
        let area = self.resolver.resolve_area(latitude, longitude).await?;
        let mut candidates = self.units.list_block_groups(&area).await?;

        if candidates.len() > self.options.max_block_groups {
            debug!(
                "Capping {} block groups to {}",
                candidates.len(),
                self.options.max_block_groups
            );
            candidates.truncate(self.options.max_block_groups);
        }

        let stats = self.fetch_all(candidates).await;
        if stats.is_empty() {
            return Err(DomainError::PartialData(format!(
                "No usable block groups for state {} county {}",
                area.state, area.county
            )));
        }

        let summary = aggregate(radius, &stats);
        info!(
            state = %area.state,
            county = %area.county,
            block_groups = summary.block_groups_analyzed,
            "Demographics aggregated"
        );
        Ok(summary)
    }

    /// Fan out, then join. Failed or empty units are dropped.
    async fn fetch_all(&self, candidates: Vec<BlockGroupId>) -> Vec<BlockGroupStats> {
        let concurrency = self.options.fetch_concurrency.max(1);

        let results: Vec<Option<BlockGroupStats>> = stream::iter(candidates)
            .map(|unit| {
                let units = Arc::clone(&self.units);
                async move {
                    match units.fetch_block_group(&unit).await {
                        Ok(Some(stats)) => Some(stats),
                        Ok(None) => {
                            debug!("No census data for block group {}", unit);
                            None
                        }
                        Err(e) => {
                            warn!("Census fetch failed for block group {}: {}", unit, e);
                            None
                        }
                    }
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        results.into_iter().flatten().collect()
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn percent(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        round1(numerator / denominator * 100.0)
    } else {
        0.0
    }
}

/// Reduces per-unit statistics. Counts are summed, percentages divide summed
/// numerators by summed denominators, and median income is weighted by
/// population.
pub fn aggregate(radius: f64, units: &[BlockGroupStats]) -> DemographicsSummary {
    if units.is_empty() {
        return DemographicsSummary::empty(radius);
    }

    let mut total = BlockGroupStats::default();
    let mut weighted_income = 0.0;

    for unit in units.iter().map(|u| u.sanitized()) {
        total.population += unit.population;
        total.housing_units += unit.housing_units;
        total.occupied_housing_units += unit.occupied_housing_units;
        total.owner_occupied_units += unit.owner_occupied_units;
        total.education_population += unit.education_population;
        total.bachelors_or_higher += unit.bachelors_or_higher;
        total.commuters += unit.commuters;
        total.commute_30_plus += unit.commute_30_plus;
        total.workers += unit.workers;
        total.work_from_home += unit.work_from_home;
        total.households += unit.households;
        total.households_200k_plus += unit.households_200k_plus;
        weighted_income += unit.median_household_income * unit.population;
    }

    let median_household_income = if total.population > 0.0 {
        (weighted_income / total.population).round() as u64
    } else {
        0
    };

    DemographicsSummary {
        radius,
        total_population: total.population.round() as u64,
        median_household_income,
        total_housing_units: total.housing_units.round() as u64,
        owner_occupied_percent: percent(total.owner_occupied_units, total.occupied_housing_units),
        commute_30_plus_percent: percent(total.commute_30_plus, total.commuters),
        bachelors_degree_percent: percent(total.bachelors_or_higher, total.education_population),
        work_from_home_percent: percent(total.work_from_home, total.workers),
        households_200k_percent: percent(total.households_200k_plus, total.households),
        block_groups_analyzed: units.len(),
    }
}
