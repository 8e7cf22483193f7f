//! Census geography and demographic summaries

use serde::{Deserialize, Serialize};

/// State + county enclosing a point (FIPS codes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensusArea {
    pub state: String,
    pub county: String,
}

/// One census block group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockGroupId {
    pub state: String,
    pub county: String,
    pub tract: String,
    pub block_group: String,
}

impl std::fmt::Display for BlockGroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.state, self.county, self.tract, self.block_group
        )
    }
}

/// Raw counts for one block group, paired with the denominators the
/// percentages need.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockGroupStats {
    pub population: f64,
    pub median_household_income: f64,
    pub housing_units: f64,
    pub occupied_housing_units: f64,
    pub owner_occupied_units: f64,
    pub education_population: f64,
    pub bachelors_or_higher: f64,
    pub commuters: f64,
    pub commute_30_plus: f64,
    pub workers: f64,
    pub work_from_home: f64,
    pub households: f64,
    pub households_200k_plus: f64,
}

impl BlockGroupStats {
    /// Census encodes "not available" as large negatives; clamp every
    /// missing, negative or non-finite count to zero.
    pub fn sanitized(self) -> Self {
        fn clean(v: f64) -> f64 {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                0.0
            }
        }

        Self {
            population: clean(self.population),
            median_household_income: clean(self.median_household_income),
            housing_units: clean(self.housing_units),
            occupied_housing_units: clean(self.occupied_housing_units),
            owner_occupied_units: clean(self.owner_occupied_units),
            education_population: clean(self.education_population),
            bachelors_or_higher: clean(self.bachelors_or_higher),
            commuters: clean(self.commuters),
            commute_30_plus: clean(self.commute_30_plus),
            workers: clean(self.workers),
            work_from_home: clean(self.work_from_home),
            households: clean(self.households),
            households_200k_plus: clean(self.households_200k_plus),
        }
    }
}

/// Aggregated demographics around a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicsSummary {
    pub radius: f64,
    pub total_population: u64,
    pub median_household_income: u64,
    pub total_housing_units: u64,
    pub owner_occupied_percent: f64,
    pub commute_30_plus_percent: f64,
    pub bachelors_degree_percent: f64,
    pub work_from_home_percent: f64,
    pub households_200k_percent: f64,
    pub block_groups_analyzed: usize,
}

impl DemographicsSummary {
    /// Payload returned when no block group produced data.
    pub fn empty(radius: f64) -> Self {
        Self {
            radius,
            total_population: 0,
            median_household_income: 0,
            total_housing_units: 0,
            owner_occupied_percent: 0.0,
            commute_30_plus_percent: 0.0,
            bachelors_degree_percent: 0.0,
            work_from_home_percent: 0.0,
            households_200k_percent: 0.0,
            block_groups_analyzed: 0,
        }
    }
}
