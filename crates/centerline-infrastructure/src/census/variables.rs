//! ACS 5-year variables requested per block group

use std::collections::HashMap;

use centerline_core::domain::BlockGroupStats;

pub const TOTAL_POPULATION: &str = "B01003_001E";
pub const MEDIAN_HOUSEHOLD_INCOME: &str = "B19013_001E";
pub const HOUSING_UNITS: &str = "B25001_001E";
pub const OCCUPIED_HOUSING_UNITS: &str = "B25003_001E";
pub const OWNER_OCCUPIED_UNITS: &str = "B25003_002E";
pub const EDUCATION_POPULATION: &str = "B15003_001E";
/// Bachelor's, master's, professional and doctorate degrees.
pub const BACHELORS_OR_HIGHER: [&str; 4] = ["B15003_022E", "B15003_023E", "B15003_024E", "B15003_025E"];
pub const COMMUTERS: &str = "B08303_001E";
/// 30-34, 35-39, 40-44, 45-59, 60-89 and 90+ minute bands.
pub const COMMUTE_30_PLUS: [&str; 6] = [
    "B08303_008E",
    "B08303_009E",
    "B08303_010E",
    "B08303_011E",
    "B08303_012E",
    "B08303_013E",
];
pub const WORKERS: &str = "B08301_001E";
pub const WORK_FROM_HOME: &str = "B08301_021E";
pub const HOUSEHOLDS: &str = "B19001_001E";
pub const HOUSEHOLDS_200K_PLUS: &str = "B19001_017E";

/// Every variable in request order.
pub fn all() -> Vec<&'static str> {
    let mut vars = vec![
        TOTAL_POPULATION,
        MEDIAN_HOUSEHOLD_INCOME,
        HOUSING_UNITS,
        OCCUPIED_HOUSING_UNITS,
        OWNER_OCCUPIED_UNITS,
        EDUCATION_POPULATION,
    ];
    vars.extend(BACHELORS_OR_HIGHER);
    vars.push(COMMUTERS);
    vars.extend(COMMUTE_30_PLUS);
    vars.extend([WORKERS, WORK_FROM_HOME, HOUSEHOLDS, HOUSEHOLDS_200K_PLUS]);
    vars
}

/// Builds statistics from `variable -> value`. Absent variables and census
/// sentinel negatives read as 0.
pub fn to_stats(values: &HashMap<String, f64>) -> BlockGroupStats {
    let get = |name: &str| values.get(name).copied().filter(|v| *v > 0.0).unwrap_or(0.0);
    let sum = |names: &[&str]| names.iter().map(|n| get(n)).sum::<f64>();

    BlockGroupStats {
        population: get(TOTAL_POPULATION),
        median_household_income: get(MEDIAN_HOUSEHOLD_INCOME),
        housing_units: get(HOUSING_UNITS),
        occupied_housing_units: get(OCCUPIED_HOUSING_UNITS),
        owner_occupied_units: get(OWNER_OCCUPIED_UNITS),
        education_population: get(EDUCATION_POPULATION),
        bachelors_or_higher: sum(&BACHELORS_OR_HIGHER),
        commuters: get(COMMUTERS),
        commute_30_plus: sum(&COMMUTE_30_PLUS),
        workers: get(WORKERS),
        work_from_home: get(WORK_FROM_HOME),
        households: get(HOUSEHOLDS),
        households_200k_plus: get(HOUSEHOLDS_200K_PLUS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_list_has_no_duplicates() {
        let vars = all();
        let mut sorted = vars.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), vars.len());
        assert_eq!(vars.len(), 21);
    }

    #[test]
    fn test_bands_are_summed_and_sentinels_zeroed() {
        let mut values = HashMap::new();
        values.insert("B15003_022E".to_string(), 10.0);
        values.insert("B15003_025E".to_string(), 5.0);
        values.insert("B08303_013E".to_string(), 7.0);
        values.insert(MEDIAN_HOUSEHOLD_INCOME.to_string(), -666_666_666.0);

        let stats = to_stats(&values);
        assert_eq!(stats.bachelors_or_higher, 15.0);
        assert_eq!(stats.commute_30_plus, 7.0);
        assert_eq!(stats.median_household_income, 0.0);
        assert_eq!(stats.population, 0.0);
    }
}
