//! Request/response mapping of the census client.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use centerline_core::domain::{BlockGroupId, CensusArea};
use centerline_core::repositories::{CensusAreaResolver, CensusUnitSource};
use centerline_infrastructure::CensusClient;

fn client(server: &MockServer, api_key: Option<&str>) -> CensusClient {
    CensusClient::new(
        format!("{}/data/2022/acs/acs5", server.uri()),
        format!("{}/api/census/area", server.uri()),
        api_key.map(str::to_string),
        Duration::from_secs(5),
    )
}

fn area() -> CensusArea {
    CensusArea {
        state: "06".to_string(),
        county: "059".to_string(),
    }
}

#[tokio::test]
async fn test_area_lookup_reads_state_and_county_suffix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/census/area"))
        .and(query_param("latitude", "33.68"))
        .and(query_param("longitude", "-117.83"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "block_fips": "060590626101000",
                "county_fips": "06059",
                "county_name": "Orange County",
                "state_fips": "06",
                "state_code": "CA"
            }]
        })))
        .mount(&server)
        .await;

    let resolved = client(&server, None).resolve_area(33.68, -117.83).await.unwrap();
    assert_eq!(resolved, area());
}

#[tokio::test]
async fn test_area_lookup_without_results_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/census/area"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;

    assert!(client(&server, None).resolve_area(0.0, 0.0).await.is_err());
}

#[tokio::test]
async fn test_block_groups_are_enumerated_from_header_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2022/acs/acs5"))
        .and(query_param("for", "block group:*"))
        .and(query_param("in", "state:06 county:059 tract:*"))
        .and(query_param("key", "census-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            ["NAME", "state", "county", "tract", "block group"],
            ["Block Group 1", "06", "059", "062610", "1"],
            ["Block Group 2", "06", "059", "062610", "2"]
        ])))
        .mount(&server)
        .await;

    let units = client(&server, Some("census-key"))
        .list_block_groups(&area())
        .await
        .unwrap();
    assert_eq!(units.len(), 2);
    assert_eq!(units[1].tract, "062610");
    assert_eq!(units[1].block_group, "2");
    assert_eq!(units[1].to_string(), "060590626102");
}

#[tokio::test]
async fn test_block_group_statistics_are_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2022/acs/acs5"))
        .and(query_param("for", "block group:1"))
        .and(query_param("in", "state:06 county:059 tract:062610"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [
                "NAME", "B01003_001E", "B19013_001E", "B25003_001E", "B25003_002E",
                "B15003_022E", "B15003_023E", "B08301_001E", "B08301_021E",
                "state", "county", "tract", "block group"
            ],
            [
                "Block Group 1", "1200", "-666666666", "400", "300",
                "100", "50", "600", null,
                "06", "059", "062610", "1"
            ]
        ])))
        .mount(&server)
        .await;

    let unit = BlockGroupId {
        state: "06".to_string(),
        county: "059".to_string(),
        tract: "062610".to_string(),
        block_group: "1".to_string(),
    };
    let stats = client(&server, None)
        .fetch_block_group(&unit)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stats.population, 1200.0);
    assert_eq!(stats.median_household_income, 0.0);
    assert_eq!(stats.occupied_housing_units, 400.0);
    assert_eq!(stats.owner_occupied_units, 300.0);
    assert_eq!(stats.bachelors_or_higher, 150.0);
    assert_eq!(stats.workers, 600.0);
    assert_eq!(stats.work_from_home, 0.0);
}

#[tokio::test]
async fn test_no_content_means_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2022/acs/acs5"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let census = client(&server, None);
    assert!(census.list_block_groups(&area()).await.unwrap().is_empty());

    let unit = BlockGroupId {
        state: "06".to_string(),
        county: "059".to_string(),
        tract: "062610".to_string(),
        block_group: "9".to_string(),
    };
    assert!(census.fetch_block_group(&unit).await.unwrap().is_none());
}

#[tokio::test]
async fn test_server_errors_surface_as_enrichment_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let err = client(&server, None).list_block_groups(&area()).await.unwrap_err();
    assert!(err.to_string().contains("503"));
}
