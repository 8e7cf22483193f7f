//! End-to-end import scenarios over the in-memory store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use centerline_core::domain::{Address, GeoPoint};
use centerline_core::error::DomainError;
use centerline_core::repositories::{CenterStore, GeocodeResult, Geocoder};
use centerline_core::services::{
    CenterEnrichmentService, CenterQueryService, ImportOptions, ImportReconciler,
};
use centerline_infrastructure::MemoryCenterStore;

const HEADER: &str = "shopping_center_name,center_type,address_street,address_city,address_state,address_zip,county,municipality,owner,property_manager,total_gla,tenant_name,tenant_suite_number,square_footage,retail_category,base_rent,is_chain,google_place_id";

fn csv(rows: &[&str]) -> Vec<u8> {
    let mut out = String::from(HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(row);
    }
    out.into_bytes()
}

/// Answers every lookup with a fixed point and counts calls.
#[derive(Default)]
struct FixedGeocoder {
    calls: AtomicUsize,
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, _address: &Address) -> Option<GeocodeResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Some(GeocodeResult {
            location: GeoPoint {
                latitude: 33.68,
                longitude: -117.83,
            },
            place_id: Some("stub-place".to_string()),
        })
    }
}

struct FailingGeocoder;

#[async_trait]
impl Geocoder for FailingGeocoder {
    async fn geocode(&self, _address: &Address) -> Option<GeocodeResult> {
        None
    }
}

fn reconciler(store: &Arc<MemoryCenterStore>, geocoder: Option<Arc<dyn Geocoder>>) -> ImportReconciler {
    ImportReconciler::new(store.clone(), geocoder, ImportOptions::default())
}

fn sample_file() -> Vec<u8> {
    csv(&[
        "Westfield Mall,Super Regional,1 Main St,Irvine,CA,92618,Orange,Irvine,Acme REIT,Acme PM,\"1,200,000\",Starbucks,100,1500,Food & Beverage,\"$45,000\",yes,",
        "WESTFIELD MALL ,,,,,,,,,,,Vacant - Drive-Thru,101,2000,Food & Beverage,,,",
        "Harbor Plaza,strip mall,9 Bay Rd,Newport,CA,92660,Orange,,,,80000,Target,A,30000,General Merchandise,900000,true,",
    ])
}

#[tokio::test]
async fn test_first_import_builds_the_graph() {
    let store = Arc::new(MemoryCenterStore::new());
    let stats = reconciler(&store, None).import_csv(&sample_file()).await.unwrap();

    assert_eq!(stats.rows_processed, 3);
    assert_eq!(stats.shopping_centers_created, 2);
    assert_eq!(stats.shopping_centers_updated, 0);
    assert_eq!(stats.spaces_created, 3);
    // the vacancy tenant is not counted
    assert_eq!(stats.tenants_created, 2);
    assert_eq!(stats.leases_created, 3);
    assert_eq!(stats.geocoded_centers, 0);
    assert_eq!(stats.errors, 0);
    assert_eq!(stats.center_types_processed.get("Super Regional Mall"), Some(&1));
    assert_eq!(stats.center_types_processed.get("Strip/Convenience"), Some(&1));

    let westfield = store.find_center_by_key("westfield mall").await.unwrap().unwrap();
    assert_eq!(westfield.name, "Westfield Mall");
    assert_eq!(westfield.total_gla, Some(1_200_000));
    assert_eq!(westfield.owner.as_deref(), Some("Acme REIT"));
    assert!(westfield.location.is_none());

    let vacant = store.find_tenant_by_name("Vacant (Drive-Thru)").await.unwrap().unwrap();
    assert!(vacant.is_vacant);
    assert!(vacant.category_id.is_none());
    assert!(!vacant.is_national_chain);

    let starbucks = store.find_tenant_by_name("Starbucks").await.unwrap().unwrap();
    assert!(starbucks.is_national_chain);
    assert!(starbucks.category_id.is_some());
}

#[tokio::test]
async fn test_reimport_supersedes_leases_without_duplicating_entities() {
    let store = Arc::new(MemoryCenterStore::new());
    let importer = reconciler(&store, None);
    importer.import_csv(&sample_file()).await.unwrap();
    let second = importer.import_csv(&sample_file()).await.unwrap();

    assert_eq!(second.shopping_centers_created, 0);
    assert_eq!(second.shopping_centers_updated, 2);
    assert_eq!(second.spaces_created, 0);
    assert_eq!(second.tenants_created, 0);
    assert_eq!(second.leases_created, 3);
    assert_eq!(store.list_centers().await.unwrap().len(), 2);

    let rows = store.occupancy(None).await.unwrap();
    assert_eq!(rows.len(), 3);
    for row in &rows {
        let history = store.leases_for_space(row.space_id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().filter(|l| l.is_active).count(), 1);
        assert!(history[0].is_active);
    }
}

#[tokio::test]
async fn test_blank_cells_never_clear_stored_values() {
    let store = Arc::new(MemoryCenterStore::new());
    let importer = reconciler(&store, None);
    importer
        .import_csv(&csv(&["Plaza,,,,,,,,Owner One,,250000,Shop A,1,,,,,"]))
        .await
        .unwrap();
    importer
        .import_csv(&csv(&["plaza,,,,,,Orange,,,,,Shop B,2,,,,,"]))
        .await
        .unwrap();

    let plaza = store.find_center_by_key("plaza").await.unwrap().unwrap();
    assert_eq!(plaza.total_gla, Some(250_000));
    assert_eq!(plaza.owner.as_deref(), Some("Owner One"));
    assert_eq!(plaza.county.as_deref(), Some("Orange"));
}

#[tokio::test]
async fn test_vacancy_tenant_is_shared_across_centers() {
    let store = Arc::new(MemoryCenterStore::new());
    let stats = reconciler(&store, None)
        .import_csv(&csv(&[
            "North Center,,,,,,,,,,,VACANT drive thru pad,1,,Food,,yes,",
            "South Center,,,,,,,,,,,Vacant - Drive-Thru,1,,,,,",
            "South Center,,,,,,,,,,,,2,,,,,",
        ]))
        .await
        .unwrap();

    assert_eq!(stats.tenants_created, 0);
    assert_eq!(stats.spaces_created, 3);
    assert!(store.find_tenant_by_name("Vacant (Drive-Thru)").await.unwrap().is_some());
    assert!(store.find_tenant_by_name("Vacant").await.unwrap().is_some());

    let portfolio = CenterQueryService::new(store.clone())
        .portfolio_vacancy()
        .await
        .unwrap();
    assert_eq!(portfolio.total_spaces, 3);
    assert_eq!(portfolio.vacant_spaces, 3);
    assert_eq!(portfolio.vacancy_by_type.get("Vacant (Drive-Thru)"), Some(&2));
    assert_eq!(portfolio.vacancy_by_type.get("Vacant"), Some(&1));
}

#[tokio::test]
async fn test_suiteless_rows_always_create_spaces() {
    let store = Arc::new(MemoryCenterStore::new());
    let stats = reconciler(&store, None)
        .import_csv(&csv(&[
            "Plaza,,,,,,,,,,,Shop A,,,,,,",
            "Plaza,,,,,,,,,,,Shop A,,,,,,",
        ]))
        .await
        .unwrap();

    assert_eq!(stats.spaces_created, 2);
    assert_eq!(stats.tenants_created, 1);
    assert_eq!(stats.shopping_centers_created, 1);
}

#[tokio::test]
async fn test_row_errors_are_counted_and_sampled() {
    let store = Arc::new(MemoryCenterStore::new());
    let stats = reconciler(&store, None)
        .import_csv(&csv(&[
            "Plaza,,,,,,,,,,,Shop A,1,,,,,",
            "   ,,,,,,,,,,,Orphan,2,,,,,",
            "Plaza,,,,,,,,,,,Shop B,3,,,,,",
        ]))
        .await
        .unwrap();

    assert_eq!(stats.rows_processed, 3);
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.leases_created, 2);
    assert_eq!(stats.sample_errors.len(), 1);
    assert!(stats.sample_errors[0].starts_with("Row 3: "));
    assert!(store.find_tenant_by_name("Orphan").await.unwrap().is_none());
}

#[tokio::test]
async fn test_malformed_file_aborts_import() {
    let store = Arc::new(MemoryCenterStore::new());
    let mut data = csv(&["Plaza,,,,,,,,,,,Shop A,1,,,,,"]);
    data.extend_from_slice(b"\nBroken,row");

    let err = reconciler(&store, None).import_csv(&data).await.unwrap_err();
    assert!(matches!(err, DomainError::Parse(_)));
    assert!(store.list_centers().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_geocoder_runs_once_per_new_center() {
    let store = Arc::new(MemoryCenterStore::new());
    let geocoder = Arc::new(FixedGeocoder::default());
    let importer = reconciler(&store, Some(geocoder.clone()));

    let stats = importer.import_csv(&sample_file()).await.unwrap();
    assert_eq!(stats.geocoded_centers, 2);
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);

    let westfield = store.find_center_by_key("westfield mall").await.unwrap().unwrap();
    assert!(westfield.is_geocoded());
    assert_eq!(westfield.place_id.as_deref(), Some("stub-place"));

    // already geocoded centers are left alone on re-import
    let again = importer.import_csv(&sample_file()).await.unwrap();
    assert_eq!(again.geocoded_centers, 0);
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failed_geocoding_leaves_coordinates_empty() {
    let store = Arc::new(MemoryCenterStore::new());
    let stats = reconciler(&store, Some(Arc::new(FailingGeocoder)))
        .import_csv(&sample_file())
        .await
        .unwrap();

    assert_eq!(stats.geocoded_centers, 0);
    assert_eq!(stats.errors, 0);
    assert_eq!(stats.shopping_centers_created, 2);
}

#[tokio::test]
async fn test_backfill_geocodes_centers_missing_coordinates() {
    let store = Arc::new(MemoryCenterStore::new());
    reconciler(&store, None).import_csv(&sample_file()).await.unwrap();

    let service = CenterEnrichmentService::new(store.clone(), Some(Arc::new(FixedGeocoder::default())));
    let report = service.geocode_missing().await.unwrap();
    assert_eq!(report.centers_considered, 2);
    assert_eq!(report.centers_geocoded, 2);
    assert!(store.centers_missing_location().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unrecognized_center_type_is_kept_verbatim() {
    let store = Arc::new(MemoryCenterStore::new());
    let stats = reconciler(&store, None)
        .import_csv(&csv(&["Depot,Bespoke Mixed-Use,,,,,,,,,,Shop,1,,,,,"]))
        .await
        .unwrap();

    assert!(stats.unrecognized_center_types.contains("Bespoke Mixed-Use"));
    let depot = store.find_center_by_key("depot").await.unwrap().unwrap();
    assert_eq!(depot.center_type.as_deref(), Some("Bespoke Mixed-Use"));
}

#[tokio::test]
async fn test_rent_per_area_and_footage_updates() {
    let store = Arc::new(MemoryCenterStore::new());
    let importer = reconciler(&store, None);
    importer
        .import_csv(&csv(&["Plaza,,,,,,,,,,,Shop A,7,1200,,30000,,"]))
        .await
        .unwrap();
    importer
        .import_csv(&csv(&["Plaza,,,,,,,,,,,Shop B,7,1500,,30000,,"]))
        .await
        .unwrap();

    let center = store.find_center_by_key("plaza").await.unwrap().unwrap();
    let rows = CenterQueryService::new(store.clone())
        .tenants_by_center(center.id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].square_footage, Some(1500));
    assert_eq!(rows[0].tenant_name.as_deref(), Some("Shop B"));
    assert_eq!(rows[0].rent_per_area, Some(20.0));
}

#[tokio::test]
async fn test_oversized_footage_is_dropped_and_vacancy_still_reports() {
    let store = Arc::new(MemoryCenterStore::new());
    let stats = reconciler(&store, None)
        .import_csv(&csv(&[
            "Plaza,,,,,,,,,,,Vacant,A,99999999999999999999999,,,,",
            "Plaza,,,,,,,,,,,Shop B,B,10,,,,",
        ]))
        .await
        .unwrap();
    assert_eq!(stats.errors, 0);

    let center = store.find_center_by_key("plaza").await.unwrap().unwrap();
    let queries = CenterQueryService::new(store.clone());
    let rows = queries.tenants_by_center(center.id).await.unwrap();
    assert_eq!(rows[0].square_footage, None);
    assert_eq!(rows[1].square_footage, Some(10));

    let vacancy = queries.vacancy_stats(center.id).await.unwrap();
    assert_eq!(vacancy.total_square_footage, 10);
    assert_eq!(vacancy.vacant_spaces, 1);
}

#[tokio::test]
async fn test_center_type_from_a_later_row_is_tallied() {
    let store = Arc::new(MemoryCenterStore::new());
    let stats = reconciler(&store, None)
        .import_csv(&csv(&[
            "Plaza,,,,,,,,,,,Shop A,A,1,,,,",
            "Plaza,Power Center,,,,,,,,,,Shop B,B,2,,,,",
        ]))
        .await
        .unwrap();

    assert_eq!(stats.center_types_processed.len(), 1);
    assert_eq!(stats.center_types_processed.get("Power Center"), Some(&1));
    let center = store.find_center_by_key("plaza").await.unwrap().unwrap();
    assert_eq!(center.center_type.as_deref(), Some("Power Center"));
}
