//! Shopping center entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed vocabulary of shopping-center formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CenterType {
    #[serde(rename = "Super Regional Mall")]
    SuperRegionalMall,
    #[serde(rename = "Regional Mall")]
    RegionalMall,
    #[serde(rename = "Community Center")]
    CommunityCenter,
    #[serde(rename = "Neighborhood Center")]
    NeighborhoodCenter,
    #[serde(rename = "Strip/Convenience")]
    StripConvenience,
    #[serde(rename = "Power Center")]
    PowerCenter,
    #[serde(rename = "Lifestyle Center")]
    LifestyleCenter,
    #[serde(rename = "Factory Outlet")]
    FactoryOutlet,
    #[serde(rename = "Theme/Festival")]
    ThemeFestival,
}

impl CenterType {
    pub const ALL: [CenterType; 9] = [
        CenterType::SuperRegionalMall,
        CenterType::RegionalMall,
        CenterType::CommunityCenter,
        CenterType::NeighborhoodCenter,
        CenterType::StripConvenience,
        CenterType::PowerCenter,
        CenterType::LifestyleCenter,
        CenterType::FactoryOutlet,
        CenterType::ThemeFestival,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CenterType::SuperRegionalMall => "Super Regional Mall",
            CenterType::RegionalMall => "Regional Mall",
            CenterType::CommunityCenter => "Community Center",
            CenterType::NeighborhoodCenter => "Neighborhood Center",
            CenterType::StripConvenience => "Strip/Convenience",
            CenterType::PowerCenter => "Power Center",
            CenterType::LifestyleCenter => "Lifestyle Center",
            CenterType::FactoryOutlet => "Factory Outlet",
            CenterType::ThemeFestival => "Theme/Festival",
        }
    }

    /// Case-insensitive exact match against the canonical labels.
    pub fn from_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for CenterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a free-text center type.
///
/// Unrecognised values are kept verbatim so operators can review them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedCenterType {
    Known(CenterType),
    Unrecognized(String),
}

impl ClassifiedCenterType {
    pub fn as_str(&self) -> &str {
        match self {
            ClassifiedCenterType::Known(t) => t.as_str(),
            ClassifiedCenterType::Unrecognized(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, ClassifiedCenterType::Known(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Postal address as imported; every part optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "address_street")]
    pub street: Option<String>,
    #[serde(rename = "address_city")]
    pub city: Option<String>,
    #[serde(rename = "address_state")]
    pub state: Option<String>,
    #[serde(rename = "address_zip")]
    pub zip: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.street.is_none() && self.city.is_none() && self.state.is_none() && self.zip.is_none()
    }

    /// Single-line form used for geocoding queries.
    pub fn one_line(&self) -> String {
        [&self.street, &self.city, &self.state, &self.zip]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Shopping center. `center_key` is unique across the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingCenter {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub center_key: String,
    pub name: String,
    /// Canonical label, or the raw value when it matched nothing.
    pub center_type: Option<String>,
    #[serde(flatten)]
    pub address: Address,
    pub county: Option<String>,
    pub municipality: Option<String>,
    pub owner: Option<String>,
    pub property_manager: Option<String>,
    pub total_gla: Option<i64>,
    pub location: Option<GeoPoint>,
    pub place_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShoppingCenter {
    pub fn new(center_key: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            center_key,
            name,
            center_type: None,
            address: Address::default(),
            county: None,
            municipality: None,
            owner: None,
            property_manager: None,
            total_gla: None,
            location: None,
            place_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_geocoded(&self) -> bool {
        self.location.is_some()
    }
}
