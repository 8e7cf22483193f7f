//! Center-type and tenant-name classification

use serde::Serialize;

use crate::domain::{CenterType, ClassifiedCenterType};

pub const VACANT: &str = "Vacant";

/// Substring rules tried in order after the exact-label match fails.
/// First hit wins.
fn heuristic_center_type(lower: &str) -> Option<CenterType> {
    let has = |needle: &str| lower.contains(needle);

    if has("strip") || has("convenience") {
        Some(CenterType::StripConvenience)
    } else if has("power") {
        Some(CenterType::PowerCenter)
    } else if has("lifestyle") {
        Some(CenterType::LifestyleCenter)
    } else if has("community") {
        Some(CenterType::CommunityCenter)
    } else if has("neighborhood") || has("neighbourhood") {
        Some(CenterType::NeighborhoodCenter)
    } else if has("regional") && !has("super") {
        Some(CenterType::RegionalMall)
    } else if has("super") && has("regional") {
        Some(CenterType::SuperRegionalMall)
    } else if has("factory") || has("outlet") {
        Some(CenterType::FactoryOutlet)
    } else if has("theme") || has("festival") {
        Some(CenterType::ThemeFestival)
    } else {
        None
    }
}

/// Maps free text onto the nine center types. Blank input yields `None`;
/// input matching no rule is passed through unchanged.
pub fn normalize_center_type(raw: &str) -> Option<ClassifiedCenterType> {
    if raw.trim().is_empty() {
        return None;
    }

    if let Some(exact) = CenterType::from_label(raw) {
        return Some(ClassifiedCenterType::Known(exact));
    }

    let lower = raw.to_lowercase();
    match heuristic_center_type(&lower) {
        Some(t) => Some(ClassifiedCenterType::Known(t)),
        None => Some(ClassifiedCenterType::Unrecognized(raw.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantName {
    pub name: String,
    pub is_vacant: bool,
}

impl TenantName {
    fn vacant(qualifier: Option<&str>) -> Self {
        let name = match qualifier {
            Some(q) => format!("{} ({})", VACANT, q),
            None => VACANT.to_string(),
        };
        Self {
            name,
            is_vacant: true,
        }
    }
}

/// Vacancy qualifiers in precedence order: (substrings, label).
const VACANCY_QUALIFIERS: &[(&[&str], &str)] = &[
    (&["drive-thru", "drive thru", "drive-through", "drive through"], "Drive-Thru"),
    (&["office"], "Office"),
    (&["2nd floor", "2nd-floor", "second floor"], "2nd Floor"),
    (&["restaurant"], "Restaurant"),
    (&["subdivide"], "Subdivide Planned"),
    (&["outparcel", "out parcel", "out-parcel"], "Outparcel"),
];

/// Blank names and anything mentioning "vacant"/"empty" collapse into the
/// vacancy vocabulary; other names are trimmed and kept.
pub fn normalize_tenant_name(raw: &str) -> TenantName {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return TenantName::vacant(None);
    }

    let lower = trimmed.to_lowercase();
    if lower.contains("vacant") || lower.contains("empty") {
        let qualifier = VACANCY_QUALIFIERS
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
            .map(|(_, label)| *label);
        return TenantName::vacant(qualifier);
    }

    TenantName {
        name: trimmed.to_string(),
        is_vacant: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(raw: &str) -> Option<String> {
        normalize_center_type(raw).map(|c| c.as_str().to_string())
    }

    #[test]
    fn test_center_type_blank_is_none() {
        assert_eq!(normalize_center_type(""), None);
        assert_eq!(normalize_center_type("   "), None);
    }

    #[test]
    fn test_center_type_exact_match_any_case() {
        assert_eq!(label("regional mall").as_deref(), Some("Regional Mall"));
        assert_eq!(label("THEME/FESTIVAL").as_deref(), Some("Theme/Festival"));
    }

    #[test]
    fn test_center_type_heuristics() {
        assert_eq!(label("strip mall").as_deref(), Some("Strip/Convenience"));
        assert_eq!(label("Convenience Plaza").as_deref(), Some("Strip/Convenience"));
        assert_eq!(label("power ctr").as_deref(), Some("Power Center"));
        assert_eq!(label("Lifestyle").as_deref(), Some("Lifestyle Center"));
        assert_eq!(label("community shopping ctr").as_deref(), Some("Community Center"));
        assert_eq!(label("Neighbourhood").as_deref(), Some("Neighborhood Center"));
        assert_eq!(label("regional").as_deref(), Some("Regional Mall"));
        assert_eq!(label("Super-Regional").as_deref(), Some("Super Regional Mall"));
        assert_eq!(label("outlets").as_deref(), Some("Factory Outlet"));
        assert_eq!(label("festival marketplace").as_deref(), Some("Theme/Festival"));
    }

    #[test]
    fn test_center_type_precedence() {
        // strip beats power, power beats lifestyle
        assert_eq!(label("power strip").as_deref(), Some("Strip/Convenience"));
        assert_eq!(label("lifestyle power").as_deref(), Some("Power Center"));
        // community beats outlet
        assert_eq!(label("community outlet").as_deref(), Some("Community Center"));
    }

    #[test]
    fn test_center_type_pass_through() {
        let classified = normalize_center_type("Bespoke Mixed-Use").unwrap();
        assert!(!classified.is_known());
        assert_eq!(classified.as_str(), "Bespoke Mixed-Use");
    }

    #[test]
    fn test_tenant_blank_is_vacant() {
        assert_eq!(
            normalize_tenant_name("  "),
            TenantName {
                name: "Vacant".to_string(),
                is_vacant: true
            }
        );
    }

    #[test]
    fn test_tenant_vacancy_qualifiers() {
        let cases = [
            ("Vacant - Drive-Thru", "Vacant (Drive-Thru)"),
            ("VACANT drive thru pad", "Vacant (Drive-Thru)"),
            ("vacant office", "Vacant (Office)"),
            ("Empty 2nd floor", "Vacant (2nd Floor)"),
            ("Vacant restaurant", "Vacant (Restaurant)"),
            ("Vacant - subdivide planned", "Vacant (Subdivide Planned)"),
            ("vacant outparcel", "Vacant (Outparcel)"),
            ("VACANT", "Vacant"),
            ("empty", "Vacant"),
        ];
        for (raw, expected) in cases {
            let n = normalize_tenant_name(raw);
            assert!(n.is_vacant, "{raw} should be vacant");
            assert_eq!(n.name, expected, "for input {raw}");
        }
    }

    #[test]
    fn test_tenant_qualifier_precedence() {
        // drive-thru is checked before office
        assert_eq!(
            normalize_tenant_name("Vacant office w/ drive-thru").name,
            "Vacant (Drive-Thru)"
        );
    }

    #[test]
    fn test_tenant_regular_name_is_trimmed() {
        assert_eq!(
            normalize_tenant_name("  Starbucks "),
            TenantName {
                name: "Starbucks".to_string(),
                is_vacant: false
            }
        );
    }
}
