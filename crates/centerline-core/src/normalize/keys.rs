//! Identity keys for centers and spaces

use crate::error::DomainError;

/// Lowercased, trimmed center name. Blank names are rejected.
pub fn center_key(name: &str) -> Result<String, DomainError> {
    let key = name.trim().to_lowercase();
    if key.is_empty() {
        return Err(DomainError::Validation(
            "shopping_center_name is required".to_string(),
        ));
    }
    Ok(key)
}

/// `center_key + suite` when a suite is given. `None` means the space is
/// never deduplicated and a fresh one is created per row.
pub fn space_key(center_key: &str, suite_number: Option<&str>) -> Option<String> {
    let suite = suite_number.map(str::trim).filter(|s| !s.is_empty())?;
    Some(format!("{}{}", center_key, suite))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_key_ignores_case_and_whitespace() {
        let variants = ["Westfield Mall", "  westfield mall", "WESTFIELD MALL \t", "WestField Mall"];
        let keys: Vec<String> = variants.iter().map(|v| center_key(v).unwrap()).collect();
        assert!(keys.iter().all(|k| k == "westfield mall"));
    }

    #[test]
    fn test_center_key_is_idempotent() {
        let once = center_key("  Plaza DEL Sol ").unwrap();
        assert_eq!(center_key(&once).unwrap(), once);
    }

    #[test]
    fn test_center_key_rejects_blank() {
        assert!(matches!(center_key("   "), Err(DomainError::Validation(_))));
        assert!(center_key("").is_err());
    }

    #[test]
    fn test_space_key() {
        assert_eq!(space_key("plaza", Some("101")), Some("plaza101".to_string()));
        assert_eq!(space_key("plaza", Some(" B-2 ")), Some("plazaB-2".to_string()));
        assert_eq!(space_key("plaza", Some("  ")), None);
        assert_eq!(space_key("plaza", None), None);
    }
}
