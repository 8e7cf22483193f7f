//! Request DTOs

use serde::Deserialize;
use validator::Validate;

/// `GET /api/demographics` query string. All three fields are required.
#[derive(Debug, Deserialize, Validate)]
pub struct DemographicsQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be within [-90, 90]"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be within [-180, 180]"))]
    pub longitude: f64,

    /// Miles.
    #[validate(range(exclusive_min = 0.0, max = 100.0, message = "radius must be within (0, 100]"))]
    pub radius: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(latitude: f64, longitude: f64, radius: f64) -> DemographicsQuery {
        DemographicsQuery {
            latitude,
            longitude,
            radius,
        }
    }

    #[test]
    fn test_bounds() {
        assert!(query(33.7, -117.8, 3.0).validate().is_ok());
        assert!(query(90.0, 180.0, 100.0).validate().is_ok());
        assert!(query(90.1, 0.0, 1.0).validate().is_err());
        assert!(query(0.0, -180.5, 1.0).validate().is_err());
        assert!(query(0.0, 0.0, 0.0).validate().is_err());
        assert!(query(0.0, 0.0, 100.5).validate().is_err());
    }
}
